//! Element-wise tensor arithmetic.
//!
//! Scalars, vectors and matrices broadcast onto every rank-2 block of a
//! tensor. Two tensors of equal rank pair up block by block, truncating to
//! the shorter extent at every depth.

use lat_ir::ArithOp;
use lat_stack::ensure_sufficient_stack;
use lat_value::{
    shape_error, Element, EvalError, EvalResult, FloatElement, Heap, TensorBlock, TensorValue,
    Value,
};

use crate::kernel::Kernel;
use crate::matrix::{apply_operand, Grid, Operand};

impl<T: Element> Grid for TensorValue<T> {
    fn check<S: Element>(&self, operand: &Operand<'_, S>, kernel: Kernel) -> Result<(), EvalError> {
        self.blocks().iter().try_for_each(|block| match block {
            TensorBlock::Matrix(m) => m.check(operand, kernel),
            TensorBlock::Tensor(t) => ensure_sufficient_stack(|| t.check(operand, kernel)),
        })
    }

    fn write<S: Element>(
        &mut self,
        operand: &Operand<'_, S>,
        kernel: Kernel,
    ) -> Result<(), EvalError> {
        self.blocks_mut().iter_mut().try_for_each(|block| match block {
            TensorBlock::Matrix(m) => m.write(operand, kernel),
            TensorBlock::Tensor(t) => ensure_sufficient_stack(|| t.write(operand, kernel)),
        })
    }
}

#[cold]
fn rank_mismatch(left: usize, right: usize) -> EvalError {
    shape_error(format!(
        "cannot combine a rank {left} tensor with a rank {right} tensor"
    ))
}

fn check_pair<T: Element, S: Element>(
    dst: &TensorValue<T>,
    src: &TensorValue<S>,
    kernel: Kernel,
) -> Result<(), EvalError> {
    dst.blocks()
        .iter()
        .zip(src.blocks())
        .try_for_each(|pair| match pair {
            (TensorBlock::Matrix(a), TensorBlock::Matrix(b)) => {
                a.check(&Operand::Matrix(b), kernel)
            }
            (TensorBlock::Tensor(a), TensorBlock::Tensor(b)) => {
                ensure_sufficient_stack(|| check_pair(a, b, kernel))
            }
            (a, b) => Err(rank_mismatch(a.shape().len(), b.shape().len())),
        })
}

fn write_pair<T: Element, S: Element>(
    dst: &mut TensorValue<T>,
    src: &TensorValue<S>,
    kernel: Kernel,
) -> Result<(), EvalError> {
    dst.blocks_mut()
        .iter_mut()
        .zip(src.blocks())
        .try_for_each(|pair| match pair {
            (TensorBlock::Matrix(a), TensorBlock::Matrix(b)) => {
                a.write(&Operand::Matrix(b), kernel)
            }
            (TensorBlock::Tensor(a), TensorBlock::Tensor(b)) => {
                ensure_sufficient_stack(|| write_pair(a, b, kernel))
            }
            (a, b) => Err(rank_mismatch(a.shape().len(), b.shape().len())),
        })
}

fn combine<T: FloatElement, S: Element>(
    target: &mut Heap<TensorValue<T>>,
    other: &TensorValue<S>,
    kernel: Kernel,
) -> Result<(), EvalError> {
    if target.rank() != other.rank() {
        return Err(rank_mismatch(target.rank(), other.rank()));
    }
    check_pair(&**target, other, kernel)?;
    write_pair(target.make_mut(), other, kernel)
}

/// `tensor op right`.
pub(crate) fn eval_tensor_binary(left: Value, right: &Value, op: ArithOp) -> EvalResult {
    let kernel = Kernel::new(op);
    match left {
        Value::Tensor32(t) => tensor_op(t, right, kernel),
        Value::Tensor64(t) => tensor_op(t, right, kernel),
        other => Err(kernel.mismatch(other.type_name(), right.type_name())),
    }
}

/// `left op tensor` for a scalar, vector or matrix `left`; the result keeps
/// the tensor kind.
pub(crate) fn broadcast_onto_tensor(left: &Value, right: Value, op: ArithOp) -> EvalResult {
    let kernel = Kernel::flipped(op);
    match right {
        Value::Tensor32(t) => tensor_op(t, left, kernel),
        Value::Tensor64(t) => tensor_op(t, left, kernel),
        other => Err(kernel.mismatch(other.type_name(), left.type_name())),
    }
}

fn tensor_op<T: FloatElement>(
    mut target: Heap<TensorValue<T>>,
    operand: &Value,
    kernel: Kernel,
) -> EvalResult {
    match operand {
        Value::Tensor32(other) => combine(&mut target, other, kernel)?,
        Value::Tensor64(other) => combine(&mut target, other, kernel)?,
        other => {
            if !apply_operand(&mut target, other, kernel)? {
                return Err(kernel.mismatch(T::TENSOR_KIND.name(), other.type_name()));
            }
        }
    }
    Ok(T::tensor_heap(target))
}
