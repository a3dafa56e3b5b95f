//! Element-wise matrix arithmetic.
//!
//! A matrix combines with a scalar (every element), a vector (broadcast
//! across every row by column position) or another matrix (row by row).
//! Rows and columns pair up to the shorter extent; the receiver's excess
//! is left untouched. `*` is element-wise here; the matrix product lives in
//! [`linalg`](crate::linalg).

use lat_ir::ArithOp;
use lat_value::{Element, EvalError, EvalResult, FloatElement, Heap, MatrixValue, Scalar, Value};

use crate::kernel::Kernel;

/// The right-hand side of an element-wise operation on a grid.
pub(crate) enum Operand<'a, S> {
    Scalar(Scalar),
    Row(&'a [S]),
    Matrix(&'a MatrixValue<S>),
}

/// A receiver made of matrices: a matrix itself, or a tensor's blocks.
pub(crate) trait Grid {
    /// Scan for zero divisors without writing.
    fn check<S: Element>(&self, operand: &Operand<'_, S>, kernel: Kernel) -> Result<(), EvalError>;

    /// Write the results; only called after `check` succeeded.
    fn write<S: Element>(&mut self, operand: &Operand<'_, S>, kernel: Kernel)
        -> Result<(), EvalError>;
}

impl<T: Element> Grid for MatrixValue<T> {
    fn check<S: Element>(&self, operand: &Operand<'_, S>, kernel: Kernel) -> Result<(), EvalError> {
        match operand {
            Operand::Scalar(s) => self.rows().try_for_each(|row| kernel.check_scalar(row, *s)),
            Operand::Row(v) => self.rows().try_for_each(|row| kernel.check_zip(row, *v)),
            Operand::Matrix(m) => self
                .rows()
                .zip(m.rows())
                .try_for_each(|(row, other)| kernel.check_zip(row, other)),
        }
    }

    fn write<S: Element>(
        &mut self,
        operand: &Operand<'_, S>,
        kernel: Kernel,
    ) -> Result<(), EvalError> {
        match operand {
            Operand::Scalar(s) => self.rows_mut().try_for_each(|row| kernel.map(row, *s)),
            Operand::Row(v) => self.rows_mut().try_for_each(|row| kernel.zip(row, *v)),
            Operand::Matrix(m) => self
                .rows_mut()
                .zip(m.rows())
                .try_for_each(|(row, other)| kernel.zip(row, other)),
        }
    }
}

/// Check every divisor, then write through the mutate-or-allocate rule.
fn run<G: Grid + Clone, S: Element>(
    target: &mut Heap<G>,
    operand: &Operand<'_, S>,
    kernel: Kernel,
) -> Result<(), EvalError> {
    target.check(operand, kernel)?;
    target.make_mut().write(operand, kernel)
}

/// Combine `target` with a scalar, numeric vector or matrix `operand`.
///
/// Returns `Ok(false)` for any other operand so the caller can report the
/// mismatch with its own kind names.
pub(crate) fn apply_operand<G: Grid + Clone>(
    target: &mut Heap<G>,
    operand: &Value,
    kernel: Kernel,
) -> Result<bool, EvalError> {
    match operand {
        Value::Matrix32(m) => run(target, &Operand::Matrix(&**m), kernel)?,
        Value::Matrix64(m) => run(target, &Operand::Matrix(&**m), kernel)?,
        Value::IntVector(v) => run(target, &Operand::Row(v.as_slice()), kernel)?,
        Value::ShortVector(v) => run(target, &Operand::Row(v.as_slice()), kernel)?,
        Value::FloatVector(v) => run(target, &Operand::Row(v.as_slice()), kernel)?,
        Value::NumberVector(v) => run(target, &Operand::Row(v.as_slice()), kernel)?,
        other => match Scalar::from_value(other) {
            Some(s) => run(target, &Operand::<f64>::Scalar(s), kernel)?,
            None => return Ok(false),
        },
    }
    Ok(true)
}

/// `matrix op right`.
pub(crate) fn eval_matrix_binary(left: Value, right: &Value, op: ArithOp) -> EvalResult {
    let kernel = Kernel::new(op);
    match left {
        Value::Matrix32(m) => matrix_op(m, right, kernel),
        Value::Matrix64(m) => matrix_op(m, right, kernel),
        other => Err(kernel.mismatch(other.type_name(), right.type_name())),
    }
}

/// `left op matrix` for a scalar or vector `left`. The matrix is the
/// receiver, so the result keeps the matrix kind.
pub(crate) fn broadcast_onto_matrix(left: &Value, right: Value, op: ArithOp) -> EvalResult {
    let kernel = Kernel::flipped(op);
    match right {
        Value::Matrix32(m) => matrix_op(m, left, kernel),
        Value::Matrix64(m) => matrix_op(m, left, kernel),
        other => Err(kernel.mismatch(other.type_name(), left.type_name())),
    }
}

fn matrix_op<T: FloatElement>(
    mut target: Heap<MatrixValue<T>>,
    operand: &Value,
    kernel: Kernel,
) -> EvalResult {
    if apply_operand(&mut target, operand, kernel)? {
        Ok(T::matrix_heap(target))
    } else {
        Err(kernel.mismatch(T::MATRIX_KIND.name(), operand.type_name()))
    }
}

#[cfg(test)]
mod tests;
