//! Homogeneous numeric vector arithmetic.
//!
//! A vector combines with a scalar (broadcast) or with another numeric
//! vector (truncating zip). Results are written into the receiver's element
//! kind, so a cross-kind operation into a lower-ranked receiver narrows
//! silently: `[1 2] * 1.5` on shorts is `[1 3]`.
//!
//! Float and number vectors take the batched path for `+ - * /` when the
//! operand is a same-kind vector or a scalar that does not outrank the
//! elements. Divisors are checked before either path writes.

use std::slice;

use lat_ir::ArithOp;
use lat_value::{Element, EvalError, EvalResult, Heap, Scalar, Value};

use crate::batch::{self, BatchOp, Lane};
use crate::kernel::Kernel;

/// Vector element types, with an optional batched write.
trait VectorElement: Element {
    /// Write the whole operation through the batched kernel. Returns `false`
    /// when the operator or operand has no batched form.
    fn write_batched(_items: &mut [Self], _operand: &Value, _kernel: Kernel) -> bool {
        false
    }
}

impl VectorElement for i16 {}

impl VectorElement for i64 {}

impl VectorElement for f32 {
    fn write_batched(items: &mut [Self], operand: &Value, kernel: Kernel) -> bool {
        write_lanes(items, operand, kernel)
    }
}

impl VectorElement for f64 {
    fn write_batched(items: &mut [Self], operand: &Value, kernel: Kernel) -> bool {
        write_lanes(items, operand, kernel)
    }
}

fn write_lanes<T: Element + Lane>(items: &mut [T], operand: &Value, kernel: Kernel) -> bool {
    let Some(op) = BatchOp::from_op(kernel.op) else {
        return false;
    };
    if !batch::worthwhile::<T>(items.len()) {
        return false;
    }
    if let Some(src) = T::as_vector(operand) {
        tracing::trace!(len = items.len(), ?op, "batched vector zip");
        batch::zip(items, src.as_slice(), op, kernel.flipped);
        return true;
    }
    match Scalar::from_value(operand) {
        Some(s) if s.rank() <= T::RANK => {
            tracing::trace!(len = items.len(), ?op, "batched scalar broadcast");
            batch::map(items, T::from_scalar(s), op, kernel.flipped);
            true
        }
        _ => false,
    }
}

/// `vector op right` for a numeric vector `left`.
pub(crate) fn eval_vector_binary(left: Value, right: &Value, op: ArithOp) -> EvalResult {
    let kernel = Kernel::new(op);
    match left {
        Value::IntVector(v) => numeric(v, right, kernel),
        Value::ShortVector(v) => numeric(v, right, kernel),
        Value::FloatVector(v) => numeric(v, right, kernel),
        Value::NumberVector(v) => numeric(v, right, kernel),
        other => Err(kernel.mismatch(other.type_name(), right.type_name())),
    }
}

/// `scalar op vector`: the vector is the receiver and keeps its kind.
pub(crate) fn broadcast_onto_vector(left: &Value, right: Value, op: ArithOp) -> EvalResult {
    let kernel = Kernel::flipped(op);
    match right {
        Value::IntVector(v) => numeric(v, left, kernel),
        Value::ShortVector(v) => numeric(v, left, kernel),
        Value::FloatVector(v) => numeric(v, left, kernel),
        Value::NumberVector(v) => numeric(v, left, kernel),
        other => Err(kernel.mismatch(other.type_name(), left.type_name())),
    }
}

/// `vector op numbers` for the numbers read out of a flat list: positional
/// zip up to the shorter length, written into the vector's kind.
pub(crate) fn zip_scalars(left: Value, numbers: &[Scalar], op: ArithOp) -> EvalResult {
    let kernel = Kernel::new(op);
    match left {
        Value::IntVector(v) => zip_numbers(v, numbers, kernel),
        Value::ShortVector(v) => zip_numbers(v, numbers, kernel),
        Value::FloatVector(v) => zip_numbers(v, numbers, kernel),
        Value::NumberVector(v) => zip_numbers(v, numbers, kernel),
        other => Err(kernel.mismatch(other.type_name(), "list")),
    }
}

fn zip_numbers<T: Element>(
    mut target: Heap<Vec<T>>,
    numbers: &[Scalar],
    kernel: Kernel,
) -> EvalResult {
    for (x, &s) in target.as_slice().iter().zip(numbers) {
        kernel.check_scalar(slice::from_ref(x), s)?;
    }
    for (x, &s) in target.make_mut().iter_mut().zip(numbers) {
        kernel.map(slice::from_mut(x), s)?;
    }
    Ok(T::vector_heap(target))
}

fn numeric<T: VectorElement>(
    mut target: Heap<Vec<T>>,
    operand: &Value,
    kernel: Kernel,
) -> EvalResult {
    check(target.as_slice(), operand, kernel)?;
    let items = target.make_mut().as_mut_slice();
    if !T::write_batched(items, operand, kernel) {
        write(items, operand, kernel)?;
    }
    Ok(T::vector_heap(target))
}

fn check<T: Element>(items: &[T], operand: &Value, kernel: Kernel) -> Result<(), EvalError> {
    match operand {
        Value::IntVector(v) => kernel.check_zip(items, v.as_slice()),
        Value::ShortVector(v) => kernel.check_zip(items, v.as_slice()),
        Value::FloatVector(v) => kernel.check_zip(items, v.as_slice()),
        Value::NumberVector(v) => kernel.check_zip(items, v.as_slice()),
        other => match Scalar::from_value(other) {
            Some(s) => kernel.check_scalar(items, s),
            None => Err(kernel.mismatch(T::VECTOR_KIND.name(), other.type_name())),
        },
    }
}

fn write<T: Element>(items: &mut [T], operand: &Value, kernel: Kernel) -> Result<(), EvalError> {
    match operand {
        Value::IntVector(v) => kernel.zip(items, v.as_slice()),
        Value::ShortVector(v) => kernel.zip(items, v.as_slice()),
        Value::FloatVector(v) => kernel.zip(items, v.as_slice()),
        Value::NumberVector(v) => kernel.zip(items, v.as_slice()),
        other => match Scalar::from_value(other) {
            Some(s) => kernel.map(items, s),
            None => Err(kernel.mismatch(T::VECTOR_KIND.name(), other.type_name())),
        },
    }
}
