//! Self-reduction: an operator folded over one container's own elements.
//!
//! Folds run left to right from the first element. Every kind returns the
//! identity for an empty container without folding: `""` for string kinds,
//! integer `0` for everything else, whatever the operator.

use lat_ir::ArithOp;
use lat_stack::ensure_sufficient_stack;
use lat_value::{type_error, Element, EvalResult, Scalar, Value};

use crate::build::tensor_elements;
use crate::kernel::fold;
use crate::operators::evaluate_binary;
use crate::set::members;

/// Fold `op` over the elements of `value`. Scalars reduce to themselves.
pub fn self_reduce(value: Value, op: ArithOp) -> EvalResult {
    match value {
        Value::Zero
        | Value::Short(_)
        | Value::Integer(_)
        | Value::Float32(_)
        | Value::Float64(_) => Ok(value),
        Value::Nil => Err(type_error(op.as_symbol(), value.type_name())),
        Value::Str(_) if op.applies_to_strings() => Ok(value),
        Value::StringVector(v) if op.applies_to_strings() => Ok(Value::string(v.concat())),
        Value::Str(_) | Value::StringVector(_) => {
            Err(type_error(op.as_symbol(), value.type_name()).with_operand(&value))
        }
        Value::IntVector(v) => numeric(v.as_slice(), op),
        Value::ShortVector(v) => numeric(v.as_slice(), op),
        Value::FloatVector(v) => scalars(v.iter().map(|x| x.to_scalar()), op),
        Value::NumberVector(v) => scalars(v.iter().map(|x| x.to_scalar()), op),
        Value::IntSet(_) | Value::NumberSet(_) => scalars(members(&value).unwrap_or_default(), op),
        Value::Matrix32(m) => scalars(m.rows().flatten().map(|x| x.to_scalar()), op),
        Value::Matrix64(m) => scalars(m.rows().flatten().map(|x| x.to_scalar()), op),
        Value::Tensor32(t) => scalars(tensor_elements(&*t), op),
        Value::Tensor64(t) => scalars(tensor_elements(&*t), op),
        Value::List(items) => children(items.into_inner(), op),
        Value::LinkedList(list) => children(list.iter().cloned().collect(), op),
    }
}

fn scalars(items: impl IntoIterator<Item = Scalar>, op: ArithOp) -> EvalResult {
    Ok(fold(items, op)?.map_or(Value::Integer(0), Scalar::into_value))
}

/// Integer vectors short-circuit a product containing zero.
fn numeric<T: Element>(items: &[T], op: ArithOp) -> EvalResult {
    if op == ArithOp::Mul {
        if let Some(zero) = items.iter().find(|x| x.to_scalar().is_zero()) {
            return Ok(zero.to_scalar().into_value());
        }
    }
    scalars(items.iter().map(|x| x.to_scalar()), op)
}

/// Left-fold through the full operator protocol; the accumulator's kind
/// may change as promotions occur.
fn children(items: Vec<Value>, op: ArithOp) -> EvalResult {
    let mut items = items.into_iter();
    let Some(mut acc) = items.next() else {
        return Ok(Value::Integer(0));
    };
    for child in items {
        acc = ensure_sufficient_stack(|| evaluate_binary(acc, child, op))?;
    }
    Ok(acc)
}
