//! Heterogeneous list arithmetic.
//!
//! Lists and linked lists recurse into the operator protocol one child at a
//! time: against another list they pair children positionally (truncating
//! zip), against anything else every child is combined with the operand.
//! A numeric vector on the left instead zips into a flat list, or into each
//! row of a list of lists.
//! Children may themselves be lists, so every step grows the stack on
//! demand.

use std::mem;

use lat_ir::ArithOp;
use lat_stack::ensure_sufficient_stack;
use lat_value::{EvalError, EvalResult, Scalar, Value};

use crate::kernel::Kernel;
use crate::operators::evaluate_binary;
use crate::vector;

/// Replace `slot` with `f(slot)`.
///
/// The child is moved out, so a uniquely owned child is updated in place.
fn rewrite(slot: &mut Value, f: impl FnOnce(Value) -> EvalResult) -> Result<(), EvalError> {
    let child = mem::replace(slot, Value::Nil);
    *slot = ensure_sufficient_stack(|| f(child))?;
    Ok(())
}

fn zip_children<'a, 'b>(
    dst: impl Iterator<Item = &'a mut Value>,
    src: impl Iterator<Item = &'b Value>,
    op: ArithOp,
) -> Result<(), EvalError> {
    for (slot, other) in dst.zip(src) {
        rewrite(slot, |child| evaluate_binary(child, other.clone(), op))?;
    }
    Ok(())
}

fn apply_children<'a>(
    dst: impl Iterator<Item = &'a mut Value>,
    operand: &Value,
    flipped: bool,
    op: ArithOp,
) -> Result<(), EvalError> {
    for slot in dst {
        rewrite(slot, |child| {
            if flipped {
                evaluate_binary(operand.clone(), child, op)
            } else {
                evaluate_binary(child, operand.clone(), op)
            }
        })?;
    }
    Ok(())
}

/// `list op right` for a list or linked list `left`.
pub(crate) fn eval_list_binary(left: Value, right: &Value, op: ArithOp) -> EvalResult {
    match left {
        Value::List(mut items) => {
            let dst = items.make_mut().iter_mut();
            match right {
                Value::List(other) => zip_children(dst, other.iter(), op)?,
                Value::LinkedList(other) => zip_children(dst, other.iter(), op)?,
                _ => apply_children(dst, right, false, op)?,
            }
            Ok(Value::List(items))
        }
        Value::LinkedList(mut list) => {
            let dst = list.make_mut().iter_mut();
            match right {
                Value::List(other) => zip_children(dst, other.iter(), op)?,
                Value::LinkedList(other) => zip_children(dst, other.iter(), op)?,
                _ => apply_children(dst, right, false, op)?,
            }
            Ok(Value::LinkedList(list))
        }
        other => Err(Kernel::new(op).mismatch(other.type_name(), right.type_name())),
    }
}

fn is_list(value: &Value) -> bool {
    matches!(value, Value::List(_) | Value::LinkedList(_))
}

/// `vector op list` for a numeric vector `left`.
///
/// A list whose children are all lists is walked row by row: each result is
/// `left op row`, collected into the list's kind. Any other list is read as
/// numbers and zipped into the vector, which keeps its kind.
pub(crate) fn vector_against_list(left: Value, right: &Value, op: ArithOp) -> EvalResult {
    let (children, linked): (Vec<&Value>, bool) = match right {
        Value::List(items) => (items.iter().collect(), false),
        Value::LinkedList(list) => (list.iter().collect(), true),
        other => return Err(Kernel::new(op).mismatch(left.type_name(), other.type_name())),
    };
    if !children.is_empty() && children.iter().all(|child| is_list(child)) {
        // A failing row drops the rows already computed with the Vec.
        let rows = children
            .into_iter()
            .map(|row| ensure_sufficient_stack(|| evaluate_binary(left.clone(), row.clone(), op)))
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(if linked {
            Value::linked_list(rows)
        } else {
            Value::list(rows)
        });
    }
    let numbers = children
        .into_iter()
        .map(|child| {
            Scalar::from_value(child)
                .ok_or_else(|| Kernel::new(op).mismatch(left.type_name(), child.type_name()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    vector::zip_scalars(left, &numbers, op)
}

/// `left op list` for a non-list `left`: one result per child, collected
/// into the list's kind.
pub(crate) fn broadcast_onto_list(left: &Value, right: Value, op: ArithOp) -> EvalResult {
    match right {
        Value::List(mut items) => {
            apply_children(items.make_mut().iter_mut(), left, true, op)?;
            Ok(Value::List(items))
        }
        Value::LinkedList(mut list) => {
            apply_children(list.make_mut().iter_mut(), left, true, op)?;
            Ok(Value::LinkedList(list))
        }
        other => Err(Kernel::flipped(op).mismatch(other.type_name(), left.type_name())),
    }
}
