//! Binary operator dispatch over the value kind lattice.
//!
//! Each pair of operand kinds is routed to the module that owns the
//! receiver. Broadcasting is always implemented on the container side: a
//! scalar on the left of a container either swaps with it (commutative
//! operators) or runs the container's kernel with the operands flipped.
//!
//! Precedence of the container families, highest first:
//! list, string, tensor, matrix, set, vector.

use lat_ir::ArithOp;
use lat_value::{type_error, EvalResult, Scalar, Value, ValueKind};

use crate::reduce::self_reduce;
use crate::{list, matrix, scalar, set, tensor, text, vector};

/// Coarse operand classification used for dispatch.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Family {
    Nil,
    Scalar,
    Text,
    Vector,
    Set,
    Matrix,
    Tensor,
    List,
}

impl Family {
    fn of(value: &Value) -> Self {
        match value.kind() {
            ValueKind::Nil => Family::Nil,
            ValueKind::Zero
            | ValueKind::Short
            | ValueKind::Integer
            | ValueKind::Float32
            | ValueKind::Float64 => Family::Scalar,
            ValueKind::String | ValueKind::StringVector => Family::Text,
            ValueKind::IntVector
            | ValueKind::ShortVector
            | ValueKind::FloatVector
            | ValueKind::NumberVector => Family::Vector,
            ValueKind::IntSet | ValueKind::NumberSet => Family::Set,
            ValueKind::Matrix32 | ValueKind::Matrix64 => Family::Matrix,
            ValueKind::Tensor32 | ValueKind::Tensor64 => Family::Tensor,
            ValueKind::List | ValueKind::LinkedList => Family::List,
        }
    }
}

/// Apply `op` to two evaluated operands.
///
/// `left` is the receiver: when it is `Mutable` its payload may be
/// rewritten and returned, when it is `Constant` a new value is allocated.
/// A `Nil` right operand selects the self-reducing form.
pub fn evaluate_binary(left: Value, right: Value, op: ArithOp) -> EvalResult {
    use Family as F;

    match (Family::of(&left), Family::of(&right)) {
        (_, F::Nil) => self_reduce(left, op),
        (F::Nil, _) => Err(type_error(op.as_symbol(), left.type_name()).with_operand(&right)),
        (F::List, _) => list::eval_list_binary(left, &right, op),
        (F::Vector, F::List) => list::vector_against_list(left, &right, op),
        (_, F::List) => list::broadcast_onto_list(&left, right, op),
        (F::Text, _) | (_, F::Text) => text::eval_text_binary(left, right, op),
        (F::Scalar, F::Scalar) => scalar_pair(&left, &right, op),
        (F::Scalar, F::Tensor) if op.is_commutative() => {
            tensor::eval_tensor_binary(right, &left, op)
        }
        (F::Scalar, F::Matrix) if op.is_commutative() => {
            matrix::eval_matrix_binary(right, &left, op)
        }
        (F::Scalar, F::Set) if op.is_commutative() => set::eval_set_binary(&right, &left, op),
        (F::Scalar, F::Vector) if op.is_commutative() => {
            vector::eval_vector_binary(right, &left, op)
        }
        (F::Tensor, _) => tensor::eval_tensor_binary(left, &right, op),
        (_, F::Tensor) => tensor::broadcast_onto_tensor(&left, right, op),
        (F::Matrix, _) => matrix::eval_matrix_binary(left, &right, op),
        (_, F::Matrix) => matrix::broadcast_onto_matrix(&left, right, op),
        (F::Set, _) => set::eval_set_binary(&left, &right, op),
        (_, F::Set) => set::broadcast_onto_set(&left, &right, op),
        (F::Vector, _) => vector::eval_vector_binary(left, &right, op),
        (F::Scalar, F::Vector) => vector::broadcast_onto_vector(&left, right, op),
    }
}

fn scalar_pair(left: &Value, right: &Value, op: ArithOp) -> EvalResult {
    match (Scalar::from_value(left), Scalar::from_value(right)) {
        (Some(a), Some(b)) => Ok(scalar::apply(a, b, op)?.into_value()),
        _ => Err(type_error(op.as_symbol(), left.type_name())),
    }
}
