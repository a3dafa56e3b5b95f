//! Integer and number set arithmetic.
//!
//! Sets are never written in place. Every operation collects its results
//! into a new set of the receiver's kind, so results that collide merge.
//! Two sets pair members by iteration order, not by value, stopping at the
//! shorter set.

use std::collections::BTreeSet;

use lat_ir::ArithOp;
use lat_value::{EvalError, EvalResult, Scalar, SetFloat, Value, ValueKind};

use crate::kernel::Kernel;
use crate::scalar::apply_ordered;

/// A member type of one of the two set kinds.
trait SetMember: Ord + Copy {
    const KIND: ValueKind;

    fn to_scalar(self) -> Scalar;

    fn from_scalar(scalar: Scalar) -> Self;

    fn into_value(members: BTreeSet<Self>) -> Value;
}

impl SetMember for i64 {
    const KIND: ValueKind = ValueKind::IntSet;

    fn to_scalar(self) -> Scalar {
        Scalar::Integer(self)
    }

    fn from_scalar(scalar: Scalar) -> Self {
        scalar.to_i64()
    }

    fn into_value(members: BTreeSet<Self>) -> Value {
        Value::int_set(members)
    }
}

impl SetMember for SetFloat {
    const KIND: ValueKind = ValueKind::NumberSet;

    fn to_scalar(self) -> Scalar {
        Scalar::Float64(self.get())
    }

    fn from_scalar(scalar: Scalar) -> Self {
        SetFloat(scalar.to_f64())
    }

    fn into_value(members: BTreeSet<Self>) -> Value {
        Value::number_set(members)
    }
}

/// Members of either set kind as scalars, in iteration order.
pub(crate) fn members(value: &Value) -> Option<Vec<Scalar>> {
    match value {
        Value::IntSet(s) => Some(s.iter().map(|&n| n.to_scalar()).collect()),
        Value::NumberSet(s) => Some(s.iter().map(|&f| f.to_scalar()).collect()),
        _ => None,
    }
}

fn combine<T: SetMember>(set: &BTreeSet<T>, operand: &Value, kernel: Kernel) -> EvalResult {
    let result: Result<BTreeSet<T>, EvalError> = if let Some(others) = members(operand) {
        set.iter()
            .zip(others)
            .map(|(&x, y)| apply_ordered(x.to_scalar(), y, kernel.op, kernel.flipped))
            .map(|r| r.map(T::from_scalar))
            .collect()
    } else if let Some(s) = Scalar::from_value(operand) {
        set.iter()
            .map(|&x| apply_ordered(x.to_scalar(), s, kernel.op, kernel.flipped))
            .map(|r| r.map(T::from_scalar))
            .collect()
    } else {
        return Err(kernel.mismatch(T::KIND.name(), operand.type_name()));
    };
    // A failed collect has already dropped the members built so far.
    result.map(T::into_value)
}

/// `set op right` for a set `left`.
pub(crate) fn eval_set_binary(left: &Value, right: &Value, op: ArithOp) -> EvalResult {
    let kernel = Kernel::new(op);
    match left {
        Value::IntSet(s) => combine(s, right, kernel),
        Value::NumberSet(s) => combine(s, right, kernel),
        other => Err(kernel.mismatch(other.type_name(), right.type_name())),
    }
}

/// `scalar op set`: the scalar is mapped over every member.
pub(crate) fn broadcast_onto_set(left: &Value, right: &Value, op: ArithOp) -> EvalResult {
    let kernel = Kernel::flipped(op);
    match right {
        Value::IntSet(s) => combine(s, left, kernel),
        Value::NumberSet(s) => combine(s, left, kernel),
        other => Err(kernel.mismatch(other.type_name(), left.type_name())),
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests {
    use super::*;
    use lat_value::EvalErrorKind;
    use pretty_assertions::assert_eq;

    fn ints(items: &[i64]) -> Value {
        Value::int_set(items.iter().copied().collect())
    }

    fn numbers(items: &[f64]) -> Value {
        Value::number_set(items.iter().copied().map(SetFloat).collect())
    }

    #[test]
    fn pairs_by_iteration_order() {
        // {1 5 9} and {2 3}: pairs (1,2) (5,3), then 9 is dropped
        let r = eval_set_binary(&ints(&[9, 1, 5]), &ints(&[3, 2]), ArithOp::Mul).unwrap();
        assert_eq!(r, ints(&[2, 15]));
    }

    #[test]
    fn scalar_maps_over_members() {
        let r = eval_set_binary(&numbers(&[1.0, 2.0]), &Value::Integer(2), ArithOp::Pow).unwrap();
        assert_eq!(r, numbers(&[1.0, 4.0]));
    }

    #[test]
    fn colliding_results_merge() {
        let r = eval_set_binary(&ints(&[1, 2, 3]), &Value::Integer(2), ArithOp::Div).unwrap();
        assert_eq!(r, ints(&[0, 1]));
    }

    #[test]
    fn flipped_puts_scalar_left() {
        let r = broadcast_onto_set(&Value::Integer(12), &ints(&[3, 4]), ArithOp::Div).unwrap();
        assert_eq!(r, ints(&[3, 4]));
        let r = broadcast_onto_set(&Value::Integer(10), &ints(&[1, 4]), ArithOp::Sub).unwrap();
        assert_eq!(r, ints(&[6, 9]));
    }

    #[test]
    fn results_take_the_receiver_kind() {
        let r = eval_set_binary(&ints(&[1, 2]), &numbers(&[0.5, 0.75]), ArithOp::Add).unwrap();
        assert_eq!(r, ints(&[1, 2]));
    }

    #[test]
    fn receiver_is_never_written() {
        let set = ints(&[1, 2]);
        let before = set.clone();
        let r = eval_set_binary(&set, &Value::Integer(1), ArithOp::Add).unwrap();
        assert_eq!(set, before);
        assert!(!r.ptr_eq(&set));
    }

    #[test]
    fn zero_divisor_fails() {
        let err = eval_set_binary(&ints(&[4, 6]), &ints(&[2, 0]), ArithOp::Mod).unwrap_err();
        assert_eq!(err.kind, EvalErrorKind::DivisionByZero);
        let err =
            broadcast_onto_set(&Value::Integer(1), &numbers(&[0.0]), ArithOp::Div).unwrap_err();
        assert_eq!(err.kind, EvalErrorKind::DivisionByZero);
    }

    #[test]
    fn failed_division_releases_both_sets() {
        // {-2 -1 0} pairs 4 and 6 before reaching the zero.
        let set = ints(&[4, 6, 8]);
        let divisors = ints(&[-2, -1, 0]);
        let (set_witness, divisor_witness) = (set.clone(), divisors.clone());
        let err = crate::operators::evaluate_binary(set, divisors, ArithOp::Div).unwrap_err();
        assert_eq!(err.kind, EvalErrorKind::DivisionByZero);
        assert_eq!(err.notes[0].message, "operand: 0");
        assert_eq!(set_witness.ref_count(), Some(1));
        assert_eq!(divisor_witness.ref_count(), Some(1));

        let numbers_witness = numbers(&[1.5, 2.5]);
        let err = crate::operators::evaluate_binary(
            numbers_witness.clone(),
            Value::Float64(0.5),
            ArithOp::Mod,
        )
        .unwrap_err();
        assert_eq!(err.kind, EvalErrorKind::DivisionByZero);
        assert_eq!(numbers_witness.ref_count(), Some(1));
        assert_eq!(numbers_witness, numbers(&[1.5, 2.5]));
    }

    #[test]
    fn strings_are_a_mismatch() {
        let err = eval_set_binary(&ints(&[1]), &Value::string("a"), ArithOp::Add).unwrap_err();
        assert!(matches!(err.kind, EvalErrorKind::TypeError { .. }));
    }
}
