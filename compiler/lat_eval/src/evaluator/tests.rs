#![allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use std::collections::HashMap;

use super::*;
use lat_value::{EvalErrorKind, MatrixValue};
use pretty_assertions::assert_eq;

fn evaluator() -> Evaluator {
    Evaluator::new(SharedInterner::default())
}

fn ints(items: &[i64]) -> Expr {
    Expr::literal(Value::int_vector(items.to_vec()))
}

#[test]
fn two_operands_apply_once() {
    let mut ev = evaluator();
    let r = ev.apply(ArithOp::Sub, &[Expr::int(10), Expr::int(4)]).unwrap();
    assert_eq!(r, Value::Integer(6));
    assert_eq!(ev.operations(), 1);
}

#[test]
fn more_operands_fold_left() {
    let mut ev = evaluator();
    let args = [Expr::int(20), Expr::int(2), Expr::int(5)];
    assert_eq!(ev.apply(ArithOp::Div, &args).unwrap(), Value::Integer(2));
    assert_eq!(ev.operations(), 2);

    let args = [ints(&[1, 2]), Expr::int(1), ints(&[10, 10])];
    assert_eq!(
        ev.apply(ArithOp::Add, &args).unwrap(),
        Value::int_vector(vec![12, 13])
    );
}

#[test]
fn one_operand_reduces() {
    let mut ev = evaluator();
    let r = ev.apply(ArithOp::Mul, &[ints(&[2, 3, 4])]).unwrap();
    assert_eq!(r, Value::Integer(24));
}

#[test]
fn empty_operand_gives_the_identity() {
    let mut ev = evaluator();
    assert_eq!(ev.apply(ArithOp::Div, &[ints(&[])]).unwrap(), Value::Integer(0));

    let strings = Expr::literal(Value::string_vector(Vec::new()));
    assert_eq!(
        ev.apply(ArithOp::Add, &[strings.clone()]).unwrap().as_str(),
        Some("")
    );
    let err = ev.apply(ArithOp::Sub, &[strings]).unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::TypeError { .. }));
    assert_eq!(ev.operations(), 1);
}

#[test]
fn no_operands_is_an_error() {
    let mut ev = evaluator();
    assert!(ev.apply(ArithOp::Add, &[]).is_err());
}

#[test]
fn literals_are_never_written() {
    let mut ev = evaluator();
    let lit = ints(&[1, 2]);
    let r = ev.apply(ArithOp::Add, &[lit.clone(), Expr::int(1)]).unwrap();
    assert_eq!(r, Value::int_vector(vec![2, 3]));
    assert_eq!(ev.eval(&lit).unwrap(), Value::int_vector(vec![1, 2]));
}

#[test]
fn variables_and_indexing() {
    let mut ev = evaluator();
    let v = ev.define("v", Value::int_vector(vec![5, 6, 7]));
    let r = ev.eval(&Expr::index(Expr::Var(v), Expr::int(2))).unwrap();
    assert_eq!(r, Value::Integer(7));

    let err = ev
        .eval(&Expr::index(Expr::Var(v), Expr::literal(Value::string("a"))))
        .unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::TypeError { .. }));
}

#[test]
fn unbound_variables_are_reported() {
    let mut ev = evaluator();
    let name = ev.interner().intern("missing");
    let err = ev.eval(&Expr::Var(name)).unwrap_err();
    assert_eq!(
        err.kind,
        EvalErrorKind::UnboundVariable {
            name: "missing".to_string()
        }
    );
}

#[test]
fn bit_not_counts_as_an_operation() {
    let mut ev = evaluator();
    let r = ev.eval(&Expr::bit_not(Expr::int(0))).unwrap();
    assert_eq!(r, Value::Integer(-1));
    assert_eq!(ev.operations(), 1);
}

#[test]
fn compound_assignment_updates_a_variable() {
    let mut ev = evaluator();
    let x = ev.define("x", Value::int_vector(vec![1, 2]));
    let r = ev
        .assign(ArithOp::Add, &Expr::Var(x), &[Expr::int(10), Expr::int(1)])
        .unwrap();
    assert_eq!(r, Value::int_vector(vec![12, 13]));
    assert_eq!(ev.env().read(x), Some(Value::int_vector(vec![12, 13])));
}

#[test]
fn compound_assignment_without_operands_reduces() {
    let mut ev = evaluator();
    let x = ev.define("x", Value::int_vector(vec![1, 2, 3]));
    ev.eval(&Expr::assign(ArithOp::Add, Expr::Var(x), Vec::new()))
        .unwrap();
    assert_eq!(ev.env().read(x), Some(Value::Integer(6)));
}

#[test]
fn compound_assignment_through_an_index() {
    let mut ev = evaluator();
    let l = ev.define("l", Value::list(vec![Value::Integer(1), Value::Integer(2)]));
    let target = Expr::index(Expr::Var(l), Expr::int(1));
    let r = ev.assign(ArithOp::Mul, &target, &[Expr::int(5)]).unwrap();
    assert_eq!(r, Value::Integer(10));
    assert_eq!(
        ev.env().read(l),
        Some(Value::list(vec![Value::Integer(1), Value::Integer(10)]))
    );
}

#[test]
fn compound_assignment_into_a_matrix_element() {
    let mut ev = evaluator();
    let rows = vec![vec![1.0, 2.0], vec![3.0, 4.0]];
    let m = ev.define("m", Value::matrix64(MatrixValue::from_rows(rows).unwrap()));
    let row = ev.eval(&Expr::index(Expr::Var(m), Expr::int(1))).unwrap();

    let target = Expr::index(Expr::index(Expr::Var(m), Expr::int(1)), Expr::int(0));
    ev.assign(ArithOp::Add, &target, &[Expr::int(1)]).unwrap();

    let expected = MatrixValue::from_rows(vec![vec![1.0, 2.0], vec![4.0, 4.0]]).unwrap();
    assert_eq!(ev.env().read(m), Some(Value::matrix64(expected)));
    // A row read earlier still sees the old element.
    assert_eq!(row, Value::number_vector(vec![3.0, 4.0]));
}

#[test]
fn squaring_multiplies_by_itself() {
    let mut ev = evaluator();
    let x = ev.define("x", Value::number_vector(vec![1.5, -2.0]));
    ev.assign(ArithOp::Pow, &Expr::Var(x), &[Expr::int(2)]).unwrap();
    assert_eq!(ev.env().read(x), Some(Value::number_vector(vec![2.25, 4.0])));

    let n = ev.define("n", Value::Integer(7));
    ev.assign(ArithOp::Pow, &Expr::Var(n), &[Expr::int(3)]).unwrap();
    assert_eq!(ev.env().read(n), Some(Value::Integer(343)));
}

#[test]
fn only_places_can_be_assigned() {
    let mut ev = evaluator();
    let err = ev
        .assign(ArithOp::Add, &Expr::int(1), &[Expr::int(1)])
        .unwrap_err();
    assert_eq!(
        err.kind,
        EvalErrorKind::InvalidAssignmentTarget {
            description: "literal".to_string()
        }
    );

    let name = ev.interner().intern("nowhere");
    let err = ev
        .assign(ArithOp::Add, &Expr::Var(name), &[Expr::int(1)])
        .unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::UnboundVariable { .. }));
}

#[test]
fn failed_assignment_leaves_the_binding() {
    let mut ev = evaluator();
    let x = ev.define("x", Value::int_vector(vec![4, 8]));
    let err = ev
        .assign(ArithOp::Div, &Expr::Var(x), &[ints(&[2, 0])])
        .unwrap_err();
    assert_eq!(err.kind, EvalErrorKind::DivisionByZero);
    assert_eq!(ev.env().read(x), Some(Value::int_vector(vec![4, 8])));
}

#[test]
fn scopes_shadow_and_restore() {
    let mut ev = evaluator();
    let x = ev.define("x", Value::Integer(1));
    ev.env_mut().push_scope();
    ev.define("x", Value::Integer(2));
    ev.assign(ArithOp::Add, &Expr::Var(x), &[Expr::int(40)]).unwrap();
    assert_eq!(ev.env().read(x), Some(Value::Integer(42)));
    ev.env_mut().pop_scope();
    assert_eq!(ev.env().read(x), Some(Value::Integer(1)));
}

#[test]
fn bounded_mode_enforces_the_budget() {
    let mut ev = EvaluatorBuilder::new(SharedInterner::default())
        .mode(EvalMode::Bounded { budget: 2 })
        .build();
    assert!(ev.mode().is_bounded());
    let args = [Expr::int(1), Expr::int(1), Expr::int(1), Expr::int(1)];
    let err = ev.apply(ArithOp::Add, &args).unwrap_err();
    assert_eq!(err.kind, EvalErrorKind::BudgetExceeded { budget: 2 });
}

#[test]
fn bounded_mode_limits_nesting() {
    let mut ev = EvaluatorBuilder::new(SharedInterner::default())
        .mode(EvalMode::Bounded { budget: 1_000 })
        .build();
    let mut expr = Expr::int(0);
    for _ in 0..70 {
        expr = Expr::bit_not(expr);
    }
    let err = ev.eval(&expr).unwrap_err();
    assert_eq!(err.kind, EvalErrorKind::DepthExceeded { depth: 64 });

    let mut shallow = Expr::int(0);
    for _ in 0..10 {
        shallow = Expr::bit_not(shallow);
    }
    assert_eq!(ev.eval(&shallow).unwrap(), Value::Integer(0));
}

#[cfg(not(target_arch = "wasm32"))]
#[test]
fn interpret_mode_nests_freely() {
    let mut ev = evaluator();
    let mut expr = Expr::int(0);
    for _ in 0..501 {
        expr = Expr::bit_not(expr);
    }
    assert_eq!(ev.eval(&expr).unwrap(), Value::Integer(-1));
}

#[derive(Default)]
struct FlatBindings(HashMap<Name, Value>);

impl Bindings for FlatBindings {
    fn read(&self, name: Name) -> Option<Value> {
        self.0.get(&name).cloned()
    }

    fn write(&mut self, name: Name, value: Value) -> bool {
        match self.0.get_mut(&name) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    fn define(&mut self, name: Name, value: Value) {
        self.0.insert(name, value);
    }
}

#[test]
fn custom_bindings_plug_in() {
    let mut ev = EvaluatorBuilder::new(SharedInterner::default())
        .env(FlatBindings::default())
        .build();
    let x = ev.define("x", Value::Short(3));
    ev.assign(ArithOp::Shl, &Expr::Var(x), &[Expr::int(2)]).unwrap();
    assert_eq!(ev.env().read(x), Some(Value::Integer(12)));
}
