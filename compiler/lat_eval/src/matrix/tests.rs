#![allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use super::*;
use lat_value::EvalErrorKind;
use pretty_assertions::assert_eq;

fn m64(rows: &[&[f64]]) -> Value {
    Value::matrix64(MatrixValue::from_rows(rows.iter().map(|r| r.to_vec()).collect()).unwrap())
}

#[test]
fn scalar_applies_to_every_element() {
    let r = eval_matrix_binary(m64(&[&[1.0, 2.0], &[3.0, 4.0]]), &Value::Integer(2), ArithOp::Mul)
        .unwrap();
    assert_eq!(r, m64(&[&[2.0, 4.0], &[6.0, 8.0]]));
}

#[test]
fn vector_broadcasts_across_rows() {
    let r = eval_matrix_binary(
        m64(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]]),
        &Value::int_vector(vec![10, 20]),
        ArithOp::Add,
    )
    .unwrap();
    assert_eq!(r, m64(&[&[11.0, 22.0, 3.0], &[14.0, 25.0, 6.0]]));
}

#[test]
fn matrices_pair_row_by_row() {
    let r = eval_matrix_binary(
        m64(&[&[1.0, 2.0], &[3.0, 4.0], &[5.0, 6.0]]),
        &m64(&[&[1.0, 1.0], &[2.0, 2.0]]),
        ArithOp::Sub,
    )
    .unwrap();
    assert_eq!(r, m64(&[&[0.0, 1.0], &[1.0, 2.0], &[5.0, 6.0]]));
}

#[test]
fn flipped_keeps_the_matrix_kind() {
    let r = broadcast_onto_matrix(&Value::Integer(1), m64(&[&[2.0, 4.0]]), ArithOp::Div).unwrap();
    assert_eq!(r, m64(&[&[0.5, 0.25]]));

    let f = Value::matrix32(MatrixValue::filled(1, 2, 2.0f32));
    let r = broadcast_onto_matrix(&Value::number_vector(vec![1.0, 3.0]), f, ArithOp::Sub).unwrap();
    assert_eq!(
        r,
        Value::matrix32(MatrixValue::from_rows(vec![vec![-1.0f32, 1.0]]).unwrap())
    );
}

#[test]
fn zero_divisor_in_a_later_row_leaves_the_matrix_untouched() {
    let m = m64(&[&[1.0, 2.0], &[3.0, 4.0]]);
    let witness = m.clone();
    let err = eval_matrix_binary(m, &m64(&[&[1.0, 1.0], &[1.0, 0.0]]), ArithOp::Div).unwrap_err();
    assert_eq!(err.kind, EvalErrorKind::DivisionByZero);
    assert_eq!(err.notes.len(), 1);
    assert_eq!(witness, m64(&[&[1.0, 2.0], &[3.0, 4.0]]));
    assert_eq!(witness.ref_count(), Some(1));
}

#[test]
fn constant_matrix_is_copied() {
    let lit = m64(&[&[1.0]]).into_constant();
    let r = eval_matrix_binary(lit.clone(), &Value::Float64(1.0), ArithOp::Add).unwrap();
    assert!(!r.ptr_eq(&lit));
    assert_eq!(lit, m64(&[&[1.0]]));
    assert_eq!(r, m64(&[&[2.0]]));
}

#[test]
fn shared_rows_are_not_written_through() {
    let m = m64(&[&[1.0, 2.0]]);
    let row = m.index(0).unwrap();
    let r = eval_matrix_binary(m, &Value::Float64(1.0), ArithOp::Add).unwrap();
    assert_eq!(r, m64(&[&[2.0, 3.0]]));
    assert_eq!(row, Value::number_vector(vec![1.0, 2.0]));
}

#[test]
fn sets_are_a_mismatch() {
    let err = eval_matrix_binary(
        m64(&[&[1.0]]),
        &Value::int_set([1].into_iter().collect()),
        ArithOp::Add,
    )
    .unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::TypeError { .. }));
}
