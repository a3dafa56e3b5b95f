#![allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use super::*;
use lat_value::EvalErrorKind;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn m64(rows: &[&[f64]]) -> MatrixValue<f64> {
    MatrixValue::from_rows(rows.iter().map(|r| r.to_vec()).collect()).unwrap()
}

fn assert_close(actual: &MatrixValue<f64>, expected: &MatrixValue<f64>, tolerance: f64) {
    assert_eq!(actual.size_x(), expected.size_x());
    assert_eq!(actual.size_y(), expected.size_y());
    for (a, e) in actual.rows().flatten().zip(expected.rows().flatten()) {
        assert!((a - e).abs() <= tolerance, "{actual} differs from {expected}");
    }
}

#[test]
fn determinant_of_two_by_two_is_closed_form() {
    let (a, b, c, d) = (3.5, -1.25, 0.75, 2.0);
    let m = Value::matrix64(m64(&[&[a, b], &[c, d]]));
    assert_eq!(determinant(&m).unwrap(), Value::Float64(a * d - b * c));
}

#[test]
fn determinant_expands_cofactors() {
    let m = m64(&[&[2.0, 0.0, 1.0], &[1.0, 3.0, 2.0], &[1.0, 1.0, 1.0]]);
    // 2(3-2) - 0 + 1(1-3)
    assert_eq!(determinant_of(&m).unwrap(), 0.0);
    let m = m64(&[
        &[1.0, 0.0, 0.0, 0.0],
        &[0.0, 2.0, 0.0, 0.0],
        &[0.0, 0.0, 3.0, 0.0],
        &[0.0, 0.0, 0.0, 4.0],
    ]);
    assert_eq!(determinant_of(&m).unwrap(), 24.0);
}

#[test]
fn determinant_of_small_sizes() {
    assert_eq!(determinant_of(&MatrixValue::<f64>::filled(0, 0, 0.0)).unwrap(), 1.0);
    assert_eq!(determinant_of(&m64(&[&[-7.0]])).unwrap(), -7.0);
}

#[test]
fn non_square_is_a_shape_error() {
    let m = Value::matrix64(MatrixValue::filled(2, 3, 1.0));
    for result in [
        invert(&m),
        determinant(&m),
        lu_decompose(&m),
        solve(&m, &m),
    ] {
        assert!(matches!(
            result.unwrap_err().kind,
            EvalErrorKind::ShapeError { .. }
        ));
    }
}

#[test]
fn solve_needs_equal_square_operands() {
    let a = Value::matrix64(identity_of(2));
    let b = Value::matrix64(identity_of(3));
    let err = solve(&a, &b).unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::ShapeError { .. }));
}

#[test]
fn zero_row_is_near_singular() {
    let m = m64(&[&[1.0, 2.0], &[0.0, 0.0]]);
    assert_eq!(decompose(&m).unwrap_err(), LuFailure::NearSingular);

    let value = Value::matrix64(m);
    assert_eq!(invert(&value).unwrap(), Value::list(Vec::new()));
    assert_eq!(solve(&value, &value).unwrap(), Value::list(Vec::new()));
    assert_eq!(
        lu_decompose(&value).unwrap_err().kind,
        EvalErrorKind::NearSingularMatrix
    );
}

#[test]
fn pivoting_tracks_the_sign() {
    let m = m64(&[&[0.0, 1.0], &[1.0, 0.0]]);
    let lu = decompose(&m).unwrap();
    assert_eq!(lu.pivots(), &[1, 1]);
    assert_eq!(lu.sign(), -1.0);
}

#[test]
fn invert_known_matrix() {
    let m = Value::matrix64(m64(&[&[4.0, 7.0], &[2.0, 6.0]]));
    let inverse = invert(&m).unwrap();
    let Value::Matrix64(inverse) = inverse else {
        panic!("expected a matrix, got {inverse}");
    };
    assert_close(&inverse, &m64(&[&[0.6, -0.7], &[-0.2, 0.4]]), 1e-12);
}

#[test]
fn back_substitution_reuses_a_decomposition() {
    let m = Value::matrix64(m64(&[&[2.0, 1.0], &[1.0, 3.0]]));
    let lu = lu_decompose(&m).unwrap();
    // x = [1 2]: b = [4 7]
    let x = lu_back_substitute(&lu, &Value::int_vector(vec![4, 7])).unwrap();
    let Value::NumberVector(x) = x else {
        panic!("expected numbers, got {x}");
    };
    assert!((x[0] - 1.0).abs() < 1e-12 && (x[1] - 2.0).abs() < 1e-12);

    let rhs = Value::matrix64(identity_of(2));
    assert_eq!(lu_back_substitute(&lu, &rhs).unwrap(), invert(&m).unwrap());
}

#[test]
fn back_substitution_rejects_bad_pivots() {
    let lu = Value::list(vec![
        Value::matrix64(identity_of(2)),
        Value::int_vector(vec![0, 5]),
        Value::Float64(1.0),
    ]);
    let err = lu_back_substitute(&lu, &Value::number_vector(vec![1.0, 1.0])).unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::ShapeError { .. }));
}

#[test]
fn product_checks_inner_dimensions() {
    let a = Value::matrix64(m64(&[&[1.0, 2.0, 3.0]]));
    let b = Value::matrix64(m64(&[&[1.0], &[1.0], &[1.0]]));
    assert_eq!(
        matrix_product(&a, &b).unwrap(),
        Value::matrix64(m64(&[&[6.0]]))
    );
    let err = matrix_product(&a, &a).unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::ShapeError { .. }));
}

#[test]
fn product_converts_to_the_left_width() {
    let a = Value::matrix32(MatrixValue::filled(1, 1, 2.0f32));
    let b = Value::matrix64(m64(&[&[3.0]]));
    assert_eq!(
        matrix_product(&a, &b).unwrap(),
        Value::matrix32(MatrixValue::filled(1, 1, 6.0f32))
    );
}

#[test]
fn transpose_swaps_axes() {
    let m = Value::matrix64(m64(&[&[1.0, 2.0, 3.0]]));
    assert_eq!(
        transpose(&m).unwrap(),
        Value::matrix64(m64(&[&[1.0], &[2.0], &[3.0]]))
    );
}

#[test]
fn float32_inverse() {
    let rows = vec![vec![2.0f32, 0.0], vec![0.0, 4.0]];
    let m = Value::matrix32(MatrixValue::from_rows(rows).unwrap());
    assert_eq!(
        invert(&m).unwrap(),
        Value::matrix32(MatrixValue::from_rows(vec![vec![0.5f32, 0.0], vec![0.0, 0.25]]).unwrap())
    );
}

/// Random diagonally dominant, hence well-conditioned, matrices.
fn dominant() -> impl Strategy<Value = MatrixValue<f64>> {
    prop_oneof![Just(2usize), Just(3), Just(4), Just(6)].prop_flat_map(|n| {
        proptest::collection::vec(-1.0f64..1.0, n * n).prop_map(move |cells| {
            MatrixValue::from_fn(n, n, |i, j| {
                let x = cells[i * n + j];
                if i == j {
                    x + n as f64 + 1.0
                } else {
                    x
                }
            })
        })
    })
}

proptest! {
    #[test]
    fn inverse_times_matrix_is_identity(m in dominant()) {
        let inverse = invert_of(&m).unwrap();
        let product = product_of(&inverse, &m).unwrap();
        assert_close(&product, &identity_of(m.size_x()), 1e-9);
    }

    #[test]
    fn solve_recovers_the_right_hand_side(m in dominant(), seed in -4.0f64..4.0) {
        let n = m.size_x();
        let rhs = MatrixValue::from_fn(n, n, |i, j| seed + (i * n + j) as f64);
        let b = product_of(&m, &rhs).unwrap();
        let x = solve_of(&m, &b).unwrap();
        assert_close(&x, &rhs, 1e-7);
    }
}
