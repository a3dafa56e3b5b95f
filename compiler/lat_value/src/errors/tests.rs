use super::*;
use pretty_assertions::assert_eq;

// Kind → message

#[test]
fn division_by_zero_has_correct_kind() {
    let err = division_by_zero();
    assert_eq!(err.kind, EvalErrorKind::DivisionByZero);
    assert_eq!(err.message, "division by zero");
}

#[test]
fn not_square_reports_dimensions() {
    let err = not_square(2, 3);
    assert_eq!(
        err.kind,
        EvalErrorKind::ShapeError {
            message: "expected a square matrix, got 2x3".to_string()
        }
    );
    assert_eq!(err.message, "shape error: expected a square matrix, got 2x3");
}

#[test]
fn type_error_names_operator_and_kind() {
    let err = type_error("&", "string");
    assert_eq!(err.message, "operator `&` cannot be applied to string");
}

#[test]
fn binary_type_mismatch_names_both_kinds() {
    let err = binary_type_mismatch("+", "string", "integers");
    assert_eq!(
        err.message,
        "operator `+` cannot be applied to `string` and `integers`"
    );
}

#[test]
fn unbound_variable_has_correct_kind() {
    let err = unbound_variable("x");
    assert_eq!(
        err.kind,
        EvalErrorKind::UnboundVariable {
            name: "x".to_string()
        }
    );
    assert_eq!(err.message, "unbound variable: x");
}

#[test]
fn index_out_of_bounds_message() {
    let err = index_out_of_bounds(5, 3);
    assert_eq!(err.message, "index 5 out of bounds for length 3");
}

#[test]
fn limit_errors() {
    assert_eq!(
        budget_exceeded(10).message,
        "operation budget of 10 exceeded"
    );
    assert_eq!(
        depth_exceeded(64).message,
        "maximum evaluation depth of 64 exceeded"
    );
}

// Custom and notes

#[test]
fn new_uses_custom_kind() {
    let err = EvalError::new("something broke");
    assert_eq!(
        err.kind,
        EvalErrorKind::Custom {
            message: "something broke".to_string()
        }
    );
    assert_eq!(err.to_string(), "something broke");
}

#[test]
fn notes_accumulate_in_order() {
    let err = division_by_zero()
        .with_note(EvalNote::new("first"))
        .with_operand(&Value::Integer(0));
    assert_eq!(
        err.notes,
        vec![EvalNote::new("first"), EvalNote::new("operand: 0")]
    );
}
