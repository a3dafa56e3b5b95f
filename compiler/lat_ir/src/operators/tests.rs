use super::ArithOp;
use pretty_assertions::assert_eq;

#[test]
fn test_symbol_round_trip() {
    for op in ArithOp::ALL {
        assert_eq!(ArithOp::from_symbol(op.as_symbol()), Some(op));
        assert_eq!(ArithOp::from_compound_symbol(op.as_compound_symbol()), Some(op));
    }
}

#[test]
fn test_unknown_symbols() {
    assert_eq!(ArithOp::from_symbol("**"), None);
    assert_eq!(ArithOp::from_symbol("+="), None);
    assert_eq!(ArithOp::from_compound_symbol("+"), None);
}

#[test]
fn test_power_and_and_not_symbols() {
    assert_eq!(ArithOp::Pow.as_symbol(), "^^");
    assert_eq!(ArithOp::Pow.as_compound_symbol(), "^^=");
    assert_eq!(ArithOp::BitAndNot.as_symbol(), "&~");
}

#[test]
fn test_operator_classes() {
    assert!(ArithOp::Add.is_commutative());
    assert!(!ArithOp::Sub.is_commutative());
    assert!(!ArithOp::BitAndNot.is_commutative());
    assert!(ArithOp::Div.rejects_zero_divisor());
    assert!(ArithOp::Mod.rejects_zero_divisor());
    assert!(!ArithOp::Shl.rejects_zero_divisor());
    assert!(ArithOp::Shr.truncates_operands());
    assert!(ArithOp::BitXor.is_bitwise());
    assert!(!ArithOp::Shl.is_bitwise());
    assert!(ArithOp::Add.applies_to_strings());
    assert!(!ArithOp::Sub.applies_to_strings());
}
