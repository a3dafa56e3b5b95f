#![allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use super::*;
use lat_value::EvalErrorKind;
use proptest::prelude::*;

fn add(a: Scalar, b: Scalar) -> Scalar {
    apply(a, b, ArithOp::Add).unwrap()
}

// Promotion

#[test]
fn short_plus_number_is_number() {
    assert_eq!(
        add(Scalar::Short(3), Scalar::Float64(0.5)),
        Scalar::Float64(3.5)
    );
}

#[test]
fn integer_plus_float_is_float() {
    assert_eq!(
        add(Scalar::Integer(2), Scalar::Float32(0.25)),
        Scalar::Float32(2.25)
    );
}

#[test]
fn short_plus_short_stays_short() {
    assert_eq!(add(Scalar::Short(2), Scalar::Short(3)), Scalar::Short(5));
}

#[test]
fn float_plus_number_is_number() {
    let r = add(Scalar::Float32(1.5), Scalar::Float64(1.0));
    assert_eq!(r, Scalar::Float64(2.5));
}

proptest! {
    #[test]
    fn promotion_widens_lower_operand(a in any::<i16>(), b in -1.0e12f64..1.0e12) {
        let widened = Scalar::Float64(f64::from(a) + b);
        prop_assert_eq!(add(Scalar::Short(a), Scalar::Float64(b)), widened);
        prop_assert_eq!(add(Scalar::Float64(b), Scalar::Short(a)), widened);
    }

    #[test]
    fn promotion_integer_to_float32(a in any::<i64>(), b in -1.0e6f32..1.0e6) {
        prop_assert_eq!(add(Scalar::Integer(a), Scalar::Float32(b)), Scalar::Float32(a as f32 + b));
    }

    #[test]
    fn result_kind_is_highest(a in 0u8..4, b in 0u8..4) {
        let x = Scalar::Integer(3).cast_to_rank(a);
        let y = Scalar::Integer(2).cast_to_rank(b);
        for op in ArithOp::ALL {
            prop_assert_eq!(apply(x, y, op).unwrap().rank(), a.max(b));
        }
    }

    #[test]
    fn bit_not_round_trips_f64(bits in any::<u64>()) {
        let v = f64::from_bits(bits);
        let Scalar::Float64(back) = bit_not(bit_not(Scalar::Float64(v))) else {
            panic!("bit_not changed kind");
        };
        prop_assert_eq!(back.to_bits(), bits);
    }

    #[test]
    fn bit_not_round_trips_f32(bits in any::<u32>()) {
        let v = f32::from_bits(bits);
        let Scalar::Float32(back) = bit_not(bit_not(Scalar::Float32(v))) else {
            panic!("bit_not changed kind");
        };
        prop_assert_eq!(back.to_bits(), bits);
    }
}

// Division and truncation

#[test]
fn division_by_zero_fails() {
    for divisor in [
        Scalar::Short(0),
        Scalar::Integer(0),
        Scalar::Float32(0.0),
        Scalar::Float64(-0.0),
    ] {
        let err = apply(Scalar::Float64(1.0), divisor, ArithOp::Div).unwrap_err();
        assert_eq!(err.kind, EvalErrorKind::DivisionByZero);
    }
}

#[test]
fn integer_division_truncates() {
    assert_eq!(
        apply(Scalar::Integer(-7), Scalar::Integer(2), ArithOp::Div).unwrap(),
        Scalar::Integer(-3)
    );
}

#[test]
fn modulo_truncates_float_operands() {
    assert_eq!(
        apply(Scalar::Float64(7.9), Scalar::Float64(2.5), ArithOp::Mod).unwrap(),
        Scalar::Float64(1.0)
    );
}

#[test]
fn modulo_by_fraction_is_division_by_zero() {
    let err = apply(Scalar::Integer(7), Scalar::Float64(0.5), ArithOp::Mod).unwrap_err();
    assert_eq!(err.kind, EvalErrorKind::DivisionByZero);
}

#[test]
fn shifts_truncate_and_keep_kind() {
    assert_eq!(
        apply(Scalar::Float32(3.7), Scalar::Integer(2), ArithOp::Shl).unwrap(),
        Scalar::Float32(12.0)
    );
    assert_eq!(
        apply(Scalar::Integer(-16), Scalar::Integer(2), ArithOp::Shr).unwrap(),
        Scalar::Integer(-4)
    );
}

#[test]
fn shift_amount_is_masked() {
    assert_eq!(
        apply(Scalar::Integer(1), Scalar::Integer(65), ArithOp::Shl).unwrap(),
        Scalar::Integer(2)
    );
}

#[test]
fn integer_overflow_wraps() {
    assert_eq!(
        apply(Scalar::Integer(i64::MAX), Scalar::Integer(1), ArithOp::Add).unwrap(),
        Scalar::Integer(i64::MIN)
    );
    assert_eq!(
        apply(Scalar::Short(i16::MAX), Scalar::Short(1), ArithOp::Add).unwrap(),
        Scalar::Short(i16::MIN)
    );
}

// Power

#[test]
fn integer_power() {
    assert_eq!(
        apply(Scalar::Integer(3), Scalar::Integer(4), ArithOp::Pow).unwrap(),
        Scalar::Integer(81)
    );
    assert_eq!(
        apply(Scalar::Integer(2), Scalar::Integer(-1), ArithOp::Pow).unwrap(),
        Scalar::Integer(0)
    );
}

#[test]
fn float_power() {
    assert_eq!(
        apply(Scalar::Float64(2.0), Scalar::Float64(0.5), ArithOp::Pow).unwrap(),
        Scalar::Float64(2.0f64.sqrt())
    );
}

// Bitwise

#[test]
fn bitwise_on_floats_uses_bit_pattern() {
    let x = 1.5f64;
    let y = -2.25f64;
    let r = apply(Scalar::Float64(x), Scalar::Float64(y), ArithOp::BitXor).unwrap();
    assert_eq!(r, Scalar::Float64(f64::from_bits(x.to_bits() ^ y.to_bits())));
}

#[test]
fn bitwise_f32_uses_32_bit_pattern() {
    let x = 3.0f32;
    let r = apply(Scalar::Float32(x), Scalar::Float32(x), ArithOp::BitAndNot).unwrap();
    assert_eq!(r, Scalar::Float32(0.0));
}

#[test]
fn and_not_on_integers() {
    assert_eq!(
        apply(Scalar::Integer(0b1110), Scalar::Integer(0b0110), ArithOp::BitAndNot).unwrap(),
        Scalar::Integer(0b1000)
    );
}

#[test]
fn bit_not_integers() {
    assert_eq!(bit_not(Scalar::Integer(0)), Scalar::Integer(-1));
    assert_eq!(bit_not(Scalar::Short(-1)), Scalar::Short(0));
}
