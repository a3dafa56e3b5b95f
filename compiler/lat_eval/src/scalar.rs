//! Scalar arithmetic with kind promotion.
//!
//! Operands are widened to the higher of their two kinds before the
//! operator runs. Integer kinds wrap on overflow. Modulo and shifts work on
//! operands truncated to `i64` and convert the result back to the promoted
//! kind. Bitwise operators on floats act on the raw IEEE-754 bit pattern.

use lat_ir::ArithOp;
use lat_value::{division_by_zero, EvalError, Scalar};

/// Both operands widened to one kind.
enum Pair {
    Short(i16, i16),
    Integer(i64, i64),
    Float32(f32, f32),
    Float64(f64, f64),
}

#[inline]
fn to_f32(s: Scalar) -> f32 {
    match s {
        Scalar::Short(n) => f32::from(n),
        Scalar::Integer(n) => n as f32,
        Scalar::Float32(f) => f,
        Scalar::Float64(f) => f as f32,
    }
}

#[inline]
fn promote(a: Scalar, b: Scalar) -> Pair {
    match (a, b) {
        (Scalar::Float64(x), y) => Pair::Float64(x, y.to_f64()),
        (x, Scalar::Float64(y)) => Pair::Float64(x.to_f64(), y),
        (Scalar::Float32(x), y) => Pair::Float32(x, to_f32(y)),
        (x, Scalar::Float32(y)) => Pair::Float32(to_f32(x), y),
        (Scalar::Short(x), Scalar::Short(y)) => Pair::Short(x, y),
        (x, y) => Pair::Integer(x.to_i64(), y.to_i64()),
    }
}

/// Whether `divisor` makes `op` fail with `DivisionByZero`.
///
/// Modulo truncates first, so a fractional divisor below one is zero.
#[inline]
pub(crate) fn is_zero_divisor(divisor: Scalar, op: ArithOp) -> bool {
    match op {
        ArithOp::Div => divisor.is_zero(),
        ArithOp::Mod => divisor.to_i64() == 0,
        _ => false,
    }
}

/// `DivisionByZero` noting the offending divisor.
#[cold]
pub(crate) fn zero_divisor(divisor: Scalar) -> EvalError {
    division_by_zero().with_operand(&divisor.into_value())
}

/// Apply `op` to two scalars. The result has the higher of the two kinds.
pub fn apply(a: Scalar, b: Scalar, op: ArithOp) -> Result<Scalar, EvalError> {
    if is_zero_divisor(b, op) {
        return Err(zero_divisor(b));
    }
    Ok(match promote(a, b) {
        Pair::Short(x, y) => Scalar::Short(short_op(x, y, op)),
        Pair::Integer(x, y) => Scalar::Integer(int_op(x, y, op)),
        Pair::Float32(x, y) => Scalar::Float32(f32_op(x, y, op)),
        Pair::Float64(x, y) => Scalar::Float64(f64_op(x, y, op)),
    })
}

/// Apply `op` between a container element and a broadcast operand.
/// `flipped` puts the broadcast operand on the left.
#[inline]
pub(crate) fn apply_ordered(
    element: Scalar,
    other: Scalar,
    op: ArithOp,
    flipped: bool,
) -> Result<Scalar, EvalError> {
    if flipped {
        apply(other, element, op)
    } else {
        apply(element, other, op)
    }
}

/// Flip every bit. Floats flip their IEEE-754 bit pattern.
pub fn bit_not(s: Scalar) -> Scalar {
    match s {
        Scalar::Short(n) => Scalar::Short(!n),
        Scalar::Integer(n) => Scalar::Integer(!n),
        Scalar::Float32(f) => Scalar::Float32(f32::from_bits(!f.to_bits())),
        Scalar::Float64(f) => Scalar::Float64(f64::from_bits(!f.to_bits())),
    }
}

#[inline]
fn int_pow(x: i64, y: i64) -> i64 {
    match u32::try_from(y) {
        Ok(exp) => x.wrapping_pow(exp),
        Err(_) => (x as f64).powf(y as f64) as i64,
    }
}

/// Truncating integer forms of `Mod`, `Shl` and `Shr`.
#[inline]
fn truncated(x: i64, y: i64, op: ArithOp) -> i64 {
    match op {
        ArithOp::Shl => x.wrapping_shl(y as u32),
        ArithOp::Shr => x.wrapping_shr(y as u32),
        _ => x.wrapping_rem(y),
    }
}

fn short_op(x: i16, y: i16, op: ArithOp) -> i16 {
    match op {
        ArithOp::Add => x.wrapping_add(y),
        ArithOp::Sub => x.wrapping_sub(y),
        ArithOp::Mul => x.wrapping_mul(y),
        ArithOp::Div => x.wrapping_div(y),
        ArithOp::Pow => int_pow(i64::from(x), i64::from(y)) as i16,
        ArithOp::BitAnd => x & y,
        ArithOp::BitAndNot => x & !y,
        ArithOp::BitOr => x | y,
        ArithOp::BitXor => x ^ y,
        ArithOp::Mod | ArithOp::Shl | ArithOp::Shr => {
            truncated(i64::from(x), i64::from(y), op) as i16
        }
    }
}

fn int_op(x: i64, y: i64, op: ArithOp) -> i64 {
    match op {
        ArithOp::Add => x.wrapping_add(y),
        ArithOp::Sub => x.wrapping_sub(y),
        ArithOp::Mul => x.wrapping_mul(y),
        ArithOp::Div => x.wrapping_div(y),
        ArithOp::Pow => int_pow(x, y),
        ArithOp::BitAnd => x & y,
        ArithOp::BitAndNot => x & !y,
        ArithOp::BitOr => x | y,
        ArithOp::BitXor => x ^ y,
        ArithOp::Mod | ArithOp::Shl | ArithOp::Shr => truncated(x, y, op),
    }
}

fn f32_op(x: f32, y: f32, op: ArithOp) -> f32 {
    let (a, b) = (x.to_bits(), y.to_bits());
    match op {
        ArithOp::Add => x + y,
        ArithOp::Sub => x - y,
        ArithOp::Mul => x * y,
        ArithOp::Div => x / y,
        ArithOp::Pow => x.powf(y),
        ArithOp::BitAnd => f32::from_bits(a & b),
        ArithOp::BitAndNot => f32::from_bits(a & !b),
        ArithOp::BitOr => f32::from_bits(a | b),
        ArithOp::BitXor => f32::from_bits(a ^ b),
        ArithOp::Mod | ArithOp::Shl | ArithOp::Shr => truncated(x as i64, y as i64, op) as f32,
    }
}

fn f64_op(x: f64, y: f64, op: ArithOp) -> f64 {
    let (a, b) = (x.to_bits(), y.to_bits());
    match op {
        ArithOp::Add => x + y,
        ArithOp::Sub => x - y,
        ArithOp::Mul => x * y,
        ArithOp::Div => x / y,
        ArithOp::Pow => x.powf(y),
        ArithOp::BitAnd => f64::from_bits(a & b),
        ArithOp::BitAndNot => f64::from_bits(a & !b),
        ArithOp::BitOr => f64::from_bits(a | b),
        ArithOp::BitXor => f64::from_bits(a ^ b),
        ArithOp::Mod | ArithOp::Shl | ArithOp::Shr => truncated(x as i64, y as i64, op) as f64,
    }
}

#[cfg(test)]
mod tests;
