//! Single-valued numbers and the element kinds stored in containers.
//!
//! # Promotion
//!
//! Scalars are ordered by rank `Float64 > Float32 > Integer > Short`.
//! A binary operation between two scalars widens the lower-ranked operand
//! to the higher kind first ([`Scalar::promote`]); the result has the
//! higher kind.

use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

use super::{Heap, MatrixValue, TensorValue, Value, ValueKind};

/// An unboxed numeric value of one of the four scalar kinds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Scalar {
    Short(i16),
    Integer(i64),
    Float32(f32),
    Float64(f64),
}

impl Scalar {
    /// Read a scalar out of a value. `Zero` reads as integer zero.
    pub fn from_value(value: &Value) -> Option<Scalar> {
        match value {
            Value::Short(n) => Some(Scalar::Short(*n)),
            Value::Integer(n) => Some(Scalar::Integer(*n)),
            Value::Float32(f) => Some(Scalar::Float32(*f)),
            Value::Float64(f) => Some(Scalar::Float64(*f)),
            Value::Zero => Some(Scalar::Integer(0)),
            _ => None,
        }
    }

    /// Box back into a value of the same kind.
    pub fn into_value(self) -> Value {
        match self {
            Scalar::Short(n) => Value::Short(n),
            Scalar::Integer(n) => Value::Integer(n),
            Scalar::Float32(f) => Value::Float32(f),
            Scalar::Float64(f) => Value::Float64(f),
        }
    }

    /// Position in the promotion order.
    #[inline]
    pub const fn rank(self) -> u8 {
        match self {
            Scalar::Short(_) => 0,
            Scalar::Integer(_) => 1,
            Scalar::Float32(_) => 2,
            Scalar::Float64(_) => 3,
        }
    }

    pub const fn kind(self) -> ValueKind {
        match self {
            Scalar::Short(_) => ValueKind::Short,
            Scalar::Integer(_) => ValueKind::Integer,
            Scalar::Float32(_) => ValueKind::Float32,
            Scalar::Float64(_) => ValueKind::Float64,
        }
    }

    #[inline]
    pub fn to_f64(self) -> f64 {
        match self {
            Scalar::Short(n) => f64::from(n),
            Scalar::Integer(n) => n as f64,
            Scalar::Float32(f) => f64::from(f),
            Scalar::Float64(f) => f,
        }
    }

    /// Integer value, truncating toward zero (saturating for floats).
    #[inline]
    pub fn to_i64(self) -> i64 {
        match self {
            Scalar::Short(n) => i64::from(n),
            Scalar::Integer(n) => n,
            Scalar::Float32(f) => f as i64,
            Scalar::Float64(f) => f as i64,
        }
    }

    /// Whether the value is exactly zero.
    #[inline]
    pub fn is_zero(self) -> bool {
        match self {
            Scalar::Short(n) => n == 0,
            Scalar::Integer(n) => n == 0,
            Scalar::Float32(f) => f == 0.0,
            Scalar::Float64(f) => f == 0.0,
        }
    }

    /// Convert to the kind with the given rank. Narrowing truncates.
    pub fn cast_to_rank(self, rank: u8) -> Scalar {
        match rank {
            0 => Scalar::Short(match self {
                Scalar::Short(n) => n,
                Scalar::Integer(n) => n as i16,
                Scalar::Float32(f) => f as i16,
                Scalar::Float64(f) => f as i16,
            }),
            1 => Scalar::Integer(self.to_i64()),
            2 => Scalar::Float32(match self {
                Scalar::Short(n) => f32::from(n),
                Scalar::Integer(n) => n as f32,
                Scalar::Float32(f) => f,
                Scalar::Float64(f) => f as f32,
            }),
            _ => Scalar::Float64(self.to_f64()),
        }
    }

    /// Widen both operands to the higher of their two kinds.
    #[inline]
    pub fn promote(a: Scalar, b: Scalar) -> (Scalar, Scalar) {
        let rank = a.rank().max(b.rank());
        (a.cast_to_rank(rank), b.cast_to_rank(rank))
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Short(n) => write!(f, "{n}"),
            Scalar::Integer(n) => write!(f, "{n}"),
            Scalar::Float32(x) => write!(f, "{x}"),
            Scalar::Float64(x) => write!(f, "{x}"),
        }
    }
}

/// A numeric type stored unboxed inside vectors, sets, matrices and tensors.
pub trait Element:
    Copy + PartialEq + Default + fmt::Debug + fmt::Display + Send + Sync + 'static
{
    /// Kind of a vector of these elements.
    const VECTOR_KIND: ValueKind;

    fn to_scalar(self) -> Scalar;

    /// Convert into this element type, narrowing if needed.
    fn from_scalar(scalar: Scalar) -> Self;

    /// Build a fresh vector value.
    fn vector_value(items: Vec<Self>) -> Value;

    /// Wrap an existing payload handle as a vector value.
    fn vector_heap(items: Heap<Vec<Self>>) -> Value;

    /// Borrow the payload if `value` is a vector of this element type.
    fn as_vector(value: &Value) -> Option<&Heap<Vec<Self>>>;
}

macro_rules! impl_element {
    ($ty:ty, $scalar:ident, $vector:ident, $factory:ident, $rank:literal) => {
        impl Element for $ty {
            const VECTOR_KIND: ValueKind = ValueKind::$vector;

            #[inline]
            fn to_scalar(self) -> Scalar {
                Scalar::$scalar(self)
            }

            #[inline]
            fn from_scalar(scalar: Scalar) -> Self {
                match scalar.cast_to_rank($rank) {
                    Scalar::$scalar(v) => v,
                    _ => <$ty>::default(),
                }
            }

            #[inline]
            fn vector_value(items: Vec<Self>) -> Value {
                Value::$factory(items)
            }

            #[inline]
            fn vector_heap(items: Heap<Vec<Self>>) -> Value {
                Value::$vector(items)
            }

            #[inline]
            fn as_vector(value: &Value) -> Option<&Heap<Vec<Self>>> {
                match value {
                    Value::$vector(items) => Some(items),
                    _ => None,
                }
            }
        }
    };
}

impl_element!(i16, Short, ShortVector, short_vector, 0);
impl_element!(i64, Integer, IntVector, int_vector, 1);
impl_element!(f32, Float32, FloatVector, float_vector, 2);
impl_element!(f64, Float64, NumberVector, number_vector, 3);

/// Floating-point elements: the element types of matrices and tensors.
pub trait FloatElement:
    Element
    + PartialOrd
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
{
    const ZERO: Self;
    const ONE: Self;
    /// Magnitude below which an LU pivot row counts as singular.
    const TINY: Self;
    const MATRIX_KIND: ValueKind;
    const TENSOR_KIND: ValueKind;

    fn abs(self) -> Self;

    fn matrix_value(matrix: MatrixValue<Self>) -> Value;
    fn matrix_heap(matrix: Heap<MatrixValue<Self>>) -> Value;
    fn tensor_heap(tensor: Heap<TensorValue<Self>>) -> Value;
    fn as_matrix(value: &Value) -> Option<&Heap<MatrixValue<Self>>>;
}

macro_rules! impl_float_element {
    ($ty:ty, $matrix:ident, $tensor:ident, $matrix_factory:ident) => {
        impl FloatElement for $ty {
            const ZERO: Self = 0.0;
            const ONE: Self = 1.0;
            const TINY: Self = 1.0e-20;
            const MATRIX_KIND: ValueKind = ValueKind::$matrix;
            const TENSOR_KIND: ValueKind = ValueKind::$tensor;

            #[inline]
            fn abs(self) -> Self {
                <$ty>::abs(self)
            }

            fn matrix_value(matrix: MatrixValue<Self>) -> Value {
                Value::$matrix_factory(matrix)
            }

            fn matrix_heap(matrix: Heap<MatrixValue<Self>>) -> Value {
                Value::$matrix(matrix)
            }

            fn tensor_heap(tensor: Heap<TensorValue<Self>>) -> Value {
                Value::$tensor(tensor)
            }

            fn as_matrix(value: &Value) -> Option<&Heap<MatrixValue<Self>>> {
                match value {
                    Value::$matrix(m) => Some(m),
                    _ => None,
                }
            }
        }
    };
}

impl_float_element!(f32, Matrix32, Tensor32, matrix32);
impl_float_element!(f64, Matrix64, Tensor64, matrix64);
