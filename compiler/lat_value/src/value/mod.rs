//! Runtime values of the numeric core.
//!
//! # Ownership
//!
//! Scalars are stored inline. Every container payload sits behind a
//! [`Heap`], whose constructor is private to this crate, so the factory
//! methods on `Value` are the only way to allocate one:
//!
//! ```text
//! let v = Value::int_vector(vec![1, 2, 3]);   // OK
//! let v = Value::IntVector(Heap::new(...));   // ERROR: Heap::new is pub(crate)
//! ```
//!
//! Freshly built values are `Mutable`. [`Value::into_constant`] marks a
//! value as a shared literal; operators then allocate instead of writing.
//! Inline scalars have no storage to share and always report `Mutable`:
//! writing a new scalar into an operand slot is indistinguishable from
//! returning a new scalar.

mod heap;
mod kind;
mod linked_list;
mod matrix;
mod scalar;
mod set;
mod tensor;

use std::collections::BTreeSet;
use std::fmt;

pub use heap::Heap;
pub use kind::{Mutability, ValueKind};
pub use linked_list::LinkedListValue;
pub use matrix::MatrixValue;
pub use scalar::{Element, FloatElement, Scalar};
pub use set::SetFloat;
pub use tensor::{Shape, TensorBlock, TensorValue};

use crate::errors::{index_out_of_bounds, shape_error, type_error, EvalError, EvalResult};

/// A value of the numeric core.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    // Inline
    /// Absent right operand; selects the self-reducing form of an operator.
    Nil,
    /// Integer zero literal, reads as `Integer(0)` in arithmetic.
    Zero,
    Short(i16),
    Integer(i64),
    Float32(f32),
    Float64(f64),

    // Heap
    Str(Heap<String>),
    List(Heap<Vec<Value>>),
    LinkedList(Heap<LinkedListValue>),
    IntVector(Heap<Vec<i64>>),
    ShortVector(Heap<Vec<i16>>),
    FloatVector(Heap<Vec<f32>>),
    NumberVector(Heap<Vec<f64>>),
    StringVector(Heap<Vec<String>>),
    IntSet(Heap<BTreeSet<i64>>),
    NumberSet(Heap<BTreeSet<SetFloat>>),
    Matrix32(Heap<MatrixValue<f32>>),
    Matrix64(Heap<MatrixValue<f64>>),
    Tensor32(Heap<TensorValue<f32>>),
    Tensor64(Heap<TensorValue<f64>>),
}

// Factory Methods

impl Value {
    #[inline]
    pub fn string(s: impl Into<String>) -> Self {
        Value::Str(Heap::new(s.into()))
    }

    #[inline]
    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Heap::new(items))
    }

    #[inline]
    pub fn linked_list(items: Vec<Value>) -> Self {
        Value::LinkedList(Heap::new(LinkedListValue::from_values(items)))
    }

    #[inline]
    pub fn linked_list_from(list: LinkedListValue) -> Self {
        Value::LinkedList(Heap::new(list))
    }

    #[inline]
    pub fn int_vector(items: Vec<i64>) -> Self {
        Value::IntVector(Heap::new(items))
    }

    #[inline]
    pub fn short_vector(items: Vec<i16>) -> Self {
        Value::ShortVector(Heap::new(items))
    }

    #[inline]
    pub fn float_vector(items: Vec<f32>) -> Self {
        Value::FloatVector(Heap::new(items))
    }

    #[inline]
    pub fn number_vector(items: Vec<f64>) -> Self {
        Value::NumberVector(Heap::new(items))
    }

    #[inline]
    pub fn string_vector(items: Vec<String>) -> Self {
        Value::StringVector(Heap::new(items))
    }

    #[inline]
    pub fn int_set(items: BTreeSet<i64>) -> Self {
        Value::IntSet(Heap::new(items))
    }

    #[inline]
    pub fn number_set(items: BTreeSet<SetFloat>) -> Self {
        Value::NumberSet(Heap::new(items))
    }

    #[inline]
    pub fn matrix32(matrix: MatrixValue<f32>) -> Self {
        Value::Matrix32(Heap::new(matrix))
    }

    #[inline]
    pub fn matrix64(matrix: MatrixValue<f64>) -> Self {
        Value::Matrix64(Heap::new(matrix))
    }

    #[inline]
    pub fn tensor32(tensor: TensorValue<f32>) -> Self {
        Value::Tensor32(Heap::new(tensor))
    }

    #[inline]
    pub fn tensor64(tensor: TensorValue<f64>) -> Self {
        Value::Tensor64(Heap::new(tensor))
    }

    /// A fresh, zero-filled value of `kind`.
    ///
    /// Sequences get `len` elements, matrices are `len` by `len`, sets and
    /// strings start empty. Tensors need a full shape and are built by the
    /// tensor builder instead, so they return `None`.
    ///
    /// This is the allocation entry point for front ends that need a blank
    /// value of a given kind. The arithmetic in `lat_eval` builds its typed
    /// payloads directly and never goes through here.
    pub fn fresh(kind: ValueKind, len: usize) -> Option<Value> {
        let value = match kind {
            ValueKind::Nil => Value::Nil,
            ValueKind::Zero => Value::Zero,
            ValueKind::Short => Value::Short(0),
            ValueKind::Integer => Value::Integer(0),
            ValueKind::Float32 => Value::Float32(0.0),
            ValueKind::Float64 => Value::Float64(0.0),
            ValueKind::String => Value::string(String::new()),
            ValueKind::List => Value::list(vec![Value::Integer(0); len]),
            ValueKind::LinkedList => Value::linked_list(vec![Value::Integer(0); len]),
            ValueKind::IntVector => Value::int_vector(vec![0; len]),
            ValueKind::ShortVector => Value::short_vector(vec![0; len]),
            ValueKind::FloatVector => Value::float_vector(vec![0.0; len]),
            ValueKind::NumberVector => Value::number_vector(vec![0.0; len]),
            ValueKind::StringVector => Value::string_vector(vec![String::new(); len]),
            ValueKind::IntSet => Value::int_set(BTreeSet::new()),
            ValueKind::NumberSet => Value::number_set(BTreeSet::new()),
            ValueKind::Matrix32 => Value::matrix32(MatrixValue::filled(len, len, 0.0)),
            ValueKind::Matrix64 => Value::matrix64(MatrixValue::filled(len, len, 0.0)),
            ValueKind::Tensor32 | ValueKind::Tensor64 => return None,
        };
        Some(value)
    }
}

// Ownership

/// Apply `$body` to the heap handle of any container variant, or evaluate
/// `$inline` for scalars.
macro_rules! with_heap {
    ($value:expr, $h:ident => $body:expr, _ => $inline:expr) => {
        match $value {
            Value::Str($h) => $body,
            Value::List($h) => $body,
            Value::LinkedList($h) => $body,
            Value::IntVector($h) => $body,
            Value::ShortVector($h) => $body,
            Value::FloatVector($h) => $body,
            Value::NumberVector($h) => $body,
            Value::StringVector($h) => $body,
            Value::IntSet($h) => $body,
            Value::NumberSet($h) => $body,
            Value::Matrix32($h) => $body,
            Value::Matrix64($h) => $body,
            Value::Tensor32($h) => $body,
            Value::Tensor64($h) => $body,
            Value::Nil
            | Value::Zero
            | Value::Short(_)
            | Value::Integer(_)
            | Value::Float32(_)
            | Value::Float64(_) => $inline,
        }
    };
}

impl Value {
    /// Mark this value as a shared literal.
    #[must_use]
    pub fn into_constant(self) -> Self {
        match self {
            Value::Str(h) => Value::Str(h.into_constant()),
            Value::List(h) => Value::List(h.into_constant()),
            Value::LinkedList(h) => Value::LinkedList(h.into_constant()),
            Value::IntVector(h) => Value::IntVector(h.into_constant()),
            Value::ShortVector(h) => Value::ShortVector(h.into_constant()),
            Value::FloatVector(h) => Value::FloatVector(h.into_constant()),
            Value::NumberVector(h) => Value::NumberVector(h.into_constant()),
            Value::StringVector(h) => Value::StringVector(h.into_constant()),
            Value::IntSet(h) => Value::IntSet(h.into_constant()),
            Value::NumberSet(h) => Value::NumberSet(h.into_constant()),
            Value::Matrix32(h) => Value::Matrix32(h.into_constant()),
            Value::Matrix64(h) => Value::Matrix64(h.into_constant()),
            Value::Tensor32(h) => Value::Tensor32(h.into_constant()),
            Value::Tensor64(h) => Value::Tensor64(h.into_constant()),
            inline => inline,
        }
    }

    pub fn mutability(&self) -> Mutability {
        with_heap!(self, h => h.mutability(), _ => Mutability::Mutable)
    }

    /// Number of handles sharing this value's payload; `None` for scalars.
    pub fn ref_count(&self) -> Option<usize> {
        with_heap!(self, h => Some(h.ref_count()), _ => None)
    }

    /// Address of the payload allocation; `None` for scalars.
    pub fn payload_addr(&self) -> Option<usize> {
        with_heap!(self, h => Some(h.addr()), _ => None)
    }

    /// Whether both values share one payload allocation.
    pub fn ptr_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Str(a), Value::Str(b)) => a.ptr_eq(b),
            (Value::List(a), Value::List(b)) => a.ptr_eq(b),
            (Value::LinkedList(a), Value::LinkedList(b)) => a.ptr_eq(b),
            (Value::IntVector(a), Value::IntVector(b)) => a.ptr_eq(b),
            (Value::ShortVector(a), Value::ShortVector(b)) => a.ptr_eq(b),
            (Value::FloatVector(a), Value::FloatVector(b)) => a.ptr_eq(b),
            (Value::NumberVector(a), Value::NumberVector(b)) => a.ptr_eq(b),
            (Value::StringVector(a), Value::StringVector(b)) => a.ptr_eq(b),
            (Value::IntSet(a), Value::IntSet(b)) => a.ptr_eq(b),
            (Value::NumberSet(a), Value::NumberSet(b)) => a.ptr_eq(b),
            (Value::Matrix32(a), Value::Matrix32(b)) => a.ptr_eq(b),
            (Value::Matrix64(a), Value::Matrix64(b)) => a.ptr_eq(b),
            (Value::Tensor32(a), Value::Tensor32(b)) => a.ptr_eq(b),
            (Value::Tensor64(a), Value::Tensor64(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

// Inspection

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Nil => ValueKind::Nil,
            Value::Zero => ValueKind::Zero,
            Value::Short(_) => ValueKind::Short,
            Value::Integer(_) => ValueKind::Integer,
            Value::Float32(_) => ValueKind::Float32,
            Value::Float64(_) => ValueKind::Float64,
            Value::Str(_) => ValueKind::String,
            Value::List(_) => ValueKind::List,
            Value::LinkedList(_) => ValueKind::LinkedList,
            Value::IntVector(_) => ValueKind::IntVector,
            Value::ShortVector(_) => ValueKind::ShortVector,
            Value::FloatVector(_) => ValueKind::FloatVector,
            Value::NumberVector(_) => ValueKind::NumberVector,
            Value::StringVector(_) => ValueKind::StringVector,
            Value::IntSet(_) => ValueKind::IntSet,
            Value::NumberSet(_) => ValueKind::NumberSet,
            Value::Matrix32(_) => ValueKind::Matrix32,
            Value::Matrix64(_) => ValueKind::Matrix64,
            Value::Tensor32(_) => ValueKind::Tensor32,
            Value::Tensor64(_) => ValueKind::Tensor64,
        }
    }

    /// Kind name for error messages.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.kind().name()
    }

    #[inline]
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// Element count of a container; row count for matrices, outer extent
    /// for tensors. `None` for scalars.
    pub fn len(&self) -> Option<usize> {
        Some(match self {
            Value::Str(s) => s.chars().count(),
            Value::List(items) => items.len(),
            Value::LinkedList(list) => list.len(),
            Value::IntVector(v) => v.len(),
            Value::ShortVector(v) => v.len(),
            Value::FloatVector(v) => v.len(),
            Value::NumberVector(v) => v.len(),
            Value::StringVector(v) => v.len(),
            Value::IntSet(s) => s.len(),
            Value::NumberSet(s) => s.len(),
            Value::Matrix32(m) => m.size_x(),
            Value::Matrix64(m) => m.size_x(),
            Value::Tensor32(t) => t.shape()[0],
            Value::Tensor64(t) => t.shape()[0],
            _ => return None,
        })
    }

    /// Whether this is a container with no elements.
    pub fn is_empty_container(&self) -> bool {
        self.len() == Some(0)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }
}

// Indexing

fn checked_index(index: i64, len: usize) -> Result<usize, EvalError> {
    usize::try_from(index)
        .ok()
        .filter(|&i| i < len)
        .ok_or_else(|| index_out_of_bounds(index, len))
}

impl Value {
    /// Element at `index`. Matrices yield their row as a vector that shares
    /// the matrix's storage.
    pub fn index(&self, index: i64) -> EvalResult {
        let len = self
            .len()
            .ok_or_else(|| type_error("[]", self.type_name()))?;
        let i = checked_index(index, len)?;
        let element = match self {
            Value::List(items) => items.get(i).cloned(),
            Value::LinkedList(list) => list.get(i).cloned(),
            Value::IntVector(v) => v.get(i).map(|&n| Value::Integer(n)),
            Value::ShortVector(v) => v.get(i).map(|&n| Value::Short(n)),
            Value::FloatVector(v) => v.get(i).map(|&f| Value::Float32(f)),
            Value::NumberVector(v) => v.get(i).map(|&f| Value::Float64(f)),
            Value::StringVector(v) => v.get(i).map(|s| Value::string(s.as_str())),
            Value::Matrix32(m) => m.row_value(i),
            Value::Matrix64(m) => m.row_value(i),
            _ => return Err(type_error("[]", self.type_name())),
        };
        element.ok_or_else(|| index_out_of_bounds(index, len))
    }

    /// Overwrite the element at `index`, applying the mutate-or-allocate
    /// rule to this value's payload. Numeric elements are converted to the
    /// container's element kind.
    pub fn set_index(&mut self, index: i64, element: Value) -> Result<(), EvalError> {
        let len = self
            .len()
            .ok_or_else(|| type_error("[]=", self.type_name()))?;
        let i = checked_index(index, len)?;
        match self {
            Value::List(items) => items.make_mut()[i] = element,
            Value::LinkedList(list) => {
                if let Some(slot) = list.make_mut().get_mut(i) {
                    *slot = element;
                }
            }
            Value::IntVector(v) => v.make_mut()[i] = element_scalar::<i64>(&element)?,
            Value::ShortVector(v) => v.make_mut()[i] = element_scalar::<i16>(&element)?,
            Value::FloatVector(v) => v.make_mut()[i] = element_scalar::<f32>(&element)?,
            Value::NumberVector(v) => v.make_mut()[i] = element_scalar::<f64>(&element)?,
            Value::StringVector(v) => match element.as_str() {
                Some(s) => v.make_mut()[i] = s.to_string(),
                None => return Err(type_error("[]=", element.type_name())),
            },
            Value::Matrix32(m) => m.make_mut().set_row(i, element_row::<f32>(&element)?)?,
            Value::Matrix64(m) => m.make_mut().set_row(i, element_row::<f64>(&element)?)?,
            _ => return Err(type_error("[]=", self.type_name())),
        }
        Ok(())
    }
}

fn element_scalar<T: Element>(element: &Value) -> Result<T, EvalError> {
    Scalar::from_value(element)
        .map(T::from_scalar)
        .ok_or_else(|| type_error("[]=", element.type_name()))
}

fn element_row<T: Element>(element: &Value) -> Result<Vec<T>, EvalError> {
    fn convert<S: Element, T: Element>(items: &[S]) -> Vec<T> {
        items
            .iter()
            .map(|&x| T::from_scalar(x.to_scalar()))
            .collect()
    }
    match element {
        Value::IntVector(v) => Ok(convert(v)),
        Value::ShortVector(v) => Ok(convert(v)),
        Value::FloatVector(v) => Ok(convert(v)),
        Value::NumberVector(v) => Ok(convert(v)),
        _ => Err(shape_error(format!(
            "matrix row must be a numeric vector, got {}",
            element.type_name()
        ))),
    }
}

// Display

fn write_seq<I>(f: &mut fmt::Formatter<'_>, open: &str, items: I, close: &str) -> fmt::Result
where
    I: IntoIterator,
    I::Item: fmt::Display,
{
    f.write_str(open)?;
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            f.write_str(" ")?;
        }
        write!(f, "{item}")?;
    }
    f.write_str(close)
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => f.write_str("nil"),
            Value::Zero => f.write_str("0"),
            Value::Short(n) => write!(f, "{n}"),
            Value::Integer(n) => write!(f, "{n}"),
            Value::Float32(x) => write!(f, "{x}"),
            Value::Float64(x) => write!(f, "{x}"),
            Value::Str(s) => write!(f, "{:?}", s.as_str()),
            Value::List(items) => write_seq(f, "(", items.iter(), ")"),
            Value::LinkedList(list) => write_seq(f, "(", list.iter(), ")"),
            Value::IntVector(v) => write_seq(f, "[", v.iter(), "]"),
            Value::ShortVector(v) => write_seq(f, "[", v.iter(), "]"),
            Value::FloatVector(v) => write_seq(f, "[", v.iter(), "]"),
            Value::NumberVector(v) => write_seq(f, "[", v.iter(), "]"),
            Value::StringVector(v) => write_seq(f, "[", v.iter().map(|s| format!("{s:?}")), "]"),
            Value::IntSet(s) => write_seq(f, "{", s.iter(), "}"),
            Value::NumberSet(s) => write_seq(f, "{", s.iter(), "}"),
            Value::Matrix32(m) => write!(f, "{}", **m),
            Value::Matrix64(m) => write!(f, "{}", **m),
            Value::Tensor32(t) => write!(f, "{}", **t),
            Value::Tensor64(t) => write!(f, "{}", **t),
        }
    }
}
