#![allow(
    clippy::result_large_err,
    reason = "EvalError is fundamental; boxing would add noise across every operator"
)]
//! Lattice values - the value kind lattice of the numeric core.
//!
//! This crate provides:
//! - Runtime values (`Value`) over a closed set of scalar and container kinds
//! - The `Heap<T>` ownership handle and its `Constant`/`Mutable` class
//! - Container payloads (`LinkedListValue`, `MatrixValue`, `TensorValue`)
//! - Element conversion traits shared by the arithmetic kernels
//! - Evaluation error types (`EvalError`, `EvalResult`)
//!
//! # Value Types
//!
//! All heap allocations go through `Value::` factory methods; `Heap<T>` has
//! a crate-private constructor that enforces this. Reference counting uses
//! `Arc`.

mod errors;
mod value;

pub use errors::{
    binary_type_mismatch, budget_exceeded, depth_exceeded, division_by_zero,
    index_out_of_bounds, invalid_assignment_target, near_singular_matrix, not_square,
    shape_error, type_error, unbound_variable, EvalError, EvalErrorKind, EvalNote, EvalResult,
};
pub use value::{
    Element, FloatElement, Heap, LinkedListValue, MatrixValue, Mutability, Scalar, SetFloat,
    Shape, TensorBlock, TensorValue, Value, ValueKind,
};
