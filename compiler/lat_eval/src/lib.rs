#![allow(
    clippy::result_large_err,
    reason = "EvalError is fundamental; boxing would add noise across every operator"
)]
//! Lattice Eval - arithmetic and operator application for the numeric core.
//!
//! # Architecture
//!
//! - `evaluate_binary`: direct kind-dispatched binary operators
//! - `self_reduce`: an operator folded over one container's elements
//! - `bit_not`: unary bitwise-not over every numeric kind
//! - [`build`]: matrix, tensor and nested-list construction by cyclic tiling
//! - [`linalg`]: LU decomposition, determinant, solve and inversion
//! - [`Evaluator`]: the operator entry points over unevaluated operands,
//!   including n-ary folds and compound assignment
//!
//! # Ownership
//!
//! Every operator takes its left operand by value. A `Mutable` payload
//! that no one else holds is written in place and handed back; anything
//! else is copied first. Errors are detected before the first write, so a
//! failed operator never leaves a partly updated payload behind.

mod batch;
pub mod build;
mod environment;
mod eval_mode;
mod evaluator;
mod expr;
mod kernel;
pub mod linalg;
mod list;
mod matrix;
mod operators;
mod reduce;
pub mod scalar;
mod set;
mod tensor;
mod text;
mod unary;
mod vector;

pub use lat_value::{EvalError, EvalErrorKind, EvalResult, Value};

pub use environment::{Bindings, Environment};
pub use eval_mode::{EvalMode, ModeState};
pub use evaluator::{Evaluator, EvaluatorBuilder};
pub use expr::Expr;
pub use operators::evaluate_binary;
pub use reduce::self_reduce;
pub use unary::bit_not;
