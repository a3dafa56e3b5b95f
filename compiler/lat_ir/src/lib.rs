//! Lattice IR - operator vocabulary and interned identifiers.
//!
//! This crate holds the small set of types shared by every layer of the
//! numeric core:
//! - [`ArithOp`]: the closed set of arithmetic and bitwise operators
//! - [`Name`] / [`StringInterner`]: compact identifiers for bound variables
//!
//! # Design Philosophy
//!
//! - **Intern names**: variable names are `Name(u32)`, compared in O(1)
//! - **Closed operator set**: operators are an enum, dispatched with `match`

mod interner;
mod name;
mod operators;

pub use interner::{SharedInterner, StringInterner};
pub use name::Name;
pub use operators::ArithOp;
