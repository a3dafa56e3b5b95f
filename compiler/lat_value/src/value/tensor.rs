//! N-dimensional tensor payload.
//!
//! A tensor of rank `r >= 3` holds `shape[0]` blocks of rank `r - 1`;
//! blocks of rank 2 are matrices. Rank-2 "tensors" are never built: the
//! builders return a plain matrix instead.

use std::fmt;

use smallvec::SmallVec;

use super::{Element, MatrixValue};
use crate::errors::{shape_error, EvalError};

/// Dimension extents, outermost first.
pub type Shape = SmallVec<[usize; 4]>;

/// One sub-tensor of a tensor.
#[derive(Clone, Debug, PartialEq)]
pub enum TensorBlock<T> {
    Matrix(MatrixValue<T>),
    Tensor(TensorValue<T>),
}

impl<T: Element> TensorBlock<T> {
    pub fn shape(&self) -> Shape {
        match self {
            TensorBlock::Matrix(m) => SmallVec::from_slice(&[m.size_x(), m.size_y()]),
            TensorBlock::Tensor(t) => t.shape.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TensorValue<T> {
    shape: Shape,
    blocks: Vec<TensorBlock<T>>,
}

impl<T: Element> TensorValue<T> {
    /// Assemble a tensor, checking `shape[k]` against the element count at
    /// every nesting depth.
    pub fn from_blocks(shape: Shape, blocks: Vec<TensorBlock<T>>) -> Result<Self, EvalError> {
        if shape.len() < 3 {
            return Err(shape_error(format!(
                "tensor rank must be at least 3, got {}",
                shape.len()
            )));
        }
        if blocks.len() != shape[0] {
            return Err(shape_error(format!(
                "tensor has {} blocks, shape expects {}",
                blocks.len(),
                shape[0]
            )));
        }
        let inner = &shape[1..];
        if let Some(bad) = blocks.iter().find(|block| block.shape().as_slice() != inner) {
            return Err(shape_error(format!(
                "block shape {:?} does not match {inner:?}",
                bad.shape().as_slice()
            )));
        }
        Ok(TensorValue { shape, blocks })
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    pub fn blocks(&self) -> &[TensorBlock<T>] {
        &self.blocks
    }

    pub fn blocks_mut(&mut self) -> &mut [TensorBlock<T>] {
        &mut self.blocks
    }

    /// Total number of scalar elements.
    pub fn element_count(&self) -> usize {
        self.shape.iter().product()
    }
}

impl<T: Element> fmt::Display for TensorBlock<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TensorBlock::Matrix(m) => fmt::Display::fmt(m, f),
            TensorBlock::Tensor(t) => fmt::Display::fmt(t, f),
        }
    }
}

impl<T: Element> fmt::Display for TensorValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, block) in self.blocks.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            fmt::Display::fmt(block, f)?;
        }
        f.write_str("]")
    }
}
