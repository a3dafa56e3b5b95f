//! Dense matrix payload: a list of independently owned row vectors.

use std::fmt;

use super::{Element, Heap, Value};
use crate::errors::{shape_error, EvalError};

/// `size_x` rows of `size_y` elements each.
///
/// Every row is its own `Heap`, so indexing a matrix hands out the row
/// without copying and writing one row never copies the others.
#[derive(Clone, Debug, PartialEq)]
pub struct MatrixValue<T> {
    rows: Vec<Heap<Vec<T>>>,
    size_y: usize,
}

impl<T: Element> MatrixValue<T> {
    /// A `size_x` by `size_y` matrix with every element set to `fill`.
    pub fn filled(size_x: usize, size_y: usize, fill: T) -> Self {
        MatrixValue {
            rows: (0..size_x).map(|_| Heap::new(vec![fill; size_y])).collect(),
            size_y,
        }
    }

    /// Build from explicit rows. All rows must have the same length.
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self, EvalError> {
        let size_y = rows.first().map_or(0, Vec::len);
        if let Some(bad) = rows.iter().position(|row| row.len() != size_y) {
            return Err(shape_error(format!(
                "row {bad} has {} columns, expected {size_y}",
                rows[bad].len()
            )));
        }
        Ok(MatrixValue {
            rows: rows.into_iter().map(Heap::new).collect(),
            size_y,
        })
    }

    /// Build by evaluating `f(row, col)` for every position.
    pub fn from_fn(size_x: usize, size_y: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        MatrixValue {
            rows: (0..size_x)
                .map(|i| Heap::new((0..size_y).map(|j| f(i, j)).collect()))
                .collect(),
            size_y,
        }
    }

    /// Row count.
    #[inline]
    pub fn size_x(&self) -> usize {
        self.rows.len()
    }

    /// Column count.
    #[inline]
    pub fn size_y(&self) -> usize {
        self.size_y
    }

    #[inline]
    pub fn is_square(&self) -> bool {
        self.size_x() == self.size_y
    }

    pub fn row(&self, i: usize) -> Option<&[T]> {
        self.rows.get(i).map(|row| row.as_slice())
    }

    /// Writable row, copying it first if it is shared.
    pub fn row_mut(&mut self, i: usize) -> Option<&mut [T]> {
        self.rows.get_mut(i).map(|row| row.make_mut().as_mut_slice())
    }

    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        self.rows.iter().map(|row| row.as_slice())
    }

    pub fn rows_mut(&mut self) -> impl Iterator<Item = &mut [T]> {
        self.rows
            .iter_mut()
            .map(|row| row.make_mut().as_mut_slice())
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> Option<T> {
        self.rows.get(i).and_then(|row| row.get(j)).copied()
    }

    /// Row `i` as a vector value sharing this matrix's storage.
    pub fn row_value(&self, i: usize) -> Option<Value> {
        self.rows.get(i).map(|row| T::vector_heap(row.clone()))
    }

    /// Replace row `i`. The new row must have `size_y` elements.
    pub fn set_row(&mut self, i: usize, row: Vec<T>) -> Result<(), EvalError> {
        if row.len() != self.size_y {
            return Err(shape_error(format!(
                "row has {} columns, expected {}",
                row.len(),
                self.size_y
            )));
        }
        if let Some(slot) = self.rows.get_mut(i) {
            *slot = Heap::new(row);
        }
        Ok(())
    }

    /// Copy out as plain nested vectors.
    pub fn to_rows(&self) -> Vec<Vec<T>> {
        self.rows.iter().map(|row| row.to_vec()).collect()
    }
}

impl<T: Element> fmt::Display for MatrixValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, row) in self.rows().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str("[")?;
            for (j, x) in row.iter().enumerate() {
                if j > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{x}")?;
            }
            f.write_str("]")?;
        }
        f.write_str("]")
    }
}
