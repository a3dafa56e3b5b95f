//! Matrix and tensor construction.
//!
//! # Tiling
//!
//! Builders read their elements from a flat source through a [`Cursor`]
//! that wraps back to the start when it runs off the end, so a short source
//! is tiled over the whole destination. One cursor is threaded through the
//! entire build: a 2x3 matrix from `[1 2]` is `[[1 2 1] [2 1 2]]`, and a
//! tensor's sub-tensors continue where the previous one stopped.

use smallvec::SmallVec;

use lat_stack::ensure_sufficient_stack;
use lat_value::{
    index_out_of_bounds, shape_error, type_error, Element, EvalError, EvalResult, FloatElement,
    LinkedListValue, MatrixValue, Scalar, Shape, TensorBlock, TensorValue, Value,
};

use crate::set::members;

/// Element width of a built matrix or tensor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FloatWidth {
    F32,
    F64,
}

/// Wrapping read cursor over a non-empty source.
#[derive(Debug)]
pub struct Cursor<'a, T> {
    source: &'a [T],
    pos: usize,
}

impl<'a, T> Cursor<'a, T> {
    pub fn new(source: &'a [T]) -> Result<Self, EvalError> {
        if source.is_empty() {
            return Err(shape_error("cannot build from an empty source"));
        }
        Ok(Cursor { source, pos: 0 })
    }

    /// The next element, wrapping to the start after the last one.
    pub fn read(&mut self) -> &'a T {
        if self.pos >= self.source.len() {
            self.pos = 0;
        }
        let item = &self.source[self.pos];
        self.pos += 1;
        item
    }
}

// Sources

/// Every number in `value`, row-major for matrices and depth-first for
/// tensors and lists.
pub fn flat_source(value: &Value) -> Result<Vec<Scalar>, EvalError> {
    fn scalars<T: Element>(items: &[T]) -> Vec<Scalar> {
        items.iter().map(|x| x.to_scalar()).collect()
    }
    Ok(match value {
        Value::IntVector(v) => scalars(v.as_slice()),
        Value::ShortVector(v) => scalars(v.as_slice()),
        Value::FloatVector(v) => scalars(v.as_slice()),
        Value::NumberVector(v) => scalars(v.as_slice()),
        Value::IntSet(_) | Value::NumberSet(_) => members(value).unwrap_or_default(),
        Value::Matrix32(m) => m.rows().flat_map(scalars).collect(),
        Value::Matrix64(m) => m.rows().flat_map(scalars).collect(),
        Value::Tensor32(t) => tensor_elements(&**t),
        Value::Tensor64(t) => tensor_elements(&**t),
        Value::List(items) => flat_children(items.iter())?,
        Value::LinkedList(list) => flat_children(list.iter())?,
        other => match Scalar::from_value(other) {
            Some(s) => vec![s],
            None => return Err(type_error("build", other.type_name()).with_operand(other)),
        },
    })
}

fn flat_children<'a>(
    children: impl Iterator<Item = &'a Value>,
) -> Result<Vec<Scalar>, EvalError> {
    let mut out = Vec::new();
    for child in children {
        out.extend(ensure_sufficient_stack(|| flat_source(child))?);
    }
    Ok(out)
}

/// Every element of a tensor, block by block.
pub(crate) fn tensor_elements<T: Element>(tensor: &TensorValue<T>) -> Vec<Scalar> {
    fn collect<T: Element>(tensor: &TensorValue<T>, out: &mut Vec<Scalar>) {
        for block in tensor.blocks() {
            match block {
                TensorBlock::Matrix(m) => out.extend(m.rows().flatten().map(|x| x.to_scalar())),
                TensorBlock::Tensor(t) => ensure_sufficient_stack(|| collect(t, out)),
            }
        }
    }
    let mut out = Vec::with_capacity(tensor.element_count());
    collect(tensor, &mut out);
    out
}

/// Read a shape descriptor: a numeric vector or list of non-negative
/// extents.
pub fn shape_from_value(value: &Value) -> Result<Shape, EvalError> {
    flat_source(value)?
        .into_iter()
        .map(|s| {
            usize::try_from(s.to_i64())
                .map_err(|_| shape_error(format!("negative extent {s} in shape")))
        })
        .collect()
}

fn element_count(shape: &[usize]) -> Result<usize, EvalError> {
    shape
        .iter()
        .try_fold(1usize, |acc, &n| acc.checked_mul(n))
        .ok_or_else(|| shape_error(format!("shape {shape:?} is too large")))
}

// Matrices

fn matrix_of<T: FloatElement>(
    rows: usize,
    cols: usize,
    cursor: &mut Cursor<'_, Scalar>,
) -> MatrixValue<T> {
    MatrixValue::from_fn(rows, cols, |_, _| T::from_scalar(*cursor.read()))
}

/// A `rows` by `cols` matrix with every element set to `fill`.
pub fn filled_matrix(width: FloatWidth, rows: usize, cols: usize, fill: Scalar) -> Value {
    match width {
        FloatWidth::F32 => {
            Value::matrix32(MatrixValue::filled(rows, cols, f32::from_scalar(fill)))
        }
        FloatWidth::F64 => {
            Value::matrix64(MatrixValue::filled(rows, cols, f64::from_scalar(fill)))
        }
    }
}

/// A `rows` by `cols` matrix tiled row-major from the numbers in `source`.
pub fn build_matrix(width: FloatWidth, rows: usize, cols: usize, source: &Value) -> EvalResult {
    element_count(&[rows, cols])?;
    let source = flat_source(source)?;
    let mut cursor = Cursor::new(&source)?;
    Ok(match width {
        FloatWidth::F32 => Value::matrix32(matrix_of(rows, cols, &mut cursor)),
        FloatWidth::F64 => Value::matrix64(matrix_of(rows, cols, &mut cursor)),
    })
}

// Tensors

fn tensor_of<T: FloatElement>(
    shape: &[usize],
    cursor: &mut Cursor<'_, Scalar>,
) -> Result<TensorValue<T>, EvalError> {
    let (&outer, inner) = shape
        .split_first()
        .ok_or_else(|| shape_error("tensor shape is empty"))?;
    let blocks = (0..outer)
        .map(|_| match *inner {
            [rows, cols] => Ok(TensorBlock::Matrix(matrix_of(rows, cols, cursor))),
            _ => ensure_sufficient_stack(|| tensor_of(inner, cursor)).map(TensorBlock::Tensor),
        })
        .collect::<Result<Vec<_>, _>>()?;
    TensorValue::from_blocks(SmallVec::from_slice(shape), blocks)
}

/// A tensor of `shape` tiled from the numbers in `source`. A rank-2 shape
/// builds a plain matrix.
pub fn build_tensor(width: FloatWidth, shape: &[usize], source: &Value) -> EvalResult {
    if shape.len() < 2 {
        return Err(shape_error(format!(
            "tensor rank must be at least 2, got {}",
            shape.len()
        )));
    }
    if let [rows, cols] = *shape {
        return build_matrix(width, rows, cols, source);
    }
    element_count(shape)?;
    let source = flat_source(source)?;
    let mut cursor = Cursor::new(&source)?;
    Ok(match width {
        FloatWidth::F32 => Value::tensor32(tensor_of(shape, &mut cursor)?),
        FloatWidth::F64 => Value::tensor64(tensor_of(shape, &mut cursor)?),
    })
}

// Conversion

fn convert_matrix<S: Element, T: FloatElement>(m: &MatrixValue<S>) -> MatrixValue<T> {
    MatrixValue::from_fn(m.size_x(), m.size_y(), |i, j| {
        m.get(i, j).map_or(T::ZERO, |x| T::from_scalar(x.to_scalar()))
    })
}

fn convert_tensor<S: Element, T: FloatElement>(
    t: &TensorValue<S>,
) -> Result<TensorValue<T>, EvalError> {
    let blocks = t
        .blocks()
        .iter()
        .map(|block| match block {
            TensorBlock::Matrix(m) => Ok(TensorBlock::Matrix(convert_matrix(m))),
            TensorBlock::Tensor(inner) => {
                ensure_sufficient_stack(|| convert_tensor(inner)).map(TensorBlock::Tensor)
            }
        })
        .collect::<Result<Vec<_>, _>>()?;
    TensorValue::from_blocks(SmallVec::from_slice(t.shape()), blocks)
}

/// A fresh copy of a matrix or tensor with elements of `width`.
pub fn convert(value: &Value, width: FloatWidth) -> EvalResult {
    Ok(match (value, width) {
        (Value::Matrix32(m), FloatWidth::F32) => Value::matrix32(convert_matrix(&**m)),
        (Value::Matrix64(m), FloatWidth::F32) => Value::matrix32(convert_matrix(&**m)),
        (Value::Matrix32(m), FloatWidth::F64) => Value::matrix64(convert_matrix(&**m)),
        (Value::Matrix64(m), FloatWidth::F64) => Value::matrix64(convert_matrix(&**m)),
        (Value::Tensor32(t), FloatWidth::F32) => Value::tensor32(convert_tensor(&**t)?),
        (Value::Tensor64(t), FloatWidth::F32) => Value::tensor32(convert_tensor(&**t)?),
        (Value::Tensor32(t), FloatWidth::F64) => Value::tensor64(convert_tensor(&**t)?),
        (Value::Tensor64(t), FloatWidth::F64) => Value::tensor64(convert_tensor(&**t)?),
        (other, _) => return Err(type_error("convert", other.type_name()).with_operand(other)),
    })
}

// Reshape

fn source_values(value: &Value) -> Result<Vec<Value>, EvalError> {
    Ok(match value {
        Value::List(items) => items.to_vec(),
        Value::LinkedList(list) => list.iter().cloned().collect(),
        Value::StringVector(v) => v.iter().map(|s| Value::string(s.as_str())).collect(),
        other => flat_source(other)?
            .into_iter()
            .map(Scalar::into_value)
            .collect(),
    })
}

fn nested(shape: &[usize], cursor: &mut Cursor<'_, Value>, linked: bool) -> Value {
    let Some((&n, rest)) = shape.split_first() else {
        return cursor.read().clone();
    };
    let items: Vec<Value> = (0..n)
        .map(|_| ensure_sufficient_stack(|| nested(rest, cursor, linked)))
        .collect();
    if linked {
        let mut list = LinkedListValue::new();
        for item in items.into_iter().rev() {
            list.push_front(item);
        }
        Value::linked_list_from(list)
    } else {
        Value::list(items)
    }
}

/// Tile the elements of `source` into nested lists of `shape`. A linked
/// list source produces nested linked lists.
pub fn reshape(source: &Value, shape: &[usize]) -> EvalResult {
    if shape.is_empty() {
        return Err(shape_error("reshape needs at least one extent"));
    }
    element_count(shape)?;
    let values = source_values(source)?;
    let mut cursor = Cursor::new(&values)?;
    let linked = matches!(source, Value::LinkedList(_));
    Ok(nested(shape, &mut cursor, linked))
}

// Combine

/// Position path into a nested list.
pub type Path = SmallVec<[usize; 8]>;

fn leaves<'a>(value: &'a Value, path: &mut Path, out: &mut Vec<(Path, &'a Value)>) {
    let Some(items) = children(value) else {
        out.push((path.clone(), value));
        return;
    };
    for (i, child) in items.into_iter().enumerate() {
        path.push(i);
        ensure_sufficient_stack(|| leaves(child, path, out));
        path.pop();
    }
}

/// Overwrite the element of `target` at `path`.
pub fn set_path(target: &mut Value, path: &[usize], value: Value) -> Result<(), EvalError> {
    let Some((&i, rest)) = path.split_first() else {
        *target = value;
        return Ok(());
    };
    if rest.is_empty() {
        return target.set_index(i as i64, value);
    }
    let len = target.len().unwrap_or(0);
    let slot = match target {
        Value::List(items) => items.make_mut().get_mut(i),
        Value::LinkedList(list) => list.make_mut().get_mut(i),
        other => return Err(type_error("[]=", other.type_name())),
    };
    let slot = slot.ok_or_else(|| index_out_of_bounds(i as i64, len))?;
    ensure_sufficient_stack(|| set_path(slot, rest, value))
}

/// Apply `action` to every pair of leaves of `a` and `b`, writing each
/// result into `target` at the first leaf's path followed by the second's.
pub fn combine(
    target: &mut Value,
    a: &Value,
    b: &Value,
    mut action: impl FnMut(&Value, &Value) -> EvalResult,
) -> Result<(), EvalError> {
    let (mut left, mut right) = (Vec::new(), Vec::new());
    leaves(a, &mut Path::new(), &mut left);
    leaves(b, &mut Path::new(), &mut right);
    for (pa, x) in &left {
        for (pb, y) in &right {
            let path: Path = pa.iter().chain(pb).copied().collect();
            set_path(target, &path, action(*x, *y)?)?;
        }
    }
    Ok(())
}

/// Children of a list or linked list; `None` for a leaf.
fn children(value: &Value) -> Option<Vec<&Value>> {
    match value {
        Value::List(items) => Some(items.iter().collect()),
        Value::LinkedList(list) => Some(list.iter().collect()),
        _ => None,
    }
}

/// A list skeleton with `b`'s structure nested under every leaf of `a`.
fn skeleton(a: &Value, b: &Value) -> Value {
    match children(a) {
        Some(items) => Value::list(
            items
                .into_iter()
                .map(|x| ensure_sufficient_stack(|| skeleton(x, b)))
                .collect(),
        ),
        None => structure(b),
    }
}

fn structure(b: &Value) -> Value {
    match children(b) {
        Some(items) => Value::list(
            items
                .into_iter()
                .map(|x| ensure_sufficient_stack(|| structure(x)))
                .collect(),
        ),
        None => Value::Zero,
    }
}

/// Outer map: [`combine`] into a fresh skeleton shaped by `a` and `b`.
pub fn outer(
    a: &Value,
    b: &Value,
    action: impl FnMut(&Value, &Value) -> EvalResult,
) -> EvalResult {
    let mut target = skeleton(a, b);
    combine(&mut target, a, b, action)?;
    Ok(target)
}
