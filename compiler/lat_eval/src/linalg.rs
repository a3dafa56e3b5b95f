//! Dense linear algebra over `Matrix32` and `Matrix64`.
//!
//! # LU Decomposition
//!
//! [`decompose`] is Crout's method with implicit partial pivoting: every row
//! is weighted by the reciprocal of its largest magnitude when the pivot is
//! chosen. `L` (unit diagonal, not stored) and `U` are packed into one
//! matrix. A row whose largest magnitude is below `TINY` makes the matrix
//! near-singular; `invert` and `solve` answer that with an empty list
//! instead of an error.
//!
//! # Determinant
//!
//! Cofactor expansion along the first row. This is exponential in the
//! matrix size and is meant for the small matrices scripts work with.

use lat_stack::ensure_sufficient_stack;
use lat_value::{
    near_singular_matrix, not_square, shape_error, type_error, EvalError, EvalResult,
    FloatElement, Heap, MatrixValue, Scalar, Value, ValueKind,
};

use crate::build::{convert, flat_source, FloatWidth};

/// Why a decomposition produced no result.
#[derive(Clone, Debug, PartialEq)]
pub enum LuFailure {
    /// The operands were rejected before any work was done.
    Invalid(EvalError),
    /// Some row's largest magnitude is below `TINY`.
    NearSingular,
}

impl From<EvalError> for LuFailure {
    fn from(error: EvalError) -> Self {
        LuFailure::Invalid(error)
    }
}

impl From<LuFailure> for EvalError {
    fn from(failure: LuFailure) -> Self {
        match failure {
            LuFailure::Invalid(error) => error,
            LuFailure::NearSingular => near_singular_matrix(),
        }
    }
}

pub type LuResult<T> = Result<T, LuFailure>;

/// A packed LU decomposition with its row exchanges.
#[derive(Clone, Debug, PartialEq)]
pub struct LuDecomposition<T> {
    rows: Vec<Vec<T>>,
    /// Step `j` exchanged row `j` with row `pivots[j]`.
    pivots: Vec<usize>,
    sign: T,
}

impl<T: FloatElement> LuDecomposition<T> {
    /// Reassemble a decomposition returned earlier by [`lu_decompose`].
    pub fn from_parts(
        lu: &MatrixValue<T>,
        pivots: Vec<usize>,
        sign: T,
    ) -> Result<Self, EvalError> {
        if !lu.is_square() {
            return Err(not_square(lu.size_x(), lu.size_y()));
        }
        let n = lu.size_x();
        if pivots.len() != n {
            return Err(shape_error(format!(
                "expected {n} pivots, got {}",
                pivots.len()
            )));
        }
        if let Some(&bad) = pivots.iter().find(|&&p| p >= n) {
            return Err(shape_error(format!(
                "pivot {bad} is outside a {n}x{n} matrix"
            )));
        }
        Ok(LuDecomposition {
            rows: lu.to_rows(),
            pivots,
            sign,
        })
    }

    pub fn size(&self) -> usize {
        self.rows.len()
    }

    /// `L` and `U` packed as one matrix.
    pub fn matrix(&self) -> MatrixValue<T> {
        MatrixValue::from_fn(self.size(), self.size(), |i, j| self.rows[i][j])
    }

    pub fn pivots(&self) -> &[usize] {
        &self.pivots
    }

    /// Parity of the row exchanges, `1` or `-1`.
    pub fn sign(&self) -> T {
        self.sign
    }

    /// Solve `A x = b` in place for one right-hand column `b`.
    pub fn solve_column(&self, column: &mut [T]) -> Result<(), EvalError> {
        let n = self.size();
        if column.len() != n {
            return Err(shape_error(format!(
                "right-hand side has {} rows, expected {n}",
                column.len()
            )));
        }
        // Forward substitution, skipping the leading zeros of `b`.
        let mut first = None;
        for i in 0..n {
            let p = self.pivots[i];
            let mut sum = column[p];
            column[p] = column[i];
            if let Some(start) = first {
                for j in start..i {
                    sum = sum - self.rows[i][j] * column[j];
                }
            } else if sum != T::ZERO {
                first = Some(i);
            }
            column[i] = sum;
        }
        for i in (0..n).rev() {
            let mut sum = column[i];
            for j in i + 1..n {
                sum = sum - self.rows[i][j] * column[j];
            }
            column[i] = sum / self.rows[i][i];
        }
        Ok(())
    }

    /// Solve for every column of `rhs`.
    pub fn solve_columns(&self, rhs: &MatrixValue<T>) -> Result<MatrixValue<T>, EvalError> {
        let n = self.size();
        if rhs.size_x() != n {
            return Err(shape_error(format!(
                "right-hand side has {} rows, expected {n}",
                rhs.size_x()
            )));
        }
        let mut columns = Vec::with_capacity(rhs.size_y());
        for j in 0..rhs.size_y() {
            let mut column: Vec<T> = (0..n)
                .map(|i| rhs.get(i, j).unwrap_or(T::ZERO))
                .collect();
            self.solve_column(&mut column)?;
            columns.push(column);
        }
        Ok(MatrixValue::from_fn(n, rhs.size_y(), |i, j| columns[j][i]))
    }
}

/// LU-decompose a square matrix.
pub fn decompose<T: FloatElement>(matrix: &MatrixValue<T>) -> LuResult<LuDecomposition<T>> {
    if !matrix.is_square() {
        return Err(not_square(matrix.size_x(), matrix.size_y()).into());
    }
    let n = matrix.size_x();
    let mut a = matrix.to_rows();

    let mut scale = Vec::with_capacity(n);
    for (i, row) in a.iter().enumerate() {
        let big = row
            .iter()
            .fold(T::ZERO, |max, x| if x.abs() > max { x.abs() } else { max });
        if big < T::TINY {
            tracing::debug!(row = i, size = n, "near-singular row in LU decomposition");
            return Err(LuFailure::NearSingular);
        }
        scale.push(T::ONE / big);
    }

    let mut pivots = Vec::with_capacity(n);
    let mut sign = T::ONE;
    for j in 0..n {
        for i in 0..j {
            let mut sum = a[i][j];
            for k in 0..i {
                sum = sum - a[i][k] * a[k][j];
            }
            a[i][j] = sum;
        }
        let mut big = T::ZERO;
        let mut imax = j;
        for i in j..n {
            let mut sum = a[i][j];
            for k in 0..j {
                sum = sum - a[i][k] * a[k][j];
            }
            a[i][j] = sum;
            let weighted = scale[i] * sum.abs();
            if weighted >= big {
                big = weighted;
                imax = i;
            }
        }
        if imax != j {
            a.swap(imax, j);
            sign = -sign;
            scale[imax] = scale[j];
        }
        pivots.push(imax);
        // Keeps back-substitution finite on a singular column.
        if a[j][j].abs() < T::TINY {
            a[j][j] = T::TINY;
        }
        let pivot = a[j][j];
        for row in &mut a[j + 1..] {
            row[j] = row[j] / pivot;
        }
    }
    Ok(LuDecomposition {
        rows: a,
        pivots,
        sign,
    })
}

fn cofactor_det<T: FloatElement>(rows: &[Vec<T>]) -> T {
    match rows {
        [] => T::ONE,
        [only] => only[0],
        [r0, r1] => r0[0] * r1[1] - r0[1] * r1[0],
        [first, rest @ ..] => {
            let mut det = T::ZERO;
            for (j, &x) in first.iter().enumerate() {
                if x == T::ZERO {
                    continue;
                }
                let minor: Vec<Vec<T>> = rest
                    .iter()
                    .map(|row| {
                        row.iter()
                            .enumerate()
                            .filter(|&(k, _)| k != j)
                            .map(|(_, &y)| y)
                            .collect()
                    })
                    .collect();
                let term = x * ensure_sufficient_stack(|| cofactor_det(&minor));
                det = if j % 2 == 0 { det + term } else { det - term };
            }
            det
        }
    }
}

fn determinant_of<T: FloatElement>(matrix: &MatrixValue<T>) -> Result<T, EvalError> {
    if !matrix.is_square() {
        return Err(not_square(matrix.size_x(), matrix.size_y()));
    }
    Ok(cofactor_det(&matrix.to_rows()))
}

fn identity_of<T: FloatElement>(n: usize) -> MatrixValue<T> {
    MatrixValue::from_fn(n, n, |i, j| if i == j { T::ONE } else { T::ZERO })
}

fn invert_of<T: FloatElement>(matrix: &MatrixValue<T>) -> LuResult<MatrixValue<T>> {
    let lu = decompose(matrix)?;
    Ok(lu.solve_columns(&identity_of(lu.size()))?)
}

fn solve_of<T: FloatElement>(a: &MatrixValue<T>, b: &MatrixValue<T>) -> LuResult<MatrixValue<T>> {
    if !a.is_square() {
        return Err(not_square(a.size_x(), a.size_y()).into());
    }
    if !b.is_square() || b.size_x() != a.size_x() {
        return Err(shape_error(format!(
            "solve needs square matrices of equal size, got {}x{} and {}x{}",
            a.size_x(),
            a.size_y(),
            b.size_x(),
            b.size_y()
        ))
        .into());
    }
    let lu = decompose(a)?;
    Ok(lu.solve_columns(b)?)
}

fn product_of<T: FloatElement>(
    a: &MatrixValue<T>,
    b: &MatrixValue<T>,
) -> Result<MatrixValue<T>, EvalError> {
    if a.size_y() != b.size_x() {
        return Err(shape_error(format!(
            "cannot multiply {}x{} by {}x{}",
            a.size_x(),
            a.size_y(),
            b.size_x(),
            b.size_y()
        )));
    }
    Ok(MatrixValue::from_fn(a.size_x(), b.size_y(), |i, j| {
        a.row(i)
            .unwrap_or_default()
            .iter()
            .enumerate()
            .fold(T::ZERO, |acc, (k, &x)| acc + x * b.get(k, j).unwrap_or(T::ZERO))
    }))
}

fn transpose_of<T: FloatElement>(m: &MatrixValue<T>) -> MatrixValue<T> {
    MatrixValue::from_fn(m.size_y(), m.size_x(), |i, j| m.get(j, i).unwrap_or(T::ZERO))
}

// Value-level operations

fn width_of<T: FloatElement>() -> FloatWidth {
    if T::MATRIX_KIND == ValueKind::Matrix32 {
        FloatWidth::F32
    } else {
        FloatWidth::F64
    }
}

/// `value` as a matrix of element type `T`, converting the other width.
fn matrix_operand<T: FloatElement>(
    value: &Value,
    op: &str,
) -> Result<Heap<MatrixValue<T>>, EvalError> {
    if let Some(m) = T::as_matrix(value) {
        return Ok(m.clone());
    }
    let converted = match value {
        Value::Matrix32(_) | Value::Matrix64(_) => convert(value, width_of::<T>())?,
        other => return Err(type_error(op, other.type_name()).with_operand(other)),
    };
    T::as_matrix(&converted)
        .cloned()
        .ok_or_else(|| type_error(op, value.type_name()))
}

fn or_sentinel(result: LuResult<Value>, op: &str) -> EvalResult {
    match result {
        Ok(value) => Ok(value),
        Err(LuFailure::NearSingular) => {
            tracing::debug!(op, "near-singular matrix, returning the empty list");
            Ok(Value::list(Vec::new()))
        }
        Err(LuFailure::Invalid(error)) => Err(error),
    }
}

/// Inverse of a square matrix, or the empty list if it is near-singular.
pub fn invert(value: &Value) -> EvalResult {
    const OP: &str = "invert";
    match value {
        Value::Matrix32(m) => or_sentinel(invert_of(&**m).map(Value::matrix32), OP),
        Value::Matrix64(m) => or_sentinel(invert_of(&**m).map(Value::matrix64), OP),
        other => Err(type_error(OP, other.type_name()).with_operand(other)),
    }
}

/// `X` with `A X = B`, or the empty list if `A` is near-singular. `B` is
/// converted to `A`'s element width.
pub fn solve(a: &Value, b: &Value) -> EvalResult {
    const OP: &str = "solve";
    match a {
        Value::Matrix32(m) => {
            let b = matrix_operand::<f32>(b, OP)?;
            or_sentinel(solve_of(&**m, &*b).map(Value::matrix32), OP)
        }
        Value::Matrix64(m) => {
            let b = matrix_operand::<f64>(b, OP)?;
            or_sentinel(solve_of(&**m, &*b).map(Value::matrix64), OP)
        }
        other => Err(type_error(OP, other.type_name()).with_operand(other)),
    }
}

fn decomposition_value<T: FloatElement>(lu: &LuDecomposition<T>) -> Value {
    let pivots = lu.pivots().iter().map(|&p| p as i64).collect();
    Value::list(vec![
        T::matrix_value(lu.matrix()),
        Value::int_vector(pivots),
        lu.sign().to_scalar().into_value(),
    ])
}

/// `(lu pivots sign)` for a square matrix. A near-singular matrix fails
/// with `NearSingularMatrix`.
pub fn lu_decompose(value: &Value) -> EvalResult {
    match value {
        Value::Matrix32(m) => Ok(decomposition_value(&decompose(&**m)?)),
        Value::Matrix64(m) => Ok(decomposition_value(&decompose(&**m)?)),
        other => Err(type_error("lu-decompose", other.type_name()).with_operand(other)),
    }
}

fn back_substitute<T: FloatElement>(
    lu: &MatrixValue<T>,
    pivots: Vec<usize>,
    sign: Scalar,
    rhs: &Value,
) -> EvalResult {
    const OP: &str = "lu-back-substitute";
    let lu = LuDecomposition::from_parts(lu, pivots, T::from_scalar(sign))?;
    if let Value::Matrix32(_) | Value::Matrix64(_) = rhs {
        let rhs = matrix_operand::<T>(rhs, OP)?;
        return Ok(T::matrix_value(lu.solve_columns(&*rhs)?));
    }
    let mut column: Vec<T> = flat_source(rhs)?.into_iter().map(T::from_scalar).collect();
    lu.solve_column(&mut column)?;
    Ok(T::vector_value(column))
}

/// Solve against a decomposition from [`lu_decompose`]. A matrix
/// right-hand side is solved column by column; anything else is read as a
/// single column.
pub fn lu_back_substitute(decomposition: &Value, rhs: &Value) -> EvalResult {
    const OP: &str = "lu-back-substitute";
    let Some([lu, pivots, sign]) = decomposition.as_list() else {
        return Err(type_error(OP, decomposition.type_name()).with_operand(decomposition));
    };
    let Value::IntVector(raw) = pivots else {
        return Err(type_error(OP, pivots.type_name()).with_operand(pivots));
    };
    let pivots = raw
        .iter()
        .map(|&p| usize::try_from(p).map_err(|_| shape_error(format!("negative pivot {p}"))))
        .collect::<Result<Vec<_>, _>>()?;
    let sign = Scalar::from_value(sign)
        .ok_or_else(|| type_error(OP, sign.type_name()).with_operand(sign))?;
    match lu {
        Value::Matrix32(m) => back_substitute::<f32>(&**m, pivots, sign, rhs),
        Value::Matrix64(m) => back_substitute::<f64>(&**m, pivots, sign, rhs),
        other => Err(type_error(OP, other.type_name()).with_operand(other)),
    }
}

/// Determinant of a square matrix, as a scalar of the matrix's width.
pub fn determinant(value: &Value) -> EvalResult {
    match value {
        Value::Matrix32(m) => Ok(Value::Float32(determinant_of(&**m)?)),
        Value::Matrix64(m) => Ok(Value::Float64(determinant_of(&**m)?)),
        other => Err(type_error("determinant", other.type_name()).with_operand(other)),
    }
}

/// `a × b`. The result has `a`'s element width.
pub fn matrix_product(a: &Value, b: &Value) -> EvalResult {
    const OP: &str = "matrix-product";
    match a {
        Value::Matrix32(m) => {
            let b = matrix_operand::<f32>(b, OP)?;
            Ok(Value::matrix32(product_of(&**m, &*b)?))
        }
        Value::Matrix64(m) => {
            let b = matrix_operand::<f64>(b, OP)?;
            Ok(Value::matrix64(product_of(&**m, &*b)?))
        }
        other => Err(type_error(OP, other.type_name()).with_operand(other)),
    }
}

pub fn transpose(value: &Value) -> EvalResult {
    match value {
        Value::Matrix32(m) => Ok(Value::matrix32(transpose_of(&**m))),
        Value::Matrix64(m) => Ok(Value::matrix64(transpose_of(&**m))),
        other => Err(type_error("transpose", other.type_name()).with_operand(other)),
    }
}

/// The `n` by `n` identity matrix.
pub fn identity(width: FloatWidth, n: usize) -> Value {
    match width {
        FloatWidth::F32 => Value::matrix32(identity_of(n)),
        FloatWidth::F64 => Value::matrix64(identity_of(n)),
    }
}

#[cfg(test)]
mod tests;
