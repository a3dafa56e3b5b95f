//! Batched kernels for float vectors.
//!
//! Elements are processed in fixed-width groups of [`Lane::LANES`] with a
//! scalar tail, which lets the compiler keep a whole group in vector
//! registers. Only `+ - * /` between same-kind operands take this path; the
//! results are bit-identical to [`Kernel::map`](crate::kernel::Kernel::map)
//! and [`Kernel::zip`](crate::kernel::Kernel::zip). Zero divisors are checked
//! by the caller before either path runs.

use std::ops::{Add, Div, Mul, Sub};

use lat_ir::ArithOp;

/// The operators with a batched form.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum BatchOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BatchOp {
    pub fn from_op(op: ArithOp) -> Option<Self> {
        match op {
            ArithOp::Add => Some(BatchOp::Add),
            ArithOp::Sub => Some(BatchOp::Sub),
            ArithOp::Mul => Some(BatchOp::Mul),
            ArithOp::Div => Some(BatchOp::Div),
            _ => None,
        }
    }

    #[inline]
    fn eval<T: Lane>(self, a: T, b: T) -> T {
        match self {
            BatchOp::Add => a + b,
            BatchOp::Sub => a - b,
            BatchOp::Mul => a * b,
            BatchOp::Div => a / b,
        }
    }
}

/// A float element type with a preferred group width.
pub(crate) trait Lane:
    Copy + Add<Output = Self> + Sub<Output = Self> + Mul<Output = Self> + Div<Output = Self>
{
    /// Elements per group: one 256-bit register.
    const LANES: usize;
    /// Promotion rank of the element kind.
    const RANK: u8;
}

impl Lane for f32 {
    const LANES: usize = 8;
    const RANK: u8 = 2;
}

impl Lane for f64 {
    const LANES: usize = 4;
    const RANK: u8 = 3;
}

/// Whether a slice of `len` elements is long enough to batch.
#[inline]
pub(crate) fn worthwhile<T: Lane>(len: usize) -> bool {
    len >= T::LANES
}

/// `dst[i] = dst[i] op s`, or `s op dst[i]` when `flipped`.
pub(crate) fn map<T: Lane>(dst: &mut [T], s: T, op: BatchOp, flipped: bool) {
    let mut groups = dst.chunks_exact_mut(T::LANES);
    for group in &mut groups {
        for x in group.iter_mut() {
            *x = if flipped { op.eval(s, *x) } else { op.eval(*x, s) };
        }
    }
    for x in groups.into_remainder() {
        *x = if flipped { op.eval(s, *x) } else { op.eval(*x, s) };
    }
}

/// Pairwise over the shorter length; the excess of `dst` is untouched.
pub(crate) fn zip<T: Lane>(dst: &mut [T], src: &[T], op: BatchOp, flipped: bool) {
    let n = dst.len().min(src.len());
    let (dst, src) = (&mut dst[..n], &src[..n]);
    let mut groups = dst.chunks_exact_mut(T::LANES);
    let mut sources = src.chunks_exact(T::LANES);
    for (group, source) in (&mut groups).zip(&mut sources) {
        for (x, &y) in group.iter_mut().zip(source) {
            *x = if flipped { op.eval(y, *x) } else { op.eval(*x, y) };
        }
    }
    for (x, &y) in groups.into_remainder().iter_mut().zip(sources.remainder()) {
        *x = if flipped { op.eval(y, *x) } else { op.eval(*x, y) };
    }
}
