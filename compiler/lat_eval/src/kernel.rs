//! Element-wise kernels shared by vectors, sets, matrices and tensors.
//!
//! Every kernel runs in two phases. `check_*` scans for zero divisors and
//! touches nothing; `map`/`zip` write the results. Callers run every check
//! of an operation before the first write, so a failing operation never
//! leaves a half-written payload behind.

use lat_ir::ArithOp;
use lat_value::{binary_type_mismatch, Element, EvalError, Scalar};

use crate::scalar::{apply_ordered, is_zero_divisor, zero_divisor};

/// An operator plus the side the receiver sits on.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Kernel {
    pub op: ArithOp,
    /// The receiver is the right operand.
    pub flipped: bool,
}

impl Kernel {
    #[inline]
    pub fn new(op: ArithOp) -> Self {
        Kernel { op, flipped: false }
    }

    #[inline]
    pub fn flipped(op: ArithOp) -> Self {
        Kernel { op, flipped: true }
    }

    /// Type error naming both operands in source order.
    #[cold]
    pub fn mismatch(self, receiver: &str, other: &str) -> EvalError {
        let symbol = self.op.as_symbol();
        if self.flipped {
            binary_type_mismatch(symbol, other, receiver)
        } else {
            binary_type_mismatch(symbol, receiver, other)
        }
    }

    /// Divisor check for a receiver combined with one scalar.
    pub fn check_scalar<T: Element>(self, items: &[T], s: Scalar) -> Result<(), EvalError> {
        if !self.op.rejects_zero_divisor() {
            return Ok(());
        }
        let divisor = if self.flipped {
            first_zero(items, self.op)
        } else {
            Some(s).filter(|&s| is_zero_divisor(s, self.op))
        };
        match divisor {
            Some(d) => Err(zero_divisor(d)),
            None => Ok(()),
        }
    }

    /// Divisor check for a receiver zipped with `src` over the shorter length.
    pub fn check_zip<T: Element, S: Element>(self, dst: &[T], src: &[S]) -> Result<(), EvalError> {
        if !self.op.rejects_zero_divisor() {
            return Ok(());
        }
        let n = dst.len().min(src.len());
        let divisor = if self.flipped {
            first_zero(&dst[..n], self.op)
        } else {
            first_zero(&src[..n], self.op)
        };
        match divisor {
            Some(d) => Err(zero_divisor(d)),
            None => Ok(()),
        }
    }

    /// Combine every element with `s`, narrowing into the receiver's kind.
    pub fn map<T: Element>(self, items: &mut [T], s: Scalar) -> Result<(), EvalError> {
        for x in items {
            *x = T::from_scalar(apply_ordered(x.to_scalar(), s, self.op, self.flipped)?);
        }
        Ok(())
    }

    /// Combine position by position up to the shorter length; the receiver's
    /// excess is left untouched.
    pub fn zip<T: Element, S: Element>(self, dst: &mut [T], src: &[S]) -> Result<(), EvalError> {
        for (x, y) in dst.iter_mut().zip(src) {
            *x = T::from_scalar(apply_ordered(
                x.to_scalar(),
                y.to_scalar(),
                self.op,
                self.flipped,
            )?);
        }
        Ok(())
    }
}

fn first_zero<T: Element>(items: &[T], op: ArithOp) -> Option<Scalar> {
    items
        .iter()
        .copied()
        .map(T::to_scalar)
        .find(|&x| is_zero_divisor(x, op))
}

/// Left-fold `op` over `items`, starting from the first element.
///
/// Returns `None` when `items` is empty; callers substitute the identity.
pub(crate) fn fold(
    items: impl IntoIterator<Item = Scalar>,
    op: ArithOp,
) -> Result<Option<Scalar>, EvalError> {
    let mut items = items.into_iter();
    let Some(mut acc) = items.next() else {
        return Ok(None);
    };
    for x in items {
        acc = crate::scalar::apply(acc, x, op)?;
    }
    Ok(Some(acc))
}
