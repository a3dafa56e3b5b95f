//! Reference-counted payload handle carrying a mutability class.
//!
//! `Heap<T>` is the only way a container payload is stored inside a
//! [`Value`](super::Value). Its constructors are `pub(crate)`, so payloads
//! can only be created through the `Value` factory methods.
//!
//! # Mutate or allocate
//!
//! Every operator that wants to write into a payload goes through
//! [`Heap::make_mut`]:
//! - `Constant` handles are detached first: the payload is copied into a
//!   fresh `Mutable` allocation and the original stays untouched.
//! - `Mutable` handles are written in place. If the allocation happens to be
//!   shared, `Arc::make_mut` copies it, so a shared payload is never
//!   observed changing through another handle.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use super::Mutability;

/// Shared payload plus the mutability class of this handle.
pub struct Heap<T> {
    ptr: Arc<T>,
    class: Mutability,
}

impl<T> Heap<T> {
    /// Wrap a freshly built payload. Fresh payloads are `Mutable`.
    #[inline]
    pub(crate) fn new(value: T) -> Self {
        Heap {
            ptr: Arc::new(value),
            class: Mutability::Mutable,
        }
    }

    /// Mutability class of this handle.
    #[inline]
    pub fn mutability(&self) -> Mutability {
        self.class
    }

    /// Whether operators may write through this handle.
    #[inline]
    pub fn is_mutable(&self) -> bool {
        self.class.is_mutable()
    }

    /// Mark this handle as a shared literal.
    #[inline]
    #[must_use]
    pub fn into_constant(mut self) -> Self {
        self.class = Mutability::Constant;
        self
    }

    /// Number of handles sharing this payload.
    #[inline]
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.ptr)
    }

    /// Address of the payload allocation, for identity checks.
    #[inline]
    pub fn addr(&self) -> usize {
        Arc::as_ptr(&self.ptr).cast::<()>() as usize
    }

    /// Whether both handles point at the same allocation.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.ptr, &other.ptr)
    }
}

impl<T: Clone> Heap<T> {
    /// Writable access to the payload, applying the mutate-or-allocate rule.
    pub fn make_mut(&mut self) -> &mut T {
        if !self.class.is_mutable() {
            tracing::trace!("detaching constant payload before write");
            self.ptr = Arc::new((*self.ptr).clone());
            self.class = Mutability::Mutable;
        }
        Arc::make_mut(&mut self.ptr)
    }

    /// Take the payload out, copying only when it is shared.
    pub fn into_inner(self) -> T {
        Arc::try_unwrap(self.ptr).unwrap_or_else(|shared| (*shared).clone())
    }
}

impl<T> Clone for Heap<T> {
    #[inline]
    fn clone(&self) -> Self {
        Heap {
            ptr: Arc::clone(&self.ptr),
            class: self.class,
        }
    }
}

impl<T> Deref for Heap<T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        &self.ptr
    }
}

impl<T: PartialEq> PartialEq for Heap<T> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.ptr, &other.ptr) || *self.ptr == *other.ptr
    }
}

impl<T: fmt::Debug> fmt::Debug for Heap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        (*self.ptr).fmt(f)
    }
}
