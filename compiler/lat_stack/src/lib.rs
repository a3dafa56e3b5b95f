//! Stack growth for walks whose depth comes from user data.
//!
//! Nested lists, tensor blocks, cofactor expansion and nested operator
//! expressions all recurse once per level of the value or expression being
//! processed. A script can nest any of these arbitrarily deep, so each of
//! those walks enters its next level through [`ensure_sufficient_stack`].
//!
//! On native targets the stack is extended with `stacker` whenever less
//! than `RED_ZONE` remains. `wasm32` manages its own stack and calls
//! straight through.

/// Remaining stack below which a new segment is allocated.
const RED_ZONE: usize = 100 * 1024;

/// Size of each newly allocated stack segment.
const SEGMENT: usize = 1024 * 1024;

/// Run `f`, first growing the stack if it is nearly exhausted.
///
/// ```text
/// fn depth(value: &Value) -> usize {
///     ensure_sufficient_stack(|| match value {
///         Value::List(items) => 1 + items.iter().map(depth).max().unwrap_or(0),
///         _ => 0,
///     })
/// }
/// ```
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A value shaped like `((((...))))`, as a nested list literal would be.
    enum Nested {
        Leaf(i64),
        Wrap(Box<Nested>),
    }

    fn innermost(value: &Nested) -> i64 {
        ensure_sufficient_stack(|| match value {
            Nested::Leaf(n) => *n,
            Nested::Wrap(inner) => innermost(inner),
        })
    }

    fn wrap(depth: usize) -> Nested {
        let mut value = Nested::Leaf(7);
        for _ in 0..depth {
            value = Nested::Wrap(Box::new(value));
        }
        value
    }

    fn unwrap_iteratively(mut value: Nested) {
        while let Nested::Wrap(inner) = value {
            value = *inner;
        }
    }

    #[test]
    fn shallow_nesting_reaches_the_leaf() {
        let value = wrap(3);
        assert_eq!(innermost(&value), 7);
        unwrap_iteratively(value);
    }

    #[test]
    fn deep_nesting_grows_the_stack() {
        let value = wrap(200_000);
        assert_eq!(innermost(&value), 7);
        // Dropping recursively would overflow on its own.
        unwrap_iteratively(value);
    }

    #[test]
    fn results_pass_through() {
        let result: Result<i64, &str> = ensure_sufficient_stack(|| Err("depth"));
        assert_eq!(result, Err("depth"));
    }
}
