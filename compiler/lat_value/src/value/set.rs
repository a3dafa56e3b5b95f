//! Ordered float key for `NumberSet`.

use std::cmp::Ordering;
use std::fmt;

/// `f64` ordered by [`f64::total_cmp`], so it can live in a `BTreeSet`.
///
/// `-0.0` and `0.0` are distinct members; NaNs sort after every number.
#[derive(Clone, Copy, Debug)]
pub struct SetFloat(pub f64);

impl SetFloat {
    #[inline]
    pub fn get(self) -> f64 {
        self.0
    }
}

impl PartialEq for SetFloat {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SetFloat {}

impl PartialOrd for SetFloat {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SetFloat {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for SetFloat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn set_orders_and_dedups() {
        let set: BTreeSet<SetFloat> = [3.0, 1.0, 3.0, 2.5].into_iter().map(SetFloat).collect();
        let members: Vec<f64> = set.iter().map(|f| f.get()).collect();
        assert_eq!(members, vec![1.0, 2.5, 3.0]);
    }

    #[test]
    fn nan_is_a_single_member() {
        let set: BTreeSet<SetFloat> = [f64::NAN, f64::NAN].into_iter().map(SetFloat).collect();
        assert_eq!(set.len(), 1);
    }
}
