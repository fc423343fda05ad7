use std::collections::{BTreeSet, HashSet};
use std::hash::{BuildHasher, Hash};

/// Membership test used by bulk removal and retention.
///
/// Sets answer in constant or logarithmic time and are used as they are.
/// Slices, arrays and vectors are scanned linearly.
pub trait Members<T> {
    fn contains_member(&self, element: &T) -> bool;
}

impl<T: PartialEq> Members<T> for [T] {
    fn contains_member(&self, element: &T) -> bool {
        self.contains(element)
    }
}

impl<T: PartialEq, const N: usize> Members<T> for [T; N] {
    fn contains_member(&self, element: &T) -> bool {
        self.contains(element)
    }
}

impl<T: PartialEq> Members<T> for Vec<T> {
    fn contains_member(&self, element: &T) -> bool {
        self.contains(element)
    }
}

// Covers `FxHashSet` as well.
impl<T: Eq + Hash, S: BuildHasher> Members<T> for HashSet<T, S> {
    fn contains_member(&self, element: &T) -> bool {
        self.contains(element)
    }
}

impl<T: Ord> Members<T> for BTreeSet<T> {
    fn contains_member(&self, element: &T) -> bool {
        self.contains(element)
    }
}
