use std::fmt;
use std::hash::Hash;
use std::iter::FromIterator;
use std::slice;
use std::vec;

use delegate::delegate;

use crate::compare::{Compare, Natural};
use crate::engine::RawHeap;
use crate::error::Result;
use crate::heap::Heap;
use crate::members::Members;
use crate::slots::Untracked;

/// Binary min-heap ordered by a comparator `C`.
///
/// Iteration walks the slots in heap order, not in sorted order. Use
/// [`Heap::sorted_snapshot`] or [`Heap::drain_sorted`] for ascending
/// output.
#[derive(Clone)]
pub struct MinHeap<T, C = Natural> {
    raw: RawHeap<T, C, Untracked>,
}

impl<T: Ord> MinHeap<T> {
    pub fn new() -> Self {
        Self::with_comparator(Natural)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let mut heap = Self::new();
        heap.reserve(capacity);
        heap
    }
}

impl<T, C: Compare<T>> MinHeap<T, C> {
    pub fn with_comparator(cmp: C) -> Self {
        MinHeap {
            raw: RawHeap::new(cmp, Untracked),
        }
    }

    /// Builds a heap out of `items` in linear time.
    pub fn from_vec_with(cmp: C, items: Vec<T>) -> Self {
        MinHeap {
            raw: RawHeap::from_vec(items, cmp, Untracked),
        }
    }

    delegate! {
        to self.raw {
            /// Slots in heap order.
            pub fn as_slice(&self) -> &[T];
            pub fn comparator(&self) -> &C;
            pub fn reserve(&mut self, additional: usize);
            /// Installs a new order and rebuilds the heap under it. Returns the
            /// previous comparator.
            pub fn set_comparator(&mut self, cmp: C) -> C;
            /// Storage in heap order.
            pub fn into_vec(self) -> Vec<T>;
        }
    }

    pub fn into_sorted_vec(mut self) -> Vec<T> {
        self.drain_sorted()
    }

    pub(crate) fn into_parts(self) -> (Vec<T>, C) {
        self.raw.into_parts()
    }

    /// Moves every element of `other` into `self`.
    pub fn merge(mut self, other: Self) -> Self {
        self.raw.extend(other.into_vec());
        self
    }
}

impl<T, C: Compare<T>> Heap<T> for MinHeap<T, C> {
    delegate! {
        to self.raw {
            fn len(&self) -> usize;
            #[call(peek)]
            fn find_minimum(&self) -> Option<&T>;
            #[call(pop)]
            fn extract_minimum(&mut self) -> Option<T>;
            fn remove_at(&mut self, index: usize) -> Option<T>;
            fn replace_at(&mut self, index: usize, element: T) -> Result<T>;
            fn clear(&mut self);
            #[call(extend)]
            fn extend_from<I: IntoIterator<Item = T>>(&mut self, items: I);
            fn retain<F: FnMut(&T) -> bool>(&mut self, keep: F) -> bool;
            fn remove_all<M: Members<T> + ?Sized>(&mut self, members: &M) -> bool;
            fn retain_all<M: Members<T> + ?Sized>(&mut self, members: &M) -> bool;
            fn remove_values(&mut self, items: &[T]) -> bool where T: Eq + Hash;
            fn retain_values(&mut self, items: &[T]) -> bool where T: Eq + Hash;
            fn iter(&self) -> slice::Iter<'_, T>;
            fn sorted_snapshot(&self) -> Vec<T> where T: Clone;
            fn drain_sorted(&mut self) -> Vec<T>;
        }
    }

    fn insert(&mut self, element: T) {
        self.raw.push(element);
    }
}

impl<T, C: Compare<T> + Default> Default for MinHeap<T, C> {
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}

impl<T: Ord> From<Vec<T>> for MinHeap<T> {
    fn from(items: Vec<T>) -> Self {
        Self::from_vec_with(Natural, items)
    }
}

impl<T: Ord> FromIterator<T> for MinHeap<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl<T, C: Compare<T>> Extend<T> for MinHeap<T, C> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.raw.extend(iter);
    }
}

impl<'a, T, C: Compare<T>> IntoIterator for &'a MinHeap<T, C> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, C: Compare<T>> IntoIterator for MinHeap<T, C> {
    type Item = T;
    type IntoIter = vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.into_vec().into_iter()
    }
}

impl<T: fmt::Debug, C: Compare<T>> fmt::Debug for MinHeap<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
