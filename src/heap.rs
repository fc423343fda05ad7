use std::hash::Hash;
use std::slice;

use crate::error::{HeapError, Result};
use crate::members::Members;

/// Ordered container contract shared by [`MinHeap`](crate::MinHeap) and
/// [`HandleHeap`](crate::HandleHeap). Slot indices are heap positions and
/// change whenever the heap reorders itself.
pub trait Heap<T> {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn find_minimum(&self) -> Option<&T>;
    fn insert(&mut self, element: T);
    fn extract_minimum(&mut self) -> Option<T>;

    /// Removes the element in slot `index`, `None` when there is no such slot.
    fn remove_at(&mut self, index: usize) -> Option<T>;

    /// Overwrites slot `index` and moves the new element to wherever the
    /// order puts it. Returns the element it replaced.
    fn replace_at(&mut self, index: usize, element: T) -> Result<T>;

    fn clear(&mut self);

    /// Bulk insertion. Cheaper than inserting one by one once the batch is
    /// large next to the heap.
    fn extend_from<I: IntoIterator<Item = T>>(&mut self, items: I);

    /// Keeps only the elements for which `keep` returns true. Returns whether
    /// anything was removed.
    fn retain<F: FnMut(&T) -> bool>(&mut self, keep: F) -> bool;

    /// Removes every element contained in `members`.
    fn remove_all<M: Members<T> + ?Sized>(&mut self, members: &M) -> bool;

    /// Removes every element not contained in `members`.
    fn retain_all<M: Members<T> + ?Sized>(&mut self, members: &M) -> bool;

    /// Like [`Heap::remove_all`], hashing `items` first when there are more
    /// than [`MEMBERSHIP_THRESHOLD`](crate::MEMBERSHIP_THRESHOLD) of them.
    fn remove_values(&mut self, items: &[T]) -> bool
    where
        T: Eq + Hash;

    /// Like [`Heap::retain_all`], hashing `items` first when there are more
    /// than [`MEMBERSHIP_THRESHOLD`](crate::MEMBERSHIP_THRESHOLD) of them.
    fn retain_values(&mut self, items: &[T]) -> bool
    where
        T: Eq + Hash;

    /// Slots in heap order, not sorted.
    fn iter(&self) -> slice::Iter<'_, T>;

    /// Ascending copy of the contents, leaving the heap as it is.
    fn sorted_snapshot(&self) -> Vec<T>
    where
        T: Clone;

    /// Empties the heap in ascending order.
    fn drain_sorted(&mut self) -> Vec<T>;

    /// Always rejected: the comparator alone decides positions.
    fn insert_at(&mut self, _index: usize, _element: T) -> Result<()> {
        Err(HeapError::unsupported("insert_at"))
    }

    /// Always rejected, see [`Heap::insert_at`].
    fn insert_all_at<I>(&mut self, _index: usize, _elements: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
    {
        Err(HeapError::unsupported("insert_all_at"))
    }
}
