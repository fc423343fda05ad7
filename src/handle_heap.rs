use std::fmt;
use std::hash::Hash;
use std::slice;

use delegate::delegate;

use crate::compare::{Compare, Natural};
use crate::engine::RawHeap;
use crate::error::{HeapError, Result};
use crate::handle::{Handle, HandleTable};
use crate::heap::Heap;
use crate::members::Members;
use crate::min_heap::MinHeap;

/// Min-heap whose elements can be read, reprioritised or removed later
/// through the [`Handle`] issued when they were inserted.
///
/// Every element owns exactly one handle. The handle follows the element
/// through every sift and swap-removal, and is invalidated once the element
/// leaves the heap, whichever way it leaves.
pub struct HandleHeap<T, C = Natural> {
    raw: RawHeap<T, C, HandleTable>,
}

impl<T: Ord> HandleHeap<T> {
    pub fn new() -> Self {
        Self::with_comparator(Natural)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let mut heap = Self::new();
        heap.reserve(capacity);
        heap
    }
}

impl<T, C: Compare<T>> HandleHeap<T, C> {
    pub fn with_comparator(cmp: C) -> Self {
        HandleHeap {
            raw: RawHeap::new(cmp, HandleTable::new()),
        }
    }

    /// Builds a heap out of `items`. Handles come back in the order of `items`.
    pub fn from_vec_with(cmp: C, items: Vec<T>) -> (Self, Vec<Handle>) {
        let mut heap = Self::with_comparator(cmp);
        let handles = heap.extend_with_handles(items);
        (heap, handles)
    }

    /// Takes over a plain heap, issuing one handle per element. Handles come
    /// back in the heap's slot order.
    pub fn from_heap(heap: MinHeap<T, C>) -> (Self, Vec<Handle>) {
        let (items, cmp) = heap.into_parts();
        let heap = HandleHeap {
            raw: RawHeap::from_vec(items, cmp, HandleTable::new()),
        };
        let handles = heap.raw.tracker().handles_in(0..heap.raw.len());
        (heap, handles)
    }

    /// Drops every handle and keeps the elements as a plain heap.
    pub fn into_heap(self) -> MinHeap<T, C> {
        let (items, cmp) = self.raw.into_parts();
        MinHeap::from_vec_with(cmp, items)
    }

    delegate! {
        to self.raw {
            /// Slots in heap order.
            pub fn as_slice(&self) -> &[T];
            pub fn comparator(&self) -> &C;
            pub fn reserve(&mut self, additional: usize);
            /// Installs a new order and rebuilds the heap under it. Handles
            /// stay valid. Returns the previous comparator.
            pub fn set_comparator(&mut self, cmp: C) -> C;
        }
    }

    pub fn insert_with_handle(&mut self, element: T) -> Handle {
        let index = self.raw.push(element);
        self.raw.tracker().slot_handle(index)
    }

    /// Bulk insertion. Handles come back in the order of `items`.
    pub fn extend_with_handles<I>(&mut self, items: I) -> Vec<Handle>
    where
        I: IntoIterator<Item = T>,
    {
        let added = self.raw.append(items);
        let handles = self.raw.tracker().handles_in(added.clone());
        self.raw.repair(added.start);
        handles
    }

    pub fn get(&self, handle: &Handle) -> Result<&T> {
        let index = self.raw.tracker().resolve(handle)?;
        Ok(&self.raw.as_slice()[index])
    }

    /// Replaces the handle's element, which then moves up or down as the
    /// order requires. The handle stays bound to the new element. Returns the
    /// old element.
    pub fn set(&mut self, handle: &Handle, element: T) -> Result<T> {
        let index = self.raw.tracker().resolve(handle)?;
        self.raw.replace_at(index, element)
    }

    /// Current slot of the handle's element.
    pub fn index_of(&self, handle: &Handle) -> Result<usize> {
        self.raw.tracker().resolve(handle)
    }

    /// Removes the handle's element and invalidates the handle.
    pub fn remove(&mut self, handle: &Handle) -> Result<T> {
        let index = self.raw.tracker().resolve(handle)?;
        self.raw.tracker_mut().invalidate(handle);
        self.raw.remove_at(index).ok_or(HeapError::InvalidHandle)
    }

    pub fn is_valid(&self, handle: &Handle) -> bool {
        self.raw.tracker().is_live(handle)
    }

    /// Whether this heap issued `handle`, valid or not.
    pub fn owns(&self, handle: &Handle) -> bool {
        self.raw.tracker().owns(handle)
    }

    pub fn handle_at(&self, index: usize) -> Option<Handle> {
        self.raw.tracker().handle_at(index)
    }

    /// Handle of the minimum.
    pub fn peek_handle(&self) -> Option<Handle> {
        self.handle_at(0)
    }
}

impl<T, C: Compare<T>> Heap<T> for HandleHeap<T, C> {
    delegate! {
        to self.raw {
            fn len(&self) -> usize;
            #[call(peek)]
            fn find_minimum(&self) -> Option<&T>;
            #[call(pop)]
            fn extract_minimum(&mut self) -> Option<T>;
            fn remove_at(&mut self, index: usize) -> Option<T>;
            fn replace_at(&mut self, index: usize, element: T) -> Result<T>;
            #[call(extend)]
            fn extend_from<I: IntoIterator<Item = T>>(&mut self, items: I);
            fn retain<F: FnMut(&T) -> bool>(&mut self, keep: F) -> bool;
            fn remove_all<M: Members<T> + ?Sized>(&mut self, members: &M) -> bool;
            fn retain_all<M: Members<T> + ?Sized>(&mut self, members: &M) -> bool;
            fn remove_values(&mut self, items: &[T]) -> bool where T: Eq + Hash;
            fn retain_values(&mut self, items: &[T]) -> bool where T: Eq + Hash;
            fn iter(&self) -> slice::Iter<'_, T>;
            fn sorted_snapshot(&self) -> Vec<T> where T: Clone;
            /// Every handle is invalidated.
            fn drain_sorted(&mut self) -> Vec<T>;
        }
    }

    /// The element still gets a handle, reachable through
    /// [`HandleHeap::handle_at`].
    fn insert(&mut self, element: T) {
        self.raw.push(element);
    }

    fn clear(&mut self) {
        log::debug!("clearing {} elements and their handles", self.raw.len());
        self.raw.clear();
    }
}

impl<T, C: Compare<T> + Default> Default for HandleHeap<T, C> {
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}

impl<T, C: Compare<T>> Extend<T> for HandleHeap<T, C> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.raw.extend(iter);
    }
}

impl<'a, T, C: Compare<T>> IntoIterator for &'a HandleHeap<T, C> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: fmt::Debug, C: Compare<T>> fmt::Debug for HandleHeap<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
