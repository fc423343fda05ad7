use std::cmp::Ordering;
use std::hash::Hash;
use std::ops::Range;
use std::slice;

use log::trace;
use rustc_hash::FxHashSet;

use crate::compare::{ByRef, Compare};
use crate::error::{HeapError, Result};
use crate::members::Members;
use crate::slots::{Slots, Track, Untracked};

/// Bulk removal and retention by value search a hash set instead of the
/// argument slice once the slice holds more items than this.
pub const MEMBERSHIP_THRESHOLD: usize = 8;

/// Binary min-heap engine shared by the public heaps. `K` sees every move.
#[derive(Clone)]
pub(crate) struct RawHeap<T, C, K> {
    slots: Slots<T, K>,
    cmp: C,
}

impl<T, C: Compare<T>, K: Track> RawHeap<T, C, K> {
    pub fn new(cmp: C, track: K) -> Self {
        RawHeap {
            slots: Slots::new(track),
            cmp,
        }
    }

    pub fn from_vec(items: Vec<T>, cmp: C, track: K) -> Self {
        let mut heap = RawHeap {
            slots: Slots::from_vec(items, track),
            cmp,
        };
        heap.heapify();
        heap
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn as_slice(&self) -> &[T] {
        self.slots.as_slice()
    }

    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    pub fn peek(&self) -> Option<&T> {
        self.as_slice().first()
    }

    pub fn comparator(&self) -> &C {
        &self.cmp
    }

    pub fn tracker(&self) -> &K {
        self.slots.tracker()
    }

    pub fn tracker_mut(&mut self) -> &mut K {
        self.slots.tracker_mut()
    }

    pub fn reserve(&mut self, additional: usize) {
        self.slots.reserve(additional);
    }

    /// Replaces the order and rebuilds. Returns the previous comparator.
    pub fn set_comparator(&mut self, cmp: C) -> C {
        let previous = std::mem::replace(&mut self.cmp, cmp);
        log::debug!("comparator replaced, rebuilding {} elements", self.len());
        self.heapify();
        previous
    }

    fn less(&self, a: usize, b: usize) -> bool {
        self.cmp.compare(&self.slots[a], &self.slots[b]) == Ordering::Less
    }

    /// Moves the element at `index` towards the root while it is strictly
    /// smaller than its parent. Returns where it settled.
    fn sift_up(&mut self, index: usize) -> usize {
        let mut current = index;
        while current > 0 {
            let parent = (current - 1) / 2;
            if !self.less(current, parent) {
                break;
            }
            self.slots.swap(current, parent);
            current = parent;
        }
        current
    }

    /// Moves the element at `index` towards the leaves while a child is
    /// strictly smaller. Returns where it settled.
    fn sift_down(&mut self, index: usize) -> usize {
        let len = self.len();
        let mut current = index;
        loop {
            let left = 2 * current + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let child = if right < len && self.less(right, left) {
                right
            } else {
                left
            };
            if !self.less(child, current) {
                break;
            }
            self.slots.swap(current, child);
            current = child;
        }
        current
    }

    /// Sift-down only runs when sift-up did not move anything.
    fn restore(&mut self, index: usize) -> usize {
        let settled = self.sift_up(index);
        if settled != index {
            settled
        } else {
            self.sift_down(index)
        }
    }

    pub fn heapify(&mut self) {
        for index in (0..self.len() / 2).rev() {
            self.sift_down(index);
        }
    }

    /// Returns the slot the new element settled in.
    pub fn push(&mut self, element: T) -> usize {
        let index = self.slots.push(element);
        self.sift_up(index)
    }

    pub fn pop(&mut self) -> Option<T> {
        self.remove_at(0)
    }

    pub fn remove_at(&mut self, index: usize) -> Option<T> {
        if index >= self.len() {
            return None;
        }
        let element = self.slots.swap_remove(index);
        if index < self.len() {
            self.restore(index);
        }
        Some(element)
    }

    /// Overwrites slot `index` and restores order around it. Covers both
    /// key decrease and key increase. Returns the previous element.
    pub fn replace_at(&mut self, index: usize, element: T) -> Result<T> {
        if index >= self.len() {
            return Err(HeapError::out_of_bounds(index, self.len()));
        }
        let previous = self.slots.overwrite(index, element);
        self.restore(index);
        Ok(previous)
    }

    /// Appends without restoring order. Must be followed by `repair`.
    pub fn append<I: IntoIterator<Item = T>>(&mut self, items: I) -> Range<usize> {
        let start = self.len();
        let items = items.into_iter();
        self.reserve(items.size_hint().0);
        for element in items {
            self.slots.push(element);
        }
        start..self.len()
    }

    /// Restores order after `append` grew the heap from `old_len` slots.
    ///
    /// A batch at least as large as the old heap triggers a full rebuild.
    /// Smaller batches are repaired one ancestor range at a time, starting
    /// from the parents of the new slots. A range in which nothing moved
    /// leaves every range above it intact, so the walk stops there.
    pub fn repair(&mut self, old_len: usize) {
        let len = self.len();
        let added = len - old_len;
        if added == 0 {
            return;
        }
        if added >= old_len {
            trace!("bulk insert of {} into {}: full rebuild", added, old_len);
            self.heapify();
            return;
        }

        trace!("bulk insert of {} into {}: ancestor repair", added, old_len);
        let mut start = old_len;
        let mut end = len - 1;
        while start > 0 {
            start = (start - 1) / 2;
            end = (end - 1) / 2;

            let mut moved = false;
            for index in (start..=end).rev() {
                moved |= self.sift_down(index) != index;
            }
            if !moved {
                trace!("ancestor repair settled at {}..={}", start, end);
                break;
            }
        }
    }

    pub fn extend<I: IntoIterator<Item = T>>(&mut self, items: I) {
        let added = self.append(items);
        self.repair(added.start);
    }

    /// Removes every element for which `keep` returns false. Scans from the
    /// back so visited slots stay put. Returns whether anything was removed.
    pub fn retain<F: FnMut(&T) -> bool>(&mut self, mut keep: F) -> bool {
        let mut removed = false;
        let mut index = self.len();
        while index > 0 {
            index -= 1;
            // Sift-up after a removal can lift an unvisited ancestor into
            // this slot, so the slot is tested again.
            while index < self.len() && !keep(&self.slots[index]) {
                self.remove_at(index);
                removed = true;
            }
        }
        removed
    }

    pub fn remove_all<M: Members<T> + ?Sized>(&mut self, members: &M) -> bool {
        self.retain(|element| !members.contains_member(element))
    }

    pub fn retain_all<M: Members<T> + ?Sized>(&mut self, members: &M) -> bool {
        self.retain(|element| members.contains_member(element))
    }

    pub fn remove_values(&mut self, items: &[T]) -> bool
    where
        T: Eq + Hash,
    {
        if items.len() > MEMBERSHIP_THRESHOLD {
            let members: FxHashSet<&T> = items.iter().collect();
            self.retain(|element| !members.contains(element))
        } else {
            self.remove_all(items)
        }
    }

    pub fn retain_values(&mut self, items: &[T]) -> bool
    where
        T: Eq + Hash,
    {
        if items.len() > MEMBERSHIP_THRESHOLD {
            let members: FxHashSet<&T> = items.iter().collect();
            self.retain(|element| members.contains(element))
        } else {
            self.retain_all(items)
        }
    }

    /// Empties the heap in ascending order.
    pub fn drain_sorted(&mut self) -> Vec<T> {
        let mut sorted = Vec::with_capacity(self.len());
        while let Some(element) = self.pop() {
            sorted.push(element);
        }
        sorted
    }

    /// Ascending copy of the contents. The heap itself is left untouched.
    pub fn sorted_snapshot(&self) -> Vec<T>
    where
        T: Clone,
    {
        // The copy is already heap-ordered under the same comparator.
        let mut copy = RawHeap {
            slots: Slots::from_vec(self.as_slice().to_vec(), Untracked),
            cmp: ByRef(&self.cmp),
        };
        copy.drain_sorted()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }

    pub fn into_vec(self) -> Vec<T> {
        self.slots.into_vec()
    }

    pub fn into_parts(self) -> (Vec<T>, C) {
        (self.slots.into_vec(), self.cmp)
    }

    #[cfg(test)]
    pub fn assert_heap_order(&self) {
        for index in 1..self.len() {
            let parent = (index - 1) / 2;
            assert!(
                !self.less(index, parent),
                "slot {} is smaller than its parent {}",
                index,
                parent
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use rustc_hash::FxHashSet;

    use crate::compare::Natural;
    use crate::engine::RawHeap;
    use crate::error::HeapError;
    use crate::slots::Untracked;

    fn heap_of(items: Vec<i32>) -> RawHeap<i32, Natural, Untracked> {
        let heap = RawHeap::from_vec(items, Natural, Untracked);
        heap.assert_heap_order();
        heap
    }

    fn sorted(mut items: Vec<i32>) -> Vec<i32> {
        items.sort();
        items
    }

    #[test]
    fn push_and_pop_in_order() {
        let mut heap = RawHeap::new(Natural, Untracked);
        for element in vec![5, 3, 8, 1, 9, 1] {
            heap.push(element);
            heap.assert_heap_order();
        }
        assert_eq!(heap.peek(), Some(&1));
        assert_eq!(heap.drain_sorted(), vec![1, 1, 3, 5, 8, 9]);
        assert_eq!(heap.pop(), None);
    }

    #[test]
    fn remove_at_restores_order_both_ways() {
        // Removing slot 4 pulls the last element (5) up past its new parent.
        let mut heap = heap_of(vec![0, 10, 1, 11, 12, 3, 4, 13, 14, 15, 16, 5]);
        assert_eq!(heap.remove_at(4), Some(12));
        heap.assert_heap_order();
        assert_eq!(heap.as_slice()[1], 5);
        assert_eq!(heap.remove_at(0), Some(0));
        heap.assert_heap_order();
        let last = heap.len() - 1;
        assert!(heap.remove_at(last).is_some());
        heap.assert_heap_order();
        assert_eq!(heap.remove_at(heap.len()), None);
    }

    #[test]
    fn replace_at_covers_increase_and_decrease() {
        let mut heap = heap_of(vec![1, 3, 5, 7, 9, 11]);
        assert_eq!(heap.replace_at(0, 100), Ok(1));
        heap.assert_heap_order();
        assert_eq!(heap.peek(), Some(&3));

        let last = heap.len() - 1;
        heap.replace_at(last, -1).unwrap();
        heap.assert_heap_order();
        assert_eq!(heap.peek(), Some(&-1));

        assert_eq!(
            heap.replace_at(6, 0),
            Err(HeapError::OutOfBounds { index: 6, len: 6 })
        );
        assert_eq!(heap.sorted_snapshot(), vec![-1, 3, 5, 7, 9, 100]);
    }

    #[test]
    fn small_batches_use_ancestor_repair() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let base: Vec<i32> = (0..rng.gen_range(2..64))
                .map(|_| rng.gen_range(0..100))
                .collect();
            let batch: Vec<i32> = (0..rng.gen_range(0..base.len()))
                .map(|_| rng.gen_range(-20..120))
                .collect();

            let mut heap = heap_of(base.clone());
            heap.extend(batch.clone());
            heap.assert_heap_order();

            let mut expected = base;
            expected.extend(batch);
            assert_eq!(heap.sorted_snapshot(), sorted(expected));
        }
    }

    #[test]
    fn large_batches_rebuild() {
        let mut heap = heap_of(vec![4, 2]);
        heap.extend(vec![9, -3, 7, 0, 2]);
        heap.assert_heap_order();
        assert_eq!(heap.drain_sorted(), vec![-3, 0, 2, 2, 4, 7, 9]);

        let mut empty = RawHeap::new(Natural, Untracked);
        empty.extend(Vec::<i32>::new());
        assert_eq!(empty.len(), 0);
    }

    #[test]
    fn retain_removes_every_match() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..200 {
            let items: Vec<i32> = (0..rng.gen_range(0..80))
                .map(|_| rng.gen_range(0..40))
                .collect();
            let mut heap = heap_of(items.clone());
            let removed = heap.retain(|element| element % 3 != 0);
            heap.assert_heap_order();

            let expected: Vec<i32> = items.iter().copied().filter(|e| e % 3 != 0).collect();
            assert_eq!(removed, expected.len() != items.len());
            assert_eq!(heap.sorted_snapshot(), sorted(expected));
        }
    }

    #[test]
    fn membership_switches_to_hash_set() {
        let items: Vec<i32> = (0..50).collect();
        let evens: Vec<i32> = (0..50).filter(|e| e % 2 == 0).collect();
        let odd: Vec<i32> = (0..50).filter(|e| e % 2 == 1).collect();

        let mut heap = heap_of(items.clone());
        assert!(heap.remove_values(&evens));
        assert_eq!(heap.sorted_snapshot(), odd);

        let mut heap = heap_of(items);
        assert!(heap.retain_values(&evens));
        assert_eq!(heap.sorted_snapshot(), evens);
        assert!(!heap.retain_values(&evens));
    }

    #[test]
    fn sets_are_used_directly() {
        let evens: FxHashSet<i32> = (0..20).filter(|e| e % 2 == 0).collect();
        let small: BTreeSet<i32> = vec![1, 3].into_iter().collect();

        let mut heap = heap_of((0..20).collect());
        assert!(heap.remove_all(&evens));
        assert!(heap.retain_all(&small));
        assert_eq!(heap.sorted_snapshot(), vec![1, 3]);
        assert!(!heap.remove_all(&evens));
    }

    #[test]
    fn short_slices_need_only_equality() {
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
        struct Job(u8);

        let jobs = vec![Job(4), Job(1), Job(3), Job(2)];
        let mut heap = RawHeap::from_vec(jobs, Natural, Untracked);
        assert!(heap.remove_all(&[Job(1), Job(4)]));
        assert_eq!(heap.sorted_snapshot(), vec![Job(2), Job(3)]);
        assert!(heap.retain_all(&vec![Job(3)]));
        assert_eq!(heap.drain_sorted(), vec![Job(3)]);
    }

    #[test]
    fn comparator_swap_rebuilds() {
        let mut heap = RawHeap::from_vec(
            vec![3, 1, 2],
            Box::new(|a: &i32, b: &i32| a.cmp(b)) as crate::compare::DynCompare<i32>,
            Untracked,
        );
        assert_eq!(heap.peek(), Some(&1));
        let previous = heap.set_comparator(Box::new(|a: &i32, b: &i32| b.cmp(a)));
        assert_eq!(previous(&1, &2), std::cmp::Ordering::Less);
        heap.assert_heap_order();
        assert_eq!(heap.drain_sorted(), vec![3, 2, 1]);
    }
}
