use std::ops::Range;
use std::sync::atomic::{AtomicU64, Ordering};

use slab::Slab;

use crate::error::{HeapError, Result};
use crate::slots::Track;

static NEXT_OWNER: AtomicU64 = AtomicU64::new(0);

/// Stable reference to one element of a [`HandleHeap`](crate::HandleHeap).
///
/// A handle stays valid until its element leaves the heap, however often the
/// element moves in between. It never becomes valid again afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle {
    owner: u64,
    key: usize,
    serial: u64,
}

#[derive(Debug)]
struct Entry {
    serial: u64,
    index: usize,
}

/// Maps handles to slots and slots back to handles. `by_index` is aligned
/// with the element storage, so `entries[by_index[i]].index == i` for every
/// live slot `i`.
#[derive(Debug)]
pub(crate) struct HandleTable {
    owner: u64,
    entries: Slab<Entry>,
    by_index: Vec<usize>,
    serial: u64,
}

impl HandleTable {
    pub fn new() -> Self {
        HandleTable {
            owner: NEXT_OWNER.fetch_add(1, Ordering::Relaxed),
            entries: Slab::new(),
            by_index: Vec::new(),
            serial: 0,
        }
    }

    fn handle(&self, key: usize) -> Handle {
        Handle {
            owner: self.owner,
            key,
            serial: self.entries[key].serial,
        }
    }

    pub fn owns(&self, handle: &Handle) -> bool {
        handle.owner == self.owner
    }

    pub fn handle_at(&self, index: usize) -> Option<Handle> {
        self.by_index.get(index).map(|&key| self.handle(key))
    }

    /// Handle of a live slot.
    pub fn slot_handle(&self, index: usize) -> Handle {
        self.handle(self.by_index[index])
    }

    pub fn handles_in(&self, range: Range<usize>) -> Vec<Handle> {
        self.by_index[range].iter().map(|&key| self.handle(key)).collect()
    }

    fn locate(&self, handle: &Handle) -> Result<usize> {
        if !self.owns(handle) {
            return Err(HeapError::ForeignHandle);
        }
        match self.entries.get(handle.key) {
            Some(entry) if entry.serial == handle.serial => Ok(entry.index),
            _ => Err(HeapError::InvalidHandle),
        }
    }

    /// Current slot of the handle's element. Rejections are logged.
    pub fn resolve(&self, handle: &Handle) -> Result<usize> {
        self.locate(handle).map_err(|error| {
            log::debug!("rejected {:?} in heap {}: {}", handle, self.owner, error);
            error
        })
    }

    /// Validity query, silent either way.
    pub fn is_live(&self, handle: &Handle) -> bool {
        self.locate(handle).is_ok()
    }

    /// Drops the handle's entry ahead of the positional removal of its slot.
    pub fn invalidate(&mut self, handle: &Handle) {
        if self.is_live(handle) {
            self.entries.remove(handle.key);
        }
    }

    #[cfg(test)]
    pub fn assert_aligned(&self, len: usize) {
        assert_eq!(self.by_index.len(), len);
        assert_eq!(self.entries.len(), len);
        for (index, &key) in self.by_index.iter().enumerate() {
            assert_eq!(
                self.entries[key].index, index,
                "handle table out of step at slot {}",
                index
            );
        }
    }
}

impl Track for HandleTable {
    fn pushed(&mut self, index: usize) {
        debug_assert_eq!(index, self.by_index.len());
        self.serial += 1;
        let key = self.entries.insert(Entry {
            serial: self.serial,
            index,
        });
        self.by_index.push(key);
    }

    fn swapped(&mut self, a: usize, b: usize) {
        self.by_index.swap(a, b);
        let (key_a, key_b) = (self.by_index[a], self.by_index[b]);
        self.entries[key_a].index = a;
        self.entries[key_b].index = b;
    }

    fn removed(&mut self, index: usize) {
        let key = self.by_index.swap_remove(index);
        // Already gone when the removal came through the handle itself.
        self.entries.try_remove(key);
        if let Some(&moved) = self.by_index.get(index) {
            self.entries[moved].index = index;
        }
    }

    fn cleared(&mut self) {
        self.by_index.clear();
        self.entries.clear();
    }
}
