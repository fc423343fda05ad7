use std::mem;
use std::ops::Index;

/// Observer of every relocation the heap performs on its storage.
pub(crate) trait Track {
    /// A new slot was appended at `index`.
    fn pushed(&mut self, index: usize);
    /// Slots `a` and `b` exchanged their elements.
    fn swapped(&mut self, a: usize, b: usize);
    /// The element at `index` left, the last slot moved into `index` unless
    /// `index` was the last slot itself.
    fn removed(&mut self, index: usize);
    fn cleared(&mut self);
}

/// Storage without any external bookkeeping.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Untracked;

impl Track for Untracked {
    fn pushed(&mut self, _index: usize) {}
    fn swapped(&mut self, _a: usize, _b: usize) {}
    fn removed(&mut self, _index: usize) {}
    fn cleared(&mut self) {}
}

/// Dense zero-based storage. Only the moves a heap needs are exposed, and
/// each of them is reported to the tracker.
#[derive(Debug, Clone)]
pub(crate) struct Slots<T, K> {
    items: Vec<T>,
    track: K,
}

impl<T, K: Track> Slots<T, K> {
    pub fn new(track: K) -> Self {
        Slots { items: Vec::new(), track }
    }

    /// Adopts `items` as they are, reporting one append per element.
    pub fn from_vec(items: Vec<T>, mut track: K) -> Self {
        for index in 0..items.len() {
            track.pushed(index);
        }
        Slots { items, track }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn tracker(&self) -> &K {
        &self.track
    }

    pub fn tracker_mut(&mut self) -> &mut K {
        &mut self.track
    }

    pub fn reserve(&mut self, additional: usize) {
        self.items.reserve(additional);
    }

    pub fn push(&mut self, element: T) -> usize {
        let index = self.items.len();
        self.items.push(element);
        self.track.pushed(index);
        index
    }

    pub fn swap(&mut self, a: usize, b: usize) {
        self.items.swap(a, b);
        self.track.swapped(a, b);
    }

    pub fn swap_remove(&mut self, index: usize) -> T {
        let element = self.items.swap_remove(index);
        self.track.removed(index);
        element
    }

    /// Writes `element` into `index` without restoring heap order. The slot
    /// keeps its tracker entry.
    pub fn overwrite(&mut self, index: usize, element: T) -> T {
        mem::replace(&mut self.items[index], element)
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.track.cleared();
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

impl<T, K> Index<usize> for Slots<T, K> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.items[index]
    }
}
