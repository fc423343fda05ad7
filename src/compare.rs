use std::cmp::Ordering;

/// A total order over `T`. The smallest element under this order sits at the
/// root of the heap.
pub trait Compare<T: ?Sized> {
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

/// `T`'s own `Ord` implementation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Natural;

impl<T: Ord + ?Sized> Compare<T> for Natural {
    fn compare(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}

impl<T: ?Sized, F> Compare<T> for F
where
    F: Fn(&T, &T) -> Ordering,
{
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self(a, b)
    }
}

/// Comparator type for heaps whose order is swapped at runtime for a
/// different closure.
pub type DynCompare<T> = Box<dyn Fn(&T, &T) -> Ordering>;

/// Borrowed comparator, used when a temporary heap shares the order of a
/// live one.
pub(crate) struct ByRef<'a, C>(pub &'a C);

impl<'a, T: ?Sized, C: Compare<T>> Compare<T> for ByRef<'a, C> {
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self.0.compare(a, b)
    }
}
