//! Binary min-heaps with a replaceable comparator, and a variant that hands
//! out stable [`Handle`]s so a queued element can be read, reprioritised or
//! cancelled in logarithmic time.
//!
//! ```
//! use handleheap::{Heap, HandleHeap};
//!
//! let mut queue = HandleHeap::new();
//! let far = queue.insert_with_handle(50);
//! queue.insert_with_handle(20);
//!
//! queue.set(&far, 10).unwrap();
//! assert_eq!(queue.extract_minimum(), Some(10));
//! assert!(!queue.is_valid(&far));
//! ```

pub use crate::compare::{Compare, DynCompare, Natural};
pub use crate::engine::MEMBERSHIP_THRESHOLD;
pub use crate::error::{HeapError, Result};
pub use crate::handle::Handle;
pub use crate::handle_heap::HandleHeap;
pub use crate::heap::Heap;
pub use crate::members::Members;
pub use crate::min_heap::MinHeap;

mod compare;
mod engine;
mod error;
mod handle;
mod handle_heap;
mod heap;
mod members;
mod min_heap;
mod slots;
