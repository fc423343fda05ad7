use thiserror::Error;

/// Caller precondition violations. None of them leave a heap modified.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HeapError {
    #[error("handle no longer refers to an element of this heap")]
    InvalidHandle,

    #[error("handle was issued by another heap")]
    ForeignHandle,

    #[error("index {index} is out of bounds for a heap of length {len}")]
    OutOfBounds { index: usize, len: usize },

    #[error("heap does not support {op}, ordering is decided by the comparator only")]
    Unsupported { op: &'static str },
}

impl HeapError {
    #[cold]
    pub fn out_of_bounds(index: usize, len: usize) -> Self {
        HeapError::OutOfBounds { index, len }
    }

    #[cold]
    pub fn unsupported(op: &'static str) -> Self {
        log::debug!("rejected unsupported heap operation {}", op);
        HeapError::Unsupported { op }
    }
}

pub type Result<T> = std::result::Result<T, HeapError>;
