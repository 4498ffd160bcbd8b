//! Error taxonomy for the matcher.
//!
//! Every variant is a caller precondition violation: an image larger than the
//! field supports, a foreign pixel format, or a malformed buffer. Finding no
//! match is never an error; searches return an empty list instead.

use thiserror::Error;

/// Which side of an image a size error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Width,
    Height,
    Lane,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::Width => f.write_str("width"),
            Axis::Height => f.write_str("height"),
            Axis::Lane => f.write_str("lane"),
        }
    }
}

#[derive(Debug, Error)]
pub enum MatchError {
    #[error("{axis} of {requested} exceeds the field's maximum transform order {capacity}")]
    TransformTooLarge {
        axis: Axis,
        requested: usize,
        capacity: usize,
    },

    #[error("{axis} of {size} is not a power of two")]
    NotPowerOfTwo { axis: Axis, size: usize },

    #[error(
        "strided lane (offset {offset}, stride {stride}, length {length}) \
         does not fit a buffer of {buffer_len}"
    )]
    LaneOutOfBounds {
        offset: usize,
        stride: usize,
        length: usize,
        buffer_len: usize,
    },

    #[error("element {value} at index {index} is not below the field modulus")]
    OutOfField { index: usize, value: u16 },

    #[error("buffer holds {actual} values, expected {expected}")]
    BufferSize { expected: usize, actual: usize },

    #[error("unsupported pixel layout: {0}")]
    UnsupportedLayout(String),

    #[error("failed to spawn transform workers: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

pub type MatchResult<T> = Result<T, MatchError>;
