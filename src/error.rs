use alloc::string::String;

use thiserror::Error;

/// Result type alias used by the fallible collection operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Contract violations reported by [`TstMap`](crate::TstMap), [`TstSet`](crate::TstSet)
/// and their views and cursors.
///
/// Every variant is deterministic: retrying the same call on the same collection fails
/// the same way.
#[derive(Error, Clone, Debug, Eq, PartialEq)]
pub enum Error {
    /// An argument violated the operation's contract, e.g. `from > to` for a sub-range.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// The key lies outside the bounds of the view it was used with.
    #[error("key {key:?} is out of range for this view")]
    KeyOutOfRange {
        /// The offending key.
        key: String,
    },

    /// A rank was outside `[0, len)`.
    #[error("index {index} is out of range for length {len}")]
    IndexOutOfRange {
        /// The requested rank.
        index: usize,
        /// The number of keys at the time of the request.
        len: usize,
    },

    /// A dynamically typed key could not be compared against character sequences.
    #[error("key type cannot be compared against character sequences")]
    IncomparableKey,

    /// `remove` was called on a cursor before `try_next`, or twice in a row.
    #[error("cursor has no current entry to remove")]
    IteratorMisuse,

    /// `try_next` was called on a cursor that has no further entries.
    #[error("cursor is exhausted")]
    Exhausted,
}

impl Error {
    pub(crate) fn key_out_of_range(key: &str) -> Self {
        tracing::debug!(key, "rejected key outside view bounds");
        Error::KeyOutOfRange { key: key.into() }
    }

    pub(crate) fn index_out_of_range(index: usize, len: usize) -> Self {
        Error::IndexOutOfRange { index, len }
    }
}
