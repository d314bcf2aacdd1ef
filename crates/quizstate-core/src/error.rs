//! Store error types.
//!
//! Every backend and the store facade report failures through [`StoreError`],
//! so callers can tell "the substrate refused the write" apart from "a stored
//! value could not be decoded" without string matching.

use thiserror::Error;

/// Errors produced by storage backends, the record codec, and the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The storage substrate cannot be read or written (quota exceeded,
    /// disabled, or an I/O failure underneath it).
    #[error("storage unavailable: {reason}")]
    StorageUnavailable { reason: String },

    /// A stored value exists but does not decode as the expected record.
    #[error("corrupt record at '{key}': {reason}")]
    CorruptRecord { key: String, reason: String },

    /// The quiz identifier was empty.
    #[error("quiz id must not be empty")]
    InvalidQuizId,
}

impl StoreError {
    /// Shorthand for building a [`StoreError::StorageUnavailable`].
    pub fn unavailable(reason: impl Into<String>) -> Self {
        StoreError::StorageUnavailable {
            reason: reason.into(),
        }
    }

    /// Returns `true` if the substrate rejected the operation.
    ///
    /// Data written by a failed call is lost; callers must surface this.
    pub fn is_storage_unavailable(&self) -> bool {
        matches!(self, StoreError::StorageUnavailable { .. })
    }

    /// Returns `true` if this error marks an undecodable stored value.
    pub fn is_corrupt(&self) -> bool {
        matches!(self, StoreError::CorruptRecord { .. })
    }
}
