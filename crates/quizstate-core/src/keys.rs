//! Key namespacing for records in the shared storage namespace.

use std::fmt;

use crate::error::StoreError;

/// Prefix for answer record keys.
pub const ANSWER_PREFIX: &str = "quiz_";

/// Prefix for completion record keys.
pub const COMPLETION_PREFIX: &str = "completion_";

/// The kinds of record the store persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Answer,
    Completion,
}

impl RecordKind {
    /// Key prefix for this kind.
    pub fn prefix(self) -> &'static str {
        match self {
            RecordKind::Answer => ANSWER_PREFIX,
            RecordKind::Completion => COMPLETION_PREFIX,
        }
    }

    /// Build the storage key for `quiz_id`.
    pub fn key_for(self, quiz_id: &str) -> Result<String, StoreError> {
        if quiz_id.is_empty() {
            return Err(StoreError::InvalidQuizId);
        }
        Ok(format!("{}{quiz_id}", self.prefix()))
    }

    /// Split a storage key into its kind and quiz id.
    ///
    /// Returns `None` for keys outside the quiz namespace, including a bare
    /// prefix with no id.
    pub fn parse_key(key: &str) -> Option<(RecordKind, &str)> {
        [RecordKind::Answer, RecordKind::Completion]
            .into_iter()
            .find_map(|kind| {
                key.strip_prefix(kind.prefix())
                    .filter(|id| !id.is_empty())
                    .map(|id| (kind, id))
            })
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Answer => write!(f, "answer"),
            RecordKind::Completion => write!(f, "completion"),
        }
    }
}
