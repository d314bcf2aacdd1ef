//! The quiz state store: namespaced, last-write-wins persistence of per-quiz
//! answers and completions.

use std::collections::BTreeSet;

use chrono::{DateTime, SubsecRound, Utc};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::codec;
use crate::error::StoreError;
use crate::keys::RecordKind;
use crate::model::{AnswerRecord, CompletionRecord, Payload, QuizStatus};
use crate::traits::{Clock, StorageBackend, SystemClock};

/// Facade over a [`StorageBackend`]. Callers never touch the substrate
/// directly.
pub struct QuizStateStore {
    backend: Box<dyn StorageBackend>,
    clock: Box<dyn Clock>,
}

impl QuizStateStore {
    /// Create a store over `backend`, stamping writes with wall-clock time.
    pub fn new(backend: Box<dyn StorageBackend>) -> Self {
        Self {
            backend,
            clock: Box::new(SystemClock),
        }
    }

    /// Replace the timestamp source.
    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Name of the underlying backend.
    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Persist an answer for `quiz_id`, replacing any previous one.
    pub fn save_answer(
        &self,
        quiz_id: &str,
        answer: &str,
        is_correct: bool,
    ) -> Result<(), StoreError> {
        let key = RecordKind::Answer.key_for(quiz_id)?;
        let record = AnswerRecord {
            answer: answer.to_string(),
            is_correct,
            timestamp: self.write_time(),
        };
        self.backend.set_item(&key, &codec::encode(&key, &record)?)?;
        debug!(%key, is_correct, "saved answer");
        Ok(())
    }

    /// Load the answer for `quiz_id`. Absent and corrupt records are `None`.
    pub fn load_answer(&self, quiz_id: &str) -> Result<Option<AnswerRecord>, StoreError> {
        self.load(RecordKind::Answer, quiz_id)
    }

    /// Remove the answer for `quiz_id`. Clearing an absent record succeeds.
    pub fn clear_answer(&self, quiz_id: &str) -> Result<(), StoreError> {
        self.clear(RecordKind::Answer, quiz_id)
    }

    /// Mark `quiz_id` completed with the caller's fields.
    ///
    /// `timestamp` and `completed` in `payload` are replaced by the store's
    /// own values.
    pub fn save_completion(&self, quiz_id: &str, payload: Payload) -> Result<(), StoreError> {
        let key = RecordKind::Completion.key_for(quiz_id)?;
        let record = CompletionRecord::new(payload, self.write_time());
        self.backend.set_item(&key, &codec::encode(&key, &record)?)?;
        debug!(%key, fields = record.fields().len(), "saved completion");
        Ok(())
    }

    /// Load the completion for `quiz_id`. Absent and corrupt records are
    /// `None`.
    pub fn load_completion(&self, quiz_id: &str) -> Result<Option<CompletionRecord>, StoreError> {
        self.load(RecordKind::Completion, quiz_id)
    }

    /// Remove the completion for `quiz_id`. Clearing an absent record
    /// succeeds.
    pub fn clear_completion(&self, quiz_id: &str) -> Result<(), StoreError> {
        self.clear(RecordKind::Completion, quiz_id)
    }

    /// Badge state for `quiz_id`.
    pub fn status(&self, quiz_id: &str) -> Result<QuizStatus, StoreError> {
        let completion = self.load_completion(quiz_id)?;
        Ok(QuizStatus::from_completion(completion.as_ref()))
    }

    /// Every quiz with an answer or completion key in this origin.
    pub fn quiz_ids(&self) -> Result<BTreeSet<String>, StoreError> {
        Ok(self
            .backend
            .keys()?
            .iter()
            .filter_map(|key| RecordKind::parse_key(key))
            .map(|(_, id)| id.to_string())
            .collect())
    }

    fn write_time(&self) -> DateTime<Utc> {
        // Stored timestamps carry milliseconds; truncate so the in-memory
        // record equals what a load returns.
        self.clock.now().trunc_subsecs(3)
    }

    fn load<T: DeserializeOwned>(
        &self,
        kind: RecordKind,
        quiz_id: &str,
    ) -> Result<Option<T>, StoreError> {
        let key = kind.key_for(quiz_id)?;
        let Some(raw) = self.backend.get_item(&key)? else {
            return Ok(None);
        };
        match codec::decode(&key, &raw) {
            Ok(record) => Ok(Some(record)),
            Err(e) if e.is_corrupt() => {
                warn!("treating {kind} record as absent: {e}");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn clear(&self, kind: RecordKind, quiz_id: &str) -> Result<(), StoreError> {
        let key = kind.key_for(quiz_id)?;
        self.backend.remove_item(&key)?;
        debug!(%key, "cleared {kind}");
        Ok(())
    }
}
