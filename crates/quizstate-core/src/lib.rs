//! quizstate-core — Record model, key scheme, and the quiz state store.
//!
//! This crate defines the answer and completion records, how they are keyed
//! and encoded, the storage and clock seams, and the [`QuizStateStore`]
//! facade the rest of quizstate builds on.

pub mod codec;
pub mod error;
pub mod keys;
pub mod memory;
pub mod model;
pub mod store;
pub mod traits;

pub use error::StoreError;
pub use memory::MemoryBackend;
pub use model::{AnswerRecord, CompletionRecord, Payload, PayloadValue, QuizStatus};
pub use store::QuizStateStore;
pub use traits::{Clock, StorageBackend, SystemClock};
