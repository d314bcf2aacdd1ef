//! quizstate-storage — Durable storage backends and configuration.
//!
//! Implements the `StorageBackend` trait over one JSON document per origin,
//! and builds backends from `quizstate.toml`.

pub mod config;
pub mod file;

pub use config::{create_backend, load_config, BackendConfig, QuizStateConfig};
pub use file::FileBackend;
