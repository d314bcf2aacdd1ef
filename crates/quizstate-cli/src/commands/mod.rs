pub mod answer;
pub mod completion;
pub mod init;
pub mod status;

use std::path::PathBuf;

use anyhow::Result;
use tracing::debug;

use quizstate_core::QuizStateStore;
use quizstate_storage::config::{create_backend, load_config_from};

/// Global flags that decide which origin a command operates on.
pub struct StoreOptions {
    pub config: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
    pub origin: Option<String>,
}

impl StoreOptions {
    /// Load config, apply command-line overrides, and open the store.
    pub fn open(&self) -> Result<QuizStateStore> {
        let config = load_config_from(self.config.as_deref())?
            .with_overrides(self.data_dir.clone(), self.origin.clone());
        debug!(backend = ?config.backend, "opening store");
        let backend = create_backend(&config.backend)?;
        Ok(QuizStateStore::new(backend))
    }
}
