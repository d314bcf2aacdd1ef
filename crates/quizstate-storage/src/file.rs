//! File-backed storage: one JSON document per origin.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use tempfile::NamedTempFile;
use tracing::{debug, instrument};

use quizstate_core::error::StoreError;
use quizstate_core::traits::{check_quota, usage_of, StorageBackend};

/// Default quota, matching the common browser `localStorage` limit.
pub const DEFAULT_QUOTA_BYTES: usize = 5 * 1024 * 1024;

/// Durable backend persisting an origin as `<data_dir>/<origin>.json`.
///
/// The document is a flat JSON object of string keys to string values. Every
/// write replaces the document atomically through a temp file in the same
/// directory.
#[derive(Debug, Clone)]
pub struct FileBackend {
    path: PathBuf,
    quota_bytes: Option<usize>,
    read_only: bool,
}

impl FileBackend {
    /// Create a backend for `origin` under `data_dir`.
    ///
    /// Nothing is touched on disk until the first write.
    pub fn new(data_dir: &Path, origin: &str) -> Result<Self> {
        validate_origin(origin)?;
        Ok(Self {
            path: data_dir.join(format!("{origin}.json")),
            quota_bytes: Some(DEFAULT_QUOTA_BYTES),
            read_only: false,
        })
    }

    /// Set the byte quota (`None` for unlimited).
    pub fn with_quota(mut self, quota_bytes: Option<usize>) -> Self {
        self.quota_bytes = quota_bytes;
        self
    }

    /// Reject writes and removals.
    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    /// Path of the origin document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_items(&self) -> Result<BTreeMap<String, String>, StoreError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => {
                return Err(StoreError::unavailable(format!(
                    "failed to read {}: {e}",
                    self.path.display()
                )))
            }
        };
        serde_json::from_str(&content).map_err(|e| {
            StoreError::unavailable(format!(
                "origin document {} is unreadable: {e}",
                self.path.display()
            ))
        })
    }

    fn write_items(&self, items: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        let io_err = |e: std::io::Error| {
            StoreError::unavailable(format!("failed to write {}: {e}", self.path.display()))
        };

        std::fs::create_dir_all(dir).map_err(io_err)?;
        let mut tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
        let body = serde_json::to_vec_pretty(items)
            .map_err(|e| StoreError::unavailable(format!("failed to encode origin: {e}")))?;
        tmp.write_all(&body).map_err(io_err)?;
        tmp.as_file().sync_all().map_err(io_err)?;
        tmp.persist(&self.path).map_err(|e| io_err(e.error))?;
        Ok(())
    }

    fn ensure_writable(&self) -> Result<(), StoreError> {
        if self.read_only {
            return Err(StoreError::unavailable(format!(
                "{} is read-only",
                self.path.display()
            )));
        }
        Ok(())
    }
}

impl StorageBackend for FileBackend {
    fn name(&self) -> &str {
        "file"
    }

    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read_items()?.remove(key))
    }

    #[instrument(skip(self, value), fields(path = %self.path.display()))]
    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.ensure_writable()?;
        let mut items = self.read_items()?;
        check_quota(
            self.quota_bytes,
            usage_of(&items),
            key,
            items.get(key).map(String::as_str),
            value,
        )?;
        items.insert(key.to_string(), value.to_string());
        self.write_items(&items)?;
        debug!(bytes = value.len(), "wrote item");
        Ok(())
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        self.ensure_writable()?;
        let mut items = self.read_items()?;
        if items.remove(key).is_none() {
            return Ok(());
        }
        self.write_items(&items)?;
        debug!("removed item");
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.read_items()?.into_keys().collect())
    }
}

/// Origins become file names, so they must not escape the data directory.
fn validate_origin(origin: &str) -> Result<()> {
    if origin.is_empty() {
        bail!("origin must not be empty");
    }
    if origin.contains(['/', '\\']) || origin.contains("..") {
        bail!("origin '{origin}' must not contain path separators or '..'");
    }
    Ok(())
}
