//! In-memory storage backend.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::StoreError;
use crate::traits::{check_quota, usage_of, StorageBackend};

/// A process-local backend, used in tests and wherever persistence across
/// runs is not needed.
///
/// Clones share the same entries, so a test can keep a handle to inspect or
/// tamper with what a store wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    inner: Arc<Mutex<MemoryInner>>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    items: BTreeMap<String, String>,
    quota_bytes: Option<usize>,
    disabled: bool,
}

impl MemoryBackend {
    /// Create an empty backend with no quota.
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit total key plus value bytes.
    pub fn with_quota(self, quota_bytes: usize) -> Self {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .quota_bytes = Some(quota_bytes);
        self
    }

    /// Make every operation fail as if storage were turned off.
    pub fn set_disabled(&self, disabled: bool) {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .disabled = disabled;
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .items
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryInner>, StoreError> {
        let inner = self
            .inner
            .lock()
            .map_err(|_| StoreError::unavailable("memory backend lock poisoned"))?;
        if inner.disabled {
            return Err(StoreError::unavailable("storage is disabled"));
        }
        Ok(inner)
    }
}

impl StorageBackend for MemoryBackend {
    fn name(&self) -> &str {
        "memory"
    }

    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.lock()?.items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        check_quota(
            inner.quota_bytes,
            usage_of(&inner.items),
            key,
            inner.items.get(key).map(String::as_str),
            value,
        )?;
        inner.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        self.lock()?.items.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.lock()?.items.keys().cloned().collect())
    }
}
