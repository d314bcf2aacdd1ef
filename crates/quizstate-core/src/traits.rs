//! Seams between the store and its environment.
//!
//! [`StorageBackend`] is the durable string key-value substrate, and
//! [`Clock`] supplies write timestamps. Both are object safe so the store can
//! hold them as boxed trait objects.

use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};

use crate::error::StoreError;

// ---------------------------------------------------------------------------
// Storage substrate
// ---------------------------------------------------------------------------

/// A synchronous string key-value store scoped to one origin.
///
/// Mirrors the browser `localStorage` surface: reads of absent keys return
/// `None`, writes replace the whole value, and removing an absent key is a
/// no-op.
pub trait StorageBackend: Send + Sync {
    /// Human-readable backend name (e.g. "file").
    fn name(&self) -> &str;

    /// Read the value stored under `key`.
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove `key`. Succeeds when the key is already absent.
    fn remove_item(&self, key: &str) -> Result<(), StoreError>;

    /// Every key currently stored, in no particular order.
    fn keys(&self) -> Result<Vec<String>, StoreError>;
}

/// Bytes a set of entries occupies against a quota.
pub fn usage_of<'a>(entries: impl IntoIterator<Item = (&'a String, &'a String)>) -> usize {
    entries.into_iter().map(|(k, v)| k.len() + v.len()).sum()
}

/// Reject a write that would take an origin past `quota` bytes.
///
/// `current` is the usage before the write and `previous` the value the
/// write replaces, if any.
pub fn check_quota(
    quota: Option<usize>,
    current: usize,
    key: &str,
    previous: Option<&str>,
    value: &str,
) -> Result<(), StoreError> {
    let Some(quota) = quota else {
        return Ok(());
    };
    let released = previous.map(|p| key.len() + p.len()).unwrap_or(0);
    let needed = current.saturating_sub(released) + key.len() + value.len();
    if needed > quota {
        return Err(StoreError::unavailable(format!(
            "quota exceeded writing '{key}': {needed} bytes needed, {quota} allowed"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Clock
// ---------------------------------------------------------------------------

/// Source of write timestamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A manually driven clock for tests.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Move the clock forward by `by`.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn quota_counts_replaced_value_as_released() {
        // "k" + "aaaa" = 5 bytes in use; replacing with "bb" needs 3.
        assert!(check_quota(Some(3), 5, "k", Some("aaaa"), "bb").is_ok());
        assert!(check_quota(Some(3), 5, "k", None, "bb").is_err());
    }

    #[test]
    fn no_quota_accepts_anything() {
        assert!(check_quota(None, usize::MAX / 2, "k", None, "v").is_ok());
    }

    #[test]
    fn quota_error_is_storage_unavailable() {
        let err = check_quota(Some(4), 0, "quiz_q1", None, "x").unwrap_err();
        assert!(err.is_storage_unavailable());
        assert!(err.to_string().contains("quota exceeded"));
    }

    #[test]
    fn fixed_clock_advances() {
        let start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let clock = FixedClock::new(start);
        assert_eq!(clock.now(), start);
        clock.advance(Duration::seconds(90));
        assert_eq!(clock.now(), start + Duration::seconds(90));
    }
}
