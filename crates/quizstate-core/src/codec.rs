//! JSON encoding of records into storage values.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::StoreError;

/// Encode a record as the string stored under its key.
pub fn encode<T: Serialize>(key: &str, record: &T) -> Result<String, StoreError> {
    serde_json::to_string(record).map_err(|e| StoreError::CorruptRecord {
        key: key.to_string(),
        reason: e.to_string(),
    })
}

/// Decode the value stored under `key`.
///
/// Anything that does not parse as the expected record, including valid
/// JSON of the wrong shape, is a [`StoreError::CorruptRecord`].
pub fn decode<T: DeserializeOwned>(key: &str, raw: &str) -> Result<T, StoreError> {
    serde_json::from_str(raw).map_err(|e| StoreError::CorruptRecord {
        key: key.to_string(),
        reason: e.to_string(),
    })
}
