//! JSON layout of the persisted `AppData` snapshot.
//!
//! Fields added in later schema versions are optional on read and default to
//! empty, so snapshots written by older builds keep loading.

use quiz_core::model::AppData;

use crate::repository::StorageError;

/// Serialize a snapshot to its persisted JSON form.
///
/// # Errors
///
/// Returns `StorageError::Serialization` if encoding fails.
pub fn encode(data: &AppData) -> Result<String, StorageError> {
    serde_json::to_string(data).map_err(|e| StorageError::Serialization(e.to_string()))
}

/// Parse a persisted JSON snapshot.
///
/// # Errors
///
/// Returns `StorageError::Serialization` if the text is not a valid snapshot.
pub fn decode(raw: &str) -> Result<AppData, StorageError> {
    serde_json::from_str(raw).map_err(|e| StorageError::Serialization(e.to_string()))
}
