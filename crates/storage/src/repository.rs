use async_trait::async_trait;
use quiz_core::model::AppData;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::codec;

/// Versioned key under which the whole snapshot is stored.
///
/// Changing it is an intentional breaking-format bump: data under an older
/// key is ignored and readers start from seed data.
pub const STORAGE_KEY: &str = "quiz_master_v2";

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Repository contract for the persisted `AppData` aggregate.
///
/// The snapshot is always read and written as a whole.
#[async_trait]
pub trait AppDataRepository: Send + Sync {
    /// Load the stored snapshot.
    ///
    /// Returns `Ok(None)` when nothing has been stored under the key yet.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the stored value cannot be
    /// decoded, or other storage errors.
    async fn load_app_data(&self) -> Result<Option<AppData>, StorageError>;

    /// Replace the stored snapshot.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the snapshot cannot be encoded or stored.
    async fn save_app_data(&self, data: &AppData) -> Result<(), StorageError>;
}

/// Simple in-memory key/value repository for testing and prototyping.
#[derive(Clone)]
pub struct InMemoryRepository {
    key: String,
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::with_key(STORAGE_KEY)
    }

    #[must_use]
    pub fn with_key(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            values: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Store a raw value under an arbitrary key.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn put_raw(&self, key: &str, value: impl Into<String>) -> Result<(), StorageError> {
        let mut guard = self
            .values
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.to_owned(), value.into());
        Ok(())
    }

    /// Read the raw value stored under an arbitrary key.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn get_raw(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self
            .values
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }
}

#[async_trait]
impl AppDataRepository for InMemoryRepository {
    async fn load_app_data(&self) -> Result<Option<AppData>, StorageError> {
        self.get_raw(&self.key)?
            .map(|raw| codec::decode(&raw))
            .transpose()
    }

    async fn save_app_data(&self, data: &AppData) -> Result<(), StorageError> {
        let raw = codec::encode(data)?;
        self.put_raw(&self.key, raw)
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub app_data: Arc<dyn AppDataRepository>,
}
