use chrono::Utc;
use quiz_core::model::AppData;
use sqlx::Row;

use super::SqliteRepository;
use crate::codec;
use crate::repository::{AppDataRepository, StorageError};

fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

impl SqliteRepository {
    /// Read the raw value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the query fails.
    pub async fn get_raw(&self, key: &str) -> Result<Option<String>, StorageError> {
        let row = sqlx::query("SELECT value FROM kv_store WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(conn)?;

        row.map(|r| r.try_get::<String, _>("value"))
            .transpose()
            .map_err(|e| StorageError::Serialization(e.to_string()))
    }

    /// Insert or replace the raw value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the statement fails.
    pub async fn put_raw(&self, key: &str, value: &str) -> Result<(), StorageError> {
        sqlx::query(
            r"
                INSERT INTO kv_store (key, value, updated_at)
                VALUES (?1, ?2, ?3)
                ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = excluded.updated_at
            ",
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(conn)?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl AppDataRepository for SqliteRepository {
    async fn load_app_data(&self) -> Result<Option<AppData>, StorageError> {
        let Some(raw) = self.get_raw(&self.key).await? else {
            tracing::debug!(key = %self.key, "no stored snapshot");
            return Ok(None);
        };
        codec::decode(&raw).map(Some)
    }

    async fn save_app_data(&self, data: &AppData) -> Result<(), StorageError> {
        let raw = codec::encode(data)?;
        self.put_raw(&self.key, &raw).await?;
        tracing::debug!(key = %self.key, bytes = raw.len(), "saved snapshot");
        Ok(())
    }
}
