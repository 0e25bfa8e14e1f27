use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::CategoryId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CategoryError {
    #[error("category name cannot be empty")]
    EmptyName,
}

/// A named grouping of questions representing one exam topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

impl Category {
    /// Creates a new category.
    ///
    /// # Errors
    ///
    /// Returns `CategoryError::EmptyName` if the name is blank.
    pub fn new(
        id: CategoryId,
        name: impl Into<String>,
        description: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, CategoryError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CategoryError::EmptyName);
        }

        Ok(Self {
            id,
            name,
            description: description.into(),
            created_at,
        })
    }

    /// Returns a copy with new name and description, keeping id and creation time.
    ///
    /// # Errors
    ///
    /// Returns `CategoryError::EmptyName` if the name is blank.
    pub fn renamed(
        &self,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, CategoryError> {
        Self::new(self.id.clone(), name, description, self.created_at)
    }

    /// Virtual category describing a retake of the incorrect note.
    #[must_use]
    pub fn review_session(id: CategoryId, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: "Incorrect Answer Review".into(),
            description: "Retaking questions from your incorrect note.".into(),
            created_at: now,
        }
    }
}
