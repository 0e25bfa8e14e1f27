use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::ids::{CategoryId, QuestionId};

/// Marker that a question was answered wrong and has not been cleared yet.
///
/// At most one record exists per question id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncorrectRecord {
    pub question_id: QuestionId,
    pub category_id: CategoryId,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

impl IncorrectRecord {
    #[must_use]
    pub fn new(question_id: QuestionId, category_id: CategoryId, timestamp: DateTime<Utc>) -> Self {
        Self {
            question_id,
            category_id,
            timestamp,
        }
    }
}
