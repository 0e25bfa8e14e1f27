use chrono::{DateTime, Utc};

use quiz_core::history::sorted_history;
use quiz_core::model::{CategoryId, Grade, ResultId};
use quiz_core::time::format_time_spent;

use crate::store::AppStore;

/// Results-history row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryItem {
    pub result_id: ResultId,
    pub category_id: CategoryId,
    pub category_name: String,
    pub score: u32,
    pub total_questions: u32,
    pub percentage: u32,
    pub passed: bool,
    pub grade: Grade,
    pub time_spent: String,
    pub completed_at: DateTime<Utc>,
}

/// Aggregates attempt history for display.
#[derive(Clone)]
pub struct HistoryService {
    store: AppStore,
}

impl HistoryService {
    #[must_use]
    pub fn new(store: AppStore) -> Self {
        Self { store }
    }

    /// Every recorded result, newest first.
    #[must_use]
    pub fn list(&self) -> Vec<HistoryItem> {
        let data = self.store.snapshot();
        sorted_history(&data)
            .into_iter()
            .map(|entry| {
                let result = entry.result;
                HistoryItem {
                    result_id: result.id().clone(),
                    category_id: result.category_id().clone(),
                    category_name: entry.category_name.to_owned(),
                    score: result.score(),
                    total_questions: result.total_questions(),
                    percentage: result.percentage(),
                    passed: result.is_pass(),
                    grade: result.grade(),
                    time_spent: format_time_spent(result.time_spent_seconds()),
                    completed_at: result.timestamp(),
                }
            })
            .collect()
    }
}
