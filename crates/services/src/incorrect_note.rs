use std::convert::Infallible;

use chrono::{DateTime, Utc};

use quiz_core::model::{Category, CategoryId, Question, QuestionId};
use quiz_core::review::{CategoryFilter, build_retake_set, filter_incorrect, note_categories};

use crate::store::AppStore;

/// One visible incorrect-note row, detached from the store snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncorrectNoteItem {
    pub question: Question,
    pub category_id: CategoryId,
    pub category_name: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

/// Queries and edits the incorrect note.
#[derive(Clone)]
pub struct IncorrectNoteService {
    store: AppStore,
}

impl IncorrectNoteService {
    #[must_use]
    pub fn new(store: AppStore) -> Self {
        Self { store }
    }

    /// Visible records matching `search` (case-insensitive substring of the
    /// question text) and `category`, in insertion order.
    #[must_use]
    pub fn list(&self, search: &str, category: &CategoryFilter) -> Vec<IncorrectNoteItem> {
        let data = self.store.snapshot();
        filter_incorrect(&data, search, category)
            .map(|entry| IncorrectNoteItem {
                question: entry.question.clone(),
                category_id: entry.record.category_id.clone(),
                category_name: entry.category.map(|c| c.name.clone()),
                recorded_at: entry.record.timestamp,
            })
            .collect()
    }

    /// Categories offered as filter choices.
    #[must_use]
    pub fn categories(&self) -> Vec<Category> {
        let data = self.store.snapshot();
        note_categories(&data).into_iter().cloned().collect()
    }

    /// Questions for a retake of the currently filtered records. Empty means
    /// there is nothing to retake.
    #[must_use]
    pub fn retake_set(&self, search: &str, category: &CategoryFilter) -> Vec<Question> {
        let data = self.store.snapshot();
        build_retake_set(filter_incorrect(&data, search, category))
    }

    /// Total stored records, including ones hidden from the listing.
    #[must_use]
    pub fn stored_count(&self) -> usize {
        self.store.snapshot().incorrect_records.len()
    }

    /// Remove the record for a question. Removing an absent id changes nothing.
    pub async fn remove(&self, question_id: &QuestionId) {
        self.store
            .apply(|data, _| Ok::<_, Infallible>(data.without_incorrect_record(question_id)))
            .await
            .unwrap_or_else(|never| match never {});
        tracing::info!(question = %question_id, "incorrect record removed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{AppData, IncorrectRecord};
    use quiz_core::time::{fixed_clock, fixed_now};
    use std::sync::Arc;
    use storage::repository::InMemoryRepository;

    fn service_with(records: &[(&str, &str)]) -> IncorrectNoteService {
        let mut data = AppData::seed(fixed_now());
        for (q, c) in records {
            data.incorrect_records.push(IncorrectRecord::new(
                QuestionId::new(*q),
                CategoryId::new(*c),
                fixed_now(),
            ));
        }
        let store = AppStore::with_data(fixed_clock(), Arc::new(InMemoryRepository::new()), data);
        IncorrectNoteService::new(store)
    }

    #[test]
    fn search_is_case_insensitive() {
        let service = service_with(&[("q1", "cat_1"), ("q2", "cat_1"), ("q3", "cat_2")]);
        let rows = service.list("RED PLANET", &CategoryFilter::All);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].question.id, QuestionId::new("q2"));
        assert_eq!(rows[0].category_name.as_deref(), Some("General Knowledge"));
    }

    #[test]
    fn category_filter_and_choices() {
        let service = service_with(&[("q3", "cat_2"), ("q1", "cat_1")]);
        let only_web = CategoryFilter::Only(CategoryId::new("cat_2"));
        let rows = service.list("", &only_web);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].question.id, QuestionId::new("q3"));

        let names: Vec<_> = service.categories().into_iter().map(|c| c.name).collect();
        assert_eq!(names, ["Web Development", "General Knowledge"]);
    }

    #[test]
    fn unresolved_records_are_hidden_but_kept() {
        let service = service_with(&[("q1", ""), ("q2", "cat_1")]);
        assert_eq!(service.list("", &CategoryFilter::All).len(), 1);
        assert_eq!(service.stored_count(), 2);
    }

    #[test]
    fn retake_set_follows_the_filtered_view() {
        let service = service_with(&[("q1", "cat_1"), ("q2", "cat_1"), ("q3", "cat_2")]);
        let all = service.retake_set("", &CategoryFilter::All);
        assert_eq!(all.len(), 3);

        let none = service.retake_set("no such text", &CategoryFilter::All);
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn remove_is_idempotent() {
        let service = service_with(&[("q1", ""), ("q2", "cat_1")]);
        service.remove(&QuestionId::new("q1")).await;
        service.remove(&QuestionId::new("q1")).await;
        service.remove(&QuestionId::new("nothing")).await;
        assert_eq!(service.stored_count(), 1);
    }
}
