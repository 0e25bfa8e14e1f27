//! Incorrect-note queries: joins, filters and retake sets.

use std::collections::HashSet;

use crate::bank::find_question;
use crate::model::{AppData, Category, CategoryId, IncorrectRecord, Question};

/// Category selection for the incorrect note.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(CategoryId),
}

impl CategoryFilter {
    #[must_use]
    pub fn matches(&self, category_id: &CategoryId) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(wanted) => wanted == category_id,
        }
    }
}

/// An incorrect record joined to its question and category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IncorrectEntry<'a> {
    pub record: &'a IncorrectRecord,
    pub question: &'a Question,
    pub category: Option<&'a Category>,
}

/// Join every record to its question through the record's category.
/// Records whose question can no longer be found are excluded.
pub fn joined_records(data: &AppData) -> impl Iterator<Item = IncorrectEntry<'_>> + '_ {
    data.incorrect_records.iter().filter_map(move |record| {
        let question = find_question(data.questions_for(&record.category_id), &record.question_id)?;
        Some(IncorrectEntry {
            record,
            question,
            category: data.category(&record.category_id),
        })
    })
}

/// Lazily filter the joined records by a case-insensitive substring of the
/// question text and by category. Order follows record insertion order.
pub fn filter_incorrect<'a>(
    data: &'a AppData,
    text: &str,
    category: &'a CategoryFilter,
) -> impl Iterator<Item = IncorrectEntry<'a>> + use<'a> {
    let needle = text.to_lowercase();
    joined_records(data).filter(move |entry| {
        category.matches(&entry.record.category_id)
            && entry.question.text.to_lowercase().contains(&needle)
    })
}

/// Distinct categories among the visible records, in first-seen order.
#[must_use]
pub fn note_categories(data: &AppData) -> Vec<&Category> {
    let mut seen = HashSet::new();
    joined_records(data)
        .filter_map(|entry| entry.category)
        .filter(|category| seen.insert(category.id.clone()))
        .collect()
}

/// Extract the questions of `entries`, preserving order.
///
/// An empty result means no retake session should be started.
#[must_use]
pub fn build_retake_set<'a>(entries: impl IntoIterator<Item = IncorrectEntry<'a>>) -> Vec<Question> {
    entries
        .into_iter()
        .map(|entry| entry.question.clone())
        .collect()
}
