use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::model::{
    Category, CategoryId, Difficulty, IncorrectRecord, OptionId, Question, QuestionId,
    QuestionOption, QuizResult,
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AppDataError {
    #[error("category not found: {0}")]
    CategoryNotFound(CategoryId),

    #[error("category already exists: {0}")]
    DuplicateCategory(CategoryId),
}

/// Root persisted aggregate.
///
/// Every mutation goes through a `with_*`/`without_*` action that returns a
/// new snapshot, leaving `self` untouched. Callers replace their whole state
/// with the returned value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppData {
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub questions: BTreeMap<CategoryId, Vec<Question>>,
    #[serde(default)]
    pub results: Vec<QuizResult>,
    #[serde(default)]
    pub incorrect_records: Vec<IncorrectRecord>,
}

impl AppData {
    /// Default data shown on first launch or when stored data is unusable.
    #[must_use]
    pub fn seed(now: DateTime<Utc>) -> Self {
        fn q(
            id: &str,
            text: &str,
            options: &[&str],
            correct: usize,
            difficulty: Difficulty,
        ) -> Question {
            Question {
                id: QuestionId::new(id),
                text: text.to_owned(),
                options: options
                    .iter()
                    .enumerate()
                    .map(|(i, t)| QuestionOption::new(format!("opt{}", i + 1), *t))
                    .collect(),
                correct_option_id: OptionId::new(format!("opt{correct}")),
                explanation: None,
                difficulty: Some(difficulty),
            }
        }

        let general = CategoryId::new("cat_1");
        let web = CategoryId::new("cat_2");

        let mut questions = BTreeMap::new();
        questions.insert(
            general.clone(),
            vec![
                q(
                    "q1",
                    "What is the capital of France?",
                    &["London", "Berlin", "Paris", "Madrid"],
                    3,
                    Difficulty::Easy,
                ),
                q(
                    "q2",
                    "Which planet is known as the Red Planet?",
                    &["Venus", "Mars", "Jupiter", "Saturn", "Mercury"],
                    2,
                    Difficulty::Easy,
                ),
            ],
        );
        questions.insert(
            web.clone(),
            vec![q(
                "q3",
                "Which hook is used to handle side effects in React?",
                &["useState", "useEffect", "useContext", "useReducer"],
                2,
                Difficulty::Medium,
            )],
        );

        Self {
            categories: vec![
                Category {
                    id: general,
                    name: "General Knowledge".into(),
                    description: "Test your general awareness with these common questions."
                        .into(),
                    created_at: now,
                },
                Category {
                    id: web,
                    name: "Web Development".into(),
                    description: "Questions about HTML, CSS, React, and TypeScript.".into(),
                    created_at: now,
                },
            ],
            questions,
            results: Vec::new(),
            incorrect_records: Vec::new(),
        }
    }

    #[must_use]
    pub fn category(&self, id: &CategoryId) -> Option<&Category> {
        self.categories.iter().find(|c| &c.id == id)
    }

    /// Questions owned by a category; empty when the category has none.
    #[must_use]
    pub fn questions_for(&self, id: &CategoryId) -> &[Question] {
        self.questions.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    #[must_use]
    pub fn question_count(&self, id: &CategoryId) -> usize {
        self.questions_for(id).len()
    }

    /// Category ids in scan order: declared categories first, then any
    /// orphaned question lists.
    pub fn category_scan_order(&self) -> impl Iterator<Item = &CategoryId> + '_ {
        let declared = self.categories.iter().map(|c| &c.id);
        let orphaned = self
            .questions
            .keys()
            .filter(move |id| self.category(id).is_none());
        declared.chain(orphaned)
    }

    #[must_use]
    pub fn has_incorrect_record(&self, question_id: &QuestionId) -> bool {
        self.incorrect_records
            .iter()
            .any(|r| &r.question_id == question_id)
    }

    // ─── Actions ──────────────────────────────────────────────────────────────

    /// Add a category with an empty question list.
    ///
    /// # Errors
    ///
    /// Returns `AppDataError::DuplicateCategory` if the id is taken.
    pub fn with_category_added(&self, category: Category) -> Result<Self, AppDataError> {
        if self.category(&category.id).is_some() {
            return Err(AppDataError::DuplicateCategory(category.id));
        }
        let mut next = self.clone();
        next.questions.entry(category.id.clone()).or_default();
        next.categories.push(category);
        Ok(next)
    }

    /// Replace an existing category in place.
    ///
    /// # Errors
    ///
    /// Returns `AppDataError::CategoryNotFound` if no category has that id.
    pub fn with_category_updated(&self, category: Category) -> Result<Self, AppDataError> {
        let mut next = self.clone();
        let slot = next
            .categories
            .iter_mut()
            .find(|c| c.id == category.id)
            .ok_or_else(|| AppDataError::CategoryNotFound(category.id.clone()))?;
        *slot = category;
        Ok(next)
    }

    /// Remove a category and cascade its questions. Results and incorrect
    /// records are kept.
    #[must_use]
    pub fn without_category(&self, id: &CategoryId) -> Self {
        let mut next = self.clone();
        next.categories.retain(|c| &c.id != id);
        next.questions.remove(id);
        next
    }

    /// Append questions to a category's bank.
    ///
    /// # Errors
    ///
    /// Returns `AppDataError::CategoryNotFound` if the category does not exist.
    pub fn with_questions_appended(
        &self,
        id: &CategoryId,
        questions: Vec<Question>,
    ) -> Result<Self, AppDataError> {
        if self.category(id).is_none() {
            return Err(AppDataError::CategoryNotFound(id.clone()));
        }
        let mut next = self.clone();
        next.questions.entry(id.clone()).or_default().extend(questions);
        Ok(next)
    }

    /// Record a finished attempt and its newly missed questions.
    #[must_use]
    pub fn with_completed_quiz(&self, result: QuizResult, new_records: Vec<IncorrectRecord>) -> Self {
        let mut next = self.clone();
        next.results.push(result);
        for record in new_records {
            if !next.has_incorrect_record(&record.question_id) {
                next.incorrect_records.push(record);
            }
        }
        next
    }

    /// Drop the incorrect record for a question; absent ids are a no-op.
    #[must_use]
    pub fn without_incorrect_record(&self, question_id: &QuestionId) -> Self {
        let mut next = self.clone();
        next.incorrect_records
            .retain(|r| &r.question_id != question_id);
        next
    }
}
