use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;

use quiz_core::bank::QuestionIndex;
use quiz_core::model::{
    AppData, Category, CategoryId, DifficultyCounts, DifficultyFilter, Question,
};

use super::session::ExamSession;
use crate::error::SetupError;

/// Pre-quiz configuration for a single category.
#[derive(Debug, Clone)]
pub struct QuizSetup {
    category: Category,
    questions: Vec<Question>,
    shuffle: bool,
}

impl QuizSetup {
    /// Prepare a quiz over the current bank of `category_id`.
    ///
    /// # Errors
    ///
    /// Returns `SetupError::CategoryNotFound` if the category does not exist.
    pub fn new(data: &AppData, category_id: &CategoryId) -> Result<Self, SetupError> {
        let category = data
            .category(category_id)
            .cloned()
            .ok_or_else(|| SetupError::CategoryNotFound(category_id.clone()))?;
        Ok(Self {
            questions: data.questions_for(category_id).to_vec(),
            category,
            shuffle: false,
        })
    }

    #[must_use]
    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    #[must_use]
    pub fn category(&self) -> &Category {
        &self.category
    }

    /// Question counts per difficulty, for display next to each filter.
    #[must_use]
    pub fn counts(&self) -> DifficultyCounts {
        DifficultyCounts::from_questions(&self.questions)
    }

    /// The questions a quiz with `filter` would contain, in bank order unless
    /// shuffling is enabled.
    ///
    /// # Errors
    ///
    /// Returns `SetupError::NoQuestions` when nothing matches the filter.
    pub fn select(&self, filter: DifficultyFilter) -> Result<Vec<Question>, SetupError> {
        let mut selected: Vec<Question> = self
            .questions
            .iter()
            .filter(|q| filter.matches(q))
            .cloned()
            .collect();
        if selected.is_empty() {
            return Err(SetupError::NoQuestions { filter });
        }
        if self.shuffle {
            selected.shuffle(&mut rand::rng());
        }
        Ok(selected)
    }

    /// Start a session over the filtered questions.
    ///
    /// # Errors
    ///
    /// Returns `SetupError::NoQuestions` when nothing matches the filter; no
    /// session is created in that case.
    pub fn start(
        self,
        filter: DifficultyFilter,
        now: DateTime<Utc>,
    ) -> Result<ExamSession, SetupError> {
        let questions = self.select(filter)?;
        Ok(ExamSession::start(self.category, questions, now)?)
    }
}

/// Category context for a retake session: the owner of the first question,
/// or the mixed sentinel when it has none.
#[must_use]
pub fn retake_category(index: &QuestionIndex, questions: &[Question], now: DateTime<Utc>) -> Category {
    let id = questions
        .first()
        .and_then(|q| index.owner_of(&q.id))
        .cloned()
        .unwrap_or_else(CategoryId::mixed);
    Category::review_session(id, now)
}
