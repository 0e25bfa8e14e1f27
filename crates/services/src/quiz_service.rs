use std::sync::Arc;

use tracing::instrument;

use quiz_core::model::{
    AppData, CategoryId, DifficultyFilter, IncorrectRecord, Question, QuizResult,
};
use quiz_core::reconcile::reconcile_incorrect;

use crate::error::{SessionError, SetupError};
use crate::exam::{ExamSession, QuizSetup, retake_category};
use crate::store::AppStore;

/// Outcome of recording a finished attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedQuiz {
    pub result: QuizResult,
    pub new_records: Vec<IncorrectRecord>,
    pub data: Arc<AppData>,
}

/// Starts exam sessions and records their results.
#[derive(Clone)]
pub struct QuizService {
    store: AppStore,
    shuffle: bool,
}

impl QuizService {
    #[must_use]
    pub fn new(store: AppStore) -> Self {
        Self {
            store,
            shuffle: false,
        }
    }

    /// Shuffle the questions of newly configured quizzes.
    #[must_use]
    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// Configuration view for a category's quiz.
    ///
    /// # Errors
    ///
    /// Returns `SetupError::CategoryNotFound` if the category does not exist.
    pub fn setup(&self, category_id: &CategoryId) -> Result<QuizSetup, SetupError> {
        let data = self.store.snapshot();
        Ok(QuizSetup::new(&data, category_id)?.with_shuffle(self.shuffle))
    }

    /// Start a session over a category's questions matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns `SetupError::CategoryNotFound` or `SetupError::NoQuestions`.
    pub fn start_quiz(
        &self,
        category_id: &CategoryId,
        filter: DifficultyFilter,
    ) -> Result<ExamSession, SetupError> {
        let session = self.setup(category_id)?.start(filter, self.store.clock().now())?;
        tracing::info!(category = %category_id, %filter, "quiz started");
        Ok(session)
    }

    /// Start a retake session over questions taken from the incorrect note.
    ///
    /// # Errors
    ///
    /// Returns `SetupError::EmptyRetake` if `questions` is empty.
    pub fn start_retake(&self, questions: Vec<Question>) -> Result<ExamSession, SetupError> {
        if questions.is_empty() {
            return Err(SetupError::EmptyRetake);
        }
        let now = self.store.clock().now();
        let category = retake_category(&self.store.index(), &questions, now);
        tracing::info!(category = %category.id, questions = questions.len(), "retake started");
        Ok(ExamSession::start(category, questions, now)?)
    }

    /// Append a submitted result and its newly missed questions to the
    /// stored state in one step.
    ///
    /// `session_questions` must be the exact list the attempt was taken over.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` if this exact result has already
    /// been recorded.
    #[instrument(skip_all, fields(result = %result.id(), category = %result.category_id()))]
    pub async fn complete_quiz(
        &self,
        session_questions: &[Question],
        result: QuizResult,
    ) -> Result<CompletedQuiz, SessionError> {
        let now = self.store.clock().now();
        let mut new_records = Vec::new();

        let data = self
            .store
            .apply(|data, index| {
                if data.results.contains(&result) {
                    return Err(SessionError::Completed);
                }
                new_records = reconcile_incorrect(&result, session_questions, data, index, now);
                Ok(data.with_completed_quiz(result.clone(), new_records.clone()))
            })
            .await?;

        tracing::info!(
            score = result.score(),
            total = result.total_questions(),
            new_records = new_records.len(),
            "quiz recorded"
        );

        Ok(CompletedQuiz {
            result,
            new_records,
            data,
        })
    }
}
