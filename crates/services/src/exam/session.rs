use chrono::{DateTime, Utc};
use std::fmt;

use quiz_core::model::{AnswerMap, Category, OptionId, Question, QuestionId, QuizResult, ResultId};
use quiz_core::scoring::ResultBuilder;
use quiz_core::time::elapsed_seconds;

use crate::error::SessionError;

/// Time allowed per question, in seconds.
pub const SECONDS_PER_QUESTION: u64 = 60;

/// Lifecycle of an exam session. A session is `InProgress` from the moment it
/// is started until it is submitted, which happens exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExamPhase {
    InProgress,
    Submitted,
}

/// Navigation direction between questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

/// What a single countdown tick did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Still running with this many seconds left.
    Running(u64),
    /// Time ran out; the session was submitted by this tick.
    Expired(QuizResult),
    /// The session was already submitted; nothing happened.
    Finished,
}

/// One timed attempt over a fixed snapshot of questions.
#[derive(Clone)]
pub struct ExamSession {
    category: Category,
    questions: Vec<Question>,
    answers: AnswerMap,
    current: usize,
    remaining_secs: u64,
    started_at: DateTime<Utc>,
    phase: ExamPhase,
}

impl ExamSession {
    /// Start a session over a snapshot of `questions`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if no questions are provided.
    pub fn start(
        category: Category,
        questions: Vec<Question>,
        now: DateTime<Utc>,
    ) -> Result<Self, SessionError> {
        if questions.is_empty() {
            return Err(SessionError::Empty);
        }
        let remaining_secs = SECONDS_PER_QUESTION.saturating_mul(questions.len() as u64);

        tracing::debug!(
            category = %category.id,
            questions = questions.len(),
            remaining_secs,
            "exam session started"
        );

        Ok(Self {
            category,
            questions,
            answers: AnswerMap::new(),
            current: 0,
            remaining_secs,
            started_at: now,
            phase: ExamPhase::InProgress,
        })
    }

    #[must_use]
    pub fn category(&self) -> &Category {
        &self.category
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerMap {
        &self.answers
    }

    #[must_use]
    pub fn phase(&self) -> ExamPhase {
        self.phase
    }

    #[must_use]
    pub fn is_submitted(&self) -> bool {
        self.phase == ExamPhase::Submitted
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    /// Zero-based index of the question being shown.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> &Question {
        &self.questions[self.current]
    }

    #[must_use]
    pub fn is_last_question(&self) -> bool {
        self.current + 1 == self.questions.len()
    }

    /// Number of questions with a recorded answer.
    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.questions
            .iter()
            .filter(|q| self.answers.contains_key(&q.id))
            .count()
    }

    #[must_use]
    pub fn selected_for(&self, question_id: &QuestionId) -> Option<&OptionId> {
        self.answers.get(question_id)
    }

    /// Record or overwrite the answer for a question.
    ///
    /// The option is not checked against the question's options; an unknown
    /// option simply never matches the correct one.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` once the session has been submitted.
    pub fn select_option(
        &mut self,
        question_id: QuestionId,
        option_id: OptionId,
    ) -> Result<(), SessionError> {
        if self.is_submitted() {
            return Err(SessionError::Completed);
        }
        self.answers.insert(question_id, option_id);
        Ok(())
    }

    /// Answer the question currently shown.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` once the session has been submitted.
    pub fn select_current(&mut self, option_id: OptionId) -> Result<(), SessionError> {
        let question_id = self.current_question().id.clone();
        self.select_option(question_id, option_id)
    }

    /// Move one question back or forward, clamped to the question range.
    /// Does nothing after submission. Returns the resulting index.
    pub fn advance(&mut self, direction: Direction) -> usize {
        if self.is_submitted() {
            return self.current;
        }
        let last = self.questions.len() - 1;
        self.current = match direction {
            Direction::Previous => self.current.saturating_sub(1),
            Direction::Next => (self.current + 1).min(last),
        };
        self.current
    }

    /// Count down one second. Reaching zero submits the session.
    ///
    /// # Errors
    ///
    /// Propagates result-building failures from the forced submission.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Result<TickOutcome, SessionError> {
        if self.is_submitted() {
            return Ok(TickOutcome::Finished);
        }

        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs > 0 {
            return Ok(TickOutcome::Running(self.remaining_secs));
        }

        tracing::info!(category = %self.category.id, "time is up, submitting");
        self.submit(now).map(TickOutcome::Expired)
    }

    /// Finalize the attempt and build its result.
    ///
    /// Only the first call succeeds; every later call, whether from the timer
    /// or the user, gets `SessionError::Completed` and changes nothing.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` if already submitted, or
    /// `SessionError::Result` if the result cannot be built.
    pub fn submit(&mut self, now: DateTime<Utc>) -> Result<QuizResult, SessionError> {
        if self.is_submitted() {
            return Err(SessionError::Completed);
        }

        let result = ResultBuilder {
            questions: &self.questions,
            answers: &self.answers,
            category_id: &self.category.id,
            elapsed_seconds: elapsed_seconds(self.started_at, now),
            completed_at: now,
        }
        .build(ResultId::new(now.timestamp_millis().to_string()))?;

        self.phase = ExamPhase::Submitted;
        tracing::info!(
            category = %self.category.id,
            score = result.score(),
            total = result.total_questions(),
            "exam session submitted"
        );
        Ok(result)
    }
}

impl fmt::Debug for ExamSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExamSession")
            .field("category", &self.category.id)
            .field("questions_len", &self.questions.len())
            .field("answers_len", &self.answers.len())
            .field("current", &self.current)
            .field("remaining_secs", &self.remaining_secs)
            .field("started_at", &self.started_at)
            .field("phase", &self.phase)
            .finish()
    }
}
