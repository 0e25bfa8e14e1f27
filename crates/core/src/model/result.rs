use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::model::ids::{CategoryId, OptionId, QuestionId, ResultId};

/// Percentage at or above which an attempt counts as passed.
pub const PASS_PERCENTAGE: u32 = 60;

/// Percentage at or above which an attempt is rated excellent.
pub const EXCELLENT_PERCENTAGE: u32 = 80;

/// Question id → selected option id. Unanswered questions are absent.
pub type AnswerMap = BTreeMap<QuestionId, OptionId>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizResultError {
    #[error("score ({score}) exceeds total questions ({total})")]
    ScoreOutOfRange { score: u32, total: u32 },

    #[error("too many questions for a single result: {len}")]
    TooManyQuestions { len: usize },
}

/// Display rating derived from a result's percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grade {
    Excellent,
    Good,
    NeedsImprovement,
}

impl Grade {
    #[must_use]
    pub fn from_percentage(percentage: u32) -> Self {
        if percentage >= EXCELLENT_PERCENTAGE {
            Grade::Excellent
        } else if percentage >= PASS_PERCENTAGE {
            Grade::Good
        } else {
            Grade::NeedsImprovement
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Grade::Excellent => "Excellent!",
            Grade::Good => "Good Job",
            Grade::NeedsImprovement => "Needs Improvement",
        }
    }
}

/// Immutable outcome record of a completed exam session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawQuizResult")]
pub struct QuizResult {
    id: ResultId,
    category_id: CategoryId,
    score: u32,
    total_questions: u32,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    timestamp: DateTime<Utc>,
    answers: AnswerMap,
    time_spent_seconds: u64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawQuizResult {
    id: ResultId,
    category_id: CategoryId,
    score: u32,
    total_questions: u32,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    timestamp: DateTime<Utc>,
    #[serde(default)]
    answers: AnswerMap,
    #[serde(default)]
    time_spent_seconds: u64,
}

// A stored score above its total is clamped so one bad row cannot fail the
// whole snapshot.
impl From<RawQuizResult> for QuizResult {
    fn from(raw: RawQuizResult) -> Self {
        Self {
            id: raw.id,
            category_id: raw.category_id,
            score: raw.score.min(raw.total_questions),
            total_questions: raw.total_questions,
            timestamp: raw.timestamp,
            answers: raw.answers,
            time_spent_seconds: raw.time_spent_seconds,
        }
    }
}

impl QuizResult {
    /// Assemble a result, enforcing `score <= total_questions`.
    ///
    /// # Errors
    ///
    /// Returns `QuizResultError::ScoreOutOfRange` when the score exceeds the total.
    pub fn from_parts(
        id: ResultId,
        category_id: CategoryId,
        score: u32,
        total_questions: u32,
        timestamp: DateTime<Utc>,
        answers: AnswerMap,
        time_spent_seconds: u64,
    ) -> Result<Self, QuizResultError> {
        if score > total_questions {
            return Err(QuizResultError::ScoreOutOfRange {
                score,
                total: total_questions,
            });
        }

        Ok(Self {
            id,
            category_id,
            score,
            total_questions,
            timestamp,
            answers,
            time_spent_seconds,
        })
    }

    #[must_use]
    pub fn id(&self) -> &ResultId {
        &self.id
    }

    #[must_use]
    pub fn category_id(&self) -> &CategoryId {
        &self.category_id
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn total_questions(&self) -> u32 {
        self.total_questions
    }

    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerMap {
        &self.answers
    }

    #[must_use]
    pub fn time_spent_seconds(&self) -> u64 {
        self.time_spent_seconds
    }

    /// Rounded percentage of correct answers; 0 when there are no questions.
    #[must_use]
    pub fn percentage(&self) -> u32 {
        if self.total_questions == 0 {
            return 0;
        }
        let scaled = u64::from(self.score) * 100;
        let total = u64::from(self.total_questions);
        // round half up
        u32::try_from((scaled * 2 + total) / (total * 2)).unwrap_or(100)
    }

    #[must_use]
    pub fn is_pass(&self) -> bool {
        self.percentage() >= PASS_PERCENTAGE
    }

    #[must_use]
    pub fn grade(&self) -> Grade {
        Grade::from_percentage(self.percentage())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    fn result(score: u32, total: u32) -> QuizResult {
        QuizResult::from_parts(
            ResultId::new("r1"),
            CategoryId::new("c"),
            score,
            total,
            fixed_now(),
            AnswerMap::new(),
            42,
        )
        .unwrap()
    }

    #[test]
    fn score_above_total_is_rejected() {
        let err = QuizResult::from_parts(
            ResultId::new("r1"),
            CategoryId::new("c"),
            3,
            2,
            fixed_now(),
            AnswerMap::new(),
            0,
        )
        .unwrap_err();
        assert_eq!(err, QuizResultError::ScoreOutOfRange { score: 3, total: 2 });
    }

    #[test]
    fn percentage_rounds_and_grades() {
        assert_eq!(result(2, 3).percentage(), 67);
        assert_eq!(result(1, 3).percentage(), 33);
        assert_eq!(result(0, 0).percentage(), 0);
        assert_eq!(result(3, 5).grade(), Grade::Good);
        assert_eq!(result(4, 5).grade(), Grade::Excellent);
        assert_eq!(result(1, 2).grade(), Grade::NeedsImprovement);
        assert!(result(3, 5).is_pass());
        assert!(!result(1, 2).is_pass());
    }

    #[test]
    fn stored_score_above_total_is_clamped() {
        let json = r#"{"id":"r","categoryId":"c","score":5,"totalQuestions":2,"timestamp":0,"answers":{},"timeSpentSeconds":1}"#;
        let loaded: QuizResult = serde_json::from_str(json).unwrap();
        assert_eq!(loaded.score(), 2);
        assert_eq!(loaded.total_questions(), 2);
        assert_eq!(loaded.percentage(), 100);
    }

    #[test]
    fn persisted_layout_round_trips() {
        let mut answers = AnswerMap::new();
        answers.insert(QuestionId::new("q1"), OptionId::new("opt1"));
        let original = QuizResult::from_parts(
            ResultId::new("r1"),
            CategoryId::new("c"),
            1,
            1,
            fixed_now(),
            answers,
            30,
        )
        .unwrap();
        let json = serde_json::to_value(&original).unwrap();
        assert_eq!(json["answers"]["q1"], "opt1");
        assert_eq!(json["timeSpentSeconds"], 30);
        let back: QuizResult = serde_json::from_value(json).unwrap();
        assert_eq!(back, original);
    }
}
