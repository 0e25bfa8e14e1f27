use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::ids::{OptionId, QuestionId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text cannot be empty")]
    EmptyText,

    #[error("question must have at least one option")]
    NoOptions,

    #[error("duplicate option id: {0}")]
    DuplicateOption(OptionId),

    #[error("correct option {0} is not one of the question's options")]
    UnknownCorrectOption(OptionId),

    #[error("invalid difficulty: {0}")]
    InvalidDifficulty(String),
}

//
// ─── DIFFICULTY ────────────────────────────────────────────────────────────────
//

/// Optional difficulty tag attached to a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = QuestionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            other => Err(QuestionError::InvalidDifficulty(other.to_owned())),
        }
    }
}

/// Difficulty selection made when configuring a quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DifficultyFilter {
    #[default]
    All,
    Only(Difficulty),
}

impl DifficultyFilter {
    #[must_use]
    pub fn matches(self, question: &Question) -> bool {
        match self {
            DifficultyFilter::All => true,
            DifficultyFilter::Only(wanted) => question.difficulty == Some(wanted),
        }
    }
}

impl FromStr for DifficultyFilter {
    type Err = QuestionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            return Ok(Self::All);
        }
        s.parse().map(Self::Only)
    }
}

impl fmt::Display for DifficultyFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DifficultyFilter::All => f.write_str("all"),
            DifficultyFilter::Only(d) => d.fmt(f),
        }
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A single selectable answer of a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOption {
    pub id: OptionId,
    pub text: String,
}

impl QuestionOption {
    #[must_use]
    pub fn new(id: impl Into<OptionId>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

/// A multiple-choice item with exactly one correct option.
///
/// Serialized in the persisted camelCase layout (`correctOptionId`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: QuestionId,
    pub text: String,
    pub options: Vec<QuestionOption>,
    pub correct_option_id: OptionId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
}

impl Question {
    /// Creates a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` when the text is blank, there are no options,
    /// option ids repeat, or the correct option is not among the options.
    pub fn new(
        id: QuestionId,
        text: impl Into<String>,
        options: Vec<QuestionOption>,
        correct_option_id: OptionId,
    ) -> Result<Self, QuestionError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(QuestionError::EmptyText);
        }
        if options.is_empty() {
            return Err(QuestionError::NoOptions);
        }

        let mut seen = HashSet::with_capacity(options.len());
        for option in &options {
            if !seen.insert(&option.id) {
                return Err(QuestionError::DuplicateOption(option.id.clone()));
            }
        }
        if !seen.contains(&correct_option_id) {
            return Err(QuestionError::UnknownCorrectOption(correct_option_id));
        }

        Ok(Self {
            id,
            text,
            options,
            correct_option_id,
            explanation: None,
            difficulty: None,
        })
    }

    #[must_use]
    pub fn with_difficulty(mut self, difficulty: Option<Difficulty>) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// Strict identifier equality against the correct option.
    #[must_use]
    pub fn is_correct(&self, selected: &OptionId) -> bool {
        *selected == self.correct_option_id
    }

    #[must_use]
    pub fn option(&self, id: &OptionId) -> Option<&QuestionOption> {
        self.options.iter().find(|o| &o.id == id)
    }

    #[must_use]
    pub fn correct_option(&self) -> Option<&QuestionOption> {
        self.option(&self.correct_option_id)
    }
}

/// Counts questions per difficulty bucket for quiz configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DifficultyCounts {
    pub all: usize,
    pub easy: usize,
    pub medium: usize,
    pub hard: usize,
}

impl DifficultyCounts {
    #[must_use]
    pub fn from_questions(questions: &[Question]) -> Self {
        let mut counts = Self {
            all: questions.len(),
            ..Self::default()
        };
        for q in questions {
            match q.difficulty {
                Some(Difficulty::Easy) => counts.easy += 1,
                Some(Difficulty::Medium) => counts.medium += 1,
                Some(Difficulty::Hard) => counts.hard += 1,
                None => {}
            }
        }
        counts
    }

    #[must_use]
    pub fn for_filter(&self, filter: DifficultyFilter) -> usize {
        match filter {
            DifficultyFilter::All => self.all,
            DifficultyFilter::Only(Difficulty::Easy) => self.easy,
            DifficultyFilter::Only(Difficulty::Medium) => self.medium,
            DifficultyFilter::Only(Difficulty::Hard) => self.hard,
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
