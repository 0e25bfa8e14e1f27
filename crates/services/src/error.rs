//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{AppDataError, CategoryError, CategoryId, DifficultyFilter, QuizResultError};
use storage::sqlite::SqliteInitError;

/// Errors emitted by an exam session.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no questions available for session")]
    Empty,
    #[error("session already submitted")]
    Completed,
    #[error(transparent)]
    Result(#[from] QuizResultError),
}

/// Configuration errors raised before a session is created.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SetupError {
    #[error("category not found: {0}")]
    CategoryNotFound(CategoryId),
    #[error("No questions found for this difficulty ({filter}).")]
    NoQuestions { filter: DifficultyFilter },
    #[error("no questions selected for retake")]
    EmptyRetake,
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Errors raised while importing a question file.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ImportError {
    #[error("Only JSON files are supported. Please upload a .json file. (got {0})")]
    UnsupportedFormat(String),
    #[error("invalid JSON: {0}")]
    InvalidJson(String),
    #[error("File content must be an array of questions")]
    NotAnArray,
    #[error("Item at index {index} is missing required fields (text, options, correctOptionId)")]
    MissingFields { index: usize },
    #[error("Failed to read file: {0}")]
    Read(String),
}

/// Errors emitted by `CategoryService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CategoryServiceError {
    #[error(transparent)]
    Category(#[from] CategoryError),
    #[error(transparent)]
    AppData(#[from] AppDataError),
    #[error(transparent)]
    Import(#[from] ImportError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}
