use thiserror::Error;

use crate::model::{AppDataError, CategoryError, QuestionError, QuizResultError};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Category(#[from] CategoryError),
    #[error(transparent)]
    Result(#[from] QuizResultError),
    #[error(transparent)]
    AppData(#[from] AppDataError),
}
