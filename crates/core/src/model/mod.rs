mod app_data;
mod category;
mod ids;
mod incorrect;
mod question;
mod result;

pub use ids::{CategoryId, OptionId, ParseIdError, QuestionId, ResultId, generate_id};

pub use app_data::{AppData, AppDataError};
pub use category::{Category, CategoryError};
pub use incorrect::IncorrectRecord;
pub use question::{
    Difficulty, DifficultyCounts, DifficultyFilter, Question, QuestionError, QuestionOption,
};
pub use result::{
    AnswerMap, EXCELLENT_PERCENTAGE, Grade, PASS_PERCENTAGE, QuizResult, QuizResultError,
};
