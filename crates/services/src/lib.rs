#![forbid(unsafe_code)]

pub mod app_services;
pub mod category_service;
pub mod error;
pub mod exam;
pub mod history;
pub mod import;
pub mod incorrect_note;
pub mod quiz_service;
pub mod store;
pub mod template;

pub use quiz_core::Clock;

pub use app_services::AppServices;
pub use category_service::{CategoryService, CategorySummary};
pub use error::{
    AppServicesError, CategoryServiceError, ImportError, SessionError, SetupError,
};
pub use exam::{Countdown, Direction, ExamSession, QuizSetup, TickOutcome};
pub use history::{HistoryItem, HistoryService};
pub use incorrect_note::{IncorrectNoteItem, IncorrectNoteService};
pub use quiz_service::{CompletedQuiz, QuizService};
pub use store::AppStore;
