//! Timed exam sessions: setup, the session state machine and its countdown.

mod countdown;
mod session;
mod setup;

pub use countdown::{Countdown, SharedSession};
pub use session::{Direction, ExamPhase, ExamSession, SECONDS_PER_QUESTION, TickOutcome};
pub use setup::{QuizSetup, retake_category};
