//! Per-second countdown driver for a running exam session.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};

use quiz_core::Clock;
use quiz_core::model::QuizResult;

use super::session::{ExamSession, TickOutcome};

/// Session handle shared between the countdown task and the caller.
pub type SharedSession = Arc<Mutex<ExamSession>>;

/// Background task ticking a shared session once per second.
///
/// The task stops on its own once the session is submitted (by the timer or
/// by the caller). Dropping the `Countdown` cancels it.
#[derive(Debug)]
pub struct Countdown {
    handle: JoinHandle<()>,
    remaining: watch::Receiver<u64>,
}

impl Countdown {
    /// Start ticking `session`.
    ///
    /// The returned receiver resolves with the result only if the timer itself
    /// submits the session. When the caller submits first, the receiver is
    /// closed without a value.
    #[must_use]
    pub fn spawn(session: SharedSession, clock: Clock) -> (Self, oneshot::Receiver<QuizResult>) {
        let initial = lock(&session).remaining_secs();
        let (remaining_tx, remaining) = watch::channel(initial);
        let (expired_tx, expired_rx) = oneshot::channel();

        let handle = tokio::spawn(async move {
            let mut ticker = interval(Duration::from_secs(1));
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately.
            ticker.tick().await;

            loop {
                ticker.tick().await;
                let outcome = lock(&session).tick(clock.now());
                match outcome {
                    Ok(TickOutcome::Running(secs)) => {
                        let _ = remaining_tx.send(secs);
                    }
                    Ok(TickOutcome::Expired(result)) => {
                        let _ = remaining_tx.send(0);
                        let _ = expired_tx.send(result);
                        break;
                    }
                    Ok(TickOutcome::Finished) => break,
                    Err(err) => {
                        tracing::warn!(error = %err, "countdown stopped");
                        break;
                    }
                }
            }
        });

        (Self { handle, remaining }, expired_rx)
    }

    /// Watch the remaining seconds as the countdown runs.
    #[must_use]
    pub fn remaining(&self) -> watch::Receiver<u64> {
        self.remaining.clone()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub(crate) fn lock(session: &SharedSession) -> std::sync::MutexGuard<'_, ExamSession> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SessionError;
    use quiz_core::model::{Category, CategoryId, OptionId, Question, QuestionId, QuestionOption};
    use quiz_core::time::{fixed_clock, fixed_now};

    fn shared_session(n: usize) -> SharedSession {
        let category = Category::new(CategoryId::new("C"), "C", "", fixed_now()).unwrap();
        let questions = (1..=n)
            .map(|i| {
                Question::new(
                    QuestionId::new(format!("q{i}")),
                    "?",
                    vec![QuestionOption::new("a", "A"), QuestionOption::new("b", "B")],
                    OptionId::new("a"),
                )
                .unwrap()
            })
            .collect();
        Arc::new(Mutex::new(
            ExamSession::start(category, questions, fixed_now()).unwrap(),
        ))
    }

    #[tokio::test(start_paused = true)]
    async fn expiry_submits_unanswered_session() {
        let session = shared_session(2);
        let (countdown, expired) = Countdown::spawn(Arc::clone(&session), fixed_clock());

        let result = expired.await.unwrap();
        assert_eq!(result.score(), 0);
        assert_eq!(result.total_questions(), 2);
        assert!(lock(&session).is_submitted());
        assert_eq!(*countdown.remaining().borrow(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn remaining_seconds_are_published() {
        let session = shared_session(1);
        let (countdown, _expired) = Countdown::spawn(Arc::clone(&session), fixed_clock());
        let mut remaining = countdown.remaining();
        assert_eq!(*remaining.borrow(), 60);

        remaining.changed().await.unwrap();
        assert_eq!(*remaining.borrow(), 59);
    }

    #[tokio::test(start_paused = true)]
    async fn manual_submit_wins_and_timer_stays_silent() {
        let session = shared_session(1);
        let (countdown, expired) = Countdown::spawn(Arc::clone(&session), fixed_clock());

        tokio::time::sleep(Duration::from_millis(10_500)).await;
        let manual = lock(&session).submit(fixed_now()).unwrap();
        assert_eq!(manual.total_questions(), 1);

        assert!(expired.await.is_err());
        assert!(countdown.is_finished());
        assert_eq!(
            lock(&session).submit(fixed_now()).unwrap_err(),
            SessionError::Completed
        );
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_countdown_stops_ticking() {
        let session = shared_session(1);
        let (countdown, expired) = Countdown::spawn(Arc::clone(&session), fixed_clock());

        tokio::time::sleep(Duration::from_millis(5_500)).await;
        drop(countdown);
        tokio::time::sleep(Duration::from_secs(120)).await;

        assert!(expired.await.is_err());
        let guard = lock(&session);
        assert!(!guard.is_submitted());
        assert_eq!(guard.remaining_secs(), 55);
    }
}
