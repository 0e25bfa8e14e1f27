//! Application-state container.
//!
//! Holds the current `AppData` snapshot plus the question index derived from
//! it. State changes are expressed as actions that take the current snapshot
//! and return a complete replacement; the replacement is swapped in whole and
//! then written to storage on a best-effort basis. Saves happen one at a
//! time in the order the snapshots were swapped in.

use std::sync::{Arc, Mutex, PoisonError};

use quiz_core::Clock;
use quiz_core::bank::QuestionIndex;
use quiz_core::model::AppData;
use storage::repository::{AppDataRepository, InMemoryRepository};

#[derive(Debug, Clone)]
struct Snapshot {
    data: Arc<AppData>,
    index: Arc<QuestionIndex>,
}

impl Snapshot {
    fn new(data: AppData) -> Self {
        let index = QuestionIndex::build(&data);
        Self {
            data: Arc::new(data),
            index: Arc::new(index),
        }
    }

    fn replace(&self, next: AppData) -> Self {
        let bank_changed =
            next.questions != self.data.questions || next.categories != self.data.categories;
        let index = if bank_changed {
            Arc::new(QuestionIndex::build(&next))
        } else {
            Arc::clone(&self.index)
        };
        Self {
            data: Arc::new(next),
            index,
        }
    }
}

/// Shared handle to the single in-memory copy of the persisted state.
#[derive(Clone)]
pub struct AppStore {
    clock: Clock,
    repo: Arc<dyn AppDataRepository>,
    state: Arc<Mutex<Snapshot>>,
    save_lock: Arc<tokio::sync::Mutex<()>>,
}

impl AppStore {
    /// Load persisted state, falling back to seed data when nothing is stored
    /// or the stored value cannot be read.
    pub async fn load(clock: Clock, repo: Arc<dyn AppDataRepository>) -> Self {
        let data = match repo.load_app_data().await {
            Ok(Some(data)) => {
                tracing::info!(
                    categories = data.categories.len(),
                    results = data.results.len(),
                    incorrect = data.incorrect_records.len(),
                    "loaded stored data"
                );
                data
            }
            Ok(None) => {
                tracing::info!("no stored data, starting from seed data");
                AppData::seed(clock.now())
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to load data, starting from seed data");
                AppData::seed(clock.now())
            }
        };

        Self::with_data(clock, repo, data)
    }

    /// Seeded store backed by an in-memory repository.
    #[must_use]
    pub fn in_memory(clock: Clock) -> Self {
        Self::with_data(
            clock,
            Arc::new(InMemoryRepository::new()),
            AppData::seed(clock.now()),
        )
    }

    /// Store starting from the given data without reading the repository.
    #[must_use]
    pub fn with_data(clock: Clock, repo: Arc<dyn AppDataRepository>, data: AppData) -> Self {
        Self {
            clock,
            repo,
            state: Arc::new(Mutex::new(Snapshot::new(data))),
            save_lock: Arc::new(tokio::sync::Mutex::new(())),
        }
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    /// The current snapshot. Later actions never mutate it.
    #[must_use]
    pub fn snapshot(&self) -> Arc<AppData> {
        Arc::clone(&self.lock().data)
    }

    /// The question index of the current snapshot.
    #[must_use]
    pub fn index(&self) -> Arc<QuestionIndex> {
        Arc::clone(&self.lock().index)
    }

    /// Apply an action to the current snapshot.
    ///
    /// The action runs against a consistent snapshot and either returns the
    /// full replacement state or an error. On error nothing changes. On
    /// success the replacement becomes current and is saved; save failures
    /// are logged and the in-memory state is kept. Overlapping calls wait for
    /// each other, so the last save always matches the current snapshot.
    ///
    /// # Errors
    ///
    /// Returns whatever error the action returns.
    pub async fn apply<E>(
        &self,
        action: impl FnOnce(&AppData, &QuestionIndex) -> Result<AppData, E>,
    ) -> Result<Arc<AppData>, E> {
        let _saving = self.save_lock.lock().await;
        let next = {
            let mut guard = self.lock();
            let next = action(&guard.data, &guard.index)?;
            *guard = guard.replace(next);
            Arc::clone(&guard.data)
        };

        self.persist(&next).await;
        Ok(next)
    }

    async fn persist(&self, data: &AppData) {
        if let Err(err) = self.repo.save_app_data(data).await {
            tracing::warn!(error = %err, "Failed to save data");
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Snapshot> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
