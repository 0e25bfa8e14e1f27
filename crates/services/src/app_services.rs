use std::sync::Arc;

use storage::repository::Storage;

use crate::Clock;
use crate::category_service::CategoryService;
use crate::error::AppServicesError;
use crate::history::HistoryService;
use crate::incorrect_note::IncorrectNoteService;
use crate::quiz_service::QuizService;
use crate::store::AppStore;

/// Assembles app-facing services around one shared store.
#[derive(Clone)]
pub struct AppServices {
    store: AppStore,
    categories: Arc<CategoryService>,
    quiz: Arc<QuizService>,
    incorrect_note: Arc<IncorrectNoteService>,
    history: Arc<HistoryService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// Stored data that is missing or unreadable is replaced by seed data.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(db_url: &str, clock: Clock) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        let store = AppStore::load(clock, Arc::clone(&storage.app_data)).await;
        Ok(Self::from_store(store))
    }

    /// Seeded services that keep everything in memory.
    #[must_use]
    pub fn in_memory(clock: Clock) -> Self {
        Self::from_store(AppStore::in_memory(clock))
    }

    #[must_use]
    pub fn from_store(store: AppStore) -> Self {
        Self {
            categories: Arc::new(CategoryService::new(store.clone())),
            quiz: Arc::new(QuizService::new(store.clone())),
            incorrect_note: Arc::new(IncorrectNoteService::new(store.clone())),
            history: Arc::new(HistoryService::new(store.clone())),
            store,
        }
    }

    /// Enable question shuffling for newly configured quizzes.
    #[must_use]
    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.quiz = Arc::new(QuizService::new(self.store.clone()).with_shuffle(shuffle));
        self
    }

    #[must_use]
    pub fn store(&self) -> &AppStore {
        &self.store
    }

    #[must_use]
    pub fn categories(&self) -> Arc<CategoryService> {
        Arc::clone(&self.categories)
    }

    #[must_use]
    pub fn quiz(&self) -> Arc<QuizService> {
        Arc::clone(&self.quiz)
    }

    #[must_use]
    pub fn incorrect_note(&self) -> Arc<IncorrectNoteService> {
        Arc::clone(&self.incorrect_note)
    }

    #[must_use]
    pub fn history(&self) -> Arc<HistoryService> {
        Arc::clone(&self.history)
    }
}
