use std::convert::Infallible;

use tracing::instrument;

use quiz_core::model::{AppDataError, Category, CategoryId, Question, generate_id};

use crate::error::CategoryServiceError;
use crate::import::parse_questions;
use crate::store::AppStore;

/// Category listing row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySummary {
    pub category: Category,
    pub question_count: usize,
}

/// Orchestrates category management and question imports.
#[derive(Clone)]
pub struct CategoryService {
    store: AppStore,
}

impl CategoryService {
    #[must_use]
    pub fn new(store: AppStore) -> Self {
        Self { store }
    }

    /// All categories in creation order with their question counts.
    #[must_use]
    pub fn list(&self) -> Vec<CategorySummary> {
        let data = self.store.snapshot();
        data.categories
            .iter()
            .map(|category| CategorySummary {
                question_count: data.question_count(&category.id),
                category: category.clone(),
            })
            .collect()
    }

    #[must_use]
    pub fn get(&self, id: &CategoryId) -> Option<Category> {
        self.store.snapshot().category(id).cloned()
    }

    #[must_use]
    pub fn question_count(&self, id: &CategoryId) -> usize {
        self.store.snapshot().question_count(id)
    }

    /// Create a category with an empty question list.
    ///
    /// # Errors
    ///
    /// Returns `CategoryServiceError::Category` if the name is blank.
    pub async fn create_category(
        &self,
        name: &str,
        description: &str,
    ) -> Result<Category, CategoryServiceError> {
        let category = Category::new(
            CategoryId::new(generate_id()),
            name.trim(),
            description.trim(),
            self.store.clock().now(),
        )?;
        let added = category.clone();
        self.store
            .apply(|data, _| data.with_category_added(added))
            .await?;
        tracing::info!(category = %category.id, name = %category.name, "category created");
        Ok(category)
    }

    /// Rename a category, keeping its id and creation time.
    ///
    /// # Errors
    ///
    /// Returns `CategoryServiceError::Category` if the name is blank.
    /// Returns `CategoryServiceError::AppData` if the category does not exist.
    pub async fn update_category(
        &self,
        id: &CategoryId,
        name: &str,
        description: &str,
    ) -> Result<Category, CategoryServiceError> {
        let current = self
            .get(id)
            .ok_or_else(|| AppDataError::CategoryNotFound(id.clone()))?;
        let updated = current.renamed(name.trim(), description.trim())?;
        let replacement = updated.clone();
        self.store
            .apply(|data, _| data.with_category_updated(replacement))
            .await?;
        Ok(updated)
    }

    /// Delete a category and its questions. Results and incorrect records
    /// are left untouched.
    pub async fn delete_category(&self, id: &CategoryId) {
        self.store
            .apply(|data, _| Ok::<_, Infallible>(data.without_category(id)))
            .await
            .unwrap_or_else(|never| match never {});
        tracing::info!(category = %id, "category deleted");
    }

    /// Append already parsed questions to a category.
    ///
    /// # Errors
    ///
    /// Returns `CategoryServiceError::AppData` if the category does not exist.
    pub async fn add_questions(
        &self,
        id: &CategoryId,
        questions: Vec<Question>,
    ) -> Result<usize, CategoryServiceError> {
        let count = questions.len();
        self.store
            .apply(|data, _| data.with_questions_appended(id, questions))
            .await?;
        tracing::info!(category = %id, count, "questions added");
        Ok(count)
    }

    /// Parse a question file and append every question, or none on error.
    ///
    /// # Errors
    ///
    /// Returns `CategoryServiceError::Import` if the file is rejected.
    /// Returns `CategoryServiceError::AppData` if the category does not exist.
    #[instrument(skip_all, fields(category = %id, file = file_name))]
    pub async fn import_questions(
        &self,
        id: &CategoryId,
        file_name: &str,
        content: &str,
    ) -> Result<usize, CategoryServiceError> {
        let questions = parse_questions(file_name, content)?;
        self.add_questions(id, questions).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ImportError;
    use quiz_core::model::{CategoryError, QuestionId};
    use quiz_core::time::fixed_clock;

    fn service() -> CategoryService {
        CategoryService::new(AppStore::in_memory(fixed_clock()))
    }

    #[test]
    fn lists_seed_categories_with_counts() {
        let rows = service().list();
        let summary: Vec<_> = rows
            .iter()
            .map(|r| (r.category.name.as_str(), r.question_count))
            .collect();
        assert_eq!(summary, [("General Knowledge", 2), ("Web Development", 1)]);
    }

    #[tokio::test]
    async fn create_rejects_blank_names() {
        let err = service().create_category("   ", "desc").await.unwrap_err();
        assert!(matches!(
            err,
            CategoryServiceError::Category(CategoryError::EmptyName)
        ));
    }

    #[tokio::test]
    async fn create_then_update_keeps_identity() {
        let service = service();
        let created = service.create_category("Rust", "ownership").await.unwrap();
        assert_eq!(service.question_count(&created.id), 0);

        let updated = service
            .update_category(&created.id, "Rust 2024", "")
            .await
            .unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(service.get(&created.id).unwrap().name, "Rust 2024");
    }

    #[tokio::test]
    async fn update_of_unknown_category_fails() {
        let err = service()
            .update_category(&CategoryId::new("ghost"), "x", "")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CategoryServiceError::AppData(AppDataError::CategoryNotFound(_))
        ));
    }

    #[tokio::test]
    async fn delete_cascades_questions_but_keeps_records() {
        let service = service();
        service
            .store
            .apply(|data, _| {
                let mut next = data.clone();
                next.incorrect_records.push(quiz_core::model::IncorrectRecord::new(
                    QuestionId::new("q3"),
                    CategoryId::new("cat_2"),
                    fixed_clock().now(),
                ));
                Ok::<_, Infallible>(next)
            })
            .await
            .unwrap();

        service.delete_category(&CategoryId::new("cat_2")).await;

        let data = service.store.snapshot();
        assert!(data.category(&CategoryId::new("cat_2")).is_none());
        assert_eq!(data.question_count(&CategoryId::new("cat_2")), 0);
        assert_eq!(data.incorrect_records.len(), 1);
    }

    #[tokio::test]
    async fn import_is_all_or_nothing() {
        let service = service();
        let id = CategoryId::new("cat_2");
        let bad = r#"[
            {"text": "a", "options": ["x"], "correctOptionId": "opt_0"},
            {"text": "b", "options": ["x"]}
        ]"#;
        let err = service.import_questions(&id, "bad.json", bad).await.unwrap_err();
        assert!(matches!(
            err,
            CategoryServiceError::Import(ImportError::MissingFields { index: 1 })
        ));
        assert_eq!(service.question_count(&id), 1);

        let good = r#"[{"text": "a", "options": ["x", "y"], "correctOptionId": "opt_1"}]"#;
        let added = service.import_questions(&id, "good.json", good).await.unwrap();
        assert_eq!(added, 1);
        assert_eq!(service.question_count(&id), 2);
    }
}
