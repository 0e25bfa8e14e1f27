//! Example question file offered for download.

use std::io;
use std::path::Path;

use serde_json::json;

/// Default file name for the exported template.
pub const TEMPLATE_FILE_NAME: &str = "quiz_template.json";

/// Pretty-printed single-question example in the import format.
#[must_use]
pub fn template_json() -> String {
    let template = json!([
        {
            "text": "Example Question?",
            "options": [
                {"id": "a", "text": "Option A"},
                {"id": "b", "text": "Option B"},
                {"id": "c", "text": "Option C"},
                {"id": "d", "text": "Option D"}
            ],
            "correctOptionId": "b",
            "explanation": "Optional explanation here",
            "difficulty": "medium"
        }
    ]);
    // Serializing a `Value` cannot fail.
    serde_json::to_string_pretty(&template).unwrap_or_default()
}

/// Write the template to `path`.
///
/// # Errors
///
/// Returns the underlying I/O error if the file cannot be written.
pub async fn write_template(path: &Path) -> io::Result<()> {
    tokio::fs::write(path, template_json()).await?;
    tracing::info!(path = %path.display(), "template written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::parse_questions;
    use quiz_core::model::{Difficulty, OptionId};

    #[test]
    fn template_is_importable() {
        let questions = parse_questions(TEMPLATE_FILE_NAME, &template_json()).unwrap();
        assert_eq!(questions.len(), 1);

        let q = &questions[0];
        assert_eq!(q.text, "Example Question?");
        assert_eq!(q.options.len(), 4);
        assert_eq!(q.correct_option_id, OptionId::new("b"));
        assert_eq!(q.correct_option().unwrap().text, "Option B");
        assert_eq!(q.difficulty, Some(Difficulty::Medium));
    }

    #[test]
    fn template_is_indented() {
        assert!(template_json().starts_with("[\n  {\n"));
    }
}
