//! Question file import.
//!
//! Files are a JSON array of question objects. Parsing is lenient about
//! optional fields and strict about the required ones: a single bad item
//! rejects the whole file.

use std::path::Path;

use serde_json::Value;

use quiz_core::model::{Difficulty, OptionId, Question, QuestionId, QuestionOption, generate_id};

use crate::error::ImportError;

/// Parse a question file. `file_name` decides the accepted format.
///
/// # Errors
///
/// Returns `ImportError` for unsupported files, invalid JSON, a top-level
/// value that is not an array, or an item missing its required fields.
pub fn parse_questions(file_name: &str, content: &str) -> Result<Vec<Question>, ImportError> {
    if !file_name.ends_with(".json") {
        return Err(ImportError::UnsupportedFormat(file_name.to_owned()));
    }

    let value: Value =
        serde_json::from_str(content).map_err(|e| ImportError::InvalidJson(e.to_string()))?;
    let Value::Array(items) = value else {
        return Err(ImportError::NotAnArray);
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| parse_item(index, item))
        .collect()
}

/// Read and parse a question file from disk.
///
/// # Errors
///
/// Returns `ImportError::Read` if the file cannot be read, otherwise the
/// errors of [`parse_questions`].
pub async fn read_questions_file(path: &Path) -> Result<Vec<Question>, ImportError> {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    if !file_name.ends_with(".json") {
        return Err(ImportError::UnsupportedFormat(file_name));
    }

    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ImportError::Read(e.to_string()))?;
    let questions = parse_questions(&file_name, &content)?;
    tracing::debug!(path = %path.display(), count = questions.len(), "parsed question file");
    Ok(questions)
}

fn parse_item(index: usize, item: &Value) -> Result<Question, ImportError> {
    let missing = || ImportError::MissingFields { index };

    let text = item.get("text").filter(|v| is_truthy(v)).ok_or_else(missing)?;
    let options = item
        .get("options")
        .and_then(Value::as_array)
        .ok_or_else(missing)?;
    let correct = item
        .get("correctOptionId")
        .filter(|v| is_truthy(v))
        .ok_or_else(missing)?;

    let id = item
        .get("id")
        .filter(|v| is_truthy(v))
        .map_or_else(generate_id, value_text);

    let difficulty = item
        .get("difficulty")
        .and_then(Value::as_str)
        .and_then(|s| s.parse::<Difficulty>().ok());

    let explanation = item
        .get("explanation")
        .filter(|v| is_truthy(v))
        .map(value_text);

    Ok(Question {
        id: QuestionId::new(id),
        text: value_text(text),
        options: options.iter().enumerate().map(parse_option).collect(),
        correct_option_id: OptionId::new(value_text(correct)),
        explanation,
        difficulty,
    })
}

fn parse_option((i, option): (usize, &Value)) -> QuestionOption {
    let id = option
        .get("id")
        .filter(|v| is_truthy(v))
        .map_or_else(|| format!("opt_{i}"), value_text);
    let text = option
        .get("text")
        .filter(|v| is_truthy(v))
        .unwrap_or(option);
    QuestionOption::new(id, value_text(text))
}

/// Loose truthiness: null, false, zero and empty strings count as absent.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Object(_) => "[object Object]".to_owned(),
        Value::Array(items) => items.iter().map(value_text).collect::<Vec<_>>().join(","),
        Value::Null => "null".to_owned(),
        other => other.to_string(),
    }
}
