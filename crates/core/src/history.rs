//! Results history ordering and labels.

use crate::model::{AppData, QuizResult};

/// Label shown when a result's category no longer exists.
pub const UNKNOWN_CATEGORY: &str = "Unknown Category";

/// A result paired with the display name of its category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryEntry<'a> {
    pub result: &'a QuizResult,
    pub category_name: &'a str,
}

/// All results, newest first.
#[must_use]
pub fn sorted_history(data: &AppData) -> Vec<HistoryEntry<'_>> {
    let mut entries: Vec<_> = data
        .results
        .iter()
        .map(|result| HistoryEntry {
            result,
            category_name: data
                .category(result.category_id())
                .map_or(UNKNOWN_CATEGORY, |c| c.name.as_str()),
        })
        .collect();
    entries.sort_by(|a, b| b.result.timestamp().cmp(&a.result.timestamp()));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AnswerMap, CategoryId, ResultId};
    use crate::time::fixed_now;
    use chrono::Duration;

    fn result(id: &str, category: &str, offset_secs: i64) -> QuizResult {
        QuizResult::from_parts(
            ResultId::new(id),
            CategoryId::new(category),
            1,
            2,
            fixed_now() + Duration::seconds(offset_secs),
            AnswerMap::new(),
            10,
        )
        .unwrap()
    }

    #[test]
    fn newest_first_with_category_names() {
        let mut data = AppData::seed(fixed_now());
        data.results.push(result("old", "cat_1", 0));
        data.results.push(result("new", "cat_2", 60));
        data.results.push(result("mid", "deleted", 30));

        let history = sorted_history(&data);
        let ids: Vec<_> = history.iter().map(|e| e.result.id().as_str()).collect();
        assert_eq!(ids, vec!["new", "mid", "old"]);
        assert_eq!(history[0].category_name, "Web Development");
        assert_eq!(history[1].category_name, UNKNOWN_CATEGORY);
    }
}
