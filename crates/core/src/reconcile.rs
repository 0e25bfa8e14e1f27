//! Derives newly missed questions from a submitted result.

use chrono::{DateTime, Utc};
use std::collections::HashSet;

use crate::bank::{QuestionIndex, find_question};
use crate::model::{AppData, CategoryId, IncorrectRecord, Question, QuizResult};

/// Compare `result` against the question bank and return the incorrect
/// records that are not yet present in `data`.
///
/// Questions are looked up in the result's declared category first and then
/// in `session_questions`, the exact list the attempt was taken over. A
/// question found in the declared category's own list is recorded under that
/// category. Otherwise the record is attributed to the owning category from
/// `index`. When no owner is known the declared category is kept, unless it
/// is the mixed sentinel, in which case the unknown marker is used.
///
/// Correct answers, questions already recorded and answers whose question can
/// no longer be found are skipped.
#[must_use]
pub fn reconcile_incorrect(
    result: &QuizResult,
    session_questions: &[Question],
    data: &AppData,
    index: &QuestionIndex,
    now: DateTime<Utc>,
) -> Vec<IncorrectRecord> {
    let declared = result.category_id();
    let bank = data.questions_for(declared);

    let mut seen: HashSet<_> = data
        .incorrect_records
        .iter()
        .map(|r| r.question_id.clone())
        .collect();
    let mut fresh = Vec::new();

    for (question_id, selected) in result.answers() {
        let in_bank = find_question(bank, question_id);
        let Some(question) =
            in_bank.or_else(|| find_question(session_questions, question_id))
        else {
            continue;
        };
        if question.is_correct(selected) || seen.contains(question_id) {
            continue;
        }

        let category_id = if in_bank.is_some() && !declared.is_mixed() {
            declared.clone()
        } else {
            match index.owner_of(question_id) {
                Some(owner) => owner.clone(),
                None if declared.is_mixed() => CategoryId::unknown(),
                None => declared.clone(),
            }
        };

        seen.insert(question_id.clone());
        fresh.push(IncorrectRecord::new(question_id.clone(), category_id, now));
    }

    fresh
}
