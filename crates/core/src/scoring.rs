//! Scoring and result building.
//!
//! Everything here is a pure function of its inputs: calling it twice with
//! the same arguments yields equal results. Callers are responsible for
//! building at most one result per real session.

use chrono::{DateTime, Utc};

use crate::model::{
    AnswerMap, CategoryId, OptionId, Question, QuestionOption, QuizResult, QuizResultError,
    ResultId,
};

/// Number of questions whose recorded answer equals the correct option id.
/// Missing answers count as incorrect.
#[must_use]
pub fn score(questions: &[Question], answers: &AnswerMap) -> usize {
    questions
        .iter()
        .filter(|q| answers.get(&q.id).is_some_and(|sel| q.is_correct(sel)))
        .count()
}

/// Inputs needed to turn a finished attempt into a `QuizResult`.
#[derive(Debug, Clone)]
pub struct ResultBuilder<'a> {
    pub questions: &'a [Question],
    pub answers: &'a AnswerMap,
    pub category_id: &'a CategoryId,
    pub elapsed_seconds: u64,
    pub completed_at: DateTime<Utc>,
}

impl ResultBuilder<'_> {
    /// Build the immutable result record.
    ///
    /// # Errors
    ///
    /// Returns `QuizResultError::TooManyQuestions` if the question count cannot fit in `u32`.
    pub fn build(&self, id: ResultId) -> Result<QuizResult, QuizResultError> {
        let len = self.questions.len();
        let total =
            u32::try_from(len).map_err(|_| QuizResultError::TooManyQuestions { len })?;
        let correct = u32::try_from(score(self.questions, self.answers))
            .map_err(|_| QuizResultError::TooManyQuestions { len })?;

        QuizResult::from_parts(
            id,
            self.category_id.clone(),
            correct,
            total,
            self.completed_at,
            self.answers.clone(),
            self.elapsed_seconds,
        )
    }
}

/// Per-question review row shown after a quiz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerReview<'a> {
    pub question: &'a Question,
    pub selected: Option<&'a OptionId>,
    pub is_correct: bool,
}

impl<'a> AnswerReview<'a> {
    #[must_use]
    pub fn selected_option(&self) -> Option<&'a QuestionOption> {
        self.selected.and_then(|id| self.question.option(id))
    }
}

/// Pair every session question with the answer recorded in `result`.
#[must_use]
pub fn review_answers<'a>(questions: &'a [Question], result: &'a QuizResult) -> Vec<AnswerReview<'a>> {
    questions
        .iter()
        .map(|question| {
            let selected = result.answers().get(&question.id);
            AnswerReview {
                question,
                selected,
                is_correct: selected.is_some_and(|sel| question.is_correct(sel)),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{QuestionId, QuestionOption};
    use crate::time::fixed_now;

    fn question(id: &str, correct: &str) -> Question {
        Question::new(
            QuestionId::new(id),
            format!("{id}?"),
            vec![
                QuestionOption::new("optA", "A"),
                QuestionOption::new("optB", "B"),
                QuestionOption::new("optC", "C"),
            ],
            OptionId::new(correct),
        )
        .unwrap()
    }

    fn answers(pairs: &[(&str, &str)]) -> AnswerMap {
        pairs
            .iter()
            .map(|(q, o)| (QuestionId::new(*q), OptionId::new(*o)))
            .collect()
    }

    #[test]
    fn score_counts_exact_matches_only() {
        let qs = vec![question("q1", "optA"), question("q2", "optB")];
        assert_eq!(score(&qs, &answers(&[("q1", "optA"), ("q2", "optC")])), 1);
        assert_eq!(score(&qs, &answers(&[])), 0);
        assert_eq!(score(&qs, &answers(&[("q1", "optA"), ("q2", "optB")])), 2);
        // answers for questions outside the list are ignored
        assert_eq!(score(&qs, &answers(&[("q9", "optA")])), 0);
    }

    #[test]
    fn score_stays_within_bounds() {
        let qs = vec![question("q1", "optA"), question("q2", "optA"), question("q3", "optC")];
        let grids = [
            answers(&[]),
            answers(&[("q1", "optA")]),
            answers(&[("q1", "optA"), ("q2", "optA"), ("q3", "optC")]),
            answers(&[("q1", "bogus"), ("q2", "optA"), ("q3", "optA")]),
        ];
        for a in &grids {
            let s = score(&qs, a);
            assert!(s <= qs.len());
        }
    }

    #[test]
    fn builder_is_deterministic() {
        let qs = vec![question("q1", "optA"), question("q2", "optB")];
        let a = answers(&[("q1", "optA"), ("q2", "optC")]);
        let cat = CategoryId::new("C");
        let builder = ResultBuilder {
            questions: &qs,
            answers: &a,
            category_id: &cat,
            elapsed_seconds: 12,
            completed_at: fixed_now(),
        };

        let first = builder.build(ResultId::new("r")).unwrap();
        let second = builder.build(ResultId::new("r")).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.score(), 1);
        assert_eq!(first.total_questions(), 2);
        assert_eq!(first.time_spent_seconds(), 12);
        assert_eq!(first.category_id(), &cat);
    }

    #[test]
    fn review_rows_mark_unanswered_as_incorrect() {
        let qs = vec![question("q1", "optA"), question("q2", "optB")];
        let a = answers(&[("q1", "optA")]);
        let cat = CategoryId::new("C");
        let result = ResultBuilder {
            questions: &qs,
            answers: &a,
            category_id: &cat,
            elapsed_seconds: 0,
            completed_at: fixed_now(),
        }
        .build(ResultId::new("r"))
        .unwrap();

        let rows = review_answers(&qs, &result);
        assert!(rows[0].is_correct);
        assert_eq!(rows[0].selected_option().map(|o| o.text.as_str()), Some("A"));
        assert!(!rows[1].is_correct);
        assert!(rows[1].selected.is_none());
    }
}
