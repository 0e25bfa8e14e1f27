//! Lookup table from question id to owning category.

use std::collections::HashMap;

use crate::model::{AppData, CategoryId, Question, QuestionId};

/// Question id → owning category id, built once per bank snapshot.
///
/// When the same question id appears in more than one category, the first
/// category in scan order owns it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionIndex {
    owners: HashMap<QuestionId, CategoryId>,
}

impl QuestionIndex {
    #[must_use]
    pub fn build(data: &AppData) -> Self {
        let mut owners = HashMap::new();
        for category_id in data.category_scan_order() {
            for question in data.questions_for(category_id) {
                owners
                    .entry(question.id.clone())
                    .or_insert_with(|| category_id.clone());
            }
        }
        Self { owners }
    }

    #[must_use]
    pub fn owner_of(&self, question_id: &QuestionId) -> Option<&CategoryId> {
        self.owners.get(question_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.owners.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}

/// Find a question by id within a slice.
#[must_use]
pub fn find_question<'a>(questions: &'a [Question], id: &QuestionId) -> Option<&'a Question> {
    questions.iter().find(|q| &q.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn index_maps_every_seeded_question() {
        let data = AppData::seed(fixed_now());
        let index = QuestionIndex::build(&data);
        assert_eq!(index.len(), 3);
        assert_eq!(
            index.owner_of(&QuestionId::new("q3")),
            Some(&CategoryId::new("cat_2"))
        );
        assert_eq!(index.owner_of(&QuestionId::new("missing")), None);
    }

    #[test]
    fn first_category_wins_for_shared_ids() {
        let mut data = AppData::seed(fixed_now());
        let dup = data.questions_for(&CategoryId::new("cat_1"))[0].clone();
        data.questions
            .get_mut(&CategoryId::new("cat_2"))
            .unwrap()
            .push(dup);
        let index = QuestionIndex::build(&data);
        assert_eq!(
            index.owner_of(&QuestionId::new("q1")),
            Some(&CategoryId::new("cat_1"))
        );
    }
}
