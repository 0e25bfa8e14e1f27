use std::sync::{Arc, Mutex};

use quiz_core::model::{CategoryId, Difficulty, DifficultyFilter, OptionId, QuestionId};
use quiz_core::review::CategoryFilter;
use quiz_core::time::{fixed_clock, fixed_now};
use services::{AppServices, AppStore, Countdown, SetupError};
use storage::repository::{AppDataRepository, InMemoryRepository};

const TWO_QUESTIONS: &str = r#"[
    {"id": "c1", "text": "First?", "options": [{"id": "optA", "text": "A"}, {"id": "optB", "text": "B"}, {"id": "optC", "text": "C"}], "correctOptionId": "optA", "difficulty": "easy"},
    {"id": "c2", "text": "Second?", "options": [{"id": "optA", "text": "A"}, {"id": "optB", "text": "B"}, {"id": "optC", "text": "C"}], "correctOptionId": "optB", "difficulty": "easy"}
]"#;

#[tokio::test]
async fn submitted_quiz_is_scored_reconciled_and_persisted() {
    let repo = InMemoryRepository::new();
    let store = AppStore::load(fixed_clock(), Arc::new(repo.clone())).await;
    let app = AppServices::from_store(store);

    let category = app.categories().create_category("C", "").await.unwrap();
    app.categories()
        .import_questions(&category.id, "c.json", TWO_QUESTIONS)
        .await
        .unwrap();

    let mut session = app
        .quiz()
        .start_quiz(&category.id, DifficultyFilter::All)
        .unwrap();
    session.select_current(OptionId::new("optA")).unwrap();
    session.advance(services::Direction::Next);
    session.select_current(OptionId::new("optC")).unwrap();
    let result = session.submit(fixed_now()).unwrap();

    let done = app
        .quiz()
        .complete_quiz(session.questions(), result)
        .await
        .unwrap();
    assert_eq!(done.result.score(), 1);
    assert_eq!(done.result.total_questions(), 2);
    assert_eq!(done.new_records.len(), 1);
    assert_eq!(done.new_records[0].question_id, QuestionId::new("c2"));
    assert_eq!(done.new_records[0].category_id, category.id);

    let history = app.history().list();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].category_name, "C");
    assert!(!history[0].passed);

    let stored = repo.load_app_data().await.unwrap().unwrap();
    assert_eq!(stored.results.len(), 1);
    assert_eq!(stored.incorrect_records.len(), 1);
}

#[tokio::test]
async fn empty_difficulty_filter_blocks_session_start() {
    let app = AppServices::in_memory(fixed_clock());
    let cat_1 = CategoryId::new("cat_1");

    let setup = app.quiz().setup(&cat_1).unwrap();
    assert_eq!(setup.counts().for_filter(DifficultyFilter::Only(Difficulty::Hard)), 0);

    let err = app
        .quiz()
        .start_quiz(&cat_1, DifficultyFilter::Only(Difficulty::Hard))
        .unwrap_err();
    assert!(matches!(err, SetupError::NoQuestions { .. }));
    assert!(app.store().snapshot().results.is_empty());
}

#[tokio::test(start_paused = true)]
async fn expired_countdown_records_one_result() {
    let app = AppServices::in_memory(fixed_clock());
    let session = app
        .quiz()
        .start_quiz(&CategoryId::new("cat_1"), DifficultyFilter::All)
        .unwrap();
    let questions = session.questions().to_vec();
    let shared = Arc::new(Mutex::new(session));

    let (_countdown, expired) = Countdown::spawn(Arc::clone(&shared), fixed_clock());
    let result = expired.await.unwrap();
    assert_eq!(result.score(), 0);
    assert_eq!(result.total_questions(), 2);

    // Only answered questions are reconciled.
    let done = app.quiz().complete_quiz(&questions, result.clone()).await.unwrap();
    assert!(done.new_records.is_empty());
    assert!(app.quiz().complete_quiz(&questions, result).await.is_err());
    assert_eq!(app.store().snapshot().results.len(), 1);

    let late_submit = shared.lock().unwrap().submit(fixed_now());
    assert!(late_submit.is_err());
}

#[tokio::test]
async fn mixed_retake_reconciles_to_owning_categories() {
    let app = AppServices::in_memory(fixed_clock());
    let c1 = app.categories().create_category("C1", "").await.unwrap();
    let c2 = app.categories().create_category("C2", "").await.unwrap();
    app.categories()
        .import_questions(
            &c1.id,
            "c1.json",
            r#"[{"id": "m1", "text": "One?", "options": ["a", "b"], "correctOptionId": "opt_0"}]"#,
        )
        .await
        .unwrap();
    app.categories()
        .import_questions(
            &c2.id,
            "c2.json",
            r#"[{"id": "m2", "text": "Two?", "options": ["a", "b"], "correctOptionId": "opt_0"}]"#,
        )
        .await
        .unwrap();

    // Miss each question once in its own category.
    for id in [&c1.id, &c2.id] {
        let mut session = app.quiz().start_quiz(id, DifficultyFilter::All).unwrap();
        session.select_current(OptionId::new("opt_1")).unwrap();
        let result = session.submit(fixed_now()).unwrap();
        app.quiz()
            .complete_quiz(session.questions(), result)
            .await
            .unwrap();
    }

    let note = app.incorrect_note();
    let retake = note.retake_set("", &CategoryFilter::All);
    assert_eq!(retake.len(), 2);

    // Clear the note so the retake can record fresh misses.
    for question in &retake {
        note.remove(&question.id).await;
    }
    assert_eq!(note.stored_count(), 0);

    let mut session = app.quiz().start_retake(retake).unwrap();
    assert_eq!(session.category().id, c1.id);
    session.select_option(QuestionId::new("m1"), OptionId::new("opt_1")).unwrap();
    session.select_option(QuestionId::new("m2"), OptionId::new("opt_1")).unwrap();
    let result = session.submit(fixed_now()).unwrap();

    let done = app
        .quiz()
        .complete_quiz(session.questions(), result)
        .await
        .unwrap();
    let owners: Vec<_> = done
        .new_records
        .iter()
        .map(|r| (r.question_id.as_str(), r.category_id.clone()))
        .collect();
    assert_eq!(owners, [("m1", c1.id.clone()), ("m2", c2.id.clone())]);
    assert!(owners.iter().all(|(_, c)| !c.is_mixed()));

    let rows = note.list("", &CategoryFilter::All);
    assert_eq!(rows.len(), 2);
}
