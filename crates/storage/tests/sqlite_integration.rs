use quiz_core::model::{AnswerMap, AppData, CategoryId, IncorrectRecord, QuestionId, QuizResult, ResultId};
use quiz_core::time::fixed_now;
use storage::repository::{AppDataRepository, STORAGE_KEY, StorageError};
use storage::sqlite::SqliteRepository;

async fn repo(name: &str) -> SqliteRepository {
    let url = format!("sqlite:file:{name}?mode=memory&cache=shared");
    let repo = SqliteRepository::connect(&url).await.expect("connect");
    repo.migrate().await.expect("migrate");
    repo
}

#[tokio::test]
async fn sqlite_roundtrip_persists_whole_snapshot() {
    let repo = repo("memdb_roundtrip").await;
    assert!(repo.load_app_data().await.unwrap().is_none());

    let result = QuizResult::from_parts(
        ResultId::new("r1"),
        CategoryId::new("cat_1"),
        1,
        2,
        fixed_now(),
        AnswerMap::new(),
        33,
    )
    .unwrap();
    let record = IncorrectRecord::new(QuestionId::new("q2"), CategoryId::new("cat_1"), fixed_now());
    let data = AppData::seed(fixed_now()).with_completed_quiz(result, vec![record]);

    repo.save_app_data(&data).await.unwrap();
    let loaded = repo.load_app_data().await.unwrap().expect("stored");
    assert_eq!(loaded, data);

    // second save replaces rather than appends
    let trimmed = loaded.without_incorrect_record(&QuestionId::new("q2"));
    repo.save_app_data(&trimmed).await.unwrap();
    let reloaded = repo.load_app_data().await.unwrap().unwrap();
    assert!(reloaded.incorrect_records.is_empty());
    assert_eq!(reloaded.results.len(), 1);
}

#[tokio::test]
async fn sqlite_migrations_are_idempotent() {
    let repo = repo("memdb_migrate_twice").await;
    repo.migrate().await.expect("second migrate");
    repo.save_app_data(&AppData::default()).await.unwrap();
    assert_eq!(repo.load_app_data().await.unwrap(), Some(AppData::default()));
}

#[tokio::test]
async fn sqlite_reports_corrupt_snapshot() {
    let repo = repo("memdb_corrupt").await;
    repo.put_raw(STORAGE_KEY, "{\"categories\": 7").await.unwrap();
    let err = repo.load_app_data().await.unwrap_err();
    assert!(matches!(err, StorageError::Serialization(_)));
}

#[tokio::test]
async fn sqlite_keys_are_isolated() {
    let repo = repo("memdb_keys").await;
    repo.save_app_data(&AppData::seed(fixed_now())).await.unwrap();

    let other = repo.clone().with_key("quiz_master_v3");
    assert_eq!(other.key(), "quiz_master_v3");
    assert!(other.load_app_data().await.unwrap().is_none());
}
