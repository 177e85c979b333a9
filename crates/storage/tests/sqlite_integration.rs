use storage::repository::{ProgressRepository, Storage};
use storage::sqlite::SqliteRepository;

#[tokio::test]
async fn sqlite_progress_slot_starts_empty() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_empty_slot?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let loaded = repo.load_progress().await.expect("load");
    assert!(loaded.is_none());
}

#[tokio::test]
async fn sqlite_progress_slot_overwrites_full_document() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_overwrite?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    repo.save_progress(r#"{"1":true,"5":true}"#)
        .await
        .expect("first save");
    repo.save_progress(r#"{"5":true}"#)
        .await
        .expect("second save");

    let loaded = repo.load_progress().await.expect("load");
    assert_eq!(loaded.as_deref(), Some(r#"{"5":true}"#));
}

#[tokio::test]
async fn sqlite_migrations_are_idempotent() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_migrate_twice?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("first migrate");
    repo.save_progress("{}").await.expect("save");
    repo.migrate().await.expect("second migrate");

    let loaded = repo.load_progress().await.expect("load");
    assert_eq!(loaded.as_deref(), Some("{}"));
}

#[tokio::test]
async fn storage_sqlite_exposes_progress_repository() {
    let storage = Storage::sqlite("sqlite:file:memdb_storage_facade?mode=memory&cache=shared")
        .await
        .expect("storage");
    storage
        .progress
        .save_progress(r#"{"13":true}"#)
        .await
        .expect("save");

    let loaded = storage.progress.load_progress().await.expect("load");
    assert_eq!(loaded.as_deref(), Some(r#"{"13":true}"#));
}
