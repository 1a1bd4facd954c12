//! DbPool construction from configuration

use crate::{
    config::{DatabaseConfig, SqliteConfig},
    db::{DbError, DbPool, DbPoolRef},
    models::CreateArticle,
};

#[tokio::test]
async fn test_from_config_requires_database() {
    let result = DbPool::from_config(&DatabaseConfig::None).await;
    assert!(matches!(result, Err(DbError::NotConfigured)));
}

#[tokio::test]
async fn test_from_config_creates_file_and_migrates() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("archive.db");
    let config = DatabaseConfig::Sqlite(SqliteConfig::at(path.to_string_lossy()));

    let db = DbPool::from_config(&config).await.expect("open pool");
    db.run_migrations().await.expect("migrate");
    db.health_check().await.expect("healthy");
    assert!(path.exists());

    let article = db
        .articles()
        .create(CreateArticle::new("persisted", None))
        .await
        .unwrap();
    db.close().await;

    // Migrations are idempotent and data survives reopening
    let db = DbPool::from_config(&config).await.expect("reopen pool");
    db.run_migrations().await.expect("migrate again");
    assert!(db.articles().get_by_id(article.id).await.unwrap().is_some());

    let DbPoolRef::Sqlite(pool) = db.pool();
    let mode: String = sqlx::query_scalar("PRAGMA journal_mode")
        .fetch_one(pool)
        .await
        .unwrap();
    assert_eq!(mode.to_lowercase(), "wal");
    db.close().await;
}

#[tokio::test]
async fn test_from_config_without_create_fails_for_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.db");
    let mut sqlite = SqliteConfig::at(path.to_string_lossy());
    sqlite.create_if_missing = false;

    let result = DbPool::from_config(&DatabaseConfig::Sqlite(sqlite)).await;
    assert!(matches!(result, Err(DbError::Sqlx(_))));
    assert!(!path.exists());
}
