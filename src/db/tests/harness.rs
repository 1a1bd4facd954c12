//! Test harness for database repository testing
//!
//! SQLite databases are in-memory and migrated with the real migration files,
//! so tests run against the production schema.

use sqlx::SqlitePool;

use crate::db::DbPool;

/// Create an in-memory SQLite pool for testing
///
/// A single connection, since every `sqlite::memory:` connection opens its
/// own empty database.
pub async fn create_sqlite_pool() -> SqlitePool {
    sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory SQLite pool")
}

/// Run SQLite migrations on the pool
///
/// Uses the actual migration files to ensure tests match production schema
pub async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations_sqlx/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}

/// A migrated in-memory database wrapped in a [`DbPool`].
pub async fn create_test_db() -> DbPool {
    let pool = create_sqlite_pool().await;
    run_sqlite_migrations(&pool).await;
    DbPool::from_sqlite(pool)
}

/// Bulk-insert `count` dated articles with a single statement.
///
/// Titles are `bulk-<n>`. Dates cycle through the 28 days of `month`
/// (`YYYY-MM`), so every row sorts before the first of the next month.
pub async fn seed_articles(pool: &SqlitePool, count: u64, month: &str) {
    sqlx::query(
        r#"
        WITH RECURSIVE seq(n) AS (
            SELECT 1
            UNION ALL
            SELECT n + 1 FROM seq WHERE n < ?
        )
        INSERT INTO articles (title, published_date, created_at)
        SELECT
            'bulk-' || n,
            ? || '-' || printf('%02d', ((n - 1) % 28) + 1),
            '2024-01-01T00:00:00Z'
        FROM seq
        "#,
    )
    .bind(i64::try_from(count).expect("seed count fits i64"))
    .bind(month)
    .execute(pool)
    .await
    .expect("Failed to seed articles");
}

/// Insert a mark row with an arbitrary `article_id` value, bypassing the repo.
///
/// Used to reproduce malformed rows carried over from older archives.
pub async fn insert_raw_mark(pool: &SqlitePool, table: &str, article_id: Option<&str>) {
    let sql = match table {
        "article_relevance_marks" => {
            "INSERT INTO article_relevance_marks (article_id, is_relevant, created_at) \
             VALUES (?, 0, '2024-01-01T00:00:00Z')"
        }
        "article_approvals" => {
            "INSERT INTO article_approvals (article_id, created_at) \
             VALUES (?, '2024-01-01T00:00:00Z')"
        }
        other => panic!("unknown mark table {other}"),
    };

    sqlx::query(sql)
        .bind(article_id)
        .execute(pool)
        .await
        .expect("Failed to insert raw mark");
}
