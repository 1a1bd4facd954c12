use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

use super::common::to_count;
use crate::{
    db::{error::DbResult, repos::MarkRepo},
    models::{
        ApprovalMark, CreateApprovalMark, CreateRelevanceMark, MarkTable, RawArticleId,
        RelevanceMark,
    },
};

pub struct SqliteMarkRepo {
    pool: SqlitePool,
}

impl SqliteMarkRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MarkRepo for SqliteMarkRepo {
    async fn mark_relevance(&self, input: CreateRelevanceMark) -> DbResult<RelevanceMark> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO article_relevance_marks (article_id, is_relevant, created_at)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(input.article_id)
        .bind(input.is_relevant)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(RelevanceMark {
            id: result.last_insert_rowid(),
            article_id: input.article_id,
            is_relevant: input.is_relevant,
            created_at: now,
        })
    }

    async fn approve(&self, input: CreateApprovalMark) -> DbResult<ApprovalMark> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO article_approvals (article_id, approved_by, created_at)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(input.article_id)
        .bind(input.approved_by.as_deref())
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(ApprovalMark {
            id: result.last_insert_rowid(),
            article_id: input.article_id,
            approved_by: input.approved_by,
            created_at: now,
        })
    }

    async fn list_article_ids(&self, table: MarkTable) -> DbResult<Vec<RawArticleId>> {
        // Cast so integer, real and legacy text values all decode the same way
        let query = format!(
            "SELECT CAST(article_id AS TEXT) AS article_id FROM {}",
            table.table_name()
        );

        let ids: Vec<Option<String>> = sqlx::query_scalar(&query).fetch_all(&self.pool).await?;
        Ok(ids.into_iter().map(RawArticleId::from).collect())
    }

    async fn count_distinct_irrelevant(&self) -> DbResult<u64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(DISTINCT article_id) FROM article_relevance_marks WHERE is_relevant = 0",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(to_count(count))
    }

    async fn count_distinct_approved(&self) -> DbResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(DISTINCT article_id) FROM article_approvals")
            .fetch_one(&self.pool)
            .await?;
        Ok(to_count(count))
    }
}
