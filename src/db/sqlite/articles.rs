use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};

use super::common::{parse_date, push_eligibility, push_id_list, sql_limit, to_count};
use crate::{
    db::{error::DbResult, repos::ArticleRepo},
    models::{Article, CreateArticle, EligibilityFilter, FetchOrder, format_date},
};

pub struct SqliteArticleRepo {
    pool: SqlitePool,
}

impl SqliteArticleRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Parse an Article from a database row.
    fn parse_article(row: &sqlx::sqlite::SqliteRow) -> DbResult<Article> {
        let published_date = row
            .get::<Option<String>, _>("published_date")
            .as_deref()
            .map(parse_date)
            .transpose()?;

        Ok(Article {
            id: row.get("id"),
            title: row.get("title"),
            url: row.get("url"),
            published_date,
            created_at: row.get("created_at"),
        })
    }
}

#[async_trait]
impl ArticleRepo for SqliteArticleRepo {
    async fn create(&self, input: CreateArticle) -> DbResult<Article> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO articles (title, url, published_date, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&input.title)
        .bind(input.url.as_deref())
        .bind(input.published_date.map(format_date))
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(Article {
            id: result.last_insert_rowid(),
            title: input.title,
            url: input.url,
            published_date: input.published_date,
            created_at: now,
        })
    }

    async fn get_by_id(&self, id: i64) -> DbResult<Option<Article>> {
        let row = sqlx::query(
            r#"
            SELECT id, title, url, published_date, created_at
            FROM articles
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::parse_article).transpose()
    }

    async fn count_all(&self) -> DbResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM articles")
            .fetch_one(&self.pool)
            .await?;
        Ok(to_count(count))
    }

    async fn count_published_before(&self, cutoff: NaiveDate) -> DbResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM articles WHERE published_date < ?")
            .bind(format_date(cutoff))
            .fetch_one(&self.pool)
            .await?;
        Ok(to_count(count))
    }

    // ==================== Retention Operations ====================

    async fn count_eligible(&self, filter: &EligibilityFilter) -> DbResult<u64> {
        let mut builder = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM articles WHERE ");
        push_eligibility(&mut builder, filter);

        let count = builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;
        Ok(to_count(count))
    }

    async fn fetch_eligible_ids(
        &self,
        filter: &EligibilityFilter,
        order: FetchOrder,
        limit: u64,
    ) -> DbResult<Vec<i64>> {
        let mut builder = QueryBuilder::<Sqlite>::new("SELECT id FROM articles WHERE ");
        push_eligibility(&mut builder, filter);

        match order {
            FetchOrder::IdAfter(last_id) => {
                builder
                    .push(" AND id > ")
                    .push_bind(last_id)
                    .push(" ORDER BY id ASC");
            }
            FetchOrder::OldestPublishedFirst => {
                builder.push(" ORDER BY published_date ASC, id ASC");
            }
        }
        builder.push(" LIMIT ").push_bind(sql_limit(limit));

        let ids = builder
            .build_query_scalar::<i64>()
            .fetch_all(&self.pool)
            .await?;
        Ok(ids)
    }

    async fn delete_by_ids(&self, ids: &[i64]) -> DbResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let mut builder = QueryBuilder::<Sqlite>::new("DELETE FROM articles WHERE id IN ");
        push_id_list(&mut builder, ids.iter().copied());

        let result = builder.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}
