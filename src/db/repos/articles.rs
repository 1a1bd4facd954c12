use async_trait::async_trait;
use chrono::NaiveDate;

use crate::{
    db::error::DbResult,
    models::{Article, CreateArticle, EligibilityFilter, FetchOrder},
};

#[async_trait]
pub trait ArticleRepo: Send + Sync {
    /// Ingest a new article. The store assigns the next id.
    async fn create(&self, input: CreateArticle) -> DbResult<Article>;

    /// Get an article by ID
    async fn get_by_id(&self, id: i64) -> DbResult<Option<Article>>;

    /// Count every article in the archive
    async fn count_all(&self) -> DbResult<u64>;

    /// Count articles published before the cutoff, ignoring protection
    async fn count_published_before(&self, cutoff: NaiveDate) -> DbResult<u64>;

    // ==================== Retention Operations ====================

    /// Count articles matching the filter.
    async fn count_eligible(&self, filter: &EligibilityFilter) -> DbResult<u64>;

    /// Fetch up to `limit` ids matching the filter, in the given order.
    async fn fetch_eligible_ids(
        &self,
        filter: &EligibilityFilter,
        order: FetchOrder,
        limit: u64,
    ) -> DbResult<Vec<i64>>;

    /// Delete the given articles in a single statement.
    ///
    /// Returns the number of rows actually removed, which is lower than
    /// `ids.len()` when some ids no longer exist.
    async fn delete_by_ids(&self, ids: &[i64]) -> DbResult<u64>;
}
