use async_trait::async_trait;

use crate::{
    db::error::DbResult,
    models::{
        ApprovalMark, CreateApprovalMark, CreateRelevanceMark, MarkTable, RawArticleId,
        RelevanceMark,
    },
};

/// Editorial marks (relevance judgments and approvals) on articles.
#[async_trait]
pub trait MarkRepo: Send + Sync {
    /// Record a relevance judgment
    async fn mark_relevance(&self, input: CreateRelevanceMark) -> DbResult<RelevanceMark>;

    /// Record an approval
    async fn approve(&self, input: CreateApprovalMark) -> DbResult<ApprovalMark>;

    /// Read the `article_id` column of every row in `table`, unparsed.
    async fn list_article_ids(&self, table: MarkTable) -> DbResult<Vec<RawArticleId>>;

    /// Count distinct articles judged not relevant
    async fn count_distinct_irrelevant(&self) -> DbResult<u64>;

    /// Count distinct approved articles
    async fn count_distinct_approved(&self) -> DbResult<u64>;
}
