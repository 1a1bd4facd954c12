use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use super::protection::ProtectionResolver;
use crate::{
    db::{ArticleRepo, DbPool, DbResult, MarkRepo},
    models::{ArchiveStatus, EligibilityFilter, cutoff_date},
};

/// Read-only archive health report.
pub struct StatusService {
    articles: Arc<dyn ArticleRepo>,
    marks: Arc<dyn MarkRepo>,
    protection: ProtectionResolver,
}

impl StatusService {
    pub fn new(articles: Arc<dyn ArticleRepo>, marks: Arc<dyn MarkRepo>) -> Self {
        Self {
            articles,
            protection: ProtectionResolver::new(Arc::clone(&marks)),
            marks,
        }
    }

    pub fn from_pool(db: &DbPool) -> Self {
        Self::new(db.articles(), db.marks())
    }

    /// Summarize the archive against a cutoff `days` before today (UTC).
    pub async fn archive_status(&self, days: u32) -> DbResult<ArchiveStatus> {
        self.archive_status_at(days, Utc::now().date_naive()).await
    }

    pub async fn archive_status_at(&self, days: u32, today: NaiveDate) -> DbResult<ArchiveStatus> {
        let cutoff = cutoff_date(today, days);

        let total_articles = self.articles.count_all().await?;
        let irrelevant_articles = self.marks.count_distinct_irrelevant().await?;
        let approved_articles = self.marks.count_distinct_approved().await?;
        let old_articles = self.articles.count_published_before(cutoff).await?;

        // Same predicate the age purge uses, so the two never disagree.
        let protected = Arc::new(self.protection.resolve().await?);
        let deletable_old_articles = self
            .articles
            .count_eligible(&EligibilityFilter::published_before(cutoff, protected))
            .await?;

        Ok(ArchiveStatus {
            total_articles,
            irrelevant_articles,
            approved_articles,
            old_articles,
            deletable_old_articles,
            cutoff_date: cutoff,
        })
    }
}

impl ArchiveStatus {
    /// Log the report at info level.
    pub fn log(&self) {
        tracing::info!(
            total = self.total_articles,
            irrelevant = self.irrelevant_articles,
            approved = self.approved_articles,
            old = self.old_articles,
            deletable = self.deletable_old_articles,
            cutoff_date = %self.cutoff_date,
            "Archive status: {} articles, {} older than {} ({} deletable)",
            self.total_articles,
            self.old_articles,
            self.cutoff_date,
            self.deletable_old_articles
        );
    }
}
