use chrono::NaiveDate;
use serde::Serialize;

/// Aggregate health of the archive relative to an age cutoff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchiveStatus {
    pub total_articles: u64,
    /// Distinct articles with a relevance mark of `false`.
    pub irrelevant_articles: u64,
    /// Distinct articles with at least one approval.
    pub approved_articles: u64,
    /// Articles published before the cutoff, protected or not.
    pub old_articles: u64,
    /// Articles an age purge with the same cutoff would delete.
    pub deletable_old_articles: u64,
    pub cutoff_date: NaiveDate,
}
