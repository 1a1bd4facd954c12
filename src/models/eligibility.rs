//! Purge candidate selection.
//!
//! An [`EligibilityFilter`] pairs a selection rule with the protected-id
//! snapshot taken at the start of a run. Stores render it into their own query
//! language; the rule is the same for counting, fetching and status reports.

use std::sync::Arc;

use chrono::{Days, NaiveDate};

use super::ProtectedIds;

/// Which articles a purge looks at before protection is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArticleSelection {
    /// Articles published strictly before the cutoff date.
    PublishedBefore(NaiveDate),
    /// Any article with a known publication date.
    HasPublishedDate,
}

/// Selection rule minus protected ids.
#[derive(Debug, Clone)]
pub struct EligibilityFilter {
    pub selection: ArticleSelection,
    /// Ids excluded from the selection. An empty set adds no exclusion clause.
    pub protected: Arc<ProtectedIds>,
}

impl EligibilityFilter {
    /// Age-cutoff variant: `published_date < cutoff AND id NOT IN protected`.
    pub fn published_before(cutoff: NaiveDate, protected: Arc<ProtectedIds>) -> Self {
        Self {
            selection: ArticleSelection::PublishedBefore(cutoff),
            protected,
        }
    }

    /// Trim variant: `published_date IS NOT NULL AND id NOT IN protected`.
    pub fn has_published_date(protected: Arc<ProtectedIds>) -> Self {
        Self {
            selection: ArticleSelection::HasPublishedDate,
            protected,
        }
    }

    /// In-memory evaluation of the filter, matching what stores render.
    pub fn matches(&self, id: i64, published_date: Option<NaiveDate>) -> bool {
        if self.protected.contains(id) {
            return false;
        }
        match (self.selection, published_date) {
            (_, None) => false,
            (ArticleSelection::PublishedBefore(cutoff), Some(date)) => date < cutoff,
            (ArticleSelection::HasPublishedDate, Some(_)) => true,
        }
    }
}

/// Traversal order for fetching purge candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOrder {
    /// Ascending id, strictly after the given cursor.
    IdAfter(i64),
    /// Oldest publication date first, ties broken by ascending id.
    OldestPublishedFirst,
}

/// Date-only cutoff `days` before `today`.
///
/// Saturates at the earliest representable date for absurd thresholds.
pub fn cutoff_date(today: NaiveDate, days: u32) -> NaiveDate {
    today
        .checked_sub_days(Days::new(u64::from(days)))
        .unwrap_or(NaiveDate::MIN)
}

/// Render a date the way the archive stores it (`YYYY-MM-DD`).
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
