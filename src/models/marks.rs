use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The two editorial tables whose rows protect an article from purging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkTable {
    /// Relevance judgments, regardless of the verdict.
    Relevance,
    /// Approvals.
    Approval,
}

impl MarkTable {
    pub const ALL: [MarkTable; 2] = [MarkTable::Relevance, MarkTable::Approval];

    pub fn table_name(&self) -> &'static str {
        match self {
            MarkTable::Relevance => "article_relevance_marks",
            MarkTable::Approval => "article_approvals",
        }
    }
}

impl std::fmt::Display for MarkTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.table_name())
    }
}

/// A relevance judgment on an article
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelevanceMark {
    pub id: i64,
    pub article_id: i64,
    pub is_relevant: bool,
    pub created_at: DateTime<Utc>,
}

/// Input for recording a relevance judgment
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRelevanceMark {
    pub article_id: i64,
    pub is_relevant: bool,
}

/// An editorial approval of an article
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalMark {
    pub id: i64,
    pub article_id: i64,
    pub approved_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for approving an article
#[derive(Debug, Clone, Deserialize)]
pub struct CreateApprovalMark {
    pub article_id: i64,
    #[serde(default)]
    pub approved_by: Option<String>,
}

/// An `article_id` value exactly as read from a mark table.
///
/// Rows carried over from older archives are not guaranteed to hold a usable
/// id, so the value is kept in its textual form until [`RawArticleId::parse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawArticleId(pub Option<String>);

impl RawArticleId {
    /// Coerce the stored value to an article id.
    ///
    /// Accepts integers and integral finite decimals (`"12"`, `" 12 "`, `"12.0"`).
    /// NULL, empty, non-numeric, fractional and non-finite values yield `None`.
    pub fn parse(&self) -> Option<i64> {
        let text = self.0.as_deref()?.trim();
        if text.is_empty() {
            return None;
        }
        if let Ok(id) = text.parse::<i64>() {
            return Some(id);
        }
        let value = text.parse::<f64>().ok()?;
        if !value.is_finite() || value.fract() != 0.0 {
            return None;
        }
        if value < i64::MIN as f64 || value >= i64::MAX as f64 {
            return None;
        }
        Some(value as i64)
    }
}

impl From<Option<String>> for RawArticleId {
    fn from(value: Option<String>) -> Self {
        Self(value)
    }
}

/// Article ids that must never be purged.
///
/// Kept sorted so rendered exclusion lists are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProtectedIds(BTreeSet<i64>);

impl ProtectedIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: i64) -> bool {
        self.0.insert(id)
    }

    pub fn contains(&self, id: i64) -> bool {
        self.0.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = i64> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<i64> for ProtectedIds {
    fn from_iter<T: IntoIterator<Item = i64>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<i64> for ProtectedIds {
    fn extend<T: IntoIterator<Item = i64>>(&mut self, iter: T) {
        self.0.extend(iter);
    }
}
