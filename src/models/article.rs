use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// An archived article.
///
/// Ids are assigned monotonically by the store and never reused, which lets
/// purge runs walk the table with an id cursor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub id: i64,
    pub title: String,
    pub url: Option<String>,
    /// Publication date, date-only. Unknown for some ingested articles.
    pub published_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

/// Input for ingesting a new article
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateArticle {
    pub title: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub published_date: Option<NaiveDate>,
}

impl CreateArticle {
    pub fn new(title: impl Into<String>, published_date: Option<NaiveDate>) -> Self {
        Self {
            title: title.into(),
            url: None,
            published_date,
        }
    }
}
