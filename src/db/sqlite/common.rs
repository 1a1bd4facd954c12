use chrono::NaiveDate;
use sqlx::{QueryBuilder, Sqlite};

use crate::{
    db::error::{DbError, DbResult},
    models::{ArticleSelection, EligibilityFilter, format_date},
};

/// Parse a `YYYY-MM-DD` date column, returning a DbError on failure
pub fn parse_date(s: &str) -> DbResult<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| DbError::Internal(format!("Invalid date in database: {} ({})", s, e)))
}

/// Convert a COUNT(*) result to an unsigned count
pub fn to_count(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}

/// Clamp a row limit to what SQLite accepts as a LIMIT bind
pub fn sql_limit(limit: u64) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

/// Append the WHERE body for an eligibility filter.
///
/// Protected ids are written as integer literals rather than bind parameters:
/// the set can be far larger than SQLite's bind parameter limit, and `i64`
/// values need no quoting.
pub fn push_eligibility(builder: &mut QueryBuilder<'_, Sqlite>, filter: &EligibilityFilter) {
    match filter.selection {
        ArticleSelection::PublishedBefore(cutoff) => {
            builder.push("published_date < ");
            builder.push_bind(format_date(cutoff));
        }
        ArticleSelection::HasPublishedDate => {
            builder.push("published_date IS NOT NULL");
        }
    }

    if !filter.protected.is_empty() {
        builder.push(" AND id NOT IN ");
        push_id_list(builder, filter.protected.iter());
    }
}

/// Append a parenthesized list of integer literals, e.g. `(1, 2, 3)`.
pub fn push_id_list(builder: &mut QueryBuilder<'_, Sqlite>, ids: impl IntoIterator<Item = i64>) {
    builder.push("(");
    let mut separated = builder.separated(", ");
    for id in ids {
        separated.push(id);
    }
    separated.push_unseparated(")");
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::models::ProtectedIds;

    fn render(filter: &EligibilityFilter) -> String {
        let mut builder = QueryBuilder::<Sqlite>::new("SELECT id FROM articles WHERE ");
        push_eligibility(&mut builder, filter);
        builder.sql().to_string()
    }

    #[test]
    fn test_age_filter_without_protection_has_no_exclusion() {
        let cutoff = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let filter = EligibilityFilter::published_before(cutoff, Arc::new(ProtectedIds::new()));
        assert_eq!(
            render(&filter),
            "SELECT id FROM articles WHERE published_date < ?"
        );
    }

    #[test]
    fn test_trim_filter_lists_protected_ids() {
        let protected: ProtectedIds = [9, 2, 4].into_iter().collect();
        let filter = EligibilityFilter::has_published_date(Arc::new(protected));
        assert_eq!(
            render(&filter),
            "SELECT id FROM articles WHERE published_date IS NOT NULL AND id NOT IN (2, 4, 9)"
        );
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert!(parse_date("2024-02-29").is_ok());
        assert!(parse_date("yesterday").is_err());
    }
}
