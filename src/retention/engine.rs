//! Batched purge engine.

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use chrono::{NaiveDate, Utc};
use serde::Serialize;

use super::{
    progress::{ProgressReporter, PurgeEstimate, PurgeEvent, PurgeMode, TracingReporter},
    protection::ProtectionResolver,
};
use crate::{
    config::RetentionConfig,
    db::{ArticleRepo, DbError, DbPool, MarkRepo},
    models::{EligibilityFilter, FetchOrder, cutoff_date},
};

/// Batch sizing for a purge run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PurgeOptions {
    /// Maximum ids per delete statement.
    pub batch_size: u32,
    /// Ids in the timed first round of a large age purge.
    pub sample_size: u32,
    /// Re-resolve protection before every delete.
    pub recheck_protection: bool,
}

impl Default for PurgeOptions {
    fn default() -> Self {
        Self::from_config(&RetentionConfig::default())
    }
}

impl PurgeOptions {
    pub fn from_config(config: &RetentionConfig) -> Self {
        Self {
            batch_size: config.batch_size,
            sample_size: config.sample_size,
            recheck_protection: config.recheck_protection,
        }
    }

    pub fn validate(&self) -> Result<(), PurgeError> {
        if self.batch_size == 0 {
            return Err(PurgeError::InvalidOptions(
                "batch_size must be at least 1".into(),
            ));
        }
        if self.sample_size == 0 {
            return Err(PurgeError::InvalidOptions(
                "sample_size must be at least 1".into(),
            ));
        }
        if self.sample_size > self.batch_size {
            return Err(PurgeError::InvalidOptions(format!(
                "sample_size ({}) cannot exceed batch_size ({})",
                self.sample_size, self.batch_size
            )));
        }
        Ok(())
    }
}

/// Outcome of [`PurgeEngine::purge_by_age`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgePurgeResult {
    pub deleted_count: u64,
    /// Serialized as `YYYY-MM-DD`.
    pub cutoff_date: NaiveDate,
}

/// Outcome of [`PurgeEngine::purge_by_count`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrimPurgeResult {
    pub requested_count: u64,
    /// Eligible articles found, at most `requested_count`.
    pub found_count: u64,
    pub deleted_count: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum PurgeError {
    #[error("Invalid purge options: {0}")]
    InvalidOptions(String),

    /// A count, fetch or delete failed. Batches committed before the failure
    /// stay deleted; running the purge again resumes with what remains.
    #[error("Purge aborted by store error: {0}")]
    Store(#[from] DbError),
}

/// Deletes unprotected articles in bounded batches.
///
/// One database operation is outstanding at a time and every delete commits
/// on its own, so an interrupted run leaves the archive consistent and a
/// second run picks up the remaining candidates.
pub struct PurgeEngine {
    articles: Arc<dyn ArticleRepo>,
    protection: ProtectionResolver,
    options: PurgeOptions,
    reporter: Arc<dyn ProgressReporter>,
}

impl PurgeEngine {
    /// Create an engine reporting through `tracing`.
    pub fn new(
        articles: Arc<dyn ArticleRepo>,
        marks: Arc<dyn MarkRepo>,
        options: PurgeOptions,
    ) -> Result<Self, PurgeError> {
        options.validate()?;
        Ok(Self {
            articles,
            protection: ProtectionResolver::new(marks),
            options,
            reporter: Arc::new(TracingReporter),
        })
    }

    pub fn from_pool(db: &DbPool, config: &RetentionConfig) -> Result<Self, PurgeError> {
        Self::new(db.articles(), db.marks(), PurgeOptions::from_config(config))
    }

    /// Replace the progress reporter.
    pub fn with_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Delete every unprotected article published more than `days` days
    /// before today (UTC).
    pub async fn purge_by_age(&self, days: u32) -> Result<AgePurgeResult, PurgeError> {
        self.purge_by_age_at(days, Utc::now().date_naive()).await
    }

    /// [`purge_by_age`](Self::purge_by_age) with an explicit current date.
    #[tracing::instrument(name = "purge.age", skip(self))]
    pub async fn purge_by_age_at(
        &self,
        days: u32,
        today: NaiveDate,
    ) -> Result<AgePurgeResult, PurgeError> {
        let started = Instant::now();
        let cutoff = cutoff_date(today, days);

        let protected = Arc::new(self.protection.resolve().await?);
        tracing::debug!(protected = protected.len(), %cutoff, "Resolved protected articles");
        let filter = EligibilityFilter::published_before(cutoff, protected);

        let total = self.articles.count_eligible(&filter).await?;
        self.reporter.report(&PurgeEvent::Found {
            mode: PurgeMode::Age,
            candidates: total,
            cutoff_date: Some(cutoff),
        });

        let batch_size = u64::from(self.options.batch_size);
        let sampling = total > batch_size;

        let mut last_id = 0i64;
        let mut deleted = 0u64;
        let mut first_round = true;

        while deleted < total {
            let round_size = if first_round && sampling {
                u64::from(self.options.sample_size)
            } else {
                batch_size
            };
            let limit = round_size.min(total - deleted);

            let round_started = Instant::now();
            let ids = self
                .articles
                .fetch_eligible_ids(&filter, FetchOrder::IdAfter(last_id), limit)
                .await?;
            let Some(&max_id) = ids.iter().max() else {
                break;
            };
            last_id = max_id;

            let removed = self.delete_batch(&ids).await?;
            deleted += removed;
            self.reporter.report(&PurgeEvent::Batch {
                mode: PurgeMode::Age,
                deleted: removed,
                total_deleted: deleted,
                total,
            });

            if first_round && sampling {
                let remaining_rows = total.saturating_sub(deleted);
                if let Some(estimate) =
                    estimate_remaining(round_started.elapsed(), removed, remaining_rows)
                {
                    self.reporter.report(&PurgeEvent::Estimate(estimate));
                }
            }
            first_round = false;
        }

        self.reporter.report(&PurgeEvent::Done {
            mode: PurgeMode::Age,
            deleted,
            elapsed: started.elapsed(),
        });

        Ok(AgePurgeResult {
            deleted_count: deleted,
            cutoff_date: cutoff,
        })
    }

    /// Delete up to `requested` of the oldest unprotected articles that have
    /// a publication date, oldest first with ties broken by id.
    #[tracing::instrument(name = "purge.trim", skip(self))]
    pub async fn purge_by_count(&self, requested: u64) -> Result<TrimPurgeResult, PurgeError> {
        if requested == 0 {
            return Ok(TrimPurgeResult {
                requested_count: 0,
                found_count: 0,
                deleted_count: 0,
            });
        }

        let started = Instant::now();
        let protected = Arc::new(self.protection.resolve().await?);
        tracing::debug!(protected = protected.len(), "Resolved protected articles");
        let filter = EligibilityFilter::has_published_date(protected);

        let candidates = self
            .articles
            .fetch_eligible_ids(&filter, FetchOrder::OldestPublishedFirst, requested)
            .await?;
        let found = candidates.len() as u64;
        self.reporter.report(&PurgeEvent::Found {
            mode: PurgeMode::Trim,
            candidates: found,
            cutoff_date: None,
        });

        let mut deleted = 0u64;
        for chunk in candidates.chunks(self.options.batch_size as usize) {
            let removed = self.delete_batch(chunk).await?;
            deleted += removed;
            self.reporter.report(&PurgeEvent::Batch {
                mode: PurgeMode::Trim,
                deleted: removed,
                total_deleted: deleted,
                total: found,
            });
        }

        self.reporter.report(&PurgeEvent::Done {
            mode: PurgeMode::Trim,
            deleted,
            elapsed: started.elapsed(),
        });

        Ok(TrimPurgeResult {
            requested_count: requested,
            found_count: found,
            deleted_count: deleted,
        })
    }

    /// Delete one batch, first dropping ids that became protected during the
    /// run when `recheck_protection` is enabled.
    async fn delete_batch(&self, ids: &[i64]) -> Result<u64, PurgeError> {
        if !self.options.recheck_protection {
            return Ok(self.articles.delete_by_ids(ids).await?);
        }

        let current = self.protection.resolve().await?;
        let screened: Vec<i64> = ids
            .iter()
            .copied()
            .filter(|id| !current.contains(*id))
            .collect();

        let skipped = ids.len() - screened.len();
        if skipped > 0 {
            tracing::warn!(skipped, "Skipping articles protected after the purge started");
        }
        if screened.is_empty() {
            return Ok(0);
        }

        Ok(self.articles.delete_by_ids(&screened).await?)
    }
}

/// Extrapolate the sample round's per-row cost over the remaining rows.
fn estimate_remaining(
    sample_elapsed: Duration,
    sample_rows: u64,
    remaining_rows: u64,
) -> Option<PurgeEstimate> {
    if sample_rows == 0 {
        return None;
    }
    let per_row_secs = sample_elapsed.as_secs_f64() / sample_rows as f64;
    let per_row = Duration::try_from_secs_f64(per_row_secs).unwrap_or_default();
    let remaining =
        Duration::try_from_secs_f64(per_row_secs * remaining_rows as f64).unwrap_or(Duration::MAX);

    Some(PurgeEstimate {
        per_row,
        remaining_rows,
        remaining,
    })
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_default_options_match_config() {
        let options = PurgeOptions::default();
        assert_eq!(options.batch_size, 5000);
        assert_eq!(options.sample_size, 1000);
        assert!(!options.recheck_protection);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_invalid_options() {
        let options = PurgeOptions {
            batch_size: 10,
            sample_size: 20,
            recheck_protection: false,
        };
        assert!(matches!(
            options.validate(),
            Err(PurgeError::InvalidOptions(msg)) if msg.contains("sample_size")
        ));

        let options = PurgeOptions {
            batch_size: 0,
            ..PurgeOptions::default()
        };
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_estimate_scales_sample_cost() {
        let estimate = estimate_remaining(Duration::from_millis(500), 1000, 6000).unwrap();
        assert_eq!(estimate.remaining_rows, 6000);
        assert!((estimate.per_row.as_secs_f64() - 0.0005).abs() < 1e-9);
        assert!((estimate.remaining.as_secs_f64() - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_no_estimate_without_sampled_rows() {
        assert!(estimate_remaining(Duration::from_millis(10), 0, 100).is_none());
    }
}
