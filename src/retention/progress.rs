//! Progress events emitted by the purge engine.
//!
//! Reporting is a side channel: [`ProgressReporter::report`] returns nothing,
//! so a reporter can neither steer nor abort a purge.

use std::{fmt, time::Duration};

use chrono::NaiveDate;

use crate::models::format_date;

/// Which purge operation produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurgeMode {
    /// Every eligible article older than a day threshold.
    Age,
    /// An exact count of the oldest eligible articles.
    Trim,
}

impl fmt::Display for PurgeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PurgeMode::Age => f.write_str("age"),
            PurgeMode::Trim => f.write_str("trim"),
        }
    }
}

/// One-time estimate derived from the timed sample round.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PurgeEstimate {
    /// Measured cost of deleting one row.
    pub per_row: Duration,
    /// Rows still to delete after the sample round.
    pub remaining_rows: u64,
    /// `per_row * remaining_rows`.
    pub remaining: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PurgeEvent {
    /// Candidates were counted (age) or fetched (trim).
    Found {
        mode: PurgeMode,
        candidates: u64,
        cutoff_date: Option<NaiveDate>,
    },
    /// One delete statement committed.
    Batch {
        mode: PurgeMode,
        deleted: u64,
        total_deleted: u64,
        total: u64,
    },
    /// Emitted at most once per run, after the sample round.
    Estimate(PurgeEstimate),
    /// The run finished without error.
    Done {
        mode: PurgeMode,
        deleted: u64,
        elapsed: Duration,
    },
}

/// Receives purge progress.
pub trait ProgressReporter: Send + Sync {
    fn report(&self, event: &PurgeEvent);
}

/// Renders progress as `tracing` events under the `archivist::purge` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl ProgressReporter for TracingReporter {
    fn report(&self, event: &PurgeEvent) {
        match event {
            PurgeEvent::Found {
                mode,
                candidates,
                cutoff_date: Some(cutoff),
            } => {
                tracing::info!(
                    target: "archivist::purge",
                    mode = %mode,
                    candidates,
                    cutoff_date = %format_date(*cutoff),
                    "Found {} articles published before {}",
                    candidates,
                    format_date(*cutoff)
                );
            }
            PurgeEvent::Found {
                mode,
                candidates,
                cutoff_date: None,
            } => {
                tracing::info!(
                    target: "archivist::purge",
                    mode = %mode,
                    candidates,
                    "Found {} oldest articles to delete",
                    candidates
                );
            }
            PurgeEvent::Batch {
                mode,
                deleted,
                total_deleted,
                total,
            } => {
                tracing::info!(
                    target: "archivist::purge",
                    mode = %mode,
                    deleted,
                    total_deleted,
                    total,
                    "Deleted {}/{} articles ({}%)",
                    total_deleted,
                    total,
                    percent(*total_deleted, *total)
                );
            }
            PurgeEvent::Estimate(estimate) => {
                tracing::info!(
                    target: "archivist::purge",
                    remaining_rows = estimate.remaining_rows,
                    per_row_us = estimate.per_row.as_micros() as u64,
                    "Estimated time remaining: {}",
                    format_duration(estimate.remaining)
                );
            }
            PurgeEvent::Done {
                mode,
                deleted,
                elapsed,
            } => {
                tracing::info!(
                    target: "archivist::purge",
                    mode = %mode,
                    deleted,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Purge complete: deleted {} articles in {}",
                    deleted,
                    format_duration(*elapsed)
                );
            }
        }
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn report(&self, _event: &PurgeEvent) {}
}

fn percent(done: u64, total: u64) -> u64 {
    if total == 0 {
        return 100;
    }
    (done.saturating_mul(100) / total).min(100)
}

/// Render a duration for humans: `4.2s`, `3m 07s`, `2h 05m`.
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs < 60 {
        format!("{:.1}s", duration.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {:02}s", secs / 60, secs % 60)
    } else {
        format!("{}h {:02}m", secs / 3600, (secs % 3600) / 60)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(Duration::from_millis(0), "0.0s")]
    #[case(Duration::from_millis(4200), "4.2s")]
    #[case(Duration::from_secs(187), "3m 07s")]
    #[case(Duration::from_secs(7500), "2h 05m")]
    fn test_format_duration(#[case] duration: Duration, #[case] expected: &str) {
        assert_eq!(format_duration(duration), expected);
    }

    #[test]
    fn test_percent() {
        assert_eq!(percent(0, 0), 100);
        assert_eq!(percent(1000, 7000), 14);
        assert_eq!(percent(7000, 7000), 100);
    }

    #[test]
    fn test_mode_display() {
        assert_eq!(PurgeMode::Age.to_string(), "age");
        assert_eq!(PurgeMode::Trim.to_string(), "trim");
    }
}
