//! Purge configuration.
//!
//! # Example
//!
//! ```toml
//! [retention]
//! default_days = 180
//! batch_size = 5000
//! sample_size = 1000
//! recheck_protection = false
//! ```

use serde::{Deserialize, Serialize};

/// Purge defaults and batch sizing.
///
/// Every batch is its own transaction, so `batch_size` bounds how long a
/// single delete holds the write lock.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RetentionConfig {
    /// Age threshold in days used when `purge` is run without `--days`.
    /// Default: 180
    #[serde(default = "default_days")]
    pub default_days: u32,

    /// Maximum ids per delete statement.
    /// Default: 5000
    #[serde(default = "default_batch_size")]
    pub batch_size: u32,

    /// Ids in the first, timed round of a large age purge. The duration of
    /// that round drives the one-time time-remaining estimate.
    /// Default: 1000
    #[serde(default = "default_sample_size")]
    pub sample_size: u32,

    /// Re-read the relevance and approval tables before every delete and drop
    /// ids that became protected after the run started. Costs two extra
    /// queries per batch.
    /// Default: false
    #[serde(default)]
    pub recheck_protection: bool,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            default_days: default_days(),
            batch_size: default_batch_size(),
            sample_size: default_sample_size(),
            recheck_protection: false,
        }
    }
}

fn default_days() -> u32 {
    180
}

fn default_batch_size() -> u32 {
    5000
}

fn default_sample_size() -> u32 {
    1000
}

impl RetentionConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.batch_size == 0 {
            return Err("retention.batch_size must be at least 1".into());
        }
        if self.sample_size == 0 {
            return Err("retention.sample_size must be at least 1".into());
        }
        if self.sample_size > self.batch_size {
            return Err(format!(
                "retention.sample_size ({}) cannot exceed retention.batch_size ({})",
                self.sample_size, self.batch_size
            ));
        }
        Ok(())
    }
}
