//! Retention and batched purge.
//!
//! Two purge modes share one protection rule:
//! 1. Age purge deletes every article published before a cutoff date,
//!    walking the table with an ascending id cursor. Large runs start with a
//!    small timed round that yields a one-time estimate of the remaining time.
//! 2. Trim purge deletes an exact number of the oldest articles that have a
//!    publication date.
//!
//! Articles carrying a relevance mark or an approval are never deleted. The
//! protected set is resolved once at the start of a run.
//!
//! Deletes are batched so no statement holds the write lock for long, and
//! each batch commits independently.

mod engine;
mod progress;
mod protection;
mod status;


pub use engine::{AgePurgeResult, PurgeEngine, PurgeError, PurgeOptions, TrimPurgeResult};
pub use progress::{
    NoopReporter, ProgressReporter, PurgeEstimate, PurgeEvent, PurgeMode, TracingReporter,
    format_duration,
};
pub use protection::ProtectionResolver;
pub use status::StatusService;
