//! Logging for the purge commands.
//!
//! Console output is always on (stderr, so `status --json` stays clean on
//! stdout). With the `file-logging` feature and `observability.logging.directory`
//! set, the same events are also written to daily-rolling files.

mod tracing_init;

pub use tracing_init::*;
