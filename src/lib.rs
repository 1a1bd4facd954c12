//! Retention and batched purge for a bounded-size article archive.
//!
//! - [`retention`]: the purge engine, protection resolver and status report
//! - [`db`]: SQLite-backed article and editorial mark repositories
//! - [`config`]: TOML configuration with `${VAR}` expansion
//! - [`observability`]: tracing setup

pub mod config;
pub mod db;
pub mod models;
pub mod observability;
pub mod retention;
