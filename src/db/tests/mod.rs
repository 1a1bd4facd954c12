//! Shared database repository test infrastructure
//!
//! Each repository has a test module (e.g., `articles.rs`) containing:
//! - Shared test functions that take a context of `&dyn XxxRepo`
//! - SQLite-specific setup using in-memory databases with real migrations
//!
//! # Running tests
//!
//! ```bash
//! cargo test db::tests
//! ```

pub mod harness;
mod marks;
mod pool;
