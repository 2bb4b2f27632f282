//! # worklog-core
//!
//! Core ETL logic for worklog - shared by the CLI.
//!
//! This crate provides:
//! - The canonical time-entry model (`models` module)
//! - Day-file caching (`cache` module) and range partitioning (`dates` module)
//! - Pluggable source adapters (`sources` module)
//! - Aggregation into summary tables (`aggregate` and `table` modules)
//! - File exports and the spreadsheet sink (`export` and `sink` modules)
//! - Run orchestration (`pipeline` module)
//! - Unified error handling (`error` module)

pub mod aggregate;
pub mod cache;
pub mod config;
pub mod dates;
pub mod error;
pub mod export;
pub mod models;
pub mod pipeline;
pub mod sink;
pub mod sources;
pub mod table;

// Re-exports for convenience
pub use error::{Error, Result};

pub use aggregate::{aggregate, DatedSummaryRow, Summaries, SummaryRow};
pub use cache::CacheStore;
pub use config::{default_config_path, AppConfig};
pub use models::{DateRange, Source, TimeEntry};
pub use pipeline::{collect, publish, summarize, RunReport};
pub use sources::{build_sources, TimeSource};
pub use table::{to_tables, SummaryTables, Table};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Returns the library version
pub fn version() -> &'static str {
    VERSION
}
