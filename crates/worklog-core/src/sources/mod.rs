//! Data source abstraction
//!
//! This module provides a unified trait for pluggable time-entry sources.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ pipeline::collect                           │
//! │   for source in build_sources(&config) {    │
//! │       source.fetch(&live_range).await       │
//! │   }                                         │
//! └─────────────────────────────────────────────┘
//!          │
//!          ▼
//! ┌─────────────────────────────────────────────┐
//! │ trait TimeSource                            │
//! │   fn source_name() -> &str                  │
//! │   fn fetch(range) -> Vec<TimeEntry>         │
//! └─────────────────────────────────────────────┘
//!          │
//!     ┌────┴─────┐
//!     ▼          ▼
//! ┌───────┐  ┌────────┐
//! │Tracker│  │Database│
//! └───────┘  └────────┘
//! ```
//!
//! # Adding a New Source
//!
//! 1. Create a new module (e.g., `calendar.rs`)
//! 2. Implement the `TimeSource` trait
//! 3. Construct it in `build_sources` below

pub mod database;
pub mod tracker;

pub use database::DatabaseSource;
pub use tracker::TrackerSource;

use async_trait::async_trait;

use crate::cache::CacheStore;
use crate::config::AppConfig;
use crate::error::Result;
use crate::models::{DateRange, Source, TimeEntry};

/// Trait for pluggable time-entry sources
///
/// Every source returns rows already normalized to the canonical schema;
/// an empty range or an empty remote result yields `Ok(vec![])`, never an
/// error.
#[async_trait]
pub trait TimeSource: Send + Sync {
    /// Unique identifier for this source (e.g., "api", "database")
    ///
    /// This matches the `source` tag stamped on the rows it produces.
    fn source_name(&self) -> &'static str;

    /// Fetch and normalize all entries in the inclusive date range
    async fn fetch(&self, range: &DateRange) -> Result<Vec<TimeEntry>>;
}

/// Construct every source the configuration enables, in config order.
///
/// Each source writes its cache days into its own subdirectory of the cache
/// root, so two sources fetching the same live range cannot overwrite each
/// other's day files.
///
/// The tracker source only reads its token file here; the database source
/// connects and validates its table mappings, so misconfiguration fails the
/// run before any fetch starts.
pub async fn build_sources(
    config: &AppConfig,
    cache: &CacheStore,
) -> Result<Vec<Box<dyn TimeSource>>> {
    let mut sources: Vec<Box<dyn TimeSource>> = Vec::new();

    if let Some(tracker) = &config.tracker {
        let source = TrackerSource::new(
            tracker.clone(),
            config.offset(),
            cache.for_source(Source::Api),
        )?;
        sources.push(Box::new(source));
    }

    if let Some(database) = &config.database {
        let source = DatabaseSource::connect(
            database.clone(),
            config.offset(),
            cache.for_source(Source::Database),
        )
        .await?;
        sources.push(Box::new(source));
    }

    Ok(sources)
}
