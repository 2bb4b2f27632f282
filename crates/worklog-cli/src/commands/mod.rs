//! CLI commands module
//!
//! Contains all CLI command implementations.

pub mod export;
pub mod fetch;
pub mod run;

use chrono::NaiveDate;
use worklog_core::AppConfig;

/// Shared context for all commands
pub struct Context {
    pub config: AppConfig,
    /// Computed once at startup and passed down, never re-read mid-run
    pub today: NaiveDate,
    pub quiet: bool,
}
