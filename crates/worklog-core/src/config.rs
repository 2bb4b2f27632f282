//! Run configuration
//!
//! Everything behavioral lives here: cache directory, freshness window,
//! date-range defaults, source settings and sink destinations. The file is
//! JSON, resolved from `WORKLOG_CONFIG` or the platform config directory.
//! Database credentials are the one exception: they come from environment
//! variables and are validated when the database source is constructed.

use chrono::{FixedOffset, NaiveDate, Offset, Utc};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::models::DateRange;

/// Top-level configuration for one run
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Cache root; each source keeps its day files in its own subdirectory
    pub cache_dir: PathBuf,
    /// Trailing days of a range that are always fetched live
    pub days_no_cache: u32,
    /// Range start when the caller gives none
    pub default_start_date: NaiveDate,
    /// Range end when the caller gives none; "today" (supplied explicitly by
    /// the entry point) is used when this is also absent
    #[serde(default)]
    pub default_end_date: Option<NaiveDate>,
    /// Fixed offset applied to all start timestamps
    #[serde(default = "default_utc_offset")]
    pub utc_offset_hours: i32,
    #[serde(default)]
    pub tracker: Option<TrackerConfig>,
    #[serde(default)]
    pub database: Option<DatabaseConfig>,
    #[serde(default)]
    pub sheets: Option<SheetsConfig>,
    #[serde(default)]
    pub exports: ExportsConfig,
}

fn default_utc_offset() -> i32 {
    2
}

/// Time-tracking API source settings
#[derive(Debug, Clone, Deserialize)]
pub struct TrackerConfig {
    #[serde(default = "default_tracker_url")]
    pub base_url: String,
    /// File holding the API token
    pub token_path: PathBuf,
    /// Workspace names to include; everything else is ignored
    pub workspaces: Vec<String>,
    /// Only entries belonging to this user id are kept
    pub user_id: i64,
    /// `user_agent` value the reporting endpoint requires
    pub user_agent: String,
    /// Flat delay between report pages, in milliseconds
    #[serde(default = "default_page_delay_ms")]
    pub page_delay_ms: u64,
    #[serde(default = "default_true")]
    pub write_cache: bool,
}

fn default_tracker_url() -> String {
    "https://api.track.toggl.com".to_string()
}

fn default_page_delay_ms() -> u64 {
    3000
}

fn default_true() -> bool {
    true
}

/// Database source settings (credentials come from the environment)
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Time-entries table name
    pub entries_table: String,
    /// Only entries recorded by this user are fetched
    pub user_email: String,
    /// Workspace label stamped on every row from this source
    pub workspace: String,
    #[serde(default)]
    pub tables: ReferenceTables,
    #[serde(default = "default_true")]
    pub write_cache: bool,
}

/// Explicit id/name column mapping for one reference table
#[derive(Debug, Clone, Deserialize)]
pub struct TableMapping {
    pub table: String,
    pub id_column: String,
    pub name_column: String,
}

/// Which reference joins to perform; an unconfigured table skips its join
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReferenceTables {
    #[serde(default)]
    pub clients: Option<TableMapping>,
    #[serde(default)]
    pub projects: Option<TableMapping>,
    #[serde(default)]
    pub phases: Option<TableMapping>,
    #[serde(default)]
    pub blocks: Option<TableMapping>,
}

impl ReferenceTables {
    pub fn all(&self) -> Vec<(&'static str, &TableMapping)> {
        let mut mappings = Vec::new();
        if let Some(m) = &self.clients {
            mappings.push(("clients", m));
        }
        if let Some(m) = &self.projects {
            mappings.push(("projects", m));
        }
        if let Some(m) = &self.phases {
            mappings.push(("phases", m));
        }
        if let Some(m) = &self.blocks {
            mappings.push(("blocks", m));
        }
        mappings
    }
}

/// Spreadsheet service sink settings
#[derive(Debug, Clone, Deserialize)]
pub struct SheetsConfig {
    #[serde(default = "default_sheets_url")]
    pub base_url: String,
    /// File holding the bearer token
    pub token_path: PathBuf,
    pub spreadsheet_id: String,
    /// Addressed range per summary, e.g. "All!A1:D"
    pub all_range: String,
    pub daily_range: String,
    pub weekly_range: String,
}

fn default_sheets_url() -> String {
    "https://sheets.googleapis.com".to_string()
}

/// File export destinations; absent means the export is skipped
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExportsConfig {
    #[serde(default)]
    pub xlsx_path: Option<PathBuf>,
    #[serde(default)]
    pub csv_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Load and validate configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            Error::config(format!("cannot read config file {}: {}", path.display(), e))
        })?;
        let config: AppConfig = serde_json::from_str(&contents)
            .map_err(|e| Error::config(format!("invalid config file {}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if FixedOffset::east_opt(self.utc_offset_hours * 3600).is_none() {
            return Err(Error::config(format!(
                "utc_offset_hours out of range: {}",
                self.utc_offset_hours
            )));
        }
        if let Some(db) = &self.database {
            check_identifier("entries_table", &db.entries_table)?;
            for (name, mapping) in db.tables.all() {
                check_identifier(&format!("{}.table", name), &mapping.table)?;
                check_identifier(&format!("{}.id_column", name), &mapping.id_column)?;
                check_identifier(&format!("{}.name_column", name), &mapping.name_column)?;
            }
        }
        Ok(())
    }

    /// Fixed offset applied to all timestamps
    pub fn offset(&self) -> FixedOffset {
        // validated in load()
        FixedOffset::east_opt(self.utc_offset_hours * 3600).unwrap_or_else(|| Utc.fix())
    }

    /// Resolve the run's date range from overrides, config defaults and the
    /// caller-supplied "today".
    pub fn resolve_range(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        today: NaiveDate,
    ) -> DateRange {
        let start = start.unwrap_or(self.default_start_date);
        let end = end.or(self.default_end_date).unwrap_or(today);
        DateRange::new(start, end)
    }
}

/// SQL identifiers are interpolated into queries, so only plain names pass.
fn check_identifier(field: &str, value: &str) -> Result<()> {
    let valid = !value.is_empty()
        && value.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !value.starts_with(|c: char| c.is_ascii_digit());
    if valid {
        Ok(())
    } else {
        Err(Error::config(format!(
            "invalid SQL identifier for {}: {:?}",
            field, value
        )))
    }
}

/// Config file path: `WORKLOG_CONFIG` env var, else the platform config dir.
pub fn default_config_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("WORKLOG_CONFIG") {
        return Ok(PathBuf::from(path));
    }
    let dirs = directories::ProjectDirs::from("com", "worklog", "Worklog")
        .ok_or_else(|| Error::config("could not determine project directories"))?;
    Ok(dirs.config_dir().join("config.json"))
}

/// Read a credential token from a file, trimming surrounding whitespace.
pub fn read_token(path: &Path) -> Result<String> {
    let token = fs::read_to_string(path)
        .map_err(|e| Error::config(format!("cannot read token file {}: {}", path.display(), e)))?;
    let token = token.trim().to_string();
    if token.is_empty() {
        return Err(Error::config(format!(
            "token file {} is empty",
            path.display()
        )));
    }
    Ok(token)
}
