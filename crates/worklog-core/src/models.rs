//! Canonical data model
//!
//! Every source adapter produces [`TimeEntry`] rows in this shape; everything
//! downstream (cache, aggregation, exports) consumes it.

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Which adapter produced a row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Api,
    Database,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Api => "api",
            Source::Database => "database",
        }
    }
}

/// One normalized time entry, regardless of originating source.
///
/// Serialized field names keep the legacy cache-file keys (`h_logged`,
/// `lunes_semana`) so existing cache directories stay readable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeEntry {
    pub date: NaiveDate,
    pub client: Option<String>,
    pub project: Option<String>,
    #[serde(rename = "h_logged")]
    pub hours: f64,
    pub description: String,
    pub start: DateTime<FixedOffset>,
    #[serde(rename = "lunes_semana")]
    pub week_start: NaiveDate,
    pub workspace: String,
    pub source: Source,
}

impl TimeEntry {
    /// Build an entry from its start timestamp; `date` and `week_start` are
    /// derived, never supplied by callers.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        client: Option<String>,
        project: Option<String>,
        hours: f64,
        description: String,
        start: DateTime<FixedOffset>,
        workspace: String,
        source: Source,
    ) -> Self {
        let date = start.date_naive();
        Self {
            date,
            client,
            project,
            hours,
            description,
            start,
            week_start: week_start(date),
            workspace,
            source,
        }
    }

    /// Comparable identity over all fields (f64 compared bitwise)
    fn full_row_key(&self) -> (NaiveDate, Option<String>, Option<String>, u64, String, String, String, Source) {
        (
            self.date,
            self.client.clone(),
            self.project.clone(),
            self.hours.to_bits(),
            self.description.clone(),
            self.start.to_rfc3339(),
            self.workspace.clone(),
            self.source,
        )
    }
}

/// Monday of the ISO week containing `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let days_from_monday = date.weekday().num_days_from_monday() as i64;
    date - Duration::days(days_from_monday)
}

/// Drop rows that violate the `hours >= 0` invariant.
///
/// A negative duration is an in-progress timer at fetch time; it is discarded
/// without logging.
pub fn normalize(rows: Vec<TimeEntry>) -> Vec<TimeEntry> {
    rows.into_iter().filter(|r| r.hours >= 0.0).collect()
}

/// De-duplicate by full-row equality, keeping first occurrences in order.
pub fn dedup(rows: Vec<TimeEntry>) -> Vec<TimeEntry> {
    let mut seen = HashSet::new();
    rows.into_iter()
        .filter(|r| seen.insert(r.full_row_key()))
        .collect()
}

/// Inclusive date range at day granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// All days in the range, oldest first; empty when start > end
    pub fn days(&self) -> Vec<NaiveDate> {
        let mut days = Vec::new();
        let mut d = self.start;
        while d <= self.end {
            days.push(d);
            match d.succ_opt() {
                Some(next) => d = next,
                None => break,
            }
        }
        days
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }
}
