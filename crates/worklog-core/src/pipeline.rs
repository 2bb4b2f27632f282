//! Run orchestration
//!
//! One run: split the requested range into cached and live portions, read the
//! cached days, fetch the live ones from every configured source, merge,
//! de-duplicate, aggregate and publish.

use crate::aggregate::{self, Summaries};
use crate::cache::CacheStore;
use crate::config::AppConfig;
use crate::dates;
use crate::error::Result;
use crate::export::{export_summary_csvs, SummaryWorkbook};
use crate::models::{self, DateRange, TimeEntry};
use crate::sink::SheetsClient;
use crate::sources::TimeSource;
use crate::table;

/// What one collection pass did, for logging and CLI output
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// Rows served from the day-file cache
    pub cached_rows: usize,
    /// Rows fetched per source, in fetch order
    pub source_rows: Vec<(String, usize)>,
    /// Rows removed by full-row de-duplication
    pub dropped_duplicates: usize,
    /// Rows in the final merged set
    pub total_rows: usize,
}

/// Gather the full row set for a range: cache first, then live sources.
///
/// Sources are queried sequentially in configuration order. The merged set is
/// de-duplicated by full-row equality and sorted newest date first.
pub async fn collect(
    config: &AppConfig,
    cache: &CacheStore,
    sources: &[Box<dyn TimeSource>],
    range: &DateRange,
) -> Result<(Vec<TimeEntry>, RunReport)> {
    let partition = dates::partition(range, config.days_no_cache);
    let mut report = RunReport::default();
    let mut rows = Vec::new();

    if let Some(cache_range) = partition.cache_range() {
        log::info!(
            "reading cache for {} to {}",
            cache_range.start,
            cache_range.end
        );
        let cached = cache.read_range_all(&cache_range);
        report.cached_rows = cached.len();
        rows.extend(cached);
    }

    if let Some(live_range) = partition.live_range() {
        for source in sources {
            log::info!(
                "fetching {} for {} to {}",
                source.source_name(),
                live_range.start,
                live_range.end
            );
            let fetched = source.fetch(&live_range).await?;
            report
                .source_rows
                .push((source.source_name().to_string(), fetched.len()));
            rows.extend(fetched);
        }
    }

    let before = rows.len();
    let mut rows = models::dedup(rows);
    report.dropped_duplicates = before - rows.len();

    // newest first; stable sort keeps source order within a date
    rows.sort_by(|a, b| b.date.cmp(&a.date));
    report.total_rows = rows.len();
    Ok((rows, report))
}

/// Aggregate a merged row set into the three summary tables.
pub fn summarize(rows: &[TimeEntry]) -> Summaries {
    aggregate::aggregate(rows)
}

/// Publish summaries to every configured sink.
pub async fn publish(config: &AppConfig, summaries: &Summaries) -> Result<()> {
    let tables = table::to_tables(summaries);

    if let Some(sheets) = &config.sheets {
        let client = SheetsClient::new(sheets.clone())?;
        client.publish_summaries(&tables).await?;
    }

    if let Some(path) = &config.exports.xlsx_path {
        let mut workbook = SummaryWorkbook::new();
        workbook.create_report(summaries)?;
        workbook.save(path)?;
    }

    if let Some(dir) = &config.exports.csv_dir {
        export_summary_csvs(dir, &tables)?;
    }

    Ok(())
}
