//! Day-file cache store
//!
//! One JSON-Lines file per calendar day (`YYYY-MM-DD.json`), each line a
//! serialized [`TimeEntry`]. Each source adapter writes fetched days back
//! through its own subdirectory of the cache root (`{cache_dir}/api`,
//! `{cache_dir}/database`), so one source's write-back can never clobber
//! another's day files; the pipeline serves cache-eligible dates from every
//! source subdirectory instead of hitting the sources.
//!
//! Read failures of any kind (missing file, malformed line) are treated as
//! "no cached data for that day" and never propagated.

use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::models::{DateRange, Source, TimeEntry};

/// Handle to a day-file cache directory
#[derive(Debug, Clone)]
pub struct CacheStore {
    dir: PathBuf,
}

impl CacheStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The store scoped to one source's subdirectory of this cache root.
    pub fn for_source(&self, source: Source) -> CacheStore {
        CacheStore {
            dir: self.dir.join(source.as_str()),
        }
    }

    /// Read every present day in the range across all source subdirectories.
    pub fn read_range_all(&self, range: &DateRange) -> Vec<TimeEntry> {
        let mut rows = Vec::new();
        for source in [Source::Api, Source::Database] {
            rows.extend(self.for_source(source).read_range(range));
        }
        rows
    }

    fn day_path(&self, date: NaiveDate) -> PathBuf {
        self.dir.join(format!("{}.json", date.format("%Y-%m-%d")))
    }

    /// Read one day's rows; `None` on missing file or any parse failure.
    pub fn read_day(&self, date: NaiveDate) -> Option<Vec<TimeEntry>> {
        let path = self.day_path(date);
        let contents = match fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) => {
                log::debug!("no cache file for {}: {}", date, e);
                return None;
            }
        };

        let mut rows = Vec::new();
        for line in contents.lines().filter(|l| !l.trim().is_empty()) {
            match serde_json::from_str::<TimeEntry>(line) {
                Ok(entry) => rows.push(entry),
                Err(e) => {
                    log::debug!("discarding unreadable cache file {}: {}", path.display(), e);
                    return None;
                }
            }
        }
        Some(rows)
    }

    /// Read every present day in the inclusive range, skipping absent days.
    pub fn read_range(&self, range: &DateRange) -> Vec<TimeEntry> {
        let mut rows = Vec::new();
        for date in range.days() {
            if let Some(day_rows) = self.read_day(date) {
                rows.extend(day_rows);
            }
        }
        rows
    }

    /// Overwrite the day files covered by `range` with the matching rows.
    ///
    /// Rows are partitioned by their `date` and every day with rows gets its
    /// file rewritten, including days outside the range (the offset
    /// conversion can push a late-evening row past the fetch bound). A day
    /// inside the range with zero matching rows has its stale file removed,
    /// so a re-fetch cannot resurrect entries the tracker no longer reports.
    /// Days outside the range are never removed.
    pub fn write_range(&self, range: &DateRange, rows: &[TimeEntry]) -> Result<()> {
        if range.is_empty() && rows.is_empty() {
            return Ok(());
        }
        fs::create_dir_all(&self.dir)?;

        let mut by_day: BTreeMap<NaiveDate, Vec<&TimeEntry>> = BTreeMap::new();
        for row in rows {
            by_day.entry(row.date).or_default().push(row);
        }

        let mut dates: BTreeSet<NaiveDate> = range.days().into_iter().collect();
        dates.extend(by_day.keys().copied());

        for date in dates {
            let path = self.day_path(date);
            match by_day.get(&date) {
                Some(day_rows) => {
                    let mut lines = String::new();
                    for row in day_rows {
                        lines.push_str(&serde_json::to_string(row)?);
                        lines.push('\n');
                    }
                    fs::write(&path, lines)?;
                }
                None => {
                    if path.exists() {
                        log::debug!("removing stale cache file {}", path.display());
                        fs::remove_file(&path)?;
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Source;
    use chrono::{FixedOffset, TimeZone};

    fn entry(day: u32, hours: f64) -> TimeEntry {
        let start = FixedOffset::east_opt(2 * 3600)
            .unwrap()
            .with_ymd_and_hms(2021, 9, day, 10, 30, 0)
            .unwrap();
        TimeEntry::new(
            Some("Acme".to_string()),
            Some("Rollout".to_string()),
            hours,
            "planning".to_string(),
            start,
            "Partners".to_string(),
            Source::Api,
        )
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 9, d).unwrap()
    }

    #[test]
    fn test_round_trip_single_day() {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::new(dir.path());
        let rows = vec![entry(1, 2.0), entry(1, 0.5)];

        store
            .write_range(&DateRange::new(date(1), date(1)), &rows)
            .unwrap();
        let back = store.read_day(date(1)).unwrap();
        assert_eq!(back, rows);
    }

    #[test]
    fn test_write_partitions_batch_by_day() {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::new(dir.path());
        let rows = vec![entry(1, 2.0), entry(2, 3.0), entry(2, 1.0)];

        store
            .write_range(&DateRange::new(date(1), date(2)), &rows)
            .unwrap();
        assert_eq!(store.read_day(date(1)).unwrap().len(), 1);
        assert_eq!(store.read_day(date(2)).unwrap().len(), 2);
    }

    #[test]
    fn test_read_missing_day_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::new(dir.path());
        assert!(store.read_day(date(1)).is_none());
    }

    #[test]
    fn test_read_malformed_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::new(dir.path());
        fs::create_dir_all(dir.path()).unwrap();
        fs::write(dir.path().join("2021-09-01.json"), "not json\n").unwrap();
        assert!(store.read_day(date(1)).is_none());
    }

    #[test]
    fn test_read_range_skips_absent_days() {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::new(dir.path());
        store
            .write_range(&DateRange::new(date(1), date(1)), &[entry(1, 2.0)])
            .unwrap();
        store
            .write_range(&DateRange::new(date(3), date(3)), &[entry(3, 1.0)])
            .unwrap();

        let rows = store.read_range(&DateRange::new(date(1), date(5)));
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_zero_row_day_inside_range_removes_stale_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::new(dir.path());
        store
            .write_range(&DateRange::new(date(2), date(2)), &[entry(2, 2.0)])
            .unwrap();
        assert!(store.read_day(date(2)).is_some());

        // Re-fetch of the same range now reports nothing for that day
        store
            .write_range(&DateRange::new(date(1), date(3)), &[entry(1, 1.0)])
            .unwrap();
        assert!(store.read_day(date(2)).is_none());
    }

    #[test]
    fn test_days_outside_range_left_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::new(dir.path());
        store
            .write_range(&DateRange::new(date(1), date(1)), &[entry(1, 2.0)])
            .unwrap();

        store
            .write_range(&DateRange::new(date(5), date(6)), &[entry(5, 1.0)])
            .unwrap();
        assert!(store.read_day(date(1)).is_some());
    }

    #[test]
    fn test_rows_outside_range_written_to_their_own_day() {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::new(dir.path());

        // the offset shift can date a row one day past the fetch bound
        store
            .write_range(
                &DateRange::new(date(8), date(9)),
                &[entry(8, 2.0), entry(10, 1.0)],
            )
            .unwrap();
        assert_eq!(store.read_day(date(8)).unwrap().len(), 1);
        assert_eq!(store.read_day(date(10)).unwrap().len(), 1);
    }

    #[test]
    fn test_source_stores_write_back_same_range_without_clobbering() {
        let dir = tempfile::tempdir().unwrap();
        let root = CacheStore::new(dir.path());
        let range = DateRange::new(date(8), date(10));
        let mut db_row = entry(9, 1.5);
        db_row.source = Source::Database;

        // each adapter writes the full live range back through its own store
        root.for_source(Source::Api)
            .write_range(&range, &[entry(8, 2.0)])
            .unwrap();
        root.for_source(Source::Database)
            .write_range(&range, &[db_row])
            .unwrap();

        let rows = root.read_range_all(&range);
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().any(|r| r.source == Source::Api));
        assert!(rows.iter().any(|r| r.source == Source::Database));
    }

    #[test]
    fn test_write_empty_range_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::new(dir.path().join("never-created"));
        store
            .write_range(&DateRange::new(date(5), date(1)), &[])
            .unwrap();
        assert!(!store.dir().exists());
    }
}
