//! Cache-vs-live date partitioning
//!
//! A requested range is split into a leading prefix that may be served from
//! the day-file cache and a trailing suffix that must always be fetched live,
//! controlled by the configured freshness window (`days_no_cache`).

use chrono::NaiveDate;

use crate::models::DateRange;

/// Result of splitting a range into cacheable and live portions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangePartition {
    /// Leading dates eligible for cache reads, oldest first
    pub cache_dates: Vec<NaiveDate>,
    /// Trailing dates that must be fetched live, oldest first
    pub live_dates: Vec<NaiveDate>,
}

impl RangePartition {
    /// The live portion as an inclusive range, if any
    pub fn live_range(&self) -> Option<DateRange> {
        match (self.live_dates.first(), self.live_dates.last()) {
            (Some(&start), Some(&end)) => Some(DateRange::new(start, end)),
            _ => None,
        }
    }

    /// The cacheable portion as an inclusive range, if any
    pub fn cache_range(&self) -> Option<DateRange> {
        match (self.cache_dates.first(), self.cache_dates.last()) {
            (Some(&start), Some(&end)) => Some(DateRange::new(start, end)),
            _ => None,
        }
    }
}

/// Split `range` into `max(0, N - days_no_cache)` cacheable dates followed by
/// `min(N, days_no_cache)` live dates.
///
/// An inverted range (start after end) produces two empty sequences; callers
/// treat that as a no-op.
pub fn partition(range: &DateRange, days_no_cache: u32) -> RangePartition {
    let days = range.days();
    let cache_len = days.len().saturating_sub(days_no_cache as usize);
    let live_dates = days[cache_len..].to_vec();
    let mut cache_dates = days;
    cache_dates.truncate(cache_len);
    RangePartition {
        cache_dates,
        live_dates,
    }
}
