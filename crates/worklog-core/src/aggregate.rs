//! Summary aggregation
//!
//! Groups normalized rows into the three summary tables published each run:
//! all-time by (client, project), daily by (date, client, project) and weekly
//! by (week_start, client, project). Summaries are recomputed from scratch on
//! every run and never persisted.

use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::models::TimeEntry;

/// Summed hours for one (client, project) pair
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub client: Option<String>,
    pub project: Option<String>,
    pub hours: f64,
}

/// Summed hours for one (date, client, project) key; used for both the daily
/// summary (calendar date) and the weekly summary (week-start Monday)
#[derive(Debug, Clone, PartialEq)]
pub struct DatedSummaryRow {
    pub date: NaiveDate,
    pub client: Option<String>,
    pub project: Option<String>,
    pub hours: f64,
}

/// The three summary tables produced from one run's row set
#[derive(Debug, Clone, PartialEq)]
pub struct Summaries {
    pub all: Vec<SummaryRow>,
    pub daily: Vec<DatedSummaryRow>,
    pub weekly: Vec<DatedSummaryRow>,
}

/// Compute all three summaries from normalized rows.
///
/// Grouping keys sort ascending by client then project; the daily and weekly
/// tables are then ordered newest date first, with the within-date ordering
/// preserved.
pub fn aggregate(rows: &[TimeEntry]) -> Summaries {
    let mut all: BTreeMap<(Option<String>, Option<String>), f64> = BTreeMap::new();
    let mut daily: BTreeMap<(NaiveDate, Option<String>, Option<String>), f64> = BTreeMap::new();
    let mut weekly: BTreeMap<(NaiveDate, Option<String>, Option<String>), f64> = BTreeMap::new();

    for row in rows {
        let client = row.client.clone();
        let project = row.project.clone();
        *all.entry((client.clone(), project.clone())).or_insert(0.0) += row.hours;
        *daily
            .entry((row.date, client.clone(), project.clone()))
            .or_insert(0.0) += row.hours;
        *weekly
            .entry((row.week_start, client, project))
            .or_insert(0.0) += row.hours;
    }

    let all = all
        .into_iter()
        .map(|((client, project), hours)| SummaryRow {
            client,
            project,
            hours,
        })
        .collect();

    Summaries {
        all,
        daily: into_dated_rows(daily),
        weekly: into_dated_rows(weekly),
    }
}

fn into_dated_rows(
    grouped: BTreeMap<(NaiveDate, Option<String>, Option<String>), f64>,
) -> Vec<DatedSummaryRow> {
    let mut rows: Vec<DatedSummaryRow> = grouped
        .into_iter()
        .map(|((date, client, project), hours)| DatedSummaryRow {
            date,
            client,
            project,
            hours,
        })
        .collect();
    // newest first; stable sort keeps the grouped client/project order
    rows.sort_by(|a, b| b.date.cmp(&a.date));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Source;
    use chrono::{FixedOffset, TimeZone};

    fn entry(client: &str, project: &str, hours: f64, day: u32) -> TimeEntry {
        let start = FixedOffset::east_opt(2 * 3600)
            .unwrap()
            .with_ymd_and_hms(2021, 9, day, 9, 0, 0)
            .unwrap();
        TimeEntry::new(
            Some(client.to_string()),
            Some(project.to_string()),
            hours,
            "work".to_string(),
            start,
            "Partners".to_string(),
            Source::Api,
        )
    }

    #[test]
    fn test_daily_sums_same_key() {
        // two rows for (2021-09-01, A, X) collapse into one 5h row
        let rows = vec![entry("A", "X", 2.0, 1), entry("A", "X", 3.0, 1)];
        let summaries = aggregate(&rows);
        assert_eq!(summaries.daily.len(), 1);
        let row = &summaries.daily[0];
        assert_eq!(row.date, NaiveDate::from_ymd_opt(2021, 9, 1).unwrap());
        assert_eq!(row.client.as_deref(), Some("A"));
        assert_eq!(row.project.as_deref(), Some("X"));
        assert_eq!(row.hours, 5.0);
    }

    #[test]
    fn test_all_summary_ignores_dates() {
        let rows = vec![entry("A", "X", 2.0, 1), entry("A", "X", 3.0, 8)];
        let summaries = aggregate(&rows);
        assert_eq!(summaries.all.len(), 1);
        assert_eq!(summaries.all[0].hours, 5.0);
    }

    #[test]
    fn test_weekly_groups_by_week_start() {
        // Sep 6 (Mon) and Sep 8 (Wed) share week 2021-09-06; Sep 13 starts a new one
        let rows = vec![
            entry("A", "X", 1.0, 6),
            entry("A", "X", 2.0, 8),
            entry("A", "X", 4.0, 13),
        ];
        let summaries = aggregate(&rows);
        assert_eq!(summaries.weekly.len(), 2);
        assert_eq!(
            summaries.weekly[0].date,
            NaiveDate::from_ymd_opt(2021, 9, 13).unwrap()
        );
        assert_eq!(summaries.weekly[0].hours, 4.0);
        assert_eq!(summaries.weekly[1].hours, 3.0);
    }

    #[test]
    fn test_daily_sorted_newest_first() {
        let rows = vec![entry("A", "X", 1.0, 1), entry("A", "X", 1.0, 3)];
        let summaries = aggregate(&rows);
        assert_eq!(
            summaries.daily[0].date,
            NaiveDate::from_ymd_opt(2021, 9, 3).unwrap()
        );
        assert_eq!(
            summaries.daily[1].date,
            NaiveDate::from_ymd_opt(2021, 9, 1).unwrap()
        );
    }

    #[test]
    fn test_distinct_projects_stay_separate() {
        let rows = vec![entry("A", "X", 2.0, 1), entry("A", "Y", 3.0, 1)];
        let summaries = aggregate(&rows);
        assert_eq!(summaries.daily.len(), 2);
        assert_eq!(summaries.all.len(), 2);
    }

    #[test]
    fn test_missing_client_is_its_own_group() {
        let mut anon = entry("A", "X", 2.0, 1);
        anon.client = None;
        let rows = vec![anon, entry("A", "X", 3.0, 1)];
        let summaries = aggregate(&rows);
        assert_eq!(summaries.all.len(), 2);
        // None sorts before Some in the grouped order
        assert!(summaries.all[0].client.is_none());
    }

    #[test]
    fn test_empty_input_gives_empty_summaries() {
        let summaries = aggregate(&[]);
        assert!(summaries.all.is_empty());
        assert!(summaries.daily.is_empty());
        assert!(summaries.weekly.is_empty());
    }
}
