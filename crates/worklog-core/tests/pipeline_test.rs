//! Offline end-to-end test: seeded cache through collection, aggregation and
//! file export, with no configured sources.

use chrono::{FixedOffset, NaiveDate, TimeZone};
use worklog_core::{
    cache::CacheStore,
    config::AppConfig,
    models::{DateRange, Source, TimeEntry},
    pipeline,
    sources::TimeSource,
};

fn entry(day: u32, client: &str, hours: f64) -> TimeEntry {
    let start = FixedOffset::east_opt(2 * 3600)
        .unwrap()
        .with_ymd_and_hms(2021, 9, day, 9, 0, 0)
        .unwrap();
    TimeEntry::new(
        Some(client.to_string()),
        Some("Rollout".to_string()),
        hours,
        "planning".to_string(),
        start,
        "Partners".to_string(),
        Source::Api,
    )
}

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2021, 9, day).unwrap()
}

#[tokio::test]
async fn cached_days_flow_through_to_exports() {
    let dir = tempfile::tempdir().unwrap();
    let cache_dir = dir.path().join("cache");
    let cache = CacheStore::new(&cache_dir);

    let seeded = vec![entry(1, "Acme", 2.0), entry(1, "Acme", 3.0), entry(2, "Beta", 1.5)];
    cache
        .for_source(Source::Api)
        .write_range(&DateRange::new(date(1), date(2)), &seeded)
        .unwrap();

    let csv_dir = dir.path().join("exports");
    let config_json = format!(
        r#"{{
            "cache_dir": {:?},
            "days_no_cache": 0,
            "default_start_date": "2021-09-01",
            "exports": {{ "csv_dir": {:?} }}
        }}"#,
        cache_dir, csv_dir
    );
    let config: AppConfig = serde_json::from_str(&config_json).unwrap();

    let sources: Vec<Box<dyn TimeSource>> = Vec::new();
    let range = config.resolve_range(None, None, date(5));

    let (rows, report) = pipeline::collect(&config, &cache, &sources, &range)
        .await
        .unwrap();
    assert_eq!(report.cached_rows, 3);
    assert_eq!(report.total_rows, 3);
    assert!(report.source_rows.is_empty());
    // newest first
    assert_eq!(rows[0].date, date(2));

    let summaries = pipeline::summarize(&rows);
    assert_eq!(summaries.daily.len(), 2);
    assert_eq!(summaries.all.len(), 2);
    // both Acme rows on day 1 collapse into one 5h row
    let acme_day = summaries
        .daily
        .iter()
        .find(|r| r.client.as_deref() == Some("Acme"))
        .unwrap();
    assert_eq!(acme_day.hours, 5.0);

    pipeline::publish(&config, &summaries).await.unwrap();

    let daily_csv = std::fs::read_to_string(csv_dir.join("daily.csv")).unwrap();
    let mut lines = daily_csv.lines();
    assert_eq!(lines.next(), Some("date,client,project,hours"));
    // daily summary is newest first
    assert_eq!(lines.next(), Some("02/09/2021,Beta,Rollout,1.5"));
    assert_eq!(lines.next(), Some("01/09/2021,Acme,Rollout,5"));
}
