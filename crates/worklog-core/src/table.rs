//! Export-facing table representation
//!
//! Sinks consume a [`Table`]: a header row plus string data rows. Missing
//! values render as empty strings and date keys are formatted `DD/MM/YYYY`;
//! the underlying summary values are never mutated.

use chrono::NaiveDate;

use crate::aggregate::{DatedSummaryRow, Summaries, SummaryRow};

/// A header row plus data rows, all cells stringified
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }
}

/// The three summary tables in publishing order
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryTables {
    pub all: Table,
    pub daily: Table,
    pub weekly: Table,
}

fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

fn format_hours(hours: f64) -> String {
    format!("{}", hours)
}

fn cell(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn all_table(rows: &[SummaryRow]) -> Table {
    let mut table = Table::new(&["client", "project", "hours"]);
    for row in rows {
        table.push_row(vec![
            cell(&row.client),
            cell(&row.project),
            format_hours(row.hours),
        ]);
    }
    table
}

fn dated_table(date_header: &str, rows: &[DatedSummaryRow]) -> Table {
    let mut table = Table::new(&[date_header, "client", "project", "hours"]);
    for row in rows {
        table.push_row(vec![
            format_date(row.date),
            cell(&row.client),
            cell(&row.project),
            format_hours(row.hours),
        ]);
    }
    table
}

/// Render summaries into the tables the sinks publish.
pub fn to_tables(summaries: &Summaries) -> SummaryTables {
    SummaryTables {
        all: all_table(&summaries.all),
        daily: dated_table("date", &summaries.daily),
        weekly: dated_table("week", &summaries.weekly),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summaries() -> Summaries {
        Summaries {
            all: vec![SummaryRow {
                client: Some("Acme".to_string()),
                project: None,
                hours: 5.0,
            }],
            daily: vec![DatedSummaryRow {
                date: NaiveDate::from_ymd_opt(2021, 9, 8).unwrap(),
                client: Some("Acme".to_string()),
                project: Some("Rollout".to_string()),
                hours: 2.5,
            }],
            weekly: vec![DatedSummaryRow {
                date: NaiveDate::from_ymd_opt(2021, 9, 6).unwrap(),
                client: None,
                project: None,
                hours: 7.25,
            }],
        }
    }

    #[test]
    fn test_dates_formatted_day_first() {
        let tables = to_tables(&summaries());
        assert_eq!(tables.daily.rows[0][0], "08/09/2021");
        assert_eq!(tables.weekly.rows[0][0], "06/09/2021");
    }

    #[test]
    fn test_missing_values_render_empty() {
        let tables = to_tables(&summaries());
        assert_eq!(tables.all.rows[0], vec!["Acme", "", "5"]);
        assert_eq!(tables.weekly.rows[0][1], "");
        assert_eq!(tables.weekly.rows[0][2], "");
    }

    #[test]
    fn test_headers() {
        let tables = to_tables(&summaries());
        assert_eq!(tables.all.headers, vec!["client", "project", "hours"]);
        assert_eq!(
            tables.daily.headers,
            vec!["date", "client", "project", "hours"]
        );
        assert_eq!(
            tables.weekly.headers,
            vec!["week", "client", "project", "hours"]
        );
    }

    #[test]
    fn test_fractional_hours_keep_precision() {
        let tables = to_tables(&summaries());
        assert_eq!(tables.daily.rows[0][3], "2.5");
        assert_eq!(tables.weekly.rows[0][3], "7.25");
    }
}
