//! Spreadsheet service sink
//!
//! Publishes a summary table to an addressed range of a cloud spreadsheet:
//! the range is cleared in full, then overwritten with the header row and all
//! data rows starting at the top-left cell. No diffing.

use reqwest::{header, Client};
use serde_json::json;
use std::time::Duration;

use crate::config::{read_token, SheetsConfig};
use crate::error::{Error, Result};
use crate::table::{SummaryTables, Table};

/// Client for the spreadsheet values API
pub struct SheetsClient {
    config: SheetsConfig,
    client: Client,
}

impl SheetsClient {
    /// Build the client with the bearer token baked into default headers.
    pub fn new(config: SheetsConfig) -> Result<Self> {
        let token = read_token(&config.token_path)?;

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| Error::config(format!("invalid spreadsheet token: {}", e)))?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self { config, client })
    }

    fn values_url(&self, range: &str, suffix: &str) -> String {
        format!(
            "{}/v4/spreadsheets/{}/values/{}{}",
            self.config.base_url, self.config.spreadsheet_id, range, suffix
        )
    }

    async fn clear_range(&self, range: &str) -> Result<()> {
        let url = self.values_url(range, ":clear");
        let response = self.client.post(&url).json(&json!({})).send().await?;
        if !response.status().is_success() {
            return Err(Error::api(format!(
                "clearing range {} failed with HTTP {}",
                range,
                response.status()
            )));
        }
        Ok(())
    }

    /// Clear the addressed range and overwrite it with the table.
    pub async fn publish(&self, table: &Table, range: &str) -> Result<()> {
        self.clear_range(range).await?;

        let url = self.values_url(range, "?valueInputOption=RAW");
        let response = self
            .client
            .put(&url)
            .json(&values_body(table, range))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Error::api(format!(
                "writing range {} failed with HTTP {}",
                range,
                response.status()
            )));
        }
        log::info!("published {} rows to {}", table.rows.len(), range);
        Ok(())
    }

    /// Publish all three summary tables to their configured ranges.
    pub async fn publish_summaries(&self, tables: &SummaryTables) -> Result<()> {
        self.publish(&tables.all, &self.config.all_range).await?;
        self.publish(&tables.daily, &self.config.daily_range).await?;
        self.publish(&tables.weekly, &self.config.weekly_range).await?;
        Ok(())
    }
}

/// Request body for a values write: header row first, then data rows.
fn values_body(table: &Table, range: &str) -> serde_json::Value {
    let mut values = Vec::with_capacity(table.rows.len() + 1);
    values.push(table.headers.clone());
    values.extend(table.rows.iter().cloned());
    json!({
        "range": range,
        "majorDimension": "ROWS",
        "values": values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_body_header_first() {
        let mut table = Table::new(&["client", "project", "hours"]);
        table.push_row(vec!["Acme".to_string(), "".to_string(), "5".to_string()]);

        let body = values_body(&table, "All!A1:C");
        assert_eq!(body["range"], "All!A1:C");
        assert_eq!(body["majorDimension"], "ROWS");
        let values = body["values"].as_array().unwrap();
        assert_eq!(values.len(), 2);
        assert_eq!(values[0][0], "client");
        assert_eq!(values[1][0], "Acme");
        assert_eq!(values[1][1], "");
    }

    #[test]
    fn test_values_body_empty_table_keeps_header() {
        let table = Table::new(&["week", "client", "project", "hours"]);
        let body = values_body(&table, "Weekly!A1:D");
        let values = body["values"].as_array().unwrap();
        assert_eq!(values.len(), 1);
    }
}
