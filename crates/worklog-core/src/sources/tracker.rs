//! Time-tracking API source
//!
//! Fetches detailed report entries from the tracking service: workspaces are
//! listed and filtered against the configured allow-list, each workspace's
//! client ids are collected, and the detailed report is paged through until
//! exhausted. Rows are filtered to the configured user and normalized into
//! [`TimeEntry`] values, then written back to the day-file cache.

use async_trait::async_trait;
use base64::Engine;
use chrono::{DateTime, FixedOffset, NaiveDate};
use reqwest::{header, Client};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::time::Duration;

use crate::cache::CacheStore;
use crate::config::{read_token, TrackerConfig};
use crate::error::{Error, Result};
use crate::models::{self, DateRange, Source, TimeEntry};
use crate::sources::TimeSource;

/// Detail-report page size fixed by the service
const PAGE_SIZE: i64 = 50;

const MS_PER_HOUR: f64 = 3_600_000.0;

/// Source adapter for the time-tracking web API
pub struct TrackerSource {
    config: TrackerConfig,
    offset: FixedOffset,
    cache: CacheStore,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct Workspace {
    id: i64,
    name: String,
}

#[derive(Debug, Deserialize)]
struct WorkspaceClient {
    id: i64,
}

#[derive(Debug, Deserialize)]
struct DetailsPage {
    total_count: i64,
    data: Vec<DetailRow>,
}

/// One raw row of the detailed report
#[derive(Debug, Deserialize)]
struct DetailRow {
    #[serde(default)]
    description: Option<String>,
    start: String,
    #[serde(default)]
    client: Option<String>,
    #[serde(default)]
    project: Option<String>,
    /// Duration in milliseconds; negative while the timer is still running
    dur: i64,
    uid: i64,
}

impl TrackerSource {
    /// Build the source: reads the token file and prepares an HTTP client
    /// with the auth header baked in.
    pub fn new(config: TrackerConfig, offset: FixedOffset, cache: CacheStore) -> Result<Self> {
        let token = read_token(&config.token_path)?;
        let credentials = format!("{}:api_token", token);
        let encoded = base64::engine::general_purpose::STANDARD.encode(credentials.as_bytes());

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&format!("Basic {}", encoded))
                .map_err(|e| Error::config(format!("invalid API token: {}", e)))?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            config,
            offset,
            cache,
            client,
        })
    }

    async fn workspaces(&self) -> Result<Vec<Workspace>> {
        let url = format!("{}/api/v9/workspaces", self.config.base_url);
        let response = self.client.get(&url).send().await?;
        check_status("workspace listing", &url, response.status())?;
        let all: Vec<Workspace> = response.json().await?;
        Ok(all
            .into_iter()
            .filter(|w| self.config.workspaces.iter().any(|name| name == &w.name))
            .collect())
    }

    async fn client_ids(&self, workspace_id: i64) -> Result<Vec<i64>> {
        let url = format!(
            "{}/api/v9/workspaces/{}/clients",
            self.config.base_url, workspace_id
        );
        let response = self.client.get(&url).send().await?;
        check_status("client listing", &url, response.status())?;
        let clients: Vec<WorkspaceClient> = response.json().await?;
        Ok(clients.into_iter().map(|c| c.id).collect())
    }

    /// Page through the detailed report for one workspace.
    async fn workspace_entries(
        &self,
        workspace: &Workspace,
        client_ids: &[i64],
        range: &DateRange,
    ) -> Result<Vec<TimeEntry>> {
        let url = format!("{}/reports/api/v2/details", self.config.base_url);
        let ids_csv = client_ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");

        let mut rows = Vec::new();
        let mut page: i64 = 1;
        loop {
            log::info!(
                "reading report for {} to {}, workspace {}, page {}",
                range.start,
                range.end,
                workspace.name,
                page
            );
            let response = self
                .client
                .get(&url)
                .query(&[
                    ("page", page.to_string()),
                    ("workspace_id", workspace.id.to_string()),
                    ("since", range.start.format("%Y-%m-%d").to_string()),
                    ("until", range.end.format("%Y-%m-%d").to_string()),
                    ("client_ids", ids_csv.clone()),
                    ("user_agent", self.config.user_agent.clone()),
                ])
                .send()
                .await?;
            check_status("detail report", &url, response.status())?;
            let details: DetailsPage = response.json().await?;

            for raw in &details.data {
                if raw.uid != self.config.user_id {
                    continue;
                }
                rows.push(convert_row(raw, &workspace.name, self.offset)?);
            }

            if details.total_count - page * PAGE_SIZE <= 0 {
                break;
            }
            page += 1;
            tokio::time::sleep(Duration::from_millis(self.config.page_delay_ms)).await;
        }
        Ok(rows)
    }
}

#[async_trait]
impl TimeSource for TrackerSource {
    fn source_name(&self) -> &'static str {
        Source::Api.as_str()
    }

    async fn fetch(&self, range: &DateRange) -> Result<Vec<TimeEntry>> {
        if range.is_empty() {
            return Ok(Vec::new());
        }

        let mut rows = Vec::new();
        for workspace in self.workspaces().await? {
            let client_ids = self.client_ids(workspace.id).await?;
            rows.extend(self.workspace_entries(&workspace, &client_ids, range).await?);
        }

        for date in dates_missing_names(&rows) {
            log::warn!("{} has entries without client or project", date);
        }

        let rows = models::normalize(rows);
        if self.config.write_cache {
            self.cache.write_range(range, &rows)?;
        }
        Ok(rows)
    }
}

fn check_status(what: &str, url: &str, status: reqwest::StatusCode) -> Result<()> {
    if status.is_success() {
        Ok(())
    } else {
        Err(Error::api(format!(
            "{} request to {} failed with HTTP {}",
            what, url, status
        )))
    }
}

/// Map one raw report row onto the canonical schema.
fn convert_row(raw: &DetailRow, workspace: &str, offset: FixedOffset) -> Result<TimeEntry> {
    let start = DateTime::parse_from_rfc3339(&raw.start)
        .map_err(|e| Error::api(format!("unparseable start timestamp {:?}: {}", raw.start, e)))?
        .with_timezone(&offset);
    Ok(TimeEntry::new(
        raw.client.clone(),
        raw.project.clone(),
        raw.dur as f64 / MS_PER_HOUR,
        raw.description.clone().unwrap_or_default(),
        start,
        workspace.to_string(),
        Source::Api,
    ))
}

/// Distinct dates with at least one row lacking a client or project name
fn dates_missing_names(rows: &[TimeEntry]) -> Vec<NaiveDate> {
    rows.iter()
        .filter(|r| r.client.is_none() || r.project.is_none())
        .map(|r| r.date)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
