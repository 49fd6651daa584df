//! Liturgical calendar client.

use std::time::Duration;

use honors_core::{DateRange, ReadingItem};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::ClientError;

/// Leyning response envelope. Items are parsed one by one so a single
/// malformed entry does not hide the rest.
#[derive(Debug, Deserialize)]
struct RawCalendarResponse {
    #[serde(default)]
    range: Option<DateRange>,
    #[serde(default)]
    items: Vec<serde_json::Value>,
}

/// Reading items for a requested range.
#[derive(Debug, Clone)]
pub struct CalendarResponse {
    /// Range the calendar reports, or the requested one.
    pub range: DateRange,
    pub items: Vec<ReadingItem>,
}

/// Client for the calendar's leyning endpoint.
#[derive(Clone)]
pub struct CalendarClient {
    http: Client,
    config: ClientConfig,
}

impl CalendarClient {
    /// Create a client with its own HTTP connection pool.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let http = build_http(config.timeout)?;
        Ok(Self::with_http(http, config))
    }

    /// Create a client that shares an existing HTTP client.
    pub fn with_http(http: Client, config: ClientConfig) -> Self {
        Self { http, config }
    }

    /// Fetch readings for an inclusive range.
    ///
    /// Items dated outside the range are dropped. Transport failures and
    /// 5xx answers are retried per the configured policy.
    pub async fn leyning(&self, range: DateRange) -> Result<CalendarResponse, ClientError> {
        let raw = self
            .config
            .retry
            .run("Calendar fetch", || self.fetch_once(range))
            .await?;

        let items = raw
            .items
            .into_iter()
            .filter_map(|value| match serde_json::from_value::<ReadingItem>(value) {
                Ok(item) => Some(item),
                Err(e) => {
                    warn!("Skipping unparseable reading item: {}", e);
                    None
                }
            })
            .filter(|item| range.contains(item.date))
            .collect();

        Ok(CalendarResponse {
            range: raw.range.unwrap_or(range),
            items,
        })
    }

    /// Reading items for an inclusive range.
    pub async fn readings(&self, range: DateRange) -> Result<Vec<ReadingItem>, ClientError> {
        Ok(self.leyning(range).await?.items)
    }

    /// Get the configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn fetch_once(&self, range: DateRange) -> Result<RawCalendarResponse, ClientError> {
        let url = self.config.leyning_url();
        let start = range.start.format("%Y-%m-%d").to_string();
        let end = range.end.format("%Y-%m-%d").to_string();
        let israel = if self.config.israel { "on" } else { "off" };
        debug!("Calendar fetch: {} ({}..{})", url, start, end);

        let response = self
            .http
            .get(&url)
            .query(&[
                ("cfg", "json"),
                ("start", start.as_str()),
                ("end", end.as_str()),
                ("i", israel),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(response.json().await?)
    }
}

impl std::fmt::Debug for CalendarClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CalendarClient")
            .field("calendar_url", &self.config.calendar_url)
            .field("israel", &self.config.israel)
            .finish()
    }
}

pub(crate) fn build_http(timeout: Duration) -> Result<Client, ClientError> {
    Client::builder()
        .user_agent(concat!("honors-console/", env!("CARGO_PKG_VERSION")))
        .timeout(timeout)
        .build()
        .map_err(ClientError::Http)
}
