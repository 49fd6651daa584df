//! Client for the honors console REST surface.

use async_trait::async_trait;
use chrono::NaiveDate;
use honors_core::{
    Assignment, DateRange, HonorsError, HonorsSource, MemberSummary, ReadingCycleConfig,
    ReadingItem, SaveRequest, SaveResponse,
};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::calendar::{build_http, CalendarClient};
use crate::config::ClientConfig;
use crate::error::ClientError;

/// Client for member search, the reading cycle setting and the assignment store.
#[derive(Clone)]
pub struct ConsoleClient {
    http: Client,
    config: ClientConfig,
    calendar: CalendarClient,
}

impl ConsoleClient {
    /// Create a client. The calendar client shares the same connection pool.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        if config.console_url.is_empty() {
            return Err(ClientError::Config("console URL is empty".to_string()));
        }
        let http = build_http(config.timeout)?;
        let calendar = CalendarClient::with_http(http.clone(), config.clone());
        Ok(Self {
            http,
            config,
            calendar,
        })
    }

    /// Get the calendar client.
    pub fn calendar(&self) -> &CalendarClient {
        &self.calendar
    }

    /// Get the configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Search members, returning at most `limit`.
    pub async fn search_members(
        &self,
        limit: usize,
        query: Option<&str>,
    ) -> Result<Vec<MemberSummary>, ClientError> {
        let url = self.config.members_url();
        let limit = limit.to_string();
        self.config
            .retry
            .run("Member search", || async {
                let mut request = self.http.get(&url).query(&[("limit", limit.as_str())]);
                if let Some(q) = query {
                    request = request.query(&[("q", q)]);
                }
                debug!("Member search: {}", url);
                read_json(request.send().await?).await
            })
            .await
    }

    /// Fetch the reading cycle setting.
    pub async fn reading_cycle_config(&self) -> Result<ReadingCycleConfig, ClientError> {
        let url = self.config.reading_cycle_url();
        self.config
            .retry
            .run("Reading cycle fetch", || async {
                debug!("Reading cycle fetch: {}", url);
                read_json(self.http.get(&url).send().await?).await
            })
            .await
    }

    /// Saved assignments for a date.
    ///
    /// A non-success answer means nothing is saved yet and yields an empty
    /// list; only transport failures are errors.
    pub async fn load(&self, date: NaiveDate) -> Result<Vec<Assignment>, ClientError> {
        let url = self.config.honors_url();
        let date = date.format("%Y-%m-%d").to_string();
        self.config
            .retry
            .run("Assignment load", || async {
                debug!("Assignment load: {} ({})", url, date);
                let response = self
                    .http
                    .get(&url)
                    .query(&[("date", date.as_str())])
                    .send()
                    .await?;
                if !response.status().is_success() {
                    warn!(
                        status = %response.status(),
                        date = %date,
                        "Assignment load returned non-success, treating as empty"
                    );
                    return Ok(Vec::new());
                }
                Ok(response.json().await?)
            })
            .await
    }

    /// Replace every assignment for `date` with `assignments`. Not retried.
    pub async fn save(
        &self,
        date: NaiveDate,
        assignments: &[Assignment],
    ) -> Result<(), ClientError> {
        let url = self.config.honors_url();
        let body = SaveRequest {
            date,
            assignments: assignments.to_vec(),
        };
        debug!("Assignment save: {} ({} honors)", url, assignments.len());

        let response = self.http.post(&url).json(&body).send().await?;
        let status = response.status();
        let text = response.text().await.unwrap_or_default();

        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                message: failure_message(&text).unwrap_or_else(|| {
                    let body = text.trim();
                    if body.is_empty() {
                        format!("HTTP {}", status)
                    } else {
                        body.to_string()
                    }
                }),
            });
        }

        match serde_json::from_str::<SaveResponse>(&text) {
            Ok(reply) if !reply.success => Err(ClientError::Status {
                status: status.as_u16(),
                message: reply.message.unwrap_or_else(|| "Save failed".to_string()),
            }),
            _ => {
                info!(date = %date, honors = assignments.len(), "Assignments saved");
                Ok(())
            }
        }
    }
}

impl std::fmt::Debug for ConsoleClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleClient")
            .field("console_url", &self.config.console_url)
            .field("calendar", &self.calendar)
            .finish()
    }
}

#[async_trait]
impl HonorsSource for ConsoleClient {
    async fn readings(&self, range: DateRange) -> Result<Vec<ReadingItem>, HonorsError> {
        self.calendar
            .readings(range)
            .await
            .map_err(|e| HonorsError::unavailable("calendar", e.to_string()))
    }

    async fn members(&self, limit: usize) -> Result<Vec<MemberSummary>, HonorsError> {
        self.search_members(limit, None)
            .await
            .map_err(|e| HonorsError::unavailable("member search", e.to_string()))
    }

    async fn reading_cycle(&self) -> Result<ReadingCycleConfig, HonorsError> {
        self.reading_cycle_config()
            .await
            .map_err(|e| HonorsError::unavailable("reading cycle", e.to_string()))
    }

    async fn load_assignments(&self, date: NaiveDate) -> Result<Vec<Assignment>, HonorsError> {
        self.load(date)
            .await
            .map_err(|e| HonorsError::unavailable("assignment store", e.to_string()))
    }

    async fn save_assignments(
        &self,
        date: NaiveDate,
        assignments: &[Assignment],
    ) -> Result<(), HonorsError> {
        match self.save(date, assignments).await {
            Ok(()) => Ok(()),
            Err(err @ ClientError::Status { .. }) => Err(HonorsError::Rejected(err.server_message())),
            Err(err) => Err(HonorsError::unavailable("assignment store", err.to_string())),
        }
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ClientError::Status {
            status: status.as_u16(),
            message: failure_message(&body).unwrap_or(body),
        });
    }
    Ok(response.json().await?)
}

/// Pull `message` or `error` out of a JSON failure body.
fn failure_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .or_else(|| value.get("error"))
        .and_then(|m| m.as_str())
        .map(str::to_string)
}
