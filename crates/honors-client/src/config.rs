//! Configuration types for honors-client.

use std::time::Duration;

use crate::retry::RetryPolicy;

/// Where the calendar and console services live, and how to call them.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the calendar service (e.g., "https://www.hebcal.com").
    pub calendar_url: String,
    /// Base URL of the honors console (e.g., "http://127.0.0.1:8788").
    pub console_url: String,
    /// Ask the calendar for the Israel reading schedule.
    pub israel: bool,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Retry policy for idempotent reads.
    pub retry: RetryPolicy,
}

impl ClientConfig {
    /// Create a configuration with the given service URLs.
    pub fn new(calendar_url: impl Into<String>, console_url: impl Into<String>) -> Self {
        Self {
            calendar_url: trim_slash(calendar_url.into()),
            console_url: trim_slash(console_url.into()),
            ..Default::default()
        }
    }

    /// Use the Israel reading schedule.
    pub fn with_israel(mut self, israel: bool) -> Self {
        self.israel = israel;
        self
    }

    /// Replace the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Replace the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Calendar leyning endpoint.
    pub fn leyning_url(&self) -> String {
        format!("{}/leyning", self.calendar_url)
    }

    /// Assignment store endpoint.
    pub fn honors_url(&self) -> String {
        format!("{}/api/honors", self.console_url)
    }

    /// Member search endpoint.
    pub fn members_url(&self) -> String {
        format!("{}/api/members", self.console_url)
    }

    /// Reading cycle setting endpoint.
    pub fn reading_cycle_url(&self) -> String {
        format!("{}/api/settings/reading-cycle", self.console_url)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            calendar_url: "https://www.hebcal.com".to_string(),
            console_url: "http://127.0.0.1:8788".to_string(),
            israel: false,
            timeout: Duration::from_secs(10),
            retry: RetryPolicy::default(),
        }
    }
}

fn trim_slash(url: String) -> String {
    url.trim_end_matches('/').to_string()
}
