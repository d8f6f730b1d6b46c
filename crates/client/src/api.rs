//! REST client for the `rest/log` job and log endpoints.
//!
//! Wraps the server's HTTP API (job start/stop, log listing, log creation,
//! forced error entries) using [`reqwest`]. Requests are never retried and
//! carry no timeout beyond the client's defaults.

use joblog_core::types::{ActiveJob, JobStarted, LogEntryForm, LogRecord, StoppedJob};
use reqwest::Url;

use crate::error::LogApiError;
use crate::service::LogService;

/// Path of the log resource relative to the server root.
pub const API_PATH: &str = "rest/log/";

/// HTTP client for a single log demo server.
#[derive(Debug, Clone)]
pub struct LogApi {
    client: reqwest::Client,
    /// Absolute URL of the log resource, always ending in `/`.
    base: Url,
}

impl LogApi {
    /// Create a client for the server at `server_url`, e.g.
    /// `http://host:8080/` or `http://host:8080/app/`.
    pub fn new(server_url: &str) -> Result<Self, LogApiError> {
        Self::with_client(reqwest::Client::new(), server_url)
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, server_url: &str) -> Result<Self, LogApiError> {
        let base = resolve_base(server_url)?;
        Ok(Self { client, base })
    }

    /// Absolute URL of the log resource.
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    // ---- private helpers ----

    /// URL of a sub-resource, e.g. `["stop", id]` -> `.../rest/log/stop/{id}`.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, LogApiError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| LogApiError::InvalidBaseUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or a [`LogApiError::Api`]
    /// containing the status and body text on failure.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, LogApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            tracing::warn!(status = status.as_u16(), body = %body, "Log API request failed");
            return Err(LogApiError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, LogApiError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }

    /// Assert the response has a success status code, discarding the body.
    async fn check_status(response: reqwest::Response) -> Result<(), LogApiError> {
        Self::ensure_success(response).await?;
        Ok(())
    }

    async fn post(&self, url: Url) -> Result<reqwest::Response, LogApiError> {
        tracing::debug!(%url, "POST");
        Ok(self.client.post(url).send().await?)
    }

    async fn get(&self, url: Url) -> Result<reqwest::Response, LogApiError> {
        tracing::debug!(%url, "GET");
        Ok(self.client.get(url).send().await?)
    }
}

impl LogService for LogApi {
    async fn stop_all(&self) -> Result<Vec<StoppedJob>, LogApiError> {
        let response = self.post(self.endpoint(&["stop"])?).await?;
        Self::parse_response(response).await
    }

    async fn start_job(&self, interval_secs: u32) -> Result<JobStarted, LogApiError> {
        let secs = interval_secs.to_string();
        let response = self.post(self.endpoint(&["start", &secs])?).await?;
        Self::parse_response(response).await
    }

    async fn trigger_error(&self) -> Result<(), LogApiError> {
        let response = self.get(self.endpoint(&["error"])?).await?;
        Self::check_status(response).await
    }

    async fn create_log(&self, form: &LogEntryForm) -> Result<(), LogApiError> {
        let url = self.base.clone();
        tracing::debug!(%url, fields = form.fields().len(), "POST log entry");
        let response = self.client.post(url).json(&form.to_json()).send().await?;
        Self::check_status(response).await
    }

    async fn list_logs(&self) -> Result<Vec<LogRecord>, LogApiError> {
        let response = self.get(self.base.clone()).await?;
        Self::parse_response(response).await
    }

    async fn list_logs_raw(&self) -> Result<serde_json::Value, LogApiError> {
        let response = self.get(self.base.clone()).await?;
        Self::parse_response(response).await
    }

    async fn active_jobs(&self) -> Result<Vec<ActiveJob>, LogApiError> {
        let response = self.get(self.endpoint(&["active"])?).await?;
        Self::parse_response(response).await
    }

    async fn stop_job(&self, id: &str) -> Result<(), LogApiError> {
        let response = self.post(self.endpoint(&["stop", id])?).await?;
        Self::check_status(response).await
    }
}

/// Join [`API_PATH`] onto the server URL, treating the server URL as a
/// directory even without a trailing slash.
fn resolve_base(server_url: &str) -> Result<Url, LogApiError> {
    let invalid = || LogApiError::InvalidBaseUrl(server_url.to_string());

    let mut root = server_url.trim().to_string();
    if !root.ends_with('/') {
        root.push('/');
    }

    let root = Url::parse(&root).map_err(|_| invalid())?;
    if root.cannot_be_a_base() {
        return Err(invalid());
    }
    root.join(API_PATH).map_err(|_| invalid())
}
