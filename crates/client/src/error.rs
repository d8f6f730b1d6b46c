use joblog_core::notifications::{self, Notification};
use reqwest::StatusCode;

/// Errors from the log REST API layer.
#[derive(Debug, thiserror::Error)]
pub enum LogApiError {
    /// The configured server URL cannot host the log resource.
    #[error("Invalid server URL: {0}")]
    InvalidBaseUrl(String),

    /// The HTTP request itself failed (network, DNS, TLS, body decoding).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server returned a non-2xx status code.
    #[error("Log API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}

/// User-facing summary of a failed request.
///
/// `status` is 0 when no response was received. `status_text` is one of
/// `error`, `timeout` or `parsererror`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReport {
    pub status: u16,
    pub status_text: &'static str,
    pub reason: String,
}

impl ErrorReport {
    /// Single-line form shown in place of content that failed to load.
    pub fn summary(&self) -> String {
        format!("{} {} {}", self.status, self.status_text, self.reason)
    }

    /// Toast announcing the failure.
    pub fn notification(&self) -> Notification {
        notifications::request_failed(self.status, self.status_text, &self.reason)
    }
}

impl LogApiError {
    pub fn report(&self) -> ErrorReport {
        match self {
            LogApiError::InvalidBaseUrl(url) => ErrorReport {
                status: 0,
                status_text: "error",
                reason: format!("Invalid server URL {url}"),
            },
            LogApiError::Request(err) => ErrorReport {
                status: err.status().map(|s| s.as_u16()).unwrap_or(0),
                status_text: if err.is_timeout() {
                    "timeout"
                } else if err.is_decode() {
                    "parsererror"
                } else {
                    "error"
                },
                reason: err.to_string(),
            },
            LogApiError::Api { status, .. } => ErrorReport {
                status: *status,
                status_text: "error",
                reason: StatusCode::from_u16(*status)
                    .ok()
                    .and_then(|s| s.canonical_reason())
                    .unwrap_or("Unknown Status")
                    .to_string(),
            },
        }
    }
}
