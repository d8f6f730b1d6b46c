//! Toast notification content.
//!
//! Builders here decide *what* the user is told after each action; the
//! console decides how and for how long it is shown.

use std::time::Duration;

use crate::types::{JobId, StoppedJob};

/// How long a toast stays visible unless a caller overrides it.
pub const DEFAULT_TOAST_TIMEOUT: Duration = Duration::from_millis(5000);

/// Title and body of a transient, dismissible toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub timeout: Duration,
}

impl Notification {
    /// Create a notification with the default timeout.
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            timeout: DEFAULT_TOAST_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Toasts reporting the outcome of a stop-all request.
///
/// An empty response produces exactly one "no active jobs" toast; otherwise
/// there is one toast per job, chosen by its `cancelled` flag.
pub fn stop_all_outcome(stopped: &[StoppedJob]) -> Vec<Notification> {
    if stopped.is_empty() {
        return vec![Notification::new("No Active Jobs", "No active jobs to stop.")];
    }

    stopped
        .iter()
        .map(|job| {
            if job.cancelled {
                Notification::new(
                    "Job Stopped",
                    format!("Successfully stopped job with id {}", job.id),
                )
            } else {
                Notification::new(
                    "Job Not Stopped",
                    format!("Job {} was not successfully stopped.", job.id),
                )
            }
        })
        .collect()
}

/// Toast confirming a newly scheduled job.
pub fn job_started(id: &JobId, interval_secs: u32) -> Notification {
    Notification::new(
        "Job Started",
        format!("Scheduled job with id {id} to run every {interval_secs} seconds."),
    )
}

/// Toast for a failed request: the status code as title, the status text
/// and reason as body.
pub fn request_failed(status: u16, status_text: &str, reason: &str) -> Notification {
    Notification::new(status.to_string(), format!("{status_text}: {reason}"))
}
