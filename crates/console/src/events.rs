//! UI events and the sources that produce them.
//!
//! Every control the console reacts to is named here independently of any
//! widget library; a front end translates its own events into [`UiEvent`]s
//! and hands them over through an [`EventSource`].

use std::future::Future;

use joblog_core::types::{JobId, LogEntryForm};
use tokio::sync::mpsc;

use crate::toast::ToastId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// Stop every running job.
    StopAll,
    /// Start a job with the configured interval.
    StartJob,
    /// Ask the server to log an error entry.
    TriggerError,
    /// Reload the log table.
    Refresh,
    /// Open the active-jobs table.
    OpenJobs,
    /// The active-jobs table was closed.
    CloseJobs,
    /// The new-log-entry form was submitted.
    SubmitLogEntry(LogEntryForm),
    /// Show every log entry as raw JSON.
    ShowRawJson,
    /// The Stop action of one jobs-table row was clicked.
    StopJob(JobId),
    /// The auto-refresh checkbox changed.
    ToggleAutoRefresh(bool),
    /// The job interval input changed.
    SetInterval(u32),
    /// A log row's detail view was opened.
    RowExpanded(usize),
    /// A log row's detail view was closed.
    RowCollapsed(usize),
    /// A toast's close button was clicked.
    DismissToast(ToastId),
    /// End the session.
    Quit,
}

impl UiEvent {
    /// Whether handling the event calls the server. All other events only
    /// change console state and must be applied in arrival order.
    pub fn is_request(&self) -> bool {
        matches!(
            self,
            UiEvent::StopAll
                | UiEvent::StartJob
                | UiEvent::TriggerError
                | UiEvent::Refresh
                | UiEvent::OpenJobs
                | UiEvent::SubmitLogEntry(_)
                | UiEvent::ShowRawJson
                | UiEvent::StopJob(_)
        )
    }
}

/// Anything that yields UI events until the session ends.
pub trait EventSource: Send {
    /// The next event, or `None` once the source is exhausted.
    fn next_event(&mut self) -> impl Future<Output = Option<UiEvent>> + Send;
}

impl EventSource for mpsc::Receiver<UiEvent> {
    async fn next_event(&mut self) -> Option<UiEvent> {
        self.recv().await
    }
}

impl EventSource for mpsc::UnboundedReceiver<UiEvent> {
    async fn next_event(&mut self) -> Option<UiEvent> {
        self.recv().await
    }
}
