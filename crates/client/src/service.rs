//! The operations the console needs from the log server.
//!
//! [`LogApi`](crate::api::LogApi) is the HTTP implementation; tests and
//! embedders can substitute their own.

use std::future::Future;

use joblog_core::types::{ActiveJob, JobStarted, LogEntryForm, LogRecord, StoppedJob};

use crate::error::LogApiError;

pub trait LogService: Send + Sync + 'static {
    /// `POST stop`: cancel every running job.
    fn stop_all(&self) -> impl Future<Output = Result<Vec<StoppedJob>, LogApiError>> + Send;

    /// `POST start/{interval_secs}`: schedule a job logging every interval.
    fn start_job(
        &self,
        interval_secs: u32,
    ) -> impl Future<Output = Result<JobStarted, LogApiError>> + Send;

    /// `GET error`: make the server emit an error-level entry.
    fn trigger_error(&self) -> impl Future<Output = Result<(), LogApiError>> + Send;

    /// `POST` to the collection: write a log entry from the form fields.
    fn create_log(
        &self,
        form: &LogEntryForm,
    ) -> impl Future<Output = Result<(), LogApiError>> + Send;

    /// `GET` the collection as typed records.
    fn list_logs(&self) -> impl Future<Output = Result<Vec<LogRecord>, LogApiError>> + Send;

    /// `GET` the collection exactly as the server sent it.
    fn list_logs_raw(&self) -> impl Future<Output = Result<serde_json::Value, LogApiError>> + Send;

    /// `GET active`: ids of the running jobs.
    fn active_jobs(&self) -> impl Future<Output = Result<Vec<ActiveJob>, LogApiError>> + Send;

    /// `POST stop/{id}`: cancel a single job.
    fn stop_job(&self, id: &str) -> impl Future<Output = Result<(), LogApiError>> + Send;
}
