#![allow(dead_code)]

use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use joblog_client::{LogApiError, LogService};
use joblog_core::preferences::{PreferenceStore, Preferences};
use joblog_core::types::{ActiveJob, JobStarted, LogEntryForm, LogRecord, StoppedJob};
use joblog_console::toast::{Toast, ToastId};
use joblog_console::view::{ConsoleView, JobRow, LogRow};

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// In-memory [`LogService`] with canned responses and a call log.
#[derive(Clone, Default)]
pub struct FakeService {
    inner: Arc<FakeInner>,
}

#[derive(Default)]
struct FakeInner {
    calls: Mutex<Vec<String>>,
    stopped: Mutex<Vec<StoppedJob>>,
    records: Mutex<Vec<LogRecord>>,
    active: Mutex<Vec<ActiveJob>>,
    created: Mutex<Vec<LogEntryForm>>,
    failing: Mutex<HashSet<&'static str>>,
    list_delays: Mutex<VecDeque<Duration>>,
}

impl FakeService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_stopped(&self, stopped: Vec<StoppedJob>) {
        *self.inner.stopped.lock().unwrap() = stopped;
    }

    pub fn set_records(&self, records: Vec<LogRecord>) {
        *self.inner.records.lock().unwrap() = records;
    }

    pub fn set_active(&self, ids: &[&str]) {
        *self.inner.active.lock().unwrap() = ids
            .iter()
            .map(|id| ActiveJob { id: id.to_string() })
            .collect();
    }

    /// Delay the next `list_logs` responses, one entry per call. The
    /// records are captured when the call starts.
    pub fn delay_list_logs(&self, delays: impl IntoIterator<Item = Duration>) {
        self.inner.list_delays.lock().unwrap().extend(delays);
    }

    /// Make every later call of `operation` fail with a 500.
    pub fn fail(&self, operation: &'static str) {
        self.inner.failing.lock().unwrap().insert(operation);
    }

    pub fn calls(&self) -> Vec<String> {
        self.inner.calls.lock().unwrap().clone()
    }

    /// How many times `operation` was called.
    pub fn count(&self, operation: &str) -> usize {
        self.calls()
            .iter()
            .filter(|call| call.split_whitespace().next() == Some(operation))
            .count()
    }

    pub fn created(&self) -> Vec<LogEntryForm> {
        self.inner.created.lock().unwrap().clone()
    }

    fn call(&self, operation: &'static str, args: &str) -> Result<(), LogApiError> {
        let entry = if args.is_empty() {
            operation.to_string()
        } else {
            format!("{operation} {args}")
        };
        self.inner.calls.lock().unwrap().push(entry);

        if self.inner.failing.lock().unwrap().contains(operation) {
            return Err(LogApiError::Api {
                status: 500,
                body: "fake failure".to_string(),
            });
        }
        Ok(())
    }
}

impl LogService for FakeService {
    async fn stop_all(&self) -> Result<Vec<StoppedJob>, LogApiError> {
        self.call("stop_all", "")?;
        Ok(self.inner.stopped.lock().unwrap().clone())
    }

    async fn start_job(&self, interval_secs: u32) -> Result<JobStarted, LogApiError> {
        self.call("start_job", &interval_secs.to_string())?;
        Ok(JobStarted {
            id: "log-job-7".to_string(),
        })
    }

    async fn trigger_error(&self) -> Result<(), LogApiError> {
        self.call("trigger_error", "")
    }

    async fn create_log(&self, form: &LogEntryForm) -> Result<(), LogApiError> {
        self.call("create_log", "")?;
        self.inner.created.lock().unwrap().push(form.clone());
        Ok(())
    }

    async fn list_logs(&self) -> Result<Vec<LogRecord>, LogApiError> {
        self.call("list_logs", "")?;
        let records = self.inner.records.lock().unwrap().clone();
        let delay = self.inner.list_delays.lock().unwrap().pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok(records)
    }

    async fn list_logs_raw(&self) -> Result<serde_json::Value, LogApiError> {
        self.call("list_logs_raw", "")?;
        Ok(serde_json::to_value(&*self.inner.records.lock().unwrap()).unwrap())
    }

    async fn active_jobs(&self) -> Result<Vec<ActiveJob>, LogApiError> {
        self.call("active_jobs", "")?;
        Ok(self.inner.active.lock().unwrap().clone())
    }

    async fn stop_job(&self, id: &str) -> Result<(), LogApiError> {
        self.call("stop_job", id)
    }
}

/// `count` INFO records numbered from zero, every fourth one an ERROR.
pub fn records(count: usize) -> Vec<LogRecord> {
    (0..count)
        .map(|n| LogRecord {
            timestamp: format!("2023-05-01T12:00:{:02}.000Z", n % 60),
            level: if n % 4 == 3 { "ERROR" } else { "INFO" }.to_string(),
            logger_name: "org.example.ScheduledLogger".to_string(),
            thread_name: "worker-1".to_string(),
            message: format!("Log number {n}"),
            stack_trace: None,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// View
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum ViewCall {
    Preferences(Preferences),
    Logs(Vec<LogRow>),
    OpenDetail(usize, String),
    CloseDetail(usize),
    ScrollTo(u32),
    Jobs(Vec<JobRow>),
    RemoveJob(String),
    ClearJobs,
    CloseLogForm,
    RawJson(String),
    Toast(Toast),
    RemoveToast(ToastId),
}

/// [`ConsoleView`] that records every call for later assertions.
#[derive(Clone, Default)]
pub struct RecordingView {
    calls: Arc<Mutex<Vec<ViewCall>>>,
    scroll: Arc<Mutex<u32>>,
}

impl RecordingView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_scroll(&self, position: u32) {
        *self.scroll.lock().unwrap() = position;
    }

    pub fn calls(&self) -> Vec<ViewCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// `(title, body)` of every toast shown, in order.
    pub fn toasts(&self) -> Vec<(String, String)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ViewCall::Toast(toast) => Some((toast.title, toast.body)),
                _ => None,
            })
            .collect()
    }

    /// Row indices whose detail view was opened, in order.
    pub fn opened_details(&self) -> Vec<usize> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ViewCall::OpenDetail(index, _) => Some(index),
                _ => None,
            })
            .collect()
    }

    pub fn last_logs(&self) -> Option<Vec<LogRow>> {
        self.calls().into_iter().rev().find_map(|call| match call {
            ViewCall::Logs(rows) => Some(rows),
            _ => None,
        })
    }

    pub fn raw_json(&self) -> Option<String> {
        self.calls().into_iter().rev().find_map(|call| match call {
            ViewCall::RawJson(text) => Some(text),
            _ => None,
        })
    }

    fn push(&self, call: ViewCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl ConsoleView for RecordingView {
    fn show_preferences(&self, prefs: &Preferences) {
        self.push(ViewCall::Preferences(*prefs));
    }

    fn render_logs(&self, rows: &[LogRow]) {
        self.push(ViewCall::Logs(rows.to_vec()));
    }

    fn open_detail(&self, index: usize, html: &str) {
        self.push(ViewCall::OpenDetail(index, html.to_string()));
    }

    fn close_detail(&self, index: usize) {
        self.push(ViewCall::CloseDetail(index));
    }

    fn scroll_position(&self) -> u32 {
        *self.scroll.lock().unwrap()
    }

    fn scroll_to(&self, position: u32) {
        self.push(ViewCall::ScrollTo(position));
    }

    fn render_jobs(&self, jobs: &[JobRow]) {
        self.push(ViewCall::Jobs(jobs.to_vec()));
    }

    fn remove_job(&self, id: &str) {
        self.push(ViewCall::RemoveJob(id.to_string()));
    }

    fn clear_jobs(&self) {
        self.push(ViewCall::ClearJobs);
    }

    fn close_log_form(&self) {
        self.push(ViewCall::CloseLogForm);
    }

    fn show_raw_json(&self, text: &str) {
        self.push(ViewCall::RawJson(text.to_string()));
    }

    fn show_toast(&self, toast: &Toast) {
        self.push(ViewCall::Toast(toast.clone()));
    }

    fn remove_toast(&self, id: ToastId) {
        self.push(ViewCall::RemoveToast(id));
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

pub fn memory_store() -> Arc<dyn PreferenceStore> {
    Arc::new(joblog_core::preferences::MemoryPreferenceStore::new())
}

/// Let spawned tasks run without advancing paused time.
pub async fn settle() {
    for _ in 0..50 {
        tokio::task::yield_now().await;
    }
}

pub const TOAST_TIMEOUT: Duration = joblog_core::notifications::DEFAULT_TOAST_TIMEOUT;
