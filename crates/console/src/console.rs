//! The log console controller.
//!
//! A [`Console`] is created once per session and owns everything the
//! dashboard needs between events: the loaded preferences, the log table
//! with its expanded detail rows, the auto-refresh timer and the visible
//! toasts. Events that call the server arrive through
//! [`Console::dispatch`], which spawns a handler per event and never waits
//! for it; events that only change local state are applied in order.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use joblog_client::{LogApiError, LogService};
use joblog_core::expansion::ExpandedRows;
use joblog_core::formatters::{detail_formatter, pretty_json};
use joblog_core::notifications::{self, Notification};
use joblog_core::preferences::{PreferenceStore, Preferences};
use joblog_core::types::{LogEntryForm, LogRecord};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::error::ConsoleError;
use crate::events::{EventSource, UiEvent};
use crate::repeating::RepeatingTask;
use crate::toast::{Toast, ToastId, ToastTray};
use crate::view::{ConsoleView, JobRow, LogRow};

/// Period of the auto-refresh timer. Independent of the job interval.
pub const AUTO_REFRESH_PERIOD: Duration = Duration::from_millis(5000);

/// Rows currently shown in the log table and which of them are expanded.
#[derive(Debug, Default)]
struct LogTable {
    records: Vec<LogRecord>,
    expanded: ExpandedRows,
    /// Generation of the refresh that produced `records`.
    generation: u64,
}

pub struct Console<S, V> {
    service: S,
    view: V,
    store: Arc<dyn PreferenceStore>,
    prefs: Mutex<Preferences>,
    table: Mutex<LogTable>,
    refresh_generation: AtomicU64,
    auto_refresh: RepeatingTask,
    toasts: ToastTray,
}

impl<S: LogService, V: ConsoleView> Console<S, V> {
    /// Load preferences, show them, and start polling if auto-refresh was
    /// left on.
    ///
    /// Missing preferences are written back with their defaults.
    pub async fn start(
        service: S,
        view: V,
        store: Arc<dyn PreferenceStore>,
    ) -> Result<Arc<Self>, ConsoleError> {
        let prefs = Preferences::load(store.as_ref())?;
        view.show_preferences(&prefs);

        let console = Arc::new(Self {
            service,
            view,
            store,
            prefs: Mutex::new(prefs),
            table: Mutex::new(LogTable::default()),
            refresh_generation: AtomicU64::new(0),
            auto_refresh: RepeatingTask::new("auto_refresh", AUTO_REFRESH_PERIOD),
            toasts: ToastTray::new(),
        });

        tracing::info!(
            auto_refresh = prefs.auto_refresh(),
            interval_secs = prefs.interval_secs(),
            "Console started",
        );

        if prefs.auto_refresh() {
            console.schedule_auto_refresh().await;
        }

        Ok(console)
    }

    /// Handle `event` on a new task. The returned handle may be awaited
    /// but nothing in the console does so.
    ///
    /// Events that only change console state should go through
    /// [`Console::apply`] instead, so they take effect in order.
    pub fn dispatch(self: &Arc<Self>, event: UiEvent) -> JoinHandle<()> {
        let console = Arc::clone(self);
        tokio::spawn(async move { console.handle(event).await })
    }

    /// Dispatch events from `source` until it runs dry or yields
    /// [`UiEvent::Quit`], then shut down.
    pub async fn run(self: Arc<Self>, mut source: impl EventSource) {
        while let Some(event) = source.next_event().await {
            if event == UiEvent::Quit {
                break;
            }
            if event.is_request() {
                self.dispatch(event);
            } else {
                self.apply(event).await;
            }
        }
        self.shutdown().await;
    }

    /// Handle `event` to completion on the caller's task.
    pub async fn apply(self: &Arc<Self>, event: UiEvent) {
        Arc::clone(self).handle(event).await;
    }

    /// Stop background work owned by the console.
    pub async fn shutdown(&self) {
        self.auto_refresh.stop().await;
        tracing::info!("Console shut down");
    }

    async fn handle(self: Arc<Self>, event: UiEvent) {
        tracing::debug!(?event, "Handling event");
        match event {
            UiEvent::StopAll => self.stop_all().await,
            UiEvent::StartJob => self.start_job().await,
            UiEvent::TriggerError => self.trigger_error().await,
            UiEvent::Refresh => self.refresh_logs().await,
            UiEvent::OpenJobs => self.open_jobs().await,
            UiEvent::CloseJobs => self.view.clear_jobs(),
            UiEvent::SubmitLogEntry(form) => self.submit_log_entry(&form).await,
            UiEvent::ShowRawJson => self.show_raw_json().await,
            UiEvent::StopJob(id) => self.stop_job(&id).await,
            UiEvent::ToggleAutoRefresh(enabled) => self.toggle_auto_refresh(enabled).await,
            UiEvent::SetInterval(secs) => self.set_interval(secs).await,
            UiEvent::RowExpanded(pos) => self.row_expanded(pos).await,
            UiEvent::RowCollapsed(pos) => self.row_collapsed(pos).await,
            UiEvent::DismissToast(id) => self.dismiss_toast(id).await,
            UiEvent::Quit => {}
        }
    }

    // -----------------------------------------------------------------------
    // Jobs
    // -----------------------------------------------------------------------

    async fn stop_all(self: &Arc<Self>) {
        match self.service.stop_all().await {
            Ok(stopped) => {
                tracing::info!(count = stopped.len(), "Stop-all completed");
                for notification in notifications::stop_all_outcome(&stopped) {
                    self.notify(notification).await;
                }
            }
            Err(e) => self.report_error("stop all jobs", &e).await,
        }
    }

    async fn start_job(self: &Arc<Self>) {
        let interval_secs = self.prefs.lock().await.interval_secs();
        match self.service.start_job(interval_secs).await {
            Ok(started) => {
                tracing::info!(job_id = %started.id, interval_secs, "Job started");
                self.refresh_logs().await;
                self.notify(notifications::job_started(&started.id, interval_secs))
                    .await;
            }
            Err(e) => self.report_error("start job", &e).await,
        }
    }

    async fn trigger_error(self: &Arc<Self>) {
        match self.service.trigger_error().await {
            Ok(()) => self.refresh_logs().await,
            Err(e) => self.report_error("trigger error", &e).await,
        }
    }

    async fn open_jobs(self: &Arc<Self>) {
        match self.service.active_jobs().await {
            Ok(jobs) => {
                let rows: Vec<JobRow> = jobs.into_iter().map(|job| JobRow::new(job.id)).collect();
                self.view.render_jobs(&rows);
            }
            Err(e) => self.report_error("list active jobs", &e).await,
        }
    }

    async fn stop_job(&self, id: &str) {
        match self.service.stop_job(id).await {
            Ok(()) => {
                tracing::info!(job_id = %id, "Job stopped");
                self.view.remove_job(id);
            }
            Err(e) => {
                tracing::warn!(job_id = %id, error = %e, "Failed to stop job");
            }
        }
    }

    // -----------------------------------------------------------------------
    // Logs
    // -----------------------------------------------------------------------

    /// Reload the log table, keep expanded detail views attached to the
    /// same records, and restore the scroll position.
    ///
    /// A failed reload leaves the table as it was, and so does a reload
    /// that completes after a later one has already been rendered.
    pub async fn refresh_logs(&self) {
        let generation = self.refresh_generation.fetch_add(1, Ordering::SeqCst) + 1;
        let scroll = self.view.scroll_position();

        let records = match self.service.list_logs().await {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to refresh logs");
                return;
            }
        };

        let rows: Vec<LogRow> = records
            .iter()
            .enumerate()
            .map(|(index, record)| LogRow::from_record(index, record))
            .collect();

        let mut table = self.table.lock().await;
        if generation < table.generation {
            tracing::debug!(
                generation,
                latest = table.generation,
                "Discarding stale log refresh",
            );
            return;
        }
        table.generation = generation;
        self.view.render_logs(&rows);
        for pos in table.expanded.reindex(records.len()) {
            if let Some(record) = records.get(pos) {
                self.view.open_detail(pos, &detail_formatter(pos, record));
            }
        }
        table.records = records;
        drop(table);

        self.view.scroll_to(scroll);
        tracing::debug!(rows = rows.len(), "Log table refreshed");
    }

    async fn submit_log_entry(self: &Arc<Self>, form: &LogEntryForm) {
        let result = self.service.create_log(form).await;
        self.view.close_log_form();
        match result {
            Ok(()) => self.refresh_logs().await,
            Err(e) => self.report_error("create log entry", &e).await,
        }
    }

    async fn show_raw_json(&self) {
        let text = match self.service.list_logs_raw().await {
            Ok(value) => match pretty_json(&value) {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to format raw logs");
                    e.to_string()
                }
            },
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch raw logs");
                e.report().summary()
            }
        };
        self.view.show_raw_json(&text);
    }

    async fn row_expanded(&self, pos: usize) {
        let mut table = self.table.lock().await;
        table.expanded.expand(pos);
        if let Some(record) = table.records.get(pos) {
            self.view.open_detail(pos, &detail_formatter(pos, record));
        }
    }

    async fn row_collapsed(&self, pos: usize) {
        self.table.lock().await.expanded.collapse(pos);
        self.view.close_detail(pos);
    }

    // -----------------------------------------------------------------------
    // Preferences
    // -----------------------------------------------------------------------

    async fn toggle_auto_refresh(self: &Arc<Self>, enabled: bool) {
        if enabled {
            self.schedule_auto_refresh().await;
        } else {
            self.auto_refresh.stop().await;
        }

        let result = self
            .prefs
            .lock()
            .await
            .set_auto_refresh(self.store.as_ref(), enabled);
        if let Err(e) = result {
            tracing::warn!(error = %e, "Failed to persist auto-refresh preference");
            self.notify(Notification::new("Preferences", e.to_string()))
                .await;
        }
    }

    async fn set_interval(self: &Arc<Self>, secs: u32) {
        let mut prefs = self.prefs.lock().await;
        let result = prefs.set_interval_secs(self.store.as_ref(), secs);
        match result {
            Ok(()) => tracing::info!(interval_secs = secs, "Job interval updated"),
            Err(e) => {
                let current = *prefs;
                drop(prefs);
                tracing::warn!(interval_secs = secs, error = %e, "Rejected job interval");
                self.view.show_preferences(&current);
                self.notify(Notification::new("Invalid Interval", e.to_string()))
                    .await;
            }
        }
    }

    /// Start the auto-refresh timer. The timer holds only a weak reference,
    /// so a dropped console stops refreshing.
    async fn schedule_auto_refresh(self: &Arc<Self>) {
        let weak: Weak<Self> = Arc::downgrade(self);
        self.auto_refresh
            .start(move || {
                let weak = weak.clone();
                async move {
                    if let Some(console) = weak.upgrade() {
                        console.refresh_logs().await;
                    }
                }
            })
            .await;
    }

    // -----------------------------------------------------------------------
    // Toasts
    // -----------------------------------------------------------------------

    /// Show a toast and schedule its removal after its timeout.
    async fn notify(self: &Arc<Self>, notification: Notification) {
        let toast = self.toasts.push(notification).await;
        self.view.show_toast(&toast);

        let weak = Arc::downgrade(self);
        let id = toast.id;
        let timeout = toast.timeout;
        tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            if let Some(console) = weak.upgrade() {
                console.dismiss_toast(id).await;
            }
        });
    }

    async fn dismiss_toast(&self, id: ToastId) {
        if self.toasts.remove(id).await.is_some() {
            self.view.remove_toast(id);
        }
    }

    /// Shared failure path for REST actions: log it and raise a toast.
    async fn report_error(self: &Arc<Self>, action: &str, err: &LogApiError) {
        let report = err.report();
        tracing::warn!(
            action,
            status = report.status,
            status_text = report.status_text,
            error = %err,
            "Request failed",
        );
        self.notify(report.notification()).await;
    }

    // -----------------------------------------------------------------------
    // Inspection
    // -----------------------------------------------------------------------

    pub async fn preferences(&self) -> Preferences {
        *self.prefs.lock().await
    }

    pub async fn auto_refresh_running(&self) -> bool {
        self.auto_refresh.is_running().await
    }

    /// Currently expanded row positions, ascending.
    pub async fn expanded_rows(&self) -> Vec<usize> {
        self.table.lock().await.expanded.positions()
    }

    pub async fn active_toasts(&self) -> Vec<Toast> {
        self.toasts.active().await
    }
}
