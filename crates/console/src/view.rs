//! The rendering surface the console drives.
//!
//! [`ConsoleView`] is the seam between the controller and whatever draws
//! the widgets: the terminal host in this crate, or a recording fake in
//! tests. View calls are synchronous and must not block.

use joblog_core::formatters::{button_formatter, message_formatter, row_class, time_formatter};
use joblog_core::preferences::Preferences;
use joblog_core::types::{JobId, LogRecord};

use crate::toast::{Toast, ToastId};

/// One row of the log table, already formatted for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRow {
    pub index: usize,
    pub time: String,
    pub level: String,
    pub logger_name: String,
    pub thread_name: String,
    pub message: String,
    /// Row highlight class, if the level warrants one.
    pub highlight: Option<&'static str>,
}

impl LogRow {
    pub fn from_record(index: usize, record: &LogRecord) -> Self {
        Self {
            index,
            time: time_formatter(&record.timestamp),
            level: record.level.clone(),
            logger_name: record.logger_name.clone(),
            thread_name: record.thread_name.clone(),
            message: message_formatter(record),
            highlight: row_class(&record.level),
        }
    }
}

/// One row of the active-jobs table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRow {
    pub id: JobId,
    /// Markup of the per-row Stop action.
    pub action: &'static str,
}

impl JobRow {
    pub fn new(id: impl Into<JobId>) -> Self {
        Self {
            id: id.into(),
            action: button_formatter(),
        }
    }
}

pub trait ConsoleView: Send + Sync + 'static {
    /// Reflect loaded preferences in the auto-refresh and interval controls.
    fn show_preferences(&self, prefs: &Preferences);

    /// Replace the log table contents.
    fn render_logs(&self, rows: &[LogRow]);

    /// Open the detail view under row `index` with the given markup.
    fn open_detail(&self, index: usize, html: &str);

    fn close_detail(&self, index: usize);

    /// Current vertical scroll offset of the log table.
    fn scroll_position(&self) -> u32 {
        0
    }

    fn scroll_to(&self, _position: u32) {}

    /// Replace the active-jobs table contents.
    fn render_jobs(&self, jobs: &[JobRow]);

    /// Remove one row from the active-jobs table.
    fn remove_job(&self, id: &str);

    fn clear_jobs(&self);

    /// Close the new-log-entry form.
    fn close_log_form(&self);

    /// Show text in the raw JSON panel.
    fn show_raw_json(&self, text: &str);

    fn show_toast(&self, toast: &Toast);

    fn remove_toast(&self, id: ToastId);
}
