//! Rendering helpers consumed by the log and jobs tables.
//!
//! All functions are pure. Character offsets count Unicode scalar values,
//! and out-of-range offsets clamp the way JavaScript's `slice` does.

use serde::Serialize;

use crate::error::CoreError;
use crate::types::LogRecord;

/// Total character budget for a message cell that carries a stack trace.
pub const MESSAGE_CELL_MAX_LEN: usize = 80;

/// Bootstrap row class for warning-level records.
pub const ROW_CLASS_WARNING: &str = "table-warning";

/// Bootstrap row class for error-level records.
pub const ROW_CLASS_DANGER: &str = "table-danger";

/// Width the level column is padded to in the detail panel.
const LEVEL_PAD_WIDTH: usize = 5;

/// Start (inclusive) and end (exclusive) of the time-of-day portion of an
/// ISO-8601 timestamp such as `2023-05-01T12:34:56.789Z`.
const TIME_START: usize = 11;
const TIME_END: usize = 23;

/// Markup for the per-row "Stop" action in the jobs table.
pub fn button_formatter() -> &'static str {
    concat!(
        r#"<a class="remove" href="javascript:void(0)" title="Remove">"#,
        r#"<button class="btn btn-small btn-danger">Stop</button>"#,
        "</a>",
    )
}

/// Render a record's full fields for the expandable detail panel.
///
/// The stack-trace span is emitted only when a trace is present.
pub fn detail_formatter(_index: usize, record: &LogRecord) -> String {
    let mut html = String::from(r#"<pre class="text-monospace"><code>"#);
    push_span(&mut html, &record.timestamp);
    push_span(
        &mut html,
        &format!("{:<width$}", record.level, width = LEVEL_PAD_WIDTH),
    );
    push_span(&mut html, &format!("[{}]", record.logger_name));
    push_span(&mut html, &format!("({})", record.thread_name));
    push_span(&mut html, &record.message);
    if let Some(trace) = record.stack_trace() {
        push_span(&mut html, trace);
    }
    html.push_str("</code></pre>");
    html
}

fn push_span(html: &mut String, text: &str) {
    html.push_str(r#"<span class="mx-1">"#);
    html.push_str(&html_escape(text));
    html.push_str("</span>");
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Extract the time of day from a timestamp for the table cell.
pub fn time_formatter(value: &str) -> String {
    value
        .chars()
        .skip(TIME_START)
        .take(TIME_END - TIME_START)
        .collect()
}

/// Map a log level to the row highlight class, if any.
pub fn row_class(level: &str) -> Option<&'static str> {
    match level {
        "WARN" | "WARNING" => Some(ROW_CLASS_WARNING),
        "ERROR" | "SEVERE" | "FATAL" => Some(ROW_CLASS_DANGER),
        _ => None,
    }
}

/// Message cell text: short messages get as much of the stack trace
/// appended as fits in [`MESSAGE_CELL_MAX_LEN`].
pub fn message_formatter(record: &LogRecord) -> String {
    let Some(trace) = record.stack_trace() else {
        return record.message.clone();
    };

    let len = record.message.chars().count();
    if len >= MESSAGE_CELL_MAX_LEN {
        return record.message.clone();
    }

    let tail: String = trace.chars().take(MESSAGE_CELL_MAX_LEN - len).collect();
    format!("{} {}", record.message, tail)
}

/// Serialize any value as tab-indented JSON for the raw log view.
pub fn pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<String, CoreError> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    String::from_utf8(buf).map_err(|e| CoreError::Validation(e.to_string()))
}
