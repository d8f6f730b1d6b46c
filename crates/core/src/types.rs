//! Wire types exchanged with the `rest/log` API.
//!
//! These are read-only views of server-owned entities. Deserialization is
//! deliberately lenient: a record with missing fields renders as blanks
//! rather than failing the whole table refresh.

use serde::{Deserialize, Serialize};

/// Server-assigned job identifier (e.g. `log-job-3`). Opaque to the client.
pub type JobId = String;

/// One entry of the `POST stop` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoppedJob {
    pub id: JobId,
    #[serde(default)]
    pub cancelled: bool,
}

/// Response of `POST start/{seconds}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobStarted {
    pub id: JobId,
}

/// One entry of the `GET active` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveJob {
    pub id: JobId,
}

/// A single JSON-formatted log line emitted by a job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LogRecord {
    pub timestamp: String,
    pub level: String,
    pub logger_name: String,
    pub thread_name: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack_trace: Option<String>,
}

impl LogRecord {
    /// The stack trace, treating an empty string the same as an absent one.
    pub fn stack_trace(&self) -> Option<&str> {
        self.stack_trace.as_deref().filter(|s| !s.is_empty())
    }
}

/// A single named form control value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub name: String,
    pub value: String,
}

/// The "new log message" form, kept as ordered name/value pairs.
///
/// Serialized as a flat JSON object of strings; a later field with the same
/// name overwrites an earlier one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogEntryForm {
    fields: Vec<FormField>,
}

impl LogEntryForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the form the log-entry dialog submits: level, message and,
    /// when ticked, the `addException` checkbox.
    pub fn log_message(level: &str, message: &str, add_exception: bool) -> Self {
        let form = Self::new()
            .with_field("level", level)
            .with_field("message", message);
        if add_exception {
            form.with_field("addException", "true")
        } else {
            form
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push(FormField {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    /// Serialize the fields into the JSON object posted to the server.
    pub fn to_json(&self) -> serde_json::Value {
        let map = self
            .fields
            .iter()
            .map(|f| (f.name.clone(), serde_json::Value::String(f.value.clone())))
            .collect::<serde_json::Map<_, _>>();
        serde_json::Value::Object(map)
    }
}
