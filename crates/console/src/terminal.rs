//! Line-oriented terminal host for the console.
//!
//! [`TerminalView`] prints every view update as plain text and
//! [`CommandReader`] turns typed commands into [`UiEvent`]s.

use std::io::Write;
use std::sync::{Mutex, MutexGuard, PoisonError};

use joblog_core::formatters::{ROW_CLASS_DANGER, ROW_CLASS_WARNING};
use joblog_core::preferences::Preferences;
use joblog_core::types::LogEntryForm;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};

use crate::events::{EventSource, UiEvent};
use crate::toast::{Toast, ToastId};
use crate::view::{ConsoleView, JobRow, LogRow};

pub const HELP: &str = "\
Commands:
  start                              start a job with the configured interval
  stop-all                           stop every running job
  stop <job-id>                      stop one job
  error                              make the server log an error
  refresh                            reload the log table
  jobs | close-jobs                  open or close the active-jobs table
  json                               show every log entry as raw JSON
  log <LEVEL> [--exception] <msg>    write a log entry
  auto on|off                        toggle auto-refresh
  interval <secs>                    set the job interval
  expand <row> | collapse <row>      open or close a row's details
  dismiss <toast-id>                 remove a toast
  help | quit";

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

pub struct TerminalView<W> {
    out: Mutex<W>,
}

impl<W: Write + Send + 'static> TerminalView<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    fn out(&self) -> MutexGuard<'_, W> {
        self.out.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn print(&self, text: &str) {
        let mut out = self.out();
        if let Err(e) = writeln!(out, "{text}").and_then(|()| out.flush()) {
            tracing::warn!(error = %e, "Failed to write to terminal");
        }
    }
}

impl<W: Write + Send + 'static> ConsoleView for TerminalView<W> {
    fn show_preferences(&self, prefs: &Preferences) {
        let auto = if prefs.auto_refresh() { "on" } else { "off" };
        self.print(&format!(
            "auto-refresh: {auto}, job interval: {}s",
            prefs.interval_secs()
        ));
    }

    fn render_logs(&self, rows: &[LogRow]) {
        if rows.is_empty() {
            self.print("(no log entries)");
            return;
        }
        let mut text = String::new();
        for row in rows {
            let marker = match row.highlight {
                Some(ROW_CLASS_DANGER) => "!!",
                Some(ROW_CLASS_WARNING) => "! ",
                _ => "  ",
            };
            text.push_str(&format!(
                "{marker}{:>4}  {:<12}  {:<7} [{}] ({}) {}\n",
                row.index, row.time, row.level, row.logger_name, row.thread_name, row.message
            ));
        }
        self.print(text.trim_end());
    }

    fn open_detail(&self, index: usize, html: &str) {
        self.print(&format!("  {index:>4} > {}", strip_markup(html)));
    }

    fn close_detail(&self, index: usize) {
        self.print(&format!("  {index:>4} > (collapsed)"));
    }

    fn render_jobs(&self, jobs: &[JobRow]) {
        if jobs.is_empty() {
            self.print("No active jobs.");
            return;
        }
        let mut text = String::from("Active jobs:");
        for job in jobs {
            text.push_str(&format!("\n  {}  (stop {})", job.id, job.id));
        }
        self.print(&text);
    }

    fn remove_job(&self, id: &str) {
        self.print(&format!("Job {id} removed from the jobs table."));
    }

    fn clear_jobs(&self) {
        self.print("Jobs table closed.");
    }

    fn close_log_form(&self) {}

    fn show_raw_json(&self, text: &str) {
        self.print(text);
    }

    fn show_toast(&self, toast: &Toast) {
        self.print(&format!(
            "[{}] {}  (dismiss {})",
            toast.title, toast.body, toast.id
        ));
    }

    fn remove_toast(&self, id: ToastId) {
        tracing::debug!(%id, "Toast removed");
    }
}

/// Plain-text form of detail markup: tags dropped, spans separated by a
/// space and entities decoded.
pub fn strip_markup(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut tag = String::new();
    let mut in_tag = false;

    for c in html.chars() {
        match (in_tag, c) {
            (false, '<') => {
                in_tag = true;
                tag.clear();
            }
            (true, '>') => {
                in_tag = false;
                if tag == "/span" {
                    text.push(' ');
                }
            }
            (true, c) => tag.push(c),
            (false, c) => text.push(c),
        }
    }

    text.trim_end()
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Event(UiEvent),
    Help,
    Empty,
}

pub fn parse_command(line: &str) -> Result<Command, String> {
    let mut words = line.split_whitespace();
    let Some(name) = words.next() else {
        return Ok(Command::Empty);
    };

    let event = match name {
        "help" | "?" => return Ok(Command::Help),
        "quit" | "exit" => UiEvent::Quit,
        "start" => UiEvent::StartJob,
        "stop-all" => UiEvent::StopAll,
        "stop" => UiEvent::StopJob(required(words.next(), "stop <job-id>")?.to_string()),
        "error" => UiEvent::TriggerError,
        "refresh" => UiEvent::Refresh,
        "jobs" => UiEvent::OpenJobs,
        "close-jobs" => UiEvent::CloseJobs,
        "json" => UiEvent::ShowRawJson,
        "log" => {
            let level = required(words.next(), "log <LEVEL> [--exception] <message>")?;
            let mut rest: Vec<&str> = words.collect();
            let add_exception = rest.first() == Some(&"--exception");
            if add_exception {
                rest.remove(0);
            }
            if rest.is_empty() {
                return Err("usage: log <LEVEL> [--exception] <message>".to_string());
            }
            UiEvent::SubmitLogEntry(LogEntryForm::log_message(
                &level.to_ascii_uppercase(),
                &rest.join(" "),
                add_exception,
            ))
        }
        "auto" => match required(words.next(), "auto on|off")? {
            "on" => UiEvent::ToggleAutoRefresh(true),
            "off" => UiEvent::ToggleAutoRefresh(false),
            other => return Err(format!("expected on or off, got {other:?}")),
        },
        "interval" => UiEvent::SetInterval(number(words.next(), "interval <secs>")?),
        "expand" => UiEvent::RowExpanded(number(words.next(), "expand <row>")?),
        "collapse" => UiEvent::RowCollapsed(number(words.next(), "collapse <row>")?),
        "dismiss" => {
            let id = required(words.next(), "dismiss <toast-id>")?;
            let id = id
                .parse::<ToastId>()
                .map_err(|_| format!("not a toast id: {id:?}"))?;
            UiEvent::DismissToast(id)
        }
        other => return Err(format!("unknown command {other:?}, type help")),
    };

    Ok(Command::Event(event))
}

fn required<'a>(word: Option<&'a str>, usage: &str) -> Result<&'a str, String> {
    word.ok_or_else(|| format!("usage: {usage}"))
}

fn number<T: std::str::FromStr>(word: Option<&str>, usage: &str) -> Result<T, String> {
    let word = required(word, usage)?;
    word.parse()
        .map_err(|_| format!("not a number: {word:?} (usage: {usage})"))
}

/// Reads commands line by line; help and parse errors go to stderr.
pub struct CommandReader<R> {
    lines: Lines<R>,
}

impl<R: AsyncBufRead + Unpin + Send> CommandReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }
}

impl<R: AsyncBufRead + Unpin + Send> EventSource for CommandReader<R> {
    async fn next_event(&mut self) -> Option<UiEvent> {
        loop {
            let line = match self.lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => return None,
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to read command");
                    return None;
                }
            };

            match parse_command(&line) {
                Ok(Command::Event(event)) => return Some(event),
                Ok(Command::Help) => eprintln!("{HELP}"),
                Ok(Command::Empty) => {}
                Err(message) => eprintln!("{message}"),
            }
        }
    }
}
