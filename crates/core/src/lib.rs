//! Domain types and pure helpers for the job log console.
//!
//! Nothing in this crate performs network I/O: it holds the wire types of
//! the `rest/log` API, the table rendering helpers, notification texts,
//! persisted preferences, and the expanded-row bookkeeping.

pub mod error;
pub mod expansion;
pub mod formatters;
pub mod notifications;
pub mod preferences;
pub mod types;
