//! HTTP client for the job log demo server.
//!
//! [`LogService`] names the operations the console performs; [`LogApi`]
//! implements them over `reqwest` against the server's `rest/log/`
//! resource.

pub mod api;
pub mod error;
pub mod service;

pub use api::LogApi;
pub use error::{ErrorReport, LogApiError};
pub use service::LogService;
