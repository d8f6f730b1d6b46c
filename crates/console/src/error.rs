use joblog_client::LogApiError;
use joblog_core::error::CoreError;

/// Errors that stop the console from starting or running.
///
/// Failures of individual actions never surface here; they are reported to
/// the user as toasts and the console keeps going.
#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    /// A domain-level error from `joblog_core` (preferences, validation).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The log API client could not be constructed.
    #[error(transparent)]
    Api(#[from] LogApiError),
}
