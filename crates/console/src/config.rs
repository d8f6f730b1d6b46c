use std::path::PathBuf;

/// Console configuration loaded from environment variables.
///
/// All fields have defaults suitable for a server running locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    /// Root URL of the log demo server (default: `http://localhost:8080/`).
    pub server_url: String,
    /// File holding the persisted preferences
    /// (default: `.joblog/preferences.json`).
    pub preferences_path: PathBuf,
}

impl ConsoleConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default                     |
    /// |---------------------------|-----------------------------|
    /// | `JOBLOG_SERVER_URL`       | `http://localhost:8080/`    |
    /// | `JOBLOG_PREFERENCES_PATH` | `.joblog/preferences.json`  |
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let server_url = lookup("JOBLOG_SERVER_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| "http://localhost:8080/".into());

        let preferences_path = lookup("JOBLOG_PREFERENCES_PATH")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(".joblog/preferences.json"));

        Self {
            server_url,
            preferences_path,
        }
    }
}
