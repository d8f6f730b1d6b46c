//! Persisted user preferences: the auto-refresh flag and the job interval.
//!
//! Values live in a string key/value [`PreferenceStore`] under the keys
//! [`KEY_AUTO_REFRESH`] and [`KEY_SECONDS`]. Missing values are initialised
//! to their defaults and written back on load, so a reload never sees an
//! absent key twice. Every setter writes through immediately.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::error::CoreError;

/// Store key for the auto-refresh flag (`"true"` / `"false"`).
pub const KEY_AUTO_REFRESH: &str = "autoRefresh";

/// Store key for the job interval in whole seconds.
pub const KEY_SECONDS: &str = "seconds";

/// Auto-refresh is off until the user turns it on.
pub const DEFAULT_AUTO_REFRESH: bool = false;

/// Interval handed to newly started jobs.
pub const DEFAULT_INTERVAL_SECS: u32 = 5;

// ---------------------------------------------------------------------------
// PreferenceStore
// ---------------------------------------------------------------------------

/// Origin-scoped string key/value storage.
pub trait PreferenceStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError>;

    fn set(&self, key: &str, value: &str) -> Result<(), CoreError>;
}

/// Ephemeral store, used by tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    values: Mutex<BTreeMap<String, String>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        Ok(lock(&self.values).get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CoreError> {
        lock(&self.values).insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Store backed by a JSON object file.
///
/// The file is read once on open; each `set` rewrites it whole.
#[derive(Debug)]
pub struct FilePreferenceStore {
    path: PathBuf,
    values: Mutex<BTreeMap<String, String>>,
}

impl FilePreferenceStore {
    /// Open the store at `path`. A missing file is an empty store; it is
    /// created (along with parent directories) on the first write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, CoreError> {
        let path = path.into();
        let values = match std::fs::read_to_string(&path) {
            Ok(text) if text.trim().is_empty() => BTreeMap::new(),
            Ok(text) => serde_json::from_str(&text)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }

    fn persist(&self, values: &BTreeMap<String, String>) -> Result<(), CoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let text = serde_json::to_string_pretty(values)?;
        std::fs::write(&self.path, text)?;
        Ok(())
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        Ok(lock(&self.values).get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CoreError> {
        let mut values = lock(&self.values);
        let mut next = values.clone();
        next.insert(key.to_string(), value.to_string());
        self.persist(&next)?;
        *values = next;
        Ok(())
    }
}

/// A poisoned map is still a valid map; keep serving it.
fn lock(values: &Mutex<BTreeMap<String, String>>) -> std::sync::MutexGuard<'_, BTreeMap<String, String>> {
    values.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

// ---------------------------------------------------------------------------
// Preferences
// ---------------------------------------------------------------------------

/// In-memory copy of the persisted preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preferences {
    auto_refresh: bool,
    interval_secs: u32,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            auto_refresh: DEFAULT_AUTO_REFRESH,
            interval_secs: DEFAULT_INTERVAL_SECS,
        }
    }
}

impl Preferences {
    /// Read both preferences, writing back defaults for any that are
    /// missing or unreadable.
    pub fn load(store: &dyn PreferenceStore) -> Result<Self, CoreError> {
        let auto_refresh = match store.get(KEY_AUTO_REFRESH)?.filter(|v| !v.is_empty()) {
            Some(value) => value == "true",
            None => {
                store.set(KEY_AUTO_REFRESH, &DEFAULT_AUTO_REFRESH.to_string())?;
                DEFAULT_AUTO_REFRESH
            }
        };

        let interval_secs = match store.get(KEY_SECONDS)?.as_deref().and_then(parse_interval) {
            Some(secs) => secs,
            None => {
                store.set(KEY_SECONDS, &DEFAULT_INTERVAL_SECS.to_string())?;
                DEFAULT_INTERVAL_SECS
            }
        };

        Ok(Self {
            auto_refresh,
            interval_secs,
        })
    }

    pub fn auto_refresh(&self) -> bool {
        self.auto_refresh
    }

    pub fn interval_secs(&self) -> u32 {
        self.interval_secs
    }

    pub fn set_auto_refresh(
        &mut self,
        store: &dyn PreferenceStore,
        enabled: bool,
    ) -> Result<(), CoreError> {
        store.set(KEY_AUTO_REFRESH, &enabled.to_string())?;
        self.auto_refresh = enabled;
        Ok(())
    }

    pub fn set_interval_secs(
        &mut self,
        store: &dyn PreferenceStore,
        secs: u32,
    ) -> Result<(), CoreError> {
        validate_interval(secs)?;
        store.set(KEY_SECONDS, &secs.to_string())?;
        self.interval_secs = secs;
        Ok(())
    }
}

/// Jobs must run at least once per interval, so zero is rejected.
pub fn validate_interval(secs: u32) -> Result<(), CoreError> {
    if secs == 0 {
        return Err(CoreError::Validation(
            "Interval must be at least 1 second".to_string(),
        ));
    }
    Ok(())
}

fn parse_interval(value: &str) -> Option<u32> {
    value.trim().parse().ok().filter(|secs| *secs > 0)
}
