//! Settings type definitions with compiled defaults.

use serde::{Deserialize, Serialize};

use tally_core::LogLevel;

/// Top-level settings.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TallySettings {
    /// Settings schema version.
    pub version: u32,
    /// Logging subsystem settings.
    pub logging: LoggingSettings,
    /// Log viewer API settings.
    pub viewer: ViewerSettings,
}

/// Logging subsystem settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    /// Minimum severity that will be processed.
    pub level: LogLevel,
    /// Emit entries to the console sink.
    pub console: bool,
    /// Persist entries through the storage adapter.
    pub storage: bool,
    /// Retained entry cap for the in-memory adapter.
    pub memory_cap: usize,
    /// Path of the durable store database.
    pub db_path: String,
    /// Entries older than this many days are removed by cleanup.
    pub retention_days: u32,
    /// How often the cleanup task runs.
    pub cleanup_interval_hours: u64,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            console: true,
            storage: true,
            memory_cap: 1000,
            db_path: default_db_path(),
            retention_days: 30,
            cleanup_interval_hours: 24,
        }
    }
}

/// Log viewer API settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewerSettings {
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Fixed allow-list of admin emails. Empty means the admin surface is
    /// locked.
    pub admin_emails: Vec<String>,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 8787,
            admin_emails: Vec::new(),
        }
    }
}

fn default_db_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_owned());
    format!("{home}/.tally/logs.db")
}
