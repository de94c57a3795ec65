//! Runtime configuration for the [`Logger`](crate::Logger).

use std::fmt;
use std::sync::Arc;

use tally_core::{LogLevel, LogStorage};

/// Sink toggles, minimum level, and the active storage adapter.
#[derive(Clone)]
pub struct LoggerConfig {
    /// Entries strictly below this level are never processed.
    pub min_level: LogLevel,
    /// Emit a `tracing` event per entry.
    pub console: bool,
    /// Persist entries through `adapter`. With no adapter configured this
    /// sink is a silent no-op.
    pub storage: bool,
    /// The active storage adapter, injected at composition time.
    pub adapter: Option<Arc<dyn LogStorage>>,
}

impl LoggerConfig {
    /// Merge a partial update; unset patch fields leave the current value.
    pub fn apply(&mut self, patch: LoggerConfigPatch) {
        if let Some(level) = patch.min_level {
            self.min_level = level;
        }
        if let Some(console) = patch.console {
            self.console = console;
        }
        if let Some(storage) = patch.storage {
            self.storage = storage;
        }
        if let Some(adapter) = patch.adapter {
            self.adapter = adapter;
        }
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            min_level: LogLevel::Info,
            console: true,
            storage: true,
            adapter: None,
        }
    }
}

impl fmt::Debug for LoggerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerConfig")
            .field("min_level", &self.min_level)
            .field("console", &self.console)
            .field("storage", &self.storage)
            .field("adapter", &self.adapter.as_ref().map(|_| "<dyn LogStorage>"))
            .finish()
    }
}

/// Partial configuration update for
/// [`Logger::update_config`](crate::Logger::update_config).
///
/// `None` leaves a field unchanged; for `adapter`, `Some(None)` removes the
/// current adapter and `Some(Some(..))` swaps it.
#[derive(Clone, Default)]
pub struct LoggerConfigPatch {
    /// New minimum level.
    pub min_level: Option<LogLevel>,
    /// New console toggle.
    pub console: Option<bool>,
    /// New storage toggle.
    pub storage: Option<bool>,
    /// New adapter (outer `None` = unchanged).
    pub adapter: Option<Option<Arc<dyn LogStorage>>>,
}

impl LoggerConfigPatch {
    /// Patch only the minimum level.
    #[must_use]
    pub fn level(level: LogLevel) -> Self {
        Self {
            min_level: Some(level),
            ..Default::default()
        }
    }

    /// Patch only the adapter.
    #[must_use]
    pub fn adapter(adapter: Arc<dyn LogStorage>) -> Self {
        Self {
            adapter: Some(Some(adapter)),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = LoggerConfig::default();
        assert_eq!(config.min_level, LogLevel::Info);
        assert!(config.console);
        assert!(config.storage);
        assert!(config.adapter.is_none());
    }

    #[test]
    fn apply_merges_only_set_fields() {
        let mut config = LoggerConfig::default();
        config.apply(LoggerConfigPatch::level(LogLevel::Error));
        assert_eq!(config.min_level, LogLevel::Error);
        assert!(config.console, "untouched fields keep their value");

        config.apply(LoggerConfigPatch {
            console: Some(false),
            ..Default::default()
        });
        assert!(!config.console);
        assert_eq!(config.min_level, LogLevel::Error);
    }

    #[test]
    fn apply_can_remove_adapter() {
        let mut config = LoggerConfig::default();
        config.apply(LoggerConfigPatch {
            adapter: Some(None),
            ..Default::default()
        });
        assert!(config.adapter.is_none());
    }
}
