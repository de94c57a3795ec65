//! Shared state available to all handlers.

use std::sync::Arc;

use tally_core::LogStorage;
use tally_settings::TallySettings;

/// Store handle and settings shared across the router.
pub struct AppState {
    /// The storage adapter both surfaces read through.
    pub store: Arc<dyn LogStorage>,
    /// Loaded settings (allow-list, retention).
    pub settings: TallySettings,
}

impl AppState {
    /// Create state over a store with the given settings.
    pub fn new(store: Arc<dyn LogStorage>, settings: TallySettings) -> Arc<Self> {
        Arc::new(Self { store, settings })
    }
}
