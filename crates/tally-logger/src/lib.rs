//! Logging facade for the Tally activity log.
//!
//! [`Logger`] is the single entry point call sites use to emit events. It
//! decides whether an entry is processed at all (minimum-level gate),
//! enriches it with ambient context, and fans out to the enabled sinks:
//! - console: one `tracing` event per entry
//! - storage: a write through the configured [`tally_core::LogStorage`]
//!   adapter
//!
//! A storage failure is reported to the console sink and swallowed; the
//! facade's public methods never surface an error. Observability code must
//! not become a new source of application failures.

pub mod config;
pub mod context;
pub mod logger;
pub mod test_utils;

pub use config::{LoggerConfig, LoggerConfigPatch};
pub use context::LogContext;
pub use logger::Logger;
pub use test_utils::{CapturedEvent, CapturedLogs, capture_logs};
