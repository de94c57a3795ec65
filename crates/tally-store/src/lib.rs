//! Storage adapters for the Tally activity log.
//!
//! Two implementations of the [`tally_core::LogStorage`] contract:
//! - [`MemoryLogStore`]: bounded newest-first ring, process-local, lost on
//!   restart; the development and test profile adapter.
//! - [`SqliteLogStore`]: durable document table over `SQLite` with WAL
//!   mode, covering indexes, and defensive deserialization.
//!
//! Which one backs the logger is decided at composition time; both are
//! handed around as `Arc<dyn LogStorage>`.

pub mod memory;
pub mod schema;
pub mod sqlite;

pub use memory::MemoryLogStore;
pub use sqlite::SqliteLogStore;
