//! The [`LogStorage`] capability contract.
//!
//! Adapters are selected at composition time and injected as
//! `Arc<dyn LogStorage>`; nothing in the logger or the viewer surfaces
//! knows which implementation it is talking to. The contract is async for
//! interface parity: the in-memory adapter resolves immediately, the
//! durable adapter suspends at the I/O boundary.

use async_trait::async_trait;

use crate::entry::LogEntry;
use crate::errors::Result;
use crate::filter::{LogFilter, Page};
use crate::ids::EntryId;

/// Persistence contract for log entries.
#[async_trait]
pub trait LogStorage: Send + Sync {
    /// Append one entry. Always an insert: a duplicate id is an error, and
    /// a failed write is not retried by the adapter itself.
    async fn write(&self, entry: &LogEntry) -> Result<()>;

    /// Entries ordered by `timestamp` descending. Structured predicates and
    /// `offset`/`limit` apply first; the `search` predicate is then applied
    /// to the fetched page, which can shrink it below `limit` even when
    /// more matching rows exist beyond the window.
    async fn read(&self, filter: &LogFilter, page: &Page) -> Result<Vec<LogEntry>>;

    /// Total entries matching the structured predicates. Deliberately does
    /// NOT apply `search`, so `count` and `read` with the same filter may
    /// disagree; consumers must tolerate this.
    async fn count(&self, filter: &LogFilter) -> Result<u64>;

    /// Remove one entry by id. Idempotent: deleting an unknown id is `Ok`.
    async fn delete(&self, id: &EntryId) -> Result<()>;

    /// Remove entries older than `now - retention_days`, in bounded
    /// batches, returning how many were removed. Callers invoke repeatedly
    /// until a call returns 0 to guarantee full cleanup.
    async fn cleanup(&self, retention_days: u32) -> Result<u64>;
}
