//! Bounded in-memory adapter.
//!
//! A newest-first ring capped at a maximum entry count: writes past the cap
//! silently discard the oldest rows. State is process-local and lost on
//! restart, and `write` never fails for connectivity reasons; this is the
//! development and test profile adapter. Operations complete synchronously
//! under a mutex and are exposed through the async contract for parity with
//! the durable adapter.

use std::collections::VecDeque;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use parking_lot::Mutex;

use tally_core::{EntryId, LogEntry, LogFilter, LogStorage, Page, Result, StorageError};

/// Default maximum number of retained entries.
pub const DEFAULT_CAP: usize = 1000;

/// Bounded newest-first in-memory log store.
pub struct MemoryLogStore {
    cap: usize,
    entries: Mutex<VecDeque<LogEntry>>,
}

impl MemoryLogStore {
    /// Create a store retaining at most `cap` entries.
    #[must_use]
    pub fn with_cap(cap: usize) -> Self {
        Self {
            cap,
            entries: Mutex::new(VecDeque::new()),
        }
    }

    /// Current number of retained entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// True when nothing is retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl Default for MemoryLogStore {
    fn default() -> Self {
        Self::with_cap(DEFAULT_CAP)
    }
}

#[async_trait]
impl LogStorage for MemoryLogStore {
    async fn write(&self, entry: &LogEntry) -> Result<()> {
        let mut entries = self.entries.lock();
        if entries.iter().any(|e| e.id == entry.id) {
            return Err(StorageError::DuplicateId(entry.id.to_string()));
        }
        entries.push_front(entry.clone());
        entries.truncate(self.cap);
        Ok(())
    }

    async fn read(&self, filter: &LogFilter, page: &Page) -> Result<Vec<LogEntry>> {
        let entries = self.entries.lock();
        let mut matching: Vec<LogEntry> = entries
            .iter()
            .filter(|e| filter.matches_structured(e))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        // Search narrows the page after pagination, same as the durable
        // adapter: the window can come back shorter than `limit`.
        Ok(matching
            .into_iter()
            .skip(page.offset)
            .take(page.limit)
            .filter(|e| filter.matches_search(e))
            .collect())
    }

    async fn count(&self, filter: &LogFilter) -> Result<u64> {
        let entries = self.entries.lock();
        Ok(entries
            .iter()
            .filter(|e| filter.matches_structured(e))
            .count() as u64)
    }

    async fn delete(&self, id: &EntryId) -> Result<()> {
        let mut entries = self.entries.lock();
        entries.retain(|e| e.id != *id);
        Ok(())
    }

    async fn cleanup(&self, retention_days: u32) -> Result<u64> {
        let cutoff = Utc::now() - Duration::days(i64::from(retention_days));
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|e| e.timestamp >= cutoff);
        Ok((before - entries.len()) as u64)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
