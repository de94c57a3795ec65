//! Query predicates and pagination for reading stored entries.
//!
//! Structured predicates (level, category, user, date range) are AND-ed
//! together and every adapter pushes them into its native query path. The
//! free-text `search` predicate is different: it is applied to the already
//! fetched page, after limit/offset, and [`count`](crate::LogStorage::count)
//! ignores it entirely. A page can therefore come back shorter than `limit`
//! while `count` still reports the structured total. Consumers tolerate the
//! divergence; it is preserved observed behavior, not something adapters
//! may quietly repair.

use chrono::{DateTime, Utc};

use crate::category::LogCategory;
use crate::entry::LogEntry;
use crate::ids::{ANONYMOUS_USER, UserId};
use crate::level::LogLevel;

/// Structured predicates plus optional free-text search.
#[derive(Clone, Debug, Default)]
pub struct LogFilter {
    /// Exact severity match.
    pub level: Option<LogLevel>,
    /// Exact category match.
    pub category: Option<LogCategory>,
    /// Exact user match. Filtering by the `"anonymous"` sentinel matches
    /// entries with no user, mirroring how the durable store persists them.
    pub user_id: Option<UserId>,
    /// Inclusive lower timestamp bound.
    pub start: Option<DateTime<Utc>>,
    /// Inclusive upper timestamp bound.
    pub end: Option<DateTime<Utc>>,
    /// Case-insensitive substring match against `message` OR `action`.
    pub search: Option<String>,
}

impl LogFilter {
    /// True when every structured predicate matches (search excluded).
    #[must_use]
    pub fn matches_structured(&self, entry: &LogEntry) -> bool {
        if self.level.is_some_and(|l| l != entry.level) {
            return false;
        }
        if self.category.is_some_and(|c| c != entry.category) {
            return false;
        }
        if let Some(ref user) = self.user_id {
            let entry_user = entry
                .user_id
                .as_ref()
                .map_or(ANONYMOUS_USER, UserId::as_str);
            if entry_user != user.as_str() {
                return false;
            }
        }
        if self.start.is_some_and(|start| entry.timestamp < start) {
            return false;
        }
        if self.end.is_some_and(|end| entry.timestamp > end) {
            return false;
        }
        true
    }

    /// True when `search` is unset/empty or is a case-insensitive substring
    /// of the entry's message or action.
    #[must_use]
    pub fn matches_search(&self, entry: &LogEntry) -> bool {
        match self.search.as_deref() {
            None | Some("") => true,
            Some(needle) => {
                let needle = needle.to_lowercase();
                entry.message.to_lowercase().contains(&needle)
                    || entry.action.to_lowercase().contains(&needle)
            }
        }
    }
}

/// Pagination window for [`read`](crate::LogStorage::read).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Page {
    /// Maximum rows returned (before the search post-filter).
    pub limit: usize,
    /// Matching rows skipped before the window starts.
    pub offset: usize,
}

impl Page {
    /// A window of `limit` rows from the top.
    #[must_use]
    pub fn first(limit: usize) -> Self {
        Self { limit, offset: 0 }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: 100,
            offset: 0,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::LogMetadata;
    use serde_json::Map;

    fn entry(level: LogLevel, category: LogCategory, action: &str, message: &str) -> LogEntry {
        LogEntry::new(level, category, action, message, Map::new(), LogMetadata::default())
    }

    #[test]
    fn empty_filter_matches_everything() {
        let filter = LogFilter::default();
        let e = entry(LogLevel::Debug, LogCategory::System, "boot", "startup");
        assert!(filter.matches_structured(&e));
        assert!(filter.matches_search(&e));
    }

    #[test]
    fn level_predicate_is_exact() {
        let filter = LogFilter {
            level: Some(LogLevel::Warn),
            ..Default::default()
        };
        assert!(filter.matches_structured(&entry(
            LogLevel::Warn,
            LogCategory::System,
            "a",
            "m"
        )));
        assert!(!filter.matches_structured(&entry(
            LogLevel::Error,
            LogCategory::System,
            "a",
            "m"
        )));
    }

    #[test]
    fn predicates_combine_with_and() {
        let filter = LogFilter {
            level: Some(LogLevel::Info),
            category: Some(LogCategory::UserAction),
            ..Default::default()
        };
        assert!(filter.matches_structured(&entry(
            LogLevel::Info,
            LogCategory::UserAction,
            "a",
            "m"
        )));
        // Right level, wrong category.
        assert!(!filter.matches_structured(&entry(
            LogLevel::Info,
            LogCategory::Database,
            "a",
            "m"
        )));
    }

    #[test]
    fn user_predicate_matches_sentinel_for_missing_user() {
        let filter = LogFilter {
            user_id: Some(UserId::from(ANONYMOUS_USER)),
            ..Default::default()
        };
        let anonymous = entry(LogLevel::Info, LogCategory::System, "a", "m");
        assert!(filter.matches_structured(&anonymous));

        let named = anonymous.clone().with_user(UserId::from("u1"));
        assert!(!filter.matches_structured(&named));
    }

    #[test]
    fn date_range_bounds_are_inclusive() {
        let e = entry(LogLevel::Info, LogCategory::System, "a", "m");
        let filter = LogFilter {
            start: Some(e.timestamp),
            end: Some(e.timestamp),
            ..Default::default()
        };
        assert!(filter.matches_structured(&e));

        let past_only = LogFilter {
            end: Some(e.timestamp - chrono::Duration::seconds(1)),
            ..Default::default()
        };
        assert!(!past_only.matches_structured(&e));
    }

    #[test]
    fn search_is_case_insensitive_over_message_and_action() {
        let e = entry(
            LogLevel::Info,
            LogCategory::UserAction,
            "expense_created",
            "User performed: expense_created",
        );
        for needle in ["EXPENSE", "performed", "_created"] {
            let filter = LogFilter {
                search: Some(needle.into()),
                ..Default::default()
            };
            assert!(filter.matches_search(&e), "needle {needle:?} should match");
        }
        let miss = LogFilter {
            search: Some("budget".into()),
            ..Default::default()
        };
        assert!(!miss.matches_search(&e));
    }

    #[test]
    fn search_matches_action_when_message_misses() {
        let e = entry(LogLevel::Info, LogCategory::Database, "budget_sync", "nightly job");
        let filter = LogFilter {
            search: Some("budget".into()),
            ..Default::default()
        };
        assert!(filter.matches_search(&e));
    }

    #[test]
    fn empty_search_matches() {
        let filter = LogFilter {
            search: Some(String::new()),
            ..Default::default()
        };
        assert!(filter.matches_search(&entry(LogLevel::Info, LogCategory::System, "a", "m")));
    }

    #[test]
    fn page_defaults() {
        let page = Page::default();
        assert_eq!(page.limit, 100);
        assert_eq!(page.offset, 0);
        assert_eq!(Page::first(10), Page { limit: 10, offset: 0 });
    }
}
