//! The [`LogEntry`] record and its transport metadata.
//!
//! An entry is immutable once persisted: stores only ever insert or delete
//! it, never update it in place. Construction stamps a fresh time-ordered
//! id and the current instant; no validation beyond shape happens here;
//! arbitrary `details`/`metadata` content is accepted and sanitized at the
//! storage boundary instead.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::category::LogCategory;
use crate::ids::{EntryId, UserId};
use crate::level::LogLevel;

/// Transport-level facts about how an event was observed.
///
/// Known fields are typed; anything else an emitter attaches rides along in
/// the flattened map.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LogMetadata {
    /// Client user agent, when observable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    /// Route or page the event originated from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
    /// HTTP method for API events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    /// HTTP status code for API events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    /// Measured duration in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    /// Error chain / stack text for exception events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
    /// Open extension point for anything not covered above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LogMetadata {
    /// True when no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.user_agent.is_none()
            && self.route.is_none()
            && self.method.is_none()
            && self.status_code.is_none()
            && self.duration_ms.is_none()
            && self.stack.is_none()
            && self.extra.is_empty()
    }
}

/// One immutable record of an event.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    /// Unique within the store for the lifetime of the store.
    pub id: EntryId,
    /// Assigned at creation time, not at write-completion time.
    pub timestamp: DateTime<Utc>,
    /// Severity.
    pub level: LogLevel,
    /// Domain.
    pub category: LogCategory,
    /// Short machine-readable identifier, e.g. `"expense_created"`.
    pub action: String,
    /// Human-readable summary.
    pub message: String,
    /// Acting user; absent for anonymous/system events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    /// Event-specific structured data.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub details: Map<String, Value>,
    /// Transport-level facts.
    #[serde(default, skip_serializing_if = "LogMetadata::is_empty")]
    pub metadata: LogMetadata,
}

impl LogEntry {
    /// Build a fully-populated entry with a fresh id and the current
    /// instant.
    #[must_use]
    pub fn new(
        level: LogLevel,
        category: LogCategory,
        action: impl Into<String>,
        message: impl Into<String>,
        details: Map<String, Value>,
        metadata: LogMetadata,
    ) -> Self {
        Self {
            id: EntryId::new(),
            timestamp: Utc::now(),
            level,
            category,
            action: action.into(),
            message: message.into(),
            user_id: None,
            details,
            metadata,
        }
    }

    /// Attach the acting user.
    #[must_use]
    pub fn with_user(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample() -> LogEntry {
        LogEntry::new(
            LogLevel::Info,
            LogCategory::UserAction,
            "expense_created",
            "User performed: expense_created",
            Map::new(),
            LogMetadata::default(),
        )
    }

    #[test]
    fn new_stamps_id_and_timestamp() {
        let before = Utc::now();
        let entry = sample();
        let after = Utc::now();

        assert!(!entry.id.as_str().is_empty());
        assert!(entry.timestamp >= before - Duration::seconds(1));
        assert!(entry.timestamp <= after + Duration::seconds(1));
        assert_eq!(entry.level, LogLevel::Info);
        assert_eq!(entry.category, LogCategory::UserAction);
        assert_eq!(entry.action, "expense_created");
        assert_eq!(entry.message, "User performed: expense_created");
        assert!(entry.user_id.is_none());
    }

    #[test]
    fn ids_are_unique_across_entries() {
        let a = sample();
        let b = sample();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn timestamps_non_decreasing_in_call_order() {
        let entries: Vec<LogEntry> = (0..20).map(|_| sample()).collect();
        for pair in entries.windows(2) {
            assert!(pair[0].timestamp <= pair[1].timestamp);
        }
    }

    #[test]
    fn serde_camel_case_wire_format() {
        let entry = sample().with_user(UserId::from("u1"));
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["userId"], "u1");
        assert_eq!(json["category"], "USER_ACTION");
        assert_eq!(json["level"], "INFO");
        assert!(json.get("details").is_none(), "empty details are omitted");
    }

    #[test]
    fn serde_roundtrip_preserves_all_fields() {
        let mut details = Map::new();
        let _ = details.insert("amount".into(), serde_json::json!(42));
        let entry = LogEntry::new(
            LogLevel::Error,
            LogCategory::Api,
            "request_failed",
            "POST /expenses",
            details,
            LogMetadata {
                method: Some("POST".into()),
                route: Some("/expenses".into()),
                status_code: Some(500),
                duration_ms: Some(120),
                ..Default::default()
            },
        );
        let json = serde_json::to_string(&entry).unwrap();
        let back: LogEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }

    #[test]
    fn metadata_extra_fields_flatten() {
        let mut meta = LogMetadata::default();
        let _ = meta.extra.insert("region".into(), serde_json::json!("eu"));
        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["region"], "eu");

        let back: LogMetadata = serde_json::from_value(json).unwrap();
        assert_eq!(back.extra["region"], "eu");
    }

    #[test]
    fn metadata_is_empty() {
        assert!(LogMetadata::default().is_empty());
        let meta = LogMetadata {
            route: Some("/budgets".into()),
            ..Default::default()
        };
        assert!(!meta.is_empty());
    }
}
