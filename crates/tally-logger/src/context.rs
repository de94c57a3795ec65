//! Ambient context merged into every emitted entry.
//!
//! Context lives on the logger handle, not in a process-global: clones of
//! one handle share it, independent loggers do not, so concurrent sessions
//! each carrying their own handle cannot cross-contaminate. Call sites tied
//! to authentication events set the user on sign-in and MUST clear it on
//! sign-out; nothing resets it automatically, and a stale user id would
//! otherwise leak into subsequent anonymous events.

use serde_json::{Map, Value};

use tally_core::UserId;

/// Ambient key-value state stamped onto entries at creation time.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LogContext {
    /// Acting user, copied into each entry's `user_id`.
    pub user_id: Option<UserId>,
    /// Extra fields, copied into each entry's `details.context`.
    pub fields: Map<String, Value>,
}

impl LogContext {
    /// Context carrying only a user.
    #[must_use]
    pub fn user(user_id: impl Into<UserId>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            ..Default::default()
        }
    }

    /// Add one extra field.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        let _ = self.fields.insert(key.into(), value);
        self
    }

    /// Shallow-merge a patch: a set `user_id` replaces the current one,
    /// patch fields override per-key, everything else is kept.
    pub fn merge(&mut self, patch: Self) {
        if patch.user_id.is_some() {
            self.user_id = patch.user_id;
        }
        self.fields.extend(patch.fields);
    }

    /// True when nothing is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.user_id.is_none() && self.fields.is_empty()
    }
}
