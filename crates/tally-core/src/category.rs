//! The [`LogCategory`] enum: the closed set of event domains.
//!
//! Categories classify what part of the application an entry belongs to,
//! independent of severity: an authentication event can be informational,
//! a database event can be an error.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Domain of a log entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogCategory {
    /// Something a user did (created an expense, exported a report, ...).
    UserAction,
    /// Internal application lifecycle.
    System,
    /// Caught exceptions and failures.
    Error,
    /// Timing measurements.
    Performance,
    /// Sign-in / sign-out and credential events.
    Authentication,
    /// Persistence-layer operations.
    Database,
    /// Outbound/inbound API calls.
    Api,
}

impl LogCategory {
    /// Wire name, e.g. `"USER_ACTION"`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UserAction => "USER_ACTION",
            Self::System => "SYSTEM",
            Self::Error => "ERROR",
            Self::Performance => "PERFORMANCE",
            Self::Authentication => "AUTHENTICATION",
            Self::Database => "DATABASE",
            Self::Api => "API",
        }
    }

    /// Parse a stored category string, falling back to
    /// [`LogCategory::System`] for anything unrecognized.
    #[must_use]
    pub fn from_str_lossy(s: &str) -> Self {
        s.parse().unwrap_or(Self::System)
    }
}

impl fmt::Display for LogCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "USER_ACTION" => Ok(Self::UserAction),
            "SYSTEM" => Ok(Self::System),
            "ERROR" => Ok(Self::Error),
            "PERFORMANCE" => Ok(Self::Performance),
            "AUTHENTICATION" => Ok(Self::Authentication),
            "DATABASE" => Ok(Self::Database),
            "API" => Ok(Self::Api),
            other => Err(format!("unknown log category: {other}")),
        }
    }
}
