//! The [`Logger`] facade.
//!
//! Entries are fully constructed synchronously, context snapshot included,
//! before any asynchronous hand-off, so a context transition during an
//! in-flight storage write can never retroactively change an entry that was
//! already built. The returned future completes when dispatch has
//! completed; call sites that need delivery confirmation await it,
//! fire-and-forget call sites spawn it.

use std::sync::Arc;

use serde_json::{Map, Value};
use tokio::sync::RwLock;
use tracing::warn;

use tally_core::{LogCategory, LogEntry, LogLevel, LogMetadata, LogStorage};

use crate::config::{LoggerConfig, LoggerConfigPatch};
use crate::context::LogContext;

/// Target of console-sink tracing events.
pub const CONSOLE_TARGET: &str = "tally::log";

struct Inner {
    config: RwLock<LoggerConfig>,
    context: RwLock<LogContext>,
}

/// Central facade for emitting log entries.
///
/// Cheap to clone; clones share configuration and ambient context.
#[derive(Clone)]
pub struct Logger {
    inner: Arc<Inner>,
}

impl Logger {
    /// Create a logger with the given configuration and empty context.
    #[must_use]
    pub fn new(config: LoggerConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                config: RwLock::new(config),
                context: RwLock::new(LogContext::default()),
            }),
        }
    }

    /// Merge a partial configuration update (swap the adapter, raise or
    /// lower the minimum level, toggle sinks) at runtime.
    pub async fn update_config(&self, patch: LoggerConfigPatch) {
        self.inner.config.write().await.apply(patch);
    }

    /// Shallow-merge the given keys into the ambient context.
    pub async fn set_context(&self, patch: LogContext) {
        self.inner.context.write().await.merge(patch);
    }

    /// Snapshot of the current ambient context.
    pub async fn get_context(&self) -> LogContext {
        self.inner.context.read().await.clone()
    }

    /// Reset the ambient context to empty. Call sites tied to sign-out must
    /// invoke this so a previous user's identity cannot leak into later
    /// anonymous events.
    pub async fn clear_context(&self) {
        *self.inner.context.write().await = LogContext::default();
    }

    /// Run `fut` with `patch` merged into the context, restoring the
    /// previous context afterwards, including when `fut` resolves to an
    /// error value.
    pub async fn with_context<F, T>(&self, patch: LogContext, fut: F) -> T
    where
        F: Future<Output = T>,
    {
        let previous = {
            let mut ctx = self.inner.context.write().await;
            let previous = ctx.clone();
            ctx.merge(patch);
            previous
        };
        let result = fut.await;
        *self.inner.context.write().await = previous;
        result
    }

    /// Emit one entry.
    ///
    /// A no-op when `level` is strictly below the configured minimum: no
    /// entry is constructed and no sink is invoked. Failures inside
    /// dispatch are reported to the console sink and swallowed; this
    /// method never surfaces an error to the caller.
    pub async fn log(
        &self,
        level: LogLevel,
        category: LogCategory,
        action: impl Into<String> + Send,
        message: impl Into<String> + Send,
        details: Map<String, Value>,
        metadata: LogMetadata,
    ) {
        let (min_level, console, storage, adapter) = {
            let config = self.inner.config.read().await;
            (
                config.min_level,
                config.console,
                config.storage,
                config.adapter.clone(),
            )
        };
        if level < min_level {
            return;
        }

        let context = self.inner.context.read().await.clone();
        let mut entry = LogEntry::new(level, category, action, message, details, metadata);
        entry.user_id = context.user_id;
        if !context.fields.is_empty() {
            let _ = entry
                .details
                .insert("context".to_owned(), Value::Object(context.fields));
        }

        if console {
            emit_console(&entry);
        }
        if storage {
            if let Some(adapter) = adapter {
                if let Err(e) = adapter.write(&entry).await {
                    warn!(error = %e, entry_id = %entry.id, "log entry dropped by storage sink");
                }
            }
        }
    }

    /// Emit at [`LogLevel::Debug`].
    pub async fn debug(
        &self,
        category: LogCategory,
        action: impl Into<String> + Send,
        message: impl Into<String> + Send,
        details: Map<String, Value>,
        metadata: LogMetadata,
    ) {
        self.log(LogLevel::Debug, category, action, message, details, metadata)
            .await;
    }

    /// Emit at [`LogLevel::Info`].
    pub async fn info(
        &self,
        category: LogCategory,
        action: impl Into<String> + Send,
        message: impl Into<String> + Send,
        details: Map<String, Value>,
        metadata: LogMetadata,
    ) {
        self.log(LogLevel::Info, category, action, message, details, metadata)
            .await;
    }

    /// Emit at [`LogLevel::Warn`].
    pub async fn warn(
        &self,
        category: LogCategory,
        action: impl Into<String> + Send,
        message: impl Into<String> + Send,
        details: Map<String, Value>,
        metadata: LogMetadata,
    ) {
        self.log(LogLevel::Warn, category, action, message, details, metadata)
            .await;
    }

    /// Emit at [`LogLevel::Error`].
    pub async fn error(
        &self,
        category: LogCategory,
        action: impl Into<String> + Send,
        message: impl Into<String> + Send,
        details: Map<String, Value>,
        metadata: LogMetadata,
    ) {
        self.log(LogLevel::Error, category, action, message, details, metadata)
            .await;
    }

    // ─────────────────────────────────────────────────────────────────────
    // Domain helpers
    // ─────────────────────────────────────────────────────────────────────

    /// Something a user did: Info / `USER_ACTION`, message
    /// `"User performed: <action>"`.
    pub async fn log_user_action(&self, action: &str, details: Map<String, Value>) {
        self.info(
            LogCategory::UserAction,
            action,
            format!("User performed: {action}"),
            details,
            LogMetadata::default(),
        )
        .await;
    }

    /// An API call outcome: Error when `status_code >= 400`, Info
    /// otherwise; message `"<method> <route>"`; metadata carries
    /// method/route/status/duration.
    pub async fn log_api_call(
        &self,
        method: &str,
        route: &str,
        status_code: u16,
        duration_ms: u64,
        details: Map<String, Value>,
    ) {
        let level = if status_code >= 400 {
            LogLevel::Error
        } else {
            LogLevel::Info
        };
        self.log(
            level,
            LogCategory::Api,
            "api_call",
            format!("{method} {route}"),
            details,
            LogMetadata {
                method: Some(method.to_owned()),
                route: Some(route.to_owned()),
                status_code: Some(status_code),
                duration_ms: Some(duration_ms),
                ..Default::default()
            },
        )
        .await;
    }

    /// A persistence-layer operation: Info / `DATABASE`, message
    /// `"Database <operation> on <table>"`.
    pub async fn log_database_operation(
        &self,
        operation: &str,
        table: &str,
        duration_ms: Option<u64>,
        mut details: Map<String, Value>,
    ) {
        let _ = details.insert("table".to_owned(), Value::String(table.to_owned()));
        self.info(
            LogCategory::Database,
            operation,
            format!("Database {operation} on {table}"),
            details,
            LogMetadata {
                duration_ms,
                ..Default::default()
            },
        )
        .await;
    }

    /// A caught error: Error / `ERROR` / action `"exception"`; the message
    /// is the error's display string, details gain the caller context and
    /// the error's type name, metadata carries the source chain text.
    pub async fn log_error<E>(
        &self,
        error: &E,
        context: Option<&str>,
        mut details: Map<String, Value>,
    ) where
        E: std::error::Error,
    {
        let _ = details.insert(
            "errorType".to_owned(),
            Value::String(std::any::type_name::<E>().to_owned()),
        );
        if let Some(context) = context {
            let _ = details.insert("context".to_owned(), Value::String(context.to_owned()));
        }
        self.error(
            LogCategory::Error,
            "exception",
            error.to_string(),
            details,
            LogMetadata {
                stack: Some(error_chain(error)),
                ..Default::default()
            },
        )
        .await;
    }

    /// A timing measurement: Info / `PERFORMANCE`, message
    /// `"Performance: <action>"`; metadata carries the duration.
    pub async fn log_performance(
        &self,
        action: &str,
        duration_ms: u64,
        details: Map<String, Value>,
    ) {
        self.info(
            LogCategory::Performance,
            action,
            format!("Performance: {action}"),
            details,
            LogMetadata {
                duration_ms: Some(duration_ms),
                ..Default::default()
            },
        )
        .await;
    }

    /// An authentication event: Info on success, Warn on failure;
    /// message `"Auth <action>: success|failed"`.
    pub async fn log_auth(&self, action: &str, success: bool, details: Map<String, Value>) {
        let level = if success { LogLevel::Info } else { LogLevel::Warn };
        let outcome = if success { "success" } else { "failed" };
        self.log(
            level,
            LogCategory::Authentication,
            action,
            format!("Auth {action}: {outcome}"),
            details,
            LogMetadata::default(),
        )
        .await;
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(LoggerConfig::default())
    }
}

/// Render one entry as a console tracing event at the mapped level.
fn emit_console(entry: &LogEntry) {
    let tag = format!("{}: {}", entry.category, entry.action);
    let log_message = entry.message.as_str();
    let details = Value::Object(entry.details.clone()).to_string();
    let metadata = serde_json::to_value(&entry.metadata)
        .map(|v| v.to_string())
        .unwrap_or_default();
    match entry.level {
        LogLevel::Debug => tracing::debug!(
            target: CONSOLE_TARGET,
            log_message, details = %details, metadata = %metadata, "{tag}"
        ),
        LogLevel::Info => tracing::info!(
            target: CONSOLE_TARGET,
            log_message, details = %details, metadata = %metadata, "{tag}"
        ),
        LogLevel::Warn => tracing::warn!(
            target: CONSOLE_TARGET,
            log_message, details = %details, metadata = %metadata, "{tag}"
        ),
        LogLevel::Error => tracing::error!(
            target: CONSOLE_TARGET,
            log_message, details = %details, metadata = %metadata, "{tag}"
        ),
    }
}

/// The error's display string plus its source chain.
fn error_chain<E: std::error::Error>(error: &E) -> String {
    let mut out = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        out.push_str("\ncaused by: ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
