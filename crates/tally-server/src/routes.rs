//! Router and handlers for the two viewer surfaces.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{delete, get, post};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use tally_core::{EntryId, LogCategory, LogEntry, LogFilter, LogLevel, Page};

use crate::auth::{caller_user, require_admin};
use crate::cleanup::run_cleanup;
use crate::error::ApiError;
use crate::state::AppState;

/// Filter and pagination query parameters, mirroring [`LogFilter`].
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LogQueryParams {
    /// Exact severity match, e.g. `WARN`.
    pub level: Option<String>,
    /// Exact category match, e.g. `USER_ACTION`.
    pub category: Option<String>,
    /// Exact user match (admin surface only; the activity surface binds
    /// this itself).
    pub user_id: Option<String>,
    /// Inclusive lower timestamp bound (RFC 3339).
    pub start: Option<DateTime<Utc>>,
    /// Inclusive upper timestamp bound (RFC 3339).
    pub end: Option<DateTime<Utc>>,
    /// Case-insensitive substring over message/action.
    pub search: Option<String>,
    /// Page size.
    pub limit: Option<usize>,
    /// Rows skipped before the page.
    pub offset: Option<usize>,
}

impl LogQueryParams {
    fn to_filter(&self) -> Result<LogFilter, ApiError> {
        let level = self
            .level
            .as_deref()
            .map(str::parse::<LogLevel>)
            .transpose()
            .map_err(ApiError::BadRequest)?;
        let category = self
            .category
            .as_deref()
            .map(str::parse::<LogCategory>)
            .transpose()
            .map_err(ApiError::BadRequest)?;
        Ok(LogFilter {
            level,
            category,
            user_id: self.user_id.as_deref().map(Into::into),
            start: self.start,
            end: self.end,
            search: self.search.clone(),
        })
    }

    fn page(&self) -> Page {
        let defaults = Page::default();
        Page {
            limit: self.limit.unwrap_or(defaults.limit),
            offset: self.offset.unwrap_or(defaults.offset),
        }
    }
}

/// One page of entries plus the structured-filter total.
///
/// `total` comes from `count`, which ignores the `search` predicate, so it
/// can exceed `entries.len()` when `search` is set.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogPage {
    /// The fetched page.
    pub entries: Vec<LogEntry>,
    /// Total entries matching the structured predicates.
    pub total: u64,
}

/// Build the viewer router over the given state.
pub fn router(state: Arc<AppState>) -> axum::Router {
    axum::Router::new()
        .route("/health", get(health))
        .route("/admin/logs", get(admin_list))
        .route("/admin/logs/cleanup", post(admin_cleanup))
        .route("/admin/logs/{id}", delete(admin_delete))
        .route("/activity", get(activity))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Admin log browser: filter, paginate, count.
async fn admin_list(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(params): Query<LogQueryParams>,
) -> Result<Json<LogPage>, ApiError> {
    require_admin(&headers, &state.settings.viewer.admin_emails)?;
    let filter = params.to_filter()?;
    let entries = state.store.read(&filter, &params.page()).await?;
    let total = state.store.count(&filter).await?;
    Ok(Json(LogPage { entries, total }))
}

/// Delete one entry by id. Idempotent: deleting an unknown id succeeds.
async fn admin_delete(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    require_admin(&headers, &state.settings.viewer.admin_emails)?;
    state.store.delete(&EntryId::from(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Serialize)]
struct CleanupResponse {
    removed: u64,
}

/// Run retention cleanup to exhaustion and report how many rows went.
async fn admin_cleanup(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<CleanupResponse>, ApiError> {
    require_admin(&headers, &state.settings.viewer.admin_emails)?;
    let removed = run_cleanup(&*state.store, state.settings.logging.retention_days).await?;
    Ok(Json(CleanupResponse { removed }))
}

/// Per-user activity view. The `userId` filter is hard-bound to the
/// authenticated caller; a caller can never see another user's rows.
async fn activity(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(params): Query<LogQueryParams>,
) -> Result<Json<LogPage>, ApiError> {
    let caller = caller_user(&headers).ok_or(ApiError::Unauthenticated)?;
    let mut filter = params.to_filter()?;
    filter.user_id = Some(caller);
    let entries = state.store.read(&filter, &params.page()).await?;
    let total = state.store.count(&filter).await?;
    Ok(Json(LogPage { entries, total }))
}
