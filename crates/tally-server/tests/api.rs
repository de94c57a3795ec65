//! Router-level tests for the viewer surfaces.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Map, Value};
use tower::ServiceExt;

use tally_core::{LogCategory, LogEntry, LogLevel, LogMetadata, LogStorage, UserId};
use tally_server::{AppState, router};
use tally_settings::{TallySettings, ViewerSettings};
use tally_store::MemoryLogStore;

const ADMIN: &str = "ops@tally.app";

async fn seed(store: &MemoryLogStore) {
    for (action, user) in [
        ("expense_created", Some("alice")),
        ("budget_updated", Some("alice")),
        ("expense_deleted", Some("bob")),
    ] {
        let mut entry = LogEntry::new(
            LogLevel::Info,
            LogCategory::UserAction,
            action,
            format!("User performed: {action}"),
            Map::new(),
            LogMetadata::default(),
        );
        entry.user_id = user.map(UserId::from);
        store.write(&entry).await.unwrap();
    }
}

async fn app_with_seed() -> (Router, Arc<MemoryLogStore>) {
    let store = Arc::new(MemoryLogStore::default());
    seed(&store).await;
    let settings = TallySettings {
        viewer: ViewerSettings {
            admin_emails: vec![ADMIN.to_owned()],
            ..Default::default()
        },
        ..Default::default()
    };
    let state = AppState::new(store.clone(), settings);
    (router(state), store)
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn get_as(uri: &str, email: Option<&str>, user: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(email) = email {
        builder = builder.header("x-tally-email", email);
    }
    if let Some(user) = user {
        builder = builder.header("x-tally-user", user);
    }
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn health_is_open() {
    let (app, _) = app_with_seed().await;
    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn admin_logs_requires_identity() {
    let (app, _) = app_with_seed().await;
    let response = app.oneshot(get("/admin/logs")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_logs_rejects_non_admins() {
    let (app, _) = app_with_seed().await;
    let response = app
        .oneshot(get_as("/admin/logs", Some("alice@tally.app"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admin_logs_lists_entries_with_total() {
    let (app, _) = app_with_seed().await;
    let response = app
        .oneshot(get_as("/admin/logs", Some(ADMIN), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["total"], 3);
    assert_eq!(body["entries"].as_array().unwrap().len(), 3);
    // Newest first.
    assert_eq!(body["entries"][0]["action"], "expense_deleted");
}

#[tokio::test]
async fn admin_logs_filters_by_user() {
    let (app, _) = app_with_seed().await;
    let response = app
        .oneshot(get_as("/admin/logs?userId=bob", Some(ADMIN), None))
        .await
        .unwrap();

    let body = body_json(response).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["entries"][0]["userId"], "bob");
}

#[tokio::test]
async fn admin_logs_search_total_counts_structured_matches_only() {
    let (app, _) = app_with_seed().await;
    let response = app
        .oneshot(get_as("/admin/logs?search=expense", Some(ADMIN), None))
        .await
        .unwrap();

    let body = body_json(response).await;
    let entries = body["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 2, "search narrows the page");
    assert_eq!(body["total"], 3, "total ignores the search predicate");
}

#[tokio::test]
async fn admin_logs_rejects_unknown_level() {
    let (app, _) = app_with_seed().await;
    let response = app
        .oneshot(get_as("/admin/logs?level=FATAL", Some(ADMIN), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn admin_delete_is_idempotent() {
    let (app, store) = app_with_seed().await;
    let id = {
        let entries = store
            .read(&tally_core::LogFilter::default(), &tally_core::Page::default())
            .await
            .unwrap();
        entries[0].id.clone()
    };

    for _ in 0..2 {
        let request = Request::builder()
            .method("DELETE")
            .uri(format!("/admin/logs/{id}"))
            .header("x-tally-email", ADMIN)
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }
    assert_eq!(store.len(), 2);
}

#[tokio::test]
async fn admin_cleanup_reports_removed_count() {
    let (app, store) = app_with_seed().await;
    // Age one entry past the default 30-day retention.
    let mut stale = LogEntry::new(
        LogLevel::Info,
        LogCategory::System,
        "stale",
        "old row",
        Map::new(),
        LogMetadata::default(),
    );
    stale.timestamp = chrono::Utc::now() - chrono::Duration::days(90);
    store.write(&stale).await.unwrap();

    let request = Request::builder()
        .method("POST")
        .uri("/admin/logs/cleanup")
        .header("x-tally-email", ADMIN)
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["removed"], 1);
    assert_eq!(store.len(), 3);
}

#[tokio::test]
async fn activity_requires_identity() {
    let (app, _) = app_with_seed().await;
    let response = app.oneshot(get("/activity")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn activity_is_scoped_to_the_caller() {
    let (app, _) = app_with_seed().await;
    let response = app
        .oneshot(get_as("/activity", None, Some("alice")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let entries = body["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|e| e["userId"] == "alice"));
}

#[tokio::test]
async fn activity_ignores_user_id_parameter() {
    let (app, _) = app_with_seed().await;
    // A caller cannot widen the scope to another user's rows.
    let response = app
        .oneshot(get_as("/activity?userId=bob", None, Some("alice")))
        .await
        .unwrap();

    let body = body_json(response).await;
    let entries = body["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|e| e["userId"] == "alice"));
}
