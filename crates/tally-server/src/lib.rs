//! Viewer surfaces for the Tally activity log.
//!
//! Two read-only JSON APIs over the [`tally_core::LogStorage`] contract:
//! - the admin log browser (filter, paginate, count, delete, cleanup),
//!   gated by a fixed email allow-list
//! - the per-user activity view, hard-scoped to the authenticated caller
//!
//! Authentication itself is external: the authenticating reverse proxy
//! forwards the verified caller identity in request headers.

pub mod auth;
pub mod cleanup;
pub mod error;
pub mod routes;
pub mod state;

pub use cleanup::{run_cleanup, spawn_cleanup_task};
pub use error::ApiError;
pub use routes::router;
pub use state::AppState;
