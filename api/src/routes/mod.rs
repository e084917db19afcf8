//! HTTP route entry point for `/api/...`.
//!
//! Route groups:
//! - `/health` → Health check endpoint
//! - `/assignments` → Assignments, their questions, batches and grade export

use crate::routes::{assignments::assignment_routes, health::health_routes};
use axum::Router;
use util::state::AppState;

pub mod assignments;
pub mod common;
pub mod health;

/// Builds the complete application router for all HTTP endpoints.
pub fn routes(app_state: AppState) -> Router {
    Router::new()
        .nest("/health", health_routes())
        .nest("/assignments", assignment_routes())
        .with_state(app_state)
}
