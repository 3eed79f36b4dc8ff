//! Items API routes
//!
//! Wires the items domain to HTTP routes.

use axum::Router;
use axum::extract::DefaultBodyLimit;
use domain_items::handlers;

use crate::state::AppState;

/// Create items router. Request bodies are capped at `MAX_UPLOAD_BYTES`.
pub fn router(state: &AppState) -> Router {
    handlers::router(state.items.clone())
        .layer(DefaultBodyLimit::max(state.config.storage.max_upload_bytes))
}
