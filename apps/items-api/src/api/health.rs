//! Readiness check for the database and the content store.

use axum::{
    Router,
    extract::State,
    response::{IntoResponse, Response},
    routing::get,
};
use axum_helpers::server::{HealthCheckFuture, run_health_checks};

use crate::state::AppState;

/// Create a readiness router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/ready", get(ready_handler))
        .with_state(state)
}

/// 200 when the database answers and the upload directory is reachable, 503 otherwise.
async fn ready_handler(State(state): State<AppState>) -> Response {
    let checks: Vec<(&str, HealthCheckFuture<'_>)> = vec![
        (
            "database",
            Box::pin(async {
                database::postgres::check_health(&state.db)
                    .await
                    .map_err(|e| e.to_string())
            }),
        ),
        (
            "storage",
            Box::pin(async {
                match tokio::fs::metadata(state.storage.root()).await {
                    Ok(meta) if meta.is_dir() => Ok(()),
                    Ok(_) => Err("upload path is not a directory".to_string()),
                    Err(e) => Err(format!("upload directory unavailable: {}", e)),
                }
            }),
        ),
    ];

    match run_health_checks(checks).await {
        Ok((status, json)) => (status, json).into_response(),
        Err((status, json)) => (status, json).into_response(),
    }
}
