//! API routes module
//!
//! This module defines all HTTP API routes for the Items API.

pub mod health;
pub mod items;

use axum::Router;
use axum_helpers::server::health_router;
use tower_http::services::ServeDir;

use crate::openapi::ApiDoc;
use crate::state::AppState;

/// The complete application: API routes under the configured prefix, docs,
/// stored images under `/uploads/{key}` and `/health`.
pub fn app(state: &AppState) -> std::io::Result<Router> {
    let router = axum_helpers::create_router::<ApiDoc>(routes(state), &state.config.server)?;

    // Stored images are served by their key, e.g. /uploads/20261018_101500_1a2b3c4d_photo.jpg
    Ok(router
        .nest_service("/uploads", ServeDir::new(state.storage.root()))
        .merge(health_router(state.config.app)))
}

/// Create all API routes
/// Note: These are nested under `API_PREFIX` (default `/api/v1`) by axum_helpers::create_router
pub fn routes(state: &AppState) -> Router {
    Router::new()
        .nest("/items", items::router(state))
        .merge(health::router(state.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, Environment};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use core_config::{app_info, server::ServerConfig, storage::StorageConfig};
    use database::postgres::PostgresConfig;
    use domain_items::LocalFileStorage;
    use http_body_util::BodyExt;
    use migration::Migrator;
    use serde_json::Value;
    use tempfile::TempDir;
    use tower::ServiceExt;

    async fn test_state(dir: &TempDir, max_upload_bytes: usize) -> AppState {
        let database = PostgresConfig::with_pool_size("sqlite::memory:", 1, 1);
        let db = database::postgres::connect_from_config(database.clone())
            .await
            .unwrap();
        database::postgres::run_migrations::<Migrator>(&db, "items_api_test")
            .await
            .unwrap();

        let mut storage_config = StorageConfig::new(dir.path());
        storage_config.max_upload_bytes = max_upload_bytes;
        let storage = LocalFileStorage::new(dir.path()).await.unwrap();

        let config = Config {
            app: app_info!(),
            database,
            server: ServerConfig::default(),
            storage: storage_config,
            environment: Environment::Development,
        };
        AppState::new(config, db, storage)
    }

    #[tokio::test]
    async fn test_ready_reports_database_and_storage() {
        let dir = TempDir::new().unwrap();
        let app = routes(&test_state(&dir, 1024).await);

        let response = app
            .oneshot(Request::builder().uri("/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "ready");
        assert_eq!(body["database"], "connected");
        assert_eq!(body["storage"], "connected");
    }

    #[tokio::test]
    async fn test_ready_fails_when_database_closed() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir, 1024).await;
        state.db.clone().close().await.unwrap();

        let response = routes(&state)
            .oneshot(Request::builder().uri("/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_app_serves_items_under_api_v1() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir, 1024).await;
        let app = app(&state).unwrap();

        for (uri, expected) in [
            ("/api/v1/items", StatusCode::OK),
            ("/api/v1/items?limit=1", StatusCode::OK),
            ("/api/v1/ready", StatusCode::OK),
            ("/health", StatusCode::OK),
            ("/api/items", StatusCode::NOT_FOUND),
        ] {
            let response = app
                .clone()
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), expected, "{}", uri);
        }
    }

    #[tokio::test]
    async fn test_app_serves_stored_images() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir, 1024).await;
        std::fs::write(dir.path().join("20261018_000000_deadbeef_a.png"), b"png").unwrap();

        let response = app(&state)
            .unwrap()
            .oneshot(
                Request::builder()
                    .uri("/uploads/20261018_000000_deadbeef_a.png")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"png");
    }

    #[tokio::test]
    async fn test_items_enforce_upload_limit() {
        let dir = TempDir::new().unwrap();
        let app = routes(&test_state(&dir, 256).await);

        let boundary = "limit";
        let mut body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"name\"\r\n\r\nBig\r\n\
             --{b}\r\nContent-Disposition: form-data; name=\"description\"\r\n\r\n\r\n\
             --{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"big.png\"\r\n\
             Content-Type: image/png\r\n\r\n",
            b = boundary
        )
        .into_bytes();
        body.extend(std::iter::repeat_n(0u8, 2048));
        body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());

        let request = Request::builder()
            .method("POST")
            .uri("/items")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={}", boundary),
            )
            .body(Body::from(body))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
