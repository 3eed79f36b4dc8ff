//! Application state management.
//!
//! Shared state passed to the route builders and readiness checks.

use database::postgres::DatabaseConnection;
use domain_items::{ItemService, LocalFileStorage, SqlItemRepository};

pub type Items = ItemService<SqlItemRepository, LocalFileStorage>;

/// Shared application state.
///
/// Cloning is cheap: the connection is a pool handle and the service holds `Arc`s.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: crate::config::Config,
    pub db: DatabaseConnection,
    pub storage: LocalFileStorage,
    pub items: Items,
}

impl AppState {
    pub fn new(
        config: crate::config::Config,
        db: DatabaseConnection,
        storage: LocalFileStorage,
    ) -> Self {
        let items = ItemService::new(SqlItemRepository::new(db.clone()), storage.clone());

        Self {
            config,
            db,
            storage,
            items,
        }
    }
}
