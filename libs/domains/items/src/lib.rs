//! Items Domain
//!
//! Items with an optional image, persisted through SeaORM and a file store.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints, multipart forms
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Validation, image lifecycle
//! └──┬───────┬──┘
//!    │       │
//! ┌──▼───┐ ┌─▼───────┐
//! │ Repo │ │ Storage │  ← Records (SQL / in-memory) and image files
//! └──────┘ └─────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_items::{handlers, ItemService, LocalFileStorage, SqlItemRepository};
//! use sea_orm::Database;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::connect("sqlite::memory:").await?;
//! let storage = LocalFileStorage::new("uploads").await?;
//!
//! let service = ItemService::new(SqlItemRepository::new(db), storage);
//! let router = handlers::router(service);
//! # Ok(())
//! # }
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod service;
pub mod sql;
pub mod storage;

// Re-export commonly used types
pub use error::{ItemError, ItemResult};
pub use handlers::ApiDoc;
pub use models::{CreateItem, ImageUpload, Item, ItemFilter, UpdateItem};
pub use repository::{InMemoryItemRepository, ItemRepository};
pub use service::ItemService;
pub use sql::SqlItemRepository;
pub use storage::{FileStorage, LocalFileStorage};
