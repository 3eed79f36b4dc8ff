//! Database connectors and helpers for the items backend
//!
//! # Features
//!
//! - `postgres` (default) - SQL support through SeaORM. PostgreSQL in production,
//!   any other SeaORM URL (such as `sqlite://`) works the same way.
//! - `config` - `core_config::FromEnv` for [`postgres::PostgresConfig`]
//!
//! # Example
//!
//! ```ignore
//! use database::postgres;
//! use migration::Migrator;
//!
//! let db = postgres::connect_from_config_with_retry(config, None).await?;
//! postgres::run_migrations::<Migrator>(&db, "items_api").await?;
//! ```

pub mod common;

#[cfg(feature = "postgres")]
pub mod postgres;

pub use common::{DatabaseError, DatabaseResult};
