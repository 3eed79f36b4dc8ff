//! Throwaway SQL database for tests
//!
//! Each `TestDatabase` is a SQLite file inside its own temporary directory,
//! migrated with the same `migration::Migrator` the service runs at startup.

use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tempfile::TempDir;

/// Migrated database that is removed from disk on drop.
pub struct TestDatabase {
    // Keeps the database file alive for the lifetime of the connection.
    _dir: TempDir,
    pub connection: DatabaseConnection,
    pub connection_string: String,
}

impl TestDatabase {
    /// ```ignore
    /// use test_utils::TestDatabase;
    ///
    /// # async fn example() {
    /// let db = TestDatabase::new().await;
    /// let repo = SqlItemRepository::new(db.connection());
    /// # }
    /// ```
    pub async fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir for test database");
        let path = dir.path().join("items.db");
        let connection_string = format!("sqlite://{}?mode=rwc", path.display());

        let mut options = ConnectOptions::new(connection_string.clone());
        options.max_connections(1).sqlx_logging(false);

        let connection = Database::connect(options)
            .await
            .expect("Failed to connect to test database");

        Migrator::up(&connection, None)
            .await
            .expect("Failed to run migrations on test database");

        tracing::debug!(path = %path.display(), "Test database ready");

        Self {
            _dir: dir,
            connection,
            connection_string,
        }
    }

    /// A cloned connection, e.g. for handing to a repository
    pub fn connection(&self) -> DatabaseConnection {
        self.connection.clone()
    }
}
