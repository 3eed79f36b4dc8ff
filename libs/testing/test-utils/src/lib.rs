//! Shared test utilities for domain testing
//!
//! - `TestDatabase`: migrated SQLite database in a temporary directory
//! - `TestDataBuilder`: deterministic test data
//! - `assertions`: small assertion helpers
//!
//! ```rust,no_run
//! use test_utils::{TestDatabase, TestDataBuilder};
//!
//! #[tokio::test]
//! async fn my_test() {
//!     let db = TestDatabase::new().await;
//!     let builder = TestDataBuilder::from_test_name("my_test");
//!
//!     let name = builder.name("item", "main");
//!     let image = builder.image_bytes(64);
//! }
//! ```

mod database;

pub use database::TestDatabase;

/// Builder for test data with deterministic randomization
///
/// This ensures tests are reproducible by using seeded data.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Seed from a hash of the test name
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_create_item");
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::new(7);
    /// assert_eq!(builder.name("item", "main"), "test-item-7-main");
    /// ```
    pub fn name(&self, prefix: &str, suffix: &str) -> String {
        format!("test-{}-{}-{}", prefix, self.seed, suffix)
    }

    /// `len` bytes derived from the seed. Two builders with different seeds
    /// produce different payloads, which lets tests tell uploads apart.
    pub fn image_bytes(&self, len: usize) -> Vec<u8> {
        let mut state = self.seed | 1;
        (0..len)
            .map(|_| {
                // xorshift64
                state ^= state << 13;
                state ^= state >> 7;
                state ^= state << 17;
                state as u8
            })
            .collect()
    }
}

/// Test assertion helpers
pub mod assertions {
    use std::path::Path;

    /// Assert that an optional value is Some
    pub fn assert_some<T>(value: Option<T>, context: &str) -> T {
        value.unwrap_or_else(|| panic!("{}: expected Some, got None", context))
    }

    /// Assert that `path` exists and holds exactly `expected`
    pub fn assert_file_contents(path: &Path, expected: &[u8]) {
        let actual = std::fs::read(path)
            .unwrap_or_else(|e| panic!("expected file {}: {}", path.display(), e));
        assert_eq!(actual, expected, "contents of {}", path.display());
    }

    pub fn assert_missing(path: &Path) {
        assert!(!path.exists(), "expected {} to be gone", path.display());
    }
}
