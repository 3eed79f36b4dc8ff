use crate::{env_or_default, env_parse_or, ConfigError, FromEnv};
use std::path::PathBuf;

/// Default cap on request bodies carrying uploads (10 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Content store configuration for uploaded files
#[derive(Clone, Debug)]
pub struct StorageConfig {
    /// Directory uploaded files are written to
    pub upload_dir: PathBuf,
    /// Largest request body accepted by upload endpoints
    pub max_upload_bytes: usize,
}

impl StorageConfig {
    pub fn new(upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            upload_dir: upload_dir.into(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl FromEnv for StorageConfig {
    /// - UPLOAD_DIR: defaults to "uploads"
    /// - MAX_UPLOAD_BYTES: defaults to 10 MiB
    fn from_env() -> Result<Self, ConfigError> {
        let upload_dir = PathBuf::from(env_or_default("UPLOAD_DIR", "uploads"));
        let max_upload_bytes = env_parse_or("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?;

        Ok(Self {
            upload_dir,
            max_upload_bytes,
        })
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new("uploads")
    }
}
