//! Content store for item images.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::error::{ItemError, ItemResult};
use crate::models::ImageUpload;

/// Content types accepted for item images
pub const ALLOWED_CONTENT_TYPES: [&str; 3] = ["image/png", "image/jpeg", "image/bmp"];

/// Where uploaded images live.
///
/// References returned by [`save`](FileStorage::save) are opaque keys; the
/// only valid use is passing them back to [`delete`](FileStorage::delete).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Validate the declared content type, write the payload under a fresh
    /// name and return its reference. Nothing is written for a rejected type.
    async fn save(&self, upload: ImageUpload) -> ItemResult<String>;

    /// Remove a stored object. A reference whose object is already gone is not an error.
    async fn delete(&self, reference: &str) -> ItemResult<()>;
}

/// Whether `content_type` is on the allowlist. Parameters such as
/// `; charset=...` are ignored and the comparison is case-insensitive.
pub fn is_allowed_content_type(content_type: &str) -> bool {
    let essence = content_type.split(';').next().unwrap_or_default().trim();
    ALLOWED_CONTENT_TYPES
        .iter()
        .any(|allowed| allowed.eq_ignore_ascii_case(essence))
}

/// Files in a single local directory
#[derive(Debug, Clone)]
pub struct LocalFileStorage {
    root: PathBuf,
}

impl LocalFileStorage {
    /// Use `root` as the store, creating it if needed.
    pub async fn new(root: impl Into<PathBuf>) -> ItemResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root).await?;
        info!(root = %root.display(), "Content store ready");
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Filesystem path for `reference`. Anything but a plain file name is refused.
    pub fn resolve(&self, reference: &str) -> ItemResult<PathBuf> {
        let mut components = Path::new(reference).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(name)), None) => Ok(self.root.join(name)),
            _ => Err(ItemError::Internal(format!(
                "Invalid storage reference: {:?}",
                reference
            ))),
        }
    }
}

#[async_trait]
impl FileStorage for LocalFileStorage {
    #[instrument(skip(self, upload), fields(file_name = %upload.file_name, content_type = %upload.content_type, size = upload.bytes.len()))]
    async fn save(&self, upload: ImageUpload) -> ItemResult<String> {
        if !is_allowed_content_type(&upload.content_type) {
            return Err(ItemError::UnsupportedContentType(upload.content_type));
        }

        let reference = storage_name(Utc::now(), &upload.file_name);
        let path = self.resolve(&reference)?;

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;
        file.write_all(&upload.bytes).await?;
        file.flush().await?;

        info!(reference = %reference, "Stored image");
        Ok(reference)
    }

    #[instrument(skip(self))]
    async fn delete(&self, reference: &str) -> ItemResult<()> {
        let path = self.resolve(reference)?;
        match fs::remove_file(&path).await {
            Ok(()) => {
                info!("Deleted image");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Image already gone");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// `{YYYYmmdd_HHMMSS}_{8 hex}_{sanitized original name}`
fn storage_name(now: DateTime<Utc>, original: &str) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!(
        "{}_{}_{}",
        now.format("%Y%m%d_%H%M%S"),
        &suffix[..8],
        sanitize_file_name(original)
    )
}

/// Last path segment of a client-supplied name, restricted to `[A-Za-z0-9._-]`.
fn sanitize_file_name(original: &str) -> String {
    let base = original
        .rsplit(|c| c == '/' || c == '\\')
        .next()
        .unwrap_or_default();

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}
