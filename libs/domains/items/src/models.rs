use axum::body::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// An item and the reference to its stored image, if any
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Item {
    /// Assigned by the store on creation
    pub id: i32,
    pub name: String,
    pub description: String,
    /// Key of the image in the content store, served under `/uploads/{key}`
    pub image_path: Option<String>,
    pub created_at: DateTime<Utc>,
    /// `null` until the first update
    pub updated_at: Option<DateTime<Utc>>,
}

/// Fields for a new item
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct CreateItem {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub description: String,
    /// Reference returned by the content store
    pub image_path: Option<String>,
}

/// Replacement values for an existing item.
///
/// Name and description are always overwritten; the image reference only
/// when `image_path` is `Some`.
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct UpdateItem {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub description: String,
    pub image_path: Option<String>,
}

/// Pagination for listing items, oldest first.
///
/// Both bounds must fit a signed 64-bit SQL integer.
#[derive(Debug, Clone, PartialEq, Deserialize, Validate, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ItemFilter {
    /// Number of items to skip (`skip` is accepted as an alias)
    #[serde(default, alias = "skip")]
    #[validate(range(max = 9_223_372_036_854_775_807_u64))]
    pub offset: u64,
    /// Maximum number of items to return
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 9_223_372_036_854_775_807_u64))]
    pub limit: u64,
}

fn default_limit() -> u64 {
    100
}

impl Default for ItemFilter {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: default_limit(),
        }
    }
}

impl ItemFilter {
    pub fn new(offset: u64, limit: u64) -> Self {
        Self { offset, limit }
    }
}

/// A file received from a client, not yet stored
#[derive(Debug, Clone, PartialEq)]
pub struct ImageUpload {
    /// Name the client gave the file
    pub file_name: String,
    /// Content type declared by the client
    pub content_type: String,
    pub bytes: Bytes,
}

/// Multipart body accepted by create and update
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct ItemForm {
    /// 1 to 200 characters
    name: String,
    description: String,
    /// PNG, JPEG or BMP image. On update, replaces the current image.
    #[schema(value_type = Option<String>, format = Binary)]
    file: Option<Vec<u8>>,
}
