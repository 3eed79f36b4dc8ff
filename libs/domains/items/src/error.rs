use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::rejection::QueryRejection;
use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use sea_orm::DbErr;
use thiserror::Error;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum ItemError {
    #[error("Item not found: {0}")]
    NotFound(i32),

    /// Declared content type is outside the image allowlist
    #[error("File type not allowed: {0}")]
    UnsupportedContentType(String),

    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationErrors),

    /// Form is structurally wrong, e.g. a required field is missing
    #[error("Invalid form: {0}")]
    InvalidForm(String),

    /// Query string could not be deserialized, e.g. `?limit=abc`
    #[error("Invalid query: {0}")]
    InvalidQuery(#[from] QueryRejection),

    #[error("Multipart error: {0}")]
    Multipart(#[from] MultipartError),

    #[error("Multipart extraction error: {0}")]
    MultipartRejection(#[from] MultipartRejection),

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ItemResult<T> = Result<T, ItemError>;

impl From<ItemError> for AppError {
    fn from(err: ItemError) -> Self {
        match err {
            ItemError::NotFound(id) => AppError::NotFound(format!("Item {} not found", id)),
            ItemError::UnsupportedContentType(content_type) => {
                AppError::UnsupportedFileType(content_type)
            }
            ItemError::Validation(e) => AppError::ValidationError(e),
            ItemError::InvalidForm(msg) => AppError::BadRequest(msg),
            ItemError::InvalidQuery(e) => AppError::BadRequest(e.body_text()),
            ItemError::Multipart(e) => AppError::Multipart(e),
            ItemError::MultipartRejection(e) => AppError::MultipartRejection(e),
            ItemError::Storage(e) => AppError::Io(e),
            ItemError::Database(e) => AppError::Database(e),
            ItemError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for ItemError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
