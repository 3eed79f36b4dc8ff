use axum::{
    Json, Router,
    extract::{
        Multipart, Query, State,
        multipart::MultipartRejection,
        rejection::QueryRejection,
    },
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{
    IdPath,
    errors::responses::{
        BadRequestIdResponse, BadRequestValidationResponse, InternalServerErrorResponse,
        NotFoundResponse, PayloadTooLargeResponse, UnsupportedFileTypeResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;
use validator::Validate;

use crate::error::{ItemError, ItemResult};
use crate::models::{CreateItem, ImageUpload, Item, ItemFilter, ItemForm, UpdateItem};
use crate::repository::ItemRepository;
use crate::service::ItemService;
use crate::storage::FileStorage;

pub const TAG: &str = "items";

/// OpenAPI documentation for Items API
#[derive(OpenApi)]
#[openapi(
    paths(list_items, create_item, get_item, update_item, delete_item),
    components(
        schemas(Item, ItemForm, ItemFilter),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestIdResponse,
            UnsupportedFileTypeResponse,
            PayloadTooLargeResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "Items with an optional image")
    )
)]
pub struct ApiDoc;

/// Create the item router with all HTTP endpoints
pub fn router<R, S>(service: ItemService<R, S>) -> Router
where
    R: ItemRepository + 'static,
    S: FileStorage + 'static,
{
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_items::<R, S>).post(create_item::<R, S>))
        .route(
            "/{id}",
            get(get_item::<R, S>)
                .put(update_item::<R, S>)
                .delete(delete_item::<R, S>),
        )
        .with_state(shared_service)
}

/// Fields of a create/update form
#[derive(Debug, Default)]
struct ParsedForm {
    name: Option<String>,
    description: Option<String>,
    file: Option<ImageUpload>,
}

impl ParsedForm {
    async fn read(mut multipart: Multipart) -> ItemResult<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await? {
            let field_name = field.name().map(str::to_owned);
            match field_name.as_deref() {
                Some("name") => form.name = Some(field.text().await?),
                Some("description") => form.description = Some(field.text().await?),
                Some("file") => {
                    let file_name = field.file_name().unwrap_or_default().to_owned();
                    let content_type = field
                        .content_type()
                        .unwrap_or("application/octet-stream")
                        .to_owned();
                    let bytes = field.bytes().await?;

                    // Browsers submit an empty, unnamed part when no file was picked.
                    if !(file_name.is_empty() && bytes.is_empty()) {
                        form.file = Some(ImageUpload {
                            file_name,
                            content_type,
                            bytes,
                        });
                    }
                }
                _ => {}
            }
        }

        Ok(form)
    }

    fn required(value: Option<String>, field: &str) -> ItemResult<String> {
        value.ok_or_else(|| ItemError::InvalidForm(format!("missing field `{}`", field)))
    }

    fn into_create(self) -> ItemResult<(CreateItem, Option<ImageUpload>)> {
        let input = CreateItem {
            name: Self::required(self.name, "name")?,
            description: Self::required(self.description, "description")?,
            image_path: None,
        };
        Ok((input, self.file))
    }

    fn into_update(self) -> ItemResult<(UpdateItem, Option<ImageUpload>)> {
        let input = UpdateItem {
            name: Self::required(self.name, "name")?,
            description: Self::required(self.description, "description")?,
            image_path: None,
        };
        Ok((input, self.file))
    }
}

/// List items, oldest first
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    params(ItemFilter),
    responses(
        (status = 200, description = "List of items", body = Vec<Item>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_items<R: ItemRepository, S: FileStorage>(
    State(service): State<Arc<ItemService<R, S>>>,
    query: Result<Query<ItemFilter>, QueryRejection>,
) -> ItemResult<Json<Vec<Item>>> {
    let Query(filter) = query?;
    let items = service.list_items(filter).await?;
    Ok(Json(items))
}

/// Create an item, optionally with an image
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body(content = ItemForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Item created successfully", body = Item),
        (status = 400, response = UnsupportedFileTypeResponse),
        (status = 413, response = PayloadTooLargeResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_item<R: ItemRepository, S: FileStorage>(
    State(service): State<Arc<ItemService<R, S>>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ItemResult<impl IntoResponse> {
    let (mut input, upload) = ParsedForm::read(multipart?).await?.into_create()?;
    input.validate()?;

    if let Some(upload) = upload {
        input.image_path = Some(service.store_image(upload).await?);
    }

    let item = service.create_item(input).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// Get an item by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i32, Path, description = "Item ID")
    ),
    responses(
        (status = 200, description = "Item found", body = Item),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_item<R: ItemRepository, S: FileStorage>(
    State(service): State<Arc<ItemService<R, S>>>,
    IdPath(id): IdPath,
) -> ItemResult<Json<Item>> {
    let item = service.get_item(id).await?;
    Ok(Json(item))
}

/// Update an item. A new image replaces and deletes the current one.
#[utoipa::path(
    put,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i32, Path, description = "Item ID")
    ),
    request_body(content = ItemForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Item updated successfully", body = Item),
        (status = 400, response = UnsupportedFileTypeResponse),
        (status = 404, response = NotFoundResponse),
        (status = 413, response = PayloadTooLargeResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_item<R: ItemRepository, S: FileStorage>(
    State(service): State<Arc<ItemService<R, S>>>,
    IdPath(id): IdPath,
    multipart: Result<Multipart, MultipartRejection>,
) -> ItemResult<Json<Item>> {
    let (mut input, upload) = ParsedForm::read(multipart?).await?.into_update()?;
    input.validate()?;

    // Unknown ids are rejected before anything is written to the store.
    service.get_item(id).await?;

    if let Some(upload) = upload {
        input.image_path = Some(service.store_image(upload).await?);
    }

    let item = service.update_item(id, input).await?;
    Ok(Json(item))
}

/// Delete an item and its image
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i32, Path, description = "Item ID")
    ),
    responses(
        (status = 204, description = "Item deleted successfully"),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_item<R: ItemRepository, S: FileStorage>(
    State(service): State<Arc<ItemService<R, S>>>,
    IdPath(id): IdPath,
) -> ItemResult<StatusCode> {
    service.delete_item(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
