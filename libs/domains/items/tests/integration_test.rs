//! Integration tests for the Items domain
//!
//! Service plus `SqlItemRepository` against a migrated SQLite database and a
//! real `LocalFileStorage`. The last test walks the full item lifecycle over HTTP.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use domain_items::*;
use http_body_util::BodyExt;
use tempfile::TempDir;
use test_utils::assertions::{assert_file_contents, assert_missing, assert_some};
use test_utils::{TestDataBuilder, TestDatabase};
use tower::ServiceExt;

struct Fixture {
    _db: TestDatabase,
    store: TempDir,
    service: ItemService<SqlItemRepository, LocalFileStorage>,
}

impl Fixture {
    async fn new() -> Self {
        let db = TestDatabase::new().await;
        let store = TempDir::new().unwrap();
        let storage = LocalFileStorage::new(store.path()).await.unwrap();
        let service = ItemService::new(SqlItemRepository::new(db.connection()), storage);

        Self {
            _db: db,
            store,
            service,
        }
    }

    fn upload(file_name: &str, content_type: &str, bytes: Vec<u8>) -> ImageUpload {
        ImageUpload {
            file_name: file_name.to_string(),
            content_type: content_type.to_string(),
            bytes: bytes.into(),
        }
    }
}

fn create(name: &str) -> CreateItem {
    CreateItem {
        name: name.to_string(),
        description: format!("{} description", name),
        image_path: None,
    }
}

#[tokio::test]
async fn test_create_and_get_item() {
    let fx = Fixture::new().await;
    let builder = TestDataBuilder::from_test_name("integration_create_get");
    let name = builder.name("item", "main");

    let created = fx.service.create_item(create(&name)).await.unwrap();
    assert!(created.id > 0);
    assert_eq!(created.name, name);
    assert!(created.updated_at.is_none());

    let fetched = fx.service.get_item(created.id).await.unwrap();
    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.name, created.name);
    assert_eq!(fetched.image_path, None);
}

#[tokio::test]
async fn test_get_missing_item_is_not_found() {
    let fx = Fixture::new().await;

    let err = fx.service.get_item(12345).await.unwrap_err();
    assert!(matches!(err, ItemError::NotFound(12345)));
}

#[tokio::test]
async fn test_list_orders_by_insertion_and_windows() {
    let fx = Fixture::new().await;
    for name in ["A", "B", "C"] {
        fx.service.create_item(create(name)).await.unwrap();
    }

    let page = fx.service.list_items(ItemFilter::new(1, 1)).await.unwrap();
    let names: Vec<_> = page.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["B"]);

    let all = fx.service.list_items(ItemFilter::default()).await.unwrap();
    let names: Vec<_> = all.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["A", "B", "C"]);

    let past_end = fx.service.list_items(ItemFilter::new(10, 5)).await.unwrap();
    assert!(past_end.is_empty());
}

#[tokio::test]
async fn test_list_out_of_range_window_is_rejected() {
    let fx = Fixture::new().await;
    fx.service.create_item(create("A")).await.unwrap();

    for filter in [ItemFilter::new(0, u64::MAX), ItemFilter::new(u64::MAX, 1)] {
        let err = fx.service.list_items(filter).await.unwrap_err();
        assert!(matches!(err, ItemError::Validation(_)));
    }

    let max = i64::MAX as u64;
    let page = fx.service.list_items(ItemFilter::new(0, max)).await.unwrap();
    assert_eq!(page.len(), 1);
    let page = fx.service.list_items(ItemFilter::new(max, 1)).await.unwrap();
    assert!(page.is_empty());
}

#[tokio::test]
async fn test_update_replaces_image_and_stamps_updated_at() {
    let fx = Fixture::new().await;
    let builder = TestDataBuilder::from_test_name("integration_update");
    let first = builder.image_bytes(128);
    let second = TestDataBuilder::new(99).image_bytes(128);

    let reference = fx
        .service
        .store_image(Fixture::upload("a.png", "image/png", first))
        .await
        .unwrap();
    let mut input = create("Lamp");
    input.image_path = Some(reference.clone());
    let created = fx.service.create_item(input).await.unwrap();

    let replacement = fx
        .service
        .store_image(Fixture::upload("b.jpg", "image/jpeg", second.clone()))
        .await
        .unwrap();
    let updated = fx
        .service
        .update_item(
            created.id,
            UpdateItem {
                name: "Lamp".into(),
                description: "Brass".into(),
                image_path: Some(replacement.clone()),
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.description, "Brass");
    assert_eq!(updated.image_path.as_deref(), Some(replacement.as_str()));
    assert!(updated.updated_at.is_some());
    assert_eq!(updated.created_at, created.created_at);

    assert_missing(&fx.store.path().join(&reference));
    assert_file_contents(&fx.store.path().join(&replacement), &second);
}

#[tokio::test]
async fn test_update_missing_item_is_not_found() {
    let fx = Fixture::new().await;

    let err = fx
        .service
        .update_item(
            7,
            UpdateItem {
                name: "x".into(),
                description: String::new(),
                image_path: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ItemError::NotFound(7)));
}

#[tokio::test]
async fn test_delete_removes_record_and_image() {
    let fx = Fixture::new().await;

    let reference = fx
        .service
        .store_image(Fixture::upload("c.bmp", "image/bmp", vec![1, 2, 3]))
        .await
        .unwrap();
    let mut input = create("Frame");
    input.image_path = Some(reference.clone());
    let created = fx.service.create_item(input).await.unwrap();

    fx.service.delete_item(created.id).await.unwrap();

    assert_missing(&fx.store.path().join(&reference));
    assert!(matches!(
        fx.service.get_item(created.id).await,
        Err(ItemError::NotFound(_))
    ));
    assert!(matches!(
        fx.service.delete_item(created.id).await,
        Err(ItemError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_rejected_upload_writes_nothing() {
    let fx = Fixture::new().await;

    let err = fx
        .service
        .store_image(Fixture::upload("x.gif", "image/gif", vec![0; 8]))
        .await
        .unwrap_err();

    assert!(matches!(err, ItemError::UnsupportedContentType(_)));
    assert_eq!(std::fs::read_dir(fx.store.path()).unwrap().count(), 0);
}

const BOUNDARY: &str = "lifecycle-boundary";

fn form(method: &str, uri: &str, name: &str, file: Option<(&str, &str, &[u8])>) -> Request<Body> {
    let mut body = Vec::new();
    for (field, value) in [("name", name), ("description", "lifecycle")] {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, field, value
            )
            .as_bytes(),
        );
    }
    if let Some((file_name, content_type, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                BOUNDARY, file_name, content_type
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method(method)
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn item_body(response: axum::response::Response) -> Item {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_item_lifecycle_over_http() {
    let fx = Fixture::new().await;
    let store = fx.store.path().to_path_buf();
    let app = handlers::router(fx.service.clone());

    let builder = TestDataBuilder::from_test_name("integration_lifecycle");
    let jpeg = builder.image_bytes(512);
    let png = TestDataBuilder::new(3).image_bytes(512);

    // Item without a file
    let response = app
        .clone()
        .oneshot(form("POST", "/", "plain", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let plain = item_body(response).await;
    assert_eq!(plain.image_path, None);

    // Item with a JPEG
    let response = app
        .clone()
        .oneshot(form("POST", "/", "photo", Some(("photo.jpg", "image/jpeg", &jpeg))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let photo = item_body(response).await;
    let jpeg_ref = assert_some(photo.image_path.clone(), "photo image");
    assert_file_contents(&store.join(&jpeg_ref), &jpeg);

    // Replace the JPEG with a PNG
    let response = app
        .clone()
        .oneshot(form(
            "PUT",
            &format!("/{}", photo.id),
            "photo",
            Some(("photo.png", "image/png", &png)),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let replaced = item_body(response).await;
    let png_ref = assert_some(replaced.image_path.clone(), "replacement image");
    assert_missing(&store.join(&jpeg_ref));
    assert_file_contents(&store.join(&png_ref), &png);

    // Delete
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/{}", photo.id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_missing(&store.join(&png_ref));

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/{}", photo.id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // The first item is untouched
    let remaining = fx.service.list_items(ItemFilter::default()).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, plain.id);
}
