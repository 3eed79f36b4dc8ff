use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{ItemError, ItemResult};
use crate::models::{CreateItem, Item, ItemFilter, UpdateItem};

/// Persistence for item records.
///
/// Implementations know nothing about stored files; keeping files and
/// records in step is the service's job.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemRepository: Send + Sync {
    async fn create(&self, input: CreateItem) -> ItemResult<Item>;

    async fn get_by_id(&self, id: i32) -> ItemResult<Option<Item>>;

    /// Items in insertion order, windowed by `filter`
    async fn list(&self, filter: ItemFilter) -> ItemResult<Vec<Item>>;

    /// Overwrite name and description, replace the image reference when one
    /// is given, and stamp `updated_at`.
    async fn update(&self, id: i32, input: UpdateItem) -> ItemResult<Item>;

    /// Returns whether a record was removed
    async fn delete(&self, id: i32) -> ItemResult<bool>;
}

#[derive(Default)]
struct Store {
    last_id: i32,
    items: BTreeMap<i32, Item>,
}

/// In-memory repository for development and tests
#[derive(Clone, Default)]
pub struct InMemoryItemRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryItemRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ItemRepository for InMemoryItemRepository {
    async fn create(&self, input: CreateItem) -> ItemResult<Item> {
        let mut store = self.store.write().await;
        store.last_id += 1;

        let item = Item {
            id: store.last_id,
            name: input.name,
            description: input.description,
            image_path: input.image_path,
            created_at: Utc::now(),
            updated_at: None,
        };
        store.items.insert(item.id, item.clone());
        Ok(item)
    }

    async fn get_by_id(&self, id: i32) -> ItemResult<Option<Item>> {
        let store = self.store.read().await;
        Ok(store.items.get(&id).cloned())
    }

    async fn list(&self, filter: ItemFilter) -> ItemResult<Vec<Item>> {
        let store = self.store.read().await;
        Ok(store
            .items
            .values()
            .skip(filter.offset as usize)
            .take(filter.limit as usize)
            .cloned()
            .collect())
    }

    async fn update(&self, id: i32, input: UpdateItem) -> ItemResult<Item> {
        let mut store = self.store.write().await;
        let item = store.items.get_mut(&id).ok_or(ItemError::NotFound(id))?;

        item.name = input.name;
        item.description = input.description;
        if let Some(image_path) = input.image_path {
            item.image_path = Some(image_path);
        }
        item.updated_at = Some(Utc::now());

        Ok(item.clone())
    }

    async fn delete(&self, id: i32) -> ItemResult<bool> {
        let mut store = self.store.write().await;
        Ok(store.items.remove(&id).is_some())
    }
}
