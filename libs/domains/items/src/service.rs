//! Item Service - ties item records to their stored images

use std::sync::Arc;
use tracing::{instrument, warn};
use validator::Validate;

use crate::error::{ItemError, ItemResult};
use crate::models::{CreateItem, ImageUpload, Item, ItemFilter, UpdateItem};
use crate::repository::ItemRepository;
use crate::storage::FileStorage;

/// Item operations.
///
/// An item owns its image: replacing the image on update or deleting the
/// item removes the previous file exactly once.
pub struct ItemService<R: ItemRepository, S: FileStorage> {
    repository: Arc<R>,
    storage: Arc<S>,
}

impl<R: ItemRepository, S: FileStorage> ItemService<R, S> {
    pub fn new(repository: R, storage: S) -> Self {
        Self {
            repository: Arc::new(repository),
            storage: Arc::new(storage),
        }
    }

    /// Persist an upload and return its reference for `create_item`/`update_item`.
    pub async fn store_image(&self, upload: ImageUpload) -> ItemResult<String> {
        self.storage.save(upload).await
    }

    #[instrument(skip(self, input), fields(item_name = %input.name))]
    pub async fn create_item(&self, input: CreateItem) -> ItemResult<Item> {
        input.validate()?;

        let image_path = input.image_path.clone();
        match self.repository.create(input).await {
            Ok(item) => Ok(item),
            Err(e) => {
                self.discard(image_path).await;
                Err(e)
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn get_item(&self, id: i32) -> ItemResult<Item> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(ItemError::NotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn list_items(&self, filter: ItemFilter) -> ItemResult<Vec<Item>> {
        filter.validate()?;
        self.repository.list(filter).await
    }

    /// Overwrite name and description. When `input.image_path` is set, the
    /// item's previous image (if any) is deleted before the record is saved.
    #[instrument(skip(self, input))]
    pub async fn update_item(&self, id: i32, input: UpdateItem) -> ItemResult<Item> {
        input.validate()?;

        let existing = self.get_item(id).await?;

        if let (Some(_), Some(old)) = (&input.image_path, existing.image_path.as_deref()) {
            if let Err(e) = self.storage.delete(old).await {
                self.discard(input.image_path.clone()).await;
                return Err(e);
            }
        }

        let image_path = input.image_path.clone();
        match self.repository.update(id, input).await {
            Ok(item) => Ok(item),
            Err(e) => {
                self.discard(image_path).await;
                Err(e)
            }
        }
    }

    /// Delete the item's image, if any, then the record.
    #[instrument(skip(self))]
    pub async fn delete_item(&self, id: i32) -> ItemResult<()> {
        let existing = self.get_item(id).await?;

        if let Some(path) = existing.image_path.as_deref() {
            self.storage.delete(path).await?;
        }

        if !self.repository.delete(id).await? {
            return Err(ItemError::NotFound(id));
        }
        Ok(())
    }

    /// Best-effort removal of a freshly stored image whose record was never written.
    async fn discard(&self, image_path: Option<String>) {
        let Some(reference) = image_path else {
            return;
        };
        if let Err(e) = self.storage.delete(&reference).await {
            warn!(reference = %reference, error = %e, "Failed to discard orphaned image");
        }
    }
}

impl<R: ItemRepository, S: FileStorage> Clone for ItemService<R, S> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            storage: Arc::clone(&self.storage),
        }
    }
}
