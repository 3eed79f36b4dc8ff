use async_trait::async_trait;
use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryOrder, QuerySelect,
    TransactionTrait,
};
use tracing::instrument;

use crate::{
    entity,
    error::{ItemError, ItemResult},
    models::{CreateItem, Item, ItemFilter, UpdateItem},
    repository::ItemRepository,
};

/// SeaORM-backed repository.
///
/// Every call runs in its own transaction. Early returns drop the
/// transaction, which rolls it back.
#[derive(Clone)]
pub struct SqlItemRepository {
    db: DatabaseConnection,
}

impl SqlItemRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ItemRepository for SqlItemRepository {
    #[instrument(skip(self, input), fields(item_name = %input.name))]
    async fn create(&self, input: CreateItem) -> ItemResult<Item> {
        let txn = self.db.begin().await?;
        let model = entity::ActiveModel::from(input).insert(&txn).await?;
        txn.commit().await?;

        tracing::info!(item_id = model.id, "Created item");
        Ok(model.into())
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: i32) -> ItemResult<Option<Item>> {
        let txn = self.db.begin().await?;
        let model = entity::Entity::find_by_id(id).one(&txn).await?;
        txn.commit().await?;

        Ok(model.map(Into::into))
    }

    #[instrument(skip(self))]
    async fn list(&self, filter: ItemFilter) -> ItemResult<Vec<Item>> {
        let txn = self.db.begin().await?;
        let models = entity::Entity::find()
            .order_by_asc(entity::Column::Id)
            .offset(filter.offset)
            .limit(filter.limit)
            .all(&txn)
            .await?;
        txn.commit().await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self, input))]
    async fn update(&self, id: i32, input: UpdateItem) -> ItemResult<Item> {
        let txn = self.db.begin().await?;
        let mut active = entity::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(ItemError::NotFound(id))?
            .into_active_model();

        active.name = Set(input.name);
        active.description = Set(input.description);
        if let Some(image_path) = input.image_path {
            active.image_path = Set(Some(image_path));
        }
        active.updated_at = Set(Some(Utc::now().into()));

        let model = active.update(&txn).await?;
        txn.commit().await?;

        tracing::info!(item_id = id, "Updated item");
        Ok(model.into())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: i32) -> ItemResult<bool> {
        let txn = self.db.begin().await?;
        let result = entity::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        let deleted = result.rows_affected > 0;
        if deleted {
            tracing::info!(item_id = id, "Deleted item");
        }
        Ok(deleted)
    }
}
