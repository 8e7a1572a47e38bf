use async_trait::async_trait;
use stride_core::types::DbId;

use super::ItemStore;
use crate::models::item::{Item, ItemQuery, NewItem, UpdateItem};
use crate::repositories::ItemRepo;
use crate::DbPool;

/// [`ItemStore`] backed by the `items` table.
#[derive(Clone)]
pub struct PgItemStore {
    pool: DbPool,
}

impl PgItemStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ItemStore for PgItemStore {
    async fn insert(&self, input: &NewItem) -> Result<Item, sqlx::Error> {
        ItemRepo::create(&self.pool, input).await
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Item>, sqlx::Error> {
        ItemRepo::find_by_id(&self.pool, id).await
    }

    async fn update(&self, id: DbId, input: &UpdateItem) -> Result<Option<Item>, sqlx::Error> {
        ItemRepo::update(&self.pool, id, input).await
    }

    async fn soft_delete(&self, id: DbId) -> Result<Option<Item>, sqlx::Error> {
        ItemRepo::soft_delete(&self.pool, id).await
    }

    async fn list(&self, query: &ItemQuery) -> Result<Vec<Item>, sqlx::Error> {
        ItemRepo::list(&self.pool, query).await
    }

    async fn health_check(&self) -> Result<(), sqlx::Error> {
        crate::health_check(&self.pool).await
    }
}
