//! The persistence seam used by the item service.
//!
//! [`PgItemStore`] is the production backend. [`MemoryItemStore`] keeps rows
//! in process memory and backs local development (`STORE_BACKEND=memory`)
//! and the test suites.

mod memory;
mod postgres;

use async_trait::async_trait;
use stride_core::types::DbId;

use crate::models::item::{Item, ItemQuery, NewItem, UpdateItem};

pub use memory::MemoryItemStore;
pub use postgres::PgItemStore;

/// Durable storage for items.
///
/// Implementations perform no ownership or placement checks; those belong
/// to the caller.
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Insert a new item and return it with its generated id and timestamps.
    async fn insert(&self, input: &NewItem) -> Result<Item, sqlx::Error>;

    /// Fetch an item by id, including soft-deleted rows.
    async fn find_by_id(&self, id: DbId) -> Result<Option<Item>, sqlx::Error>;

    /// Apply a partial update to a live item. `None` if missing or deleted.
    async fn update(&self, id: DbId, input: &UpdateItem) -> Result<Option<Item>, sqlx::Error>;

    /// Mark a live item deleted. `None` if missing or already deleted.
    async fn soft_delete(&self, id: DbId) -> Result<Option<Item>, sqlx::Error>;

    /// List live items matching the query, in the query's sort order.
    async fn list(&self, query: &ItemQuery) -> Result<Vec<Item>, sqlx::Error>;

    /// Whether the backend is reachable.
    async fn health_check(&self) -> Result<(), sqlx::Error>;
}
