//! Persistence gateway for items and categories.
//!
//! Traits describe what the item service needs from the store; the SQLite
//! implementations own query construction and nothing else.

use async_trait::async_trait;

use stockroom_core::{CategoryId, ItemId};
use stockroom_inventory::{Category, Item, ItemFields, ItemListing};

use crate::error::StoreError;
use crate::pagination::{Page, PageRequest};

pub mod categories;
pub mod items;

pub use categories::SqliteCategoryRepository;
pub use items::SqliteItemRepository;

/// Read-only access to categories.
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// All categories, ordered by id.
    async fn list(&self) -> Result<Vec<Category>, StoreError>;

    async fn find(&self, id: CategoryId) -> Result<Option<Category>, StoreError>;

    async fn exists(&self, id: CategoryId) -> Result<bool, StoreError> {
        Ok(self.find(id).await?.is_some())
    }
}

/// Single-row reads and writes on items.
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// Items joined with their category description, filtered by an optional
    /// substring search, ordered by id.
    async fn search(
        &self,
        term: Option<&str>,
        page: PageRequest,
    ) -> Result<Page<ItemListing>, StoreError>;

    async fn find(&self, id: ItemId) -> Result<Option<Item>, StoreError>;

    async fn serial_exists(&self, serial: &str) -> Result<bool, StoreError>;

    async fn insert(&self, fields: &ItemFields) -> Result<Item, StoreError>;

    /// Overwrite all mutable fields. `Ok(None)` when the item does not exist.
    async fn update(&self, id: ItemId, fields: &ItemFields) -> Result<Option<Item>, StoreError>;

    /// `Ok(false)` when the item does not exist.
    async fn delete(&self, id: ItemId) -> Result<bool, StoreError>;
}
