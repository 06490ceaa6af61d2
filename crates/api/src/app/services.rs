//! Service wiring and the item service.
//!
//! `ItemService` implements the item operations (list, forms, create, show,
//! update, destroy) against the repositories. It knows nothing about HTTP;
//! routes translate its results and `ItemError` into responses.

use std::sync::Arc;

use serde::Serialize;
use sqlx::SqlitePool;
use thiserror::Error;

use stockroom_core::{DomainError, ItemId, ValidationErrors};
use stockroom_infra::{
    CategoryRepository, ItemRepository, Page, PageRequest, SqliteCategoryRepository,
    SqliteItemRepository, StoreError,
};
use stockroom_inventory::{
    Category, CategoryType, CategoryTypeOption, Item, ItemFields, ItemForm, ItemListing, form,
    messages,
};

/// Generic messages shown when the store fails; details only go to the log.
pub mod failures {
    pub const LOAD: &str = "An error occurred while loading data.";
    pub const SAVE: &str = "An error occurred while saving data.";
    pub const UPDATE: &str = "An error occurred while updating data.";
    pub const DELETE: &str = "Failed to delete data.";
}

#[derive(Debug, Error)]
pub enum ItemError {
    /// Submitted fields were rejected; nothing was written.
    #[error("validation failed: {errors}")]
    Validation {
        errors: ValidationErrors,
        input: ItemForm,
    },

    #[error("item not found")]
    NotFound,

    /// The store failed unexpectedly. `message` is safe to show to users.
    #[error("{message}")]
    Persistence {
        message: &'static str,
        input: Option<ItemForm>,
        #[source]
        source: StoreError,
    },
}

impl From<DomainError> for ItemError {
    fn from(err: DomainError) -> Self {
        match err {
            // A path id that cannot name a row is reported like a missing row.
            DomainError::InvalidId(_) => ItemError::NotFound,
        }
    }
}

/// Data for the create form.
#[derive(Debug, Clone, Serialize)]
pub struct CreateForm {
    pub categories: Vec<Category>,
    pub category_types: Vec<CategoryTypeOption>,
}

/// An item with its category description resolved.
#[derive(Debug, Clone, Serialize)]
pub struct ItemDetail {
    pub item: Item,
    pub category_description: String,
}

/// Data for the edit form.
#[derive(Debug, Clone, Serialize)]
pub struct EditForm {
    pub item: Item,
    pub categories: Vec<Category>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum SerialRule {
    MustBeUnique,
    Unchecked,
}

#[derive(Clone)]
pub struct ItemService {
    items: Arc<dyn ItemRepository>,
    categories: Arc<dyn CategoryRepository>,
}

impl ItemService {
    pub fn new(items: Arc<dyn ItemRepository>, categories: Arc<dyn CategoryRepository>) -> Self {
        Self { items, categories }
    }

    /// One page of items, optionally filtered by a substring search.
    pub async fn list(
        &self,
        search: Option<&str>,
        page: PageRequest,
    ) -> Result<Page<ItemListing>, ItemError> {
        self.items
            .search(search, page)
            .await
            .map_err(|e| store_failure(failures::LOAD, None, e))
    }

    pub async fn create_form(&self) -> Result<CreateForm, ItemError> {
        let categories = self.all_categories().await?;
        Ok(CreateForm {
            categories,
            category_types: CategoryType::options(),
        })
    }

    pub async fn create(&self, input: ItemForm) -> Result<Item, ItemError> {
        let fields = self.check(&input, SerialRule::MustBeUnique, failures::SAVE).await?;

        match self.items.insert(&fields).await {
            Ok(item) => {
                tracing::info!(item_id = %item.id, serial = %item.serial, "item created");
                Ok(item)
            }
            // Lost a race with a concurrent create of the same serial.
            Err(StoreError::UniqueViolation(_)) => {
                let mut errors = ValidationErrors::new();
                errors.add("serial", messages::SERIAL_TAKEN);
                Err(ItemError::Validation { errors, input })
            }
            Err(StoreError::ForeignKeyViolation(_)) => {
                let mut errors = ValidationErrors::new();
                errors.add("category_id", messages::CATEGORY_UNKNOWN);
                Err(ItemError::Validation { errors, input })
            }
            Err(e) => Err(store_failure(failures::SAVE, Some(input), e)),
        }
    }

    pub async fn show(&self, id: ItemId) -> Result<ItemDetail, ItemError> {
        let item = self.find(id).await?;
        let category = self
            .categories
            .find(item.category_id)
            .await
            .map_err(|e| store_failure(failures::LOAD, None, e))?
            .ok_or(ItemError::NotFound)?;

        Ok(ItemDetail {
            item,
            category_description: category.description,
        })
    }

    pub async fn edit_form(&self, id: ItemId) -> Result<EditForm, ItemError> {
        let item = self.find(id).await?;
        let categories = self.all_categories().await?;
        Ok(EditForm { item, categories })
    }

    /// Overwrite all mutable fields of an item.
    ///
    /// Serial uniqueness is not re-checked here; a duplicate is only caught
    /// by the store's own constraint and reported as a generic failure.
    pub async fn update(&self, id: ItemId, input: ItemForm) -> Result<Item, ItemError> {
        let fields = self.check(&input, SerialRule::Unchecked, failures::UPDATE).await?;

        match self.items.update(id, &fields).await {
            Ok(Some(item)) => {
                tracing::info!(item_id = %item.id, "item updated");
                Ok(item)
            }
            Ok(None) => Err(ItemError::NotFound),
            Err(e) => Err(store_failure(failures::UPDATE, Some(input), e)),
        }
    }

    pub async fn destroy(&self, id: ItemId) -> Result<(), ItemError> {
        match self.items.delete(id).await {
            Ok(true) => {
                tracing::info!(item_id = %id, "item deleted");
                Ok(())
            }
            Ok(false) => Err(ItemError::NotFound),
            Err(e) => Err(store_failure(failures::DELETE, None, e)),
        }
    }

    async fn find(&self, id: ItemId) -> Result<Item, ItemError> {
        self.items
            .find(id)
            .await
            .map_err(|e| store_failure(failures::LOAD, None, e))?
            .ok_or(ItemError::NotFound)
    }

    async fn all_categories(&self) -> Result<Vec<Category>, ItemError> {
        self.categories
            .list()
            .await
            .map_err(|e| store_failure(failures::LOAD, None, e))
    }

    /// Field rules first, then the store-backed rules for fields that passed.
    async fn check(
        &self,
        input: &ItemForm,
        serial_rule: SerialRule,
        failure: &'static str,
    ) -> Result<ItemFields, ItemError> {
        let mut errors = ValidationErrors::new();
        let fields = match form::validate(input) {
            Ok(fields) => Some(fields),
            Err(field_errors) => {
                errors.merge(field_errors);
                None
            }
        };

        if serial_rule == SerialRule::MustBeUnique && !errors.has("serial") {
            if let Some(serial) = input.serial() {
                let taken = self
                    .items
                    .serial_exists(serial)
                    .await
                    .map_err(|e| store_failure(failure, Some(input.clone()), e))?;
                if taken {
                    errors.add("serial", messages::SERIAL_TAKEN);
                }
            }
        }

        if !errors.has("category_id") {
            if let Some(category_id) = input.category_id() {
                let exists = self
                    .categories
                    .exists(category_id)
                    .await
                    .map_err(|e| store_failure(failure, Some(input.clone()), e))?;
                if !exists {
                    errors.add("category_id", messages::CATEGORY_UNKNOWN);
                }
            }
        }

        match fields {
            Some(fields) if errors.is_empty() => Ok(fields),
            _ => Err(ItemError::Validation {
                errors,
                input: input.clone(),
            }),
        }
    }
}

fn store_failure(message: &'static str, input: Option<ItemForm>, source: StoreError) -> ItemError {
    tracing::error!(error = %source, "{message}");
    ItemError::Persistence {
        message,
        input,
        source,
    }
}

/// Everything the routes need, shared behind an `Arc`.
#[derive(Clone)]
pub struct AppServices {
    pub items: ItemService,
}

pub fn build_services(pool: SqlitePool) -> AppServices {
    let items: Arc<dyn ItemRepository> = Arc::new(SqliteItemRepository::new(pool.clone()));
    let categories: Arc<dyn CategoryRepository> = Arc::new(SqliteCategoryRepository::new(pool));
    AppServices {
        items: ItemService::new(items, categories),
    }
}
