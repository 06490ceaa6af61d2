use chrono::{DateTime, Utc};
use serde::Serialize;

use stockroom_core::{CategoryId, ItemId};

/// Inventory item as persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Item {
    pub id: ItemId,
    pub brand: String,
    pub serial: String,
    pub specification: String,
    pub stock: i64,
    pub category_id: CategoryId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Listing row: an item joined with its category description.
///
/// `category_description` is `None` when the category reference dangles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemListing {
    pub id: ItemId,
    pub brand: String,
    pub serial: String,
    pub specification: String,
    pub stock: i64,
    pub category_id: CategoryId,
    pub category_description: Option<String>,
}

/// The five mutable fields of an item, already validated.
///
/// Used for both inserts and full overwrites.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemFields {
    pub brand: String,
    pub serial: String,
    pub specification: String,
    pub stock: i64,
    pub category_id: CategoryId,
}
