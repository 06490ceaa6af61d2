//! Inventory domain module.
//!
//! Business rules for inventory items ("barang") and their categories,
//! implemented as plain data + pure validation (no IO, no HTTP, no storage).

pub mod category;
pub mod form;
pub mod item;

pub use category::{Category, CategoryType, CategoryTypeOption};
pub use form::{ItemForm, messages, validate};
pub use item::{Item, ItemFields, ItemListing};
