//! Submitted item input and its validation rules.
//!
//! Store-dependent rules (serial uniqueness, category existence) are not
//! checked here; the item service layers them on top of [`validate`].

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;

use stockroom_core::{CategoryId, ValidationErrors};

use crate::item::ItemFields;

/// User-facing validation messages, keyed by rule.
pub mod messages {
    pub const BRAND_REQUIRED: &str = "brand is required";
    pub const SERIAL_REQUIRED: &str = "serial is required";
    pub const SERIAL_TAKEN: &str = "serial already exists";
    pub const SPECIFICATION_REQUIRED: &str = "specification is required";
    pub const CATEGORY_REQUIRED: &str = "category must be selected";
    pub const CATEGORY_UNKNOWN: &str = "selected category does not exist";
    pub const STOCK_NOT_A_NUMBER: &str = "stock must be a number";
    pub const STOCK_NEGATIVE: &str = "stock must be at least 0";
}

/// Raw item input as submitted by a form or JSON client.
///
/// Every field is optional text; numbers sent by JSON clients are accepted
/// and kept in their textual form so the input can be echoed back verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemForm {
    #[serde(default, deserialize_with = "lenient_text")]
    pub brand: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub serial: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub specification: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub category_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub stock: Option<String>,
}

impl ItemForm {
    pub fn brand(&self) -> Option<&str> {
        present(&self.brand)
    }

    pub fn serial(&self) -> Option<&str> {
        present(&self.serial)
    }

    pub fn specification(&self) -> Option<&str> {
        present(&self.specification)
    }

    /// Parsed category reference, if one was submitted and is an integer.
    pub fn category_id(&self) -> Option<CategoryId> {
        present(&self.category_id).and_then(|s| s.parse().ok())
    }
}

/// Trimmed value, with blank strings treated as absent.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Apply the store-independent rules to `form`.
///
/// Every failing field is reported, one message per field.
pub fn validate(form: &ItemForm) -> Result<ItemFields, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let brand = form.brand();
    if brand.is_none() {
        errors.add("brand", messages::BRAND_REQUIRED);
    }

    let serial = form.serial();
    if serial.is_none() {
        errors.add("serial", messages::SERIAL_REQUIRED);
    }

    let specification = form.specification();
    if specification.is_none() {
        errors.add("specification", messages::SPECIFICATION_REQUIRED);
    }

    let category_id = match present(&form.category_id) {
        None => {
            errors.add("category_id", messages::CATEGORY_REQUIRED);
            None
        }
        Some(raw) => match raw.parse::<CategoryId>() {
            Ok(id) => Some(id),
            Err(_) => {
                errors.add("category_id", messages::CATEGORY_UNKNOWN);
                None
            }
        },
    };

    let stock = match present(&form.stock) {
        None => Some(0),
        Some(raw) => match raw.parse::<i64>() {
            Ok(n) if n >= 0 => Some(n),
            Ok(_) => {
                errors.add("stock", messages::STOCK_NEGATIVE);
                None
            }
            Err(_) => {
                errors.add("stock", messages::STOCK_NOT_A_NUMBER);
                None
            }
        },
    };

    match (brand, serial, specification, category_id, stock) {
        (Some(brand), Some(serial), Some(specification), Some(category_id), Some(stock))
            if errors.is_empty() =>
        {
            Ok(ItemFields {
                brand: brand.to_string(),
                serial: serial.to_string(),
                specification: specification.to_string(),
                stock,
                category_id,
            })
        }
        _ => Err(errors),
    }
}

/// Accepts any submitted value as text.
///
/// Numbers and booleans keep their literal spelling and arrays or objects
/// their JSON text, so a malformed value fails the field's own rule instead
/// of rejecting the whole body. `null` is absent.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = JsonValue::deserialize(deserializer)?;
    Ok(match value {
        JsonValue::Null => None,
        JsonValue::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}
