use serde::Serialize;

use stockroom_core::CategoryId;

/// Category an item belongs to. Read-only from the item handler's view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: CategoryId,
    pub description: String,
}

/// Category-type labels shown on the create form.
///
/// Display-only reference data: never persisted and never validated against.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum CategoryType {
    Blank,
    CapitalGoods,
    Tool,
    ConsumableSupply,
    NonConsumableSupply,
}

/// One entry of the category-type selection control.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTypeOption {
    pub value: &'static str,
    pub label: &'static str,
}

impl CategoryType {
    /// All entries, in display order.
    pub const ALL: [CategoryType; 5] = [
        CategoryType::Blank,
        CategoryType::CapitalGoods,
        CategoryType::Tool,
        CategoryType::ConsumableSupply,
        CategoryType::NonConsumableSupply,
    ];

    pub fn code(self) -> &'static str {
        match self {
            CategoryType::Blank => "blank",
            CategoryType::CapitalGoods => "M",
            CategoryType::Tool => "A",
            CategoryType::ConsumableSupply => "BHP",
            CategoryType::NonConsumableSupply => "BTHP",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CategoryType::Blank => "Select Category",
            CategoryType::CapitalGoods => "Capital Goods",
            CategoryType::Tool => "Tool",
            CategoryType::ConsumableSupply => "Consumable Supply",
            CategoryType::NonConsumableSupply => "Non-Consumable Supply",
        }
    }

    pub fn option(self) -> CategoryTypeOption {
        CategoryTypeOption {
            value: self.code(),
            label: self.label(),
        }
    }

    pub fn options() -> Vec<CategoryTypeOption> {
        Self::ALL.iter().map(|t| t.option()).collect()
    }
}
