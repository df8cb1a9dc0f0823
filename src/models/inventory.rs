//! Inventory data types
//!
//! One inventory row per product, with an append-only history of
//! quantity transitions.

use serde::{Deserialize, Serialize};

/// Stock record for a single product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inventory {
    pub id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub location: Option<String>,
    /// Quantity at or below which the product is flagged for restocking
    pub low_stock_threshold: i64,
    pub last_restock_date: Option<String>,
    pub created_at: String,
    pub updated_at: Option<String>,
}

/// Fields required to create an inventory row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewInventory {
    pub product_id: i64,
    pub quantity: i64,
    pub location: Option<String>,
    #[serde(default = "default_threshold")]
    pub low_stock_threshold: i64,
}

fn default_threshold() -> i64 {
    10
}

/// Partial update for an inventory row; only `Some` fields are applied
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InventoryPatch {
    pub quantity: Option<i64>,
    pub location: Option<String>,
    pub low_stock_threshold: Option<i64>,
    pub last_restock_date: Option<String>,
}

impl InventoryPatch {
    /// Patch that only sets the quantity
    pub fn quantity(quantity: i64) -> Self {
        Self {
            quantity: Some(quantity),
            ..Self::default()
        }
    }
}

/// One quantity transition in the append-only history log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryHistoryEntry {
    pub id: i64,
    pub inventory_id: i64,
    pub previous_quantity: i64,
    pub new_quantity: i64,
    pub change_reason: Option<String>,
    pub created_at: String,
}

/// Inventory row joined with its product, as consumed by the
/// inventory health evaluator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockLevel {
    pub product_id: i64,
    pub product_name: String,
    pub quantity: i64,
    pub low_stock_threshold: i64,
}
