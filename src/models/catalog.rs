//! Catalog data types
//!
//! Categories group products; products carry the current catalog price,
//! which is distinct from the historical unit price recorded on past
//! sale line items.

use serde::{Deserialize, Serialize};

/// Product grouping used as a filter dimension in analytics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: String,
    pub updated_at: Option<String>,
}

/// Fields required to create a category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: String,
    pub description: Option<String>,
}

/// Partial update for a category; only `Some` fields are applied
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Full product record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub sku: String,
    pub price: f64,
    pub category_id: i64,
    pub created_at: String,
    pub updated_at: Option<String>,
}

/// Fields required to create a product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub sku: String,
    pub price: f64,
    pub category_id: i64,
}

/// Partial update for a product; only `Some` fields are applied
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub sku: Option<String>,
    pub price: Option<f64>,
    pub category_id: Option<i64>,
}
