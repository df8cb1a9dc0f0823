//! Sales data types
//!
//! Orders, their line items, and the customers that placed them.
//! `SaleRecord` is the joined read model the analytics engine consumes:
//! a sale with its line items pre-fetched, each carrying the product's
//! category so no lazy association lookup happens during aggregation.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Customer record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: String,
    pub updated_at: Option<String>,
}

/// Fields required to create a customer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCustomer {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Partial update for a customer; only `Some` fields are applied
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Full sale (order) record
///
/// `total_amount` is trusted as stored for order-level aggregation;
/// per-product revenue views recompute from line items instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sale {
    pub id: i64,
    pub order_number: String,
    pub order_date: NaiveDateTime,
    pub customer_id: i64,
    pub total_amount: f64,
    /// Sales channel tag, e.g. "website" or a marketplace name
    pub platform: String,
    pub status: String,
    pub created_at: String,
    pub updated_at: Option<String>,
}

/// One product-quantity-price entry within a sale
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleItem {
    pub id: i64,
    pub sale_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub unit_price: f64,
    /// Absolute discount amount, subtracted once per line
    pub discount: f64,
    pub created_at: String,
}

/// Line item payload when creating a sale
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSaleItem {
    pub product_id: i64,
    pub quantity: i64,
    pub unit_price: f64,
    #[serde(default)]
    pub discount: f64,
}

/// Fields required to create a sale together with its line items
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSale {
    pub order_number: String,
    pub order_date: NaiveDateTime,
    pub customer_id: i64,
    pub total_amount: f64,
    pub platform: String,
    pub status: String,
    pub items: Vec<NewSaleItem>,
}

/// Partial update for a sale; only `Some` fields are applied
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SalePatch {
    pub order_date: Option<NaiveDateTime>,
    pub total_amount: Option<f64>,
    pub platform: Option<String>,
    pub status: Option<String>,
}

/// Line item as seen by the analytics engine, with the product's
/// category pre-joined
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleItemRecord {
    pub product_id: i64,
    pub category_id: i64,
    pub quantity: i64,
    pub unit_price: f64,
    pub discount: f64,
}

/// Sale with eagerly fetched line items, the unit of aggregation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleRecord {
    pub id: i64,
    pub order_number: String,
    pub order_date: NaiveDateTime,
    pub customer_id: i64,
    pub total_amount: f64,
    pub platform: String,
    pub status: String,
    pub items: Vec<SaleItemRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_new_sale_item_discount_defaults_to_zero() {
        let item: NewSaleItem =
            serde_json::from_str(r#"{"product_id": 1, "quantity": 2, "unit_price": 9.99}"#)
                .unwrap();
        assert_eq!(item.discount, 0.0);
    }

    #[test]
    fn test_sale_record_serialization() {
        let record = SaleRecord {
            id: 7,
            order_number: "ORD-0007".to_string(),
            order_date: ts(2024, 3, 15),
            customer_id: 3,
            total_amount: 120.0,
            platform: "website".to_string(),
            status: "completed".to_string(),
            items: vec![SaleItemRecord {
                product_id: 1,
                category_id: 2,
                quantity: 2,
                unit_price: 60.0,
                discount: 0.0,
            }],
        };

        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"order_number\":\"ORD-0007\""));
        assert!(json.contains("\"total_amount\":120.0"));
        assert!(json.contains("\"category_id\":2"));
    }

    #[test]
    fn test_sale_patch_partial_deserialization() {
        let patch: SalePatch = serde_json::from_str(r#"{"status": "refunded"}"#).unwrap();
        assert_eq!(patch.status.as_deref(), Some("refunded"));
        assert!(patch.order_date.is_none());
        assert!(patch.total_amount.is_none());
    }
}
