//! Line-item filter resolution
//!
//! Product and category filters apply at the sale level: a sale is
//! included when ANY of its line items matches, and once included it
//! is counted whole. Date range and platform are resolved earlier, at
//! fetch time, so these predicates only see the already-fetched set.

use crate::models::SaleRecord;

/// True when the sale has at least one line item matching the product
/// or category filter; true unconditionally when neither filter is set
pub fn sale_matches_items(
    sale: &SaleRecord,
    product_id: Option<i64>,
    category_id: Option<i64>,
) -> bool {
    if product_id.is_none() && category_id.is_none() {
        return true;
    }

    sale.items.iter().any(|item| {
        if let Some(pid) = product_id {
            if item.product_id == pid {
                return true;
            }
        }
        if let Some(cid) = category_id {
            if item.category_id == cid {
                return true;
            }
        }
        false
    })
}

/// Retain only sales with a matching line item
pub fn apply_item_filter(
    sales: Vec<SaleRecord>,
    product_id: Option<i64>,
    category_id: Option<i64>,
) -> Vec<SaleRecord> {
    if product_id.is_none() && category_id.is_none() {
        return sales;
    }

    sales
        .into_iter()
        .filter(|sale| sale_matches_items(sale, product_id, category_id))
        .collect()
}
