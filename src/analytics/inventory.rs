//! Inventory health evaluation
//!
//! Two entry points with distinct threshold handling:
//! - `evaluate_inventory` feeds the combined inventory analytics view;
//!   the alert list is always gated by each row's own threshold.
//! - `low_stock_alerts` feeds the dedicated alerts listing, where a
//!   caller-supplied override replaces the per-row threshold.

use crate::models::StockLevel;

use super::{InventorySummary, LowStockAlert};

/// Roll up stock levels into the combined inventory health summary
///
/// `low_stock_only` skips rows above their own threshold before alert
/// evaluation; since the alert condition is the same per-row check,
/// the flag narrows nothing further, but total and out-of-stock counts
/// always cover the full set.
pub fn evaluate_inventory(levels: &[StockLevel], low_stock_only: bool) -> InventorySummary {
    let total_products = levels.len() as u32;
    let out_of_stock_products = levels.iter().filter(|l| l.quantity == 0).count() as u32;

    let mut low_stock = Vec::new();
    for level in levels {
        if low_stock_only && level.quantity > level.low_stock_threshold {
            continue;
        }

        if level.quantity <= level.low_stock_threshold {
            low_stock.push(LowStockAlert {
                product_id: level.product_id,
                product_name: level.product_name.clone(),
                current_quantity: level.quantity,
                threshold: level.low_stock_threshold,
            });
        }
    }

    InventorySummary {
        total_products,
        out_of_stock_products,
        low_stock_alerts: low_stock,
    }
}

/// Build the dedicated low-stock alert list
///
/// With an override, membership and the reported threshold both use
/// the override; otherwise each row's own threshold applies.
pub fn low_stock_alerts(
    levels: &[StockLevel],
    threshold_override: Option<i64>,
) -> Vec<LowStockAlert> {
    levels
        .iter()
        .filter_map(|level| {
            let threshold = threshold_override.unwrap_or(level.low_stock_threshold);
            if level.quantity <= threshold {
                Some(LowStockAlert {
                    product_id: level.product_id,
                    product_name: level.product_name.clone(),
                    current_quantity: level.quantity,
                    threshold,
                })
            } else {
                None
            }
        })
        .collect()
}
