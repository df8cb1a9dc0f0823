//! Revenue aggregation
//!
//! Sums order totals per time bucket. Attribution is at the sale
//! level: when a product or category filter pulled a sale in via one
//! matching line item, the order's full `total_amount` still lands in
//! its bucket. Per-line attribution was considered and deliberately
//! not adopted, to keep parity with how the dashboards have always
//! reported filtered revenue.

use crate::models::SaleRecord;

use super::bucket::bucket_key;
use super::{Granularity, RevenueSummary};

/// Aggregate filtered sales into a total and a per-bucket series
pub fn aggregate_revenue(sales: &[SaleRecord], granularity: Granularity) -> RevenueSummary {
    if sales.is_empty() {
        return RevenueSummary::empty();
    }

    let mut summary = RevenueSummary::empty();
    for sale in sales {
        let key = bucket_key(sale.order_date, granularity);
        *summary.revenue_by_period.entry(key).or_insert(0.0) += sale.total_amount;
        summary.total_revenue += sale.total_amount;
    }

    summary
}
