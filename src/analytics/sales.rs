//! Sales aggregation
//!
//! Counts orders and computes average order value over a fetched sale
//! set. The date range and platform were already applied at fetch
//! time; an optional product/category filter runs here as a second,
//! in-memory phase using the any-line-item rule. The per-date
//! breakdown is always daily.

use crate::models::SaleRecord;

use super::bucket::format_date;
use super::filter::apply_item_filter;
use super::SalesSummary;

/// Aggregate fetched sales into counts, revenue, and a daily breakdown
pub fn aggregate_sales(
    sales: Vec<SaleRecord>,
    product_id: Option<i64>,
    category_id: Option<i64>,
) -> SalesSummary {
    if sales.is_empty() {
        return SalesSummary::empty();
    }

    let sales = apply_item_filter(sales, product_id, category_id);

    let total_sales = sales.len() as u32;
    let total_revenue: f64 = sales.iter().map(|s| s.total_amount).sum();
    let average_order_value = if total_sales > 0 {
        total_revenue / total_sales as f64
    } else {
        0.0
    };

    let mut summary = SalesSummary {
        total_sales,
        total_revenue,
        average_order_value,
        ..SalesSummary::empty()
    };

    for sale in &sales {
        let date = format_date(sale.order_date.date());
        let entry = summary.sales_by_date.entry(date).or_default();
        entry.count += 1;
        entry.revenue += sale.total_amount;
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SaleItemRecord;
    use chrono::NaiveDate;

    fn sale(date: (i32, u32, u32), amount: f64, items: Vec<(i64, i64)>) -> SaleRecord {
        SaleRecord {
            id: 0,
            order_number: String::new(),
            order_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2)
                .unwrap()
                .and_hms_opt(11, 0, 0)
                .unwrap(),
            customer_id: 1,
            total_amount: amount,
            platform: "website".to_string(),
            status: "completed".to_string(),
            items: items
                .into_iter()
                .map(|(product_id, category_id)| SaleItemRecord {
                    product_id,
                    category_id,
                    quantity: 1,
                    unit_price: amount,
                    discount: 0.0,
                })
                .collect(),
        }
    }

    #[test]
    fn test_empty_set_returns_zero_state() {
        let summary = aggregate_sales(vec![], None, None);
        assert_eq!(summary.total_sales, 0);
        assert_eq!(summary.total_revenue, 0.0);
        assert_eq!(summary.average_order_value, 0.0);
        assert!(summary.sales_by_date.is_empty());
    }

    #[test]
    fn test_counts_revenue_and_average() {
        let sales = vec![
            sale((2024, 3, 1), 100.0, vec![(1, 10)]),
            sale((2024, 3, 1), 50.0, vec![(2, 10)]),
            sale((2024, 3, 2), 75.0, vec![(1, 10)]),
        ];

        let summary = aggregate_sales(sales, None, None);
        assert_eq!(summary.total_sales, 3);
        assert_eq!(summary.total_revenue, 225.0);
        assert!((summary.average_order_value - 75.0).abs() < 1e-9);

        let day1 = &summary.sales_by_date["2024-03-01"];
        assert_eq!(day1.count, 2);
        assert_eq!(day1.revenue, 150.0);
        let day2 = &summary.sales_by_date["2024-03-02"];
        assert_eq!(day2.count, 1);
        assert_eq!(day2.revenue, 75.0);
    }

    #[test]
    fn test_category_filter_includes_whole_sale() {
        // One item in category 10, one in category 20; the category 20
        // filter still attributes the full 100.0 order total
        let sales = vec![sale((2024, 3, 1), 100.0, vec![(1, 10), (2, 20)])];

        let summary = aggregate_sales(sales, None, Some(20));
        assert_eq!(summary.total_sales, 1);
        assert_eq!(summary.total_revenue, 100.0);
        assert_eq!(summary.sales_by_date["2024-03-01"].revenue, 100.0);
    }

    #[test]
    fn test_item_filter_can_empty_the_set() {
        let sales = vec![sale((2024, 3, 1), 100.0, vec![(1, 10)])];

        let summary = aggregate_sales(sales, Some(99), None);
        assert_eq!(summary.total_sales, 0);
        assert_eq!(summary.average_order_value, 0.0);
        assert!(summary.sales_by_date.is_empty());
    }
}
