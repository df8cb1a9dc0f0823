//! Dashboard query entry points
//!
//! Each function performs one bulk read against the store, hands the
//! fetched snapshot to the analytics engine, and shapes the response
//! payload. Parameters are assumed pre-validated by the caller; "no
//! matching data" always yields a zero aggregate, never an error.

use chrono::Utc;
use serde::Serialize;
use tracing::debug;

use crate::analytics::{
    bucket::format_date,
    compare::{build_comparison, period_revenue, resolve_previous_window},
    filter::apply_item_filter,
    inventory::{evaluate_inventory, low_stock_alerts as evaluate_alerts},
    revenue::aggregate_revenue,
    sales::aggregate_sales,
    CompareParams, ComparisonResult, InventoryParams, InventorySummary, LowStockAlert,
    RevenueParams, RevenueSummary, SalesParams, SalesSummary,
};
use crate::db::queries::{self, PlatformStat, TopProduct};
use crate::db::Database;
use crate::AnalyticsError;

/// Number of products shown in the dashboard top-products list
const TOP_PRODUCT_LIMIT: u32 = 5;

/// Window descriptor echoed back in the dashboard summary
#[derive(Debug, Clone, Serialize)]
pub struct PeriodInfo {
    pub start_date: String,
    pub end_date: String,
    pub days: u32,
}

/// Order-level rollup for the dashboard summary
#[derive(Debug, Clone, Serialize)]
pub struct SalesOverview {
    pub total_orders: u32,
    pub average_order_value: f64,
}

/// Revenue rollup for the dashboard summary
#[derive(Debug, Clone, Serialize)]
pub struct RevenueOverview {
    pub total_revenue: f64,
    pub revenue_change_percent: f64,
}

/// Inventory rollup for the dashboard summary
#[derive(Debug, Clone, Serialize)]
pub struct InventoryOverview {
    pub total_products: u32,
    pub out_of_stock: u32,
    pub low_stock_alerts: u32,
}

/// Composite payload backing the main dashboard view
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub period: PeriodInfo,
    pub sales_summary: SalesOverview,
    pub revenue_summary: RevenueOverview,
    pub inventory_summary: InventoryOverview,
    pub top_products: Vec<TopProduct>,
    pub platform_distribution: Vec<PlatformStat>,
}

/// Revenue over time, bucketed at the requested granularity
pub fn revenue_analytics(
    db: &Database,
    params: &RevenueParams,
) -> Result<RevenueSummary, AnalyticsError> {
    debug!(
        start = %params.start_date,
        end = %params.end_date,
        granularity = ?params.granularity,
        "revenue query"
    );

    let sales = db.with_connection(|conn| {
        queries::fetch_sales_with_items(
            conn,
            params.start_date,
            params.end_date,
            params.platform.as_deref(),
        )
    })?;
    let sales = apply_item_filter(sales, params.product_id, params.category_id);

    Ok(aggregate_revenue(&sales, params.granularity))
}

/// Order counts, revenue, and average order value with a daily breakdown
pub fn sales_analytics(
    db: &Database,
    params: &SalesParams,
) -> Result<SalesSummary, AnalyticsError> {
    debug!(start = %params.start_date, end = %params.end_date, "sales query");

    let sales = db.with_connection(|conn| {
        queries::fetch_sales_with_items(
            conn,
            params.start_date,
            params.end_date,
            params.platform.as_deref(),
        )
    })?;

    Ok(aggregate_sales(sales, params.product_id, params.category_id))
}

/// Inventory health for the combined analytics view
pub fn inventory_analytics(
    db: &Database,
    params: &InventoryParams,
) -> Result<InventorySummary, AnalyticsError> {
    let levels = db.with_connection(|conn| queries::fetch_stock_levels(conn, params.category_id))?;
    Ok(evaluate_inventory(&levels, params.low_stock_only))
}

/// Dedicated low-stock listing; an override replaces per-row thresholds
pub fn low_stock_alerts(
    db: &Database,
    threshold_override: Option<i64>,
) -> Result<Vec<LowStockAlert>, AnalyticsError> {
    let levels = db.with_connection(|conn| queries::fetch_stock_levels(conn, None))?;
    Ok(evaluate_alerts(&levels, threshold_override))
}

/// Revenue for two windows plus their comparison block
///
/// Omitted previous bounds derive an immediately preceding window of
/// identical length.
pub fn compare_revenue_periods(
    db: &Database,
    params: &CompareParams,
) -> Result<ComparisonResult, AnalyticsError> {
    let (previous_start, previous_end) = resolve_previous_window(
        params.current_start,
        params.current_end,
        params.previous_start,
        params.previous_end,
    );
    debug!(
        current_start = %params.current_start,
        current_end = %params.current_end,
        previous_start = %previous_start,
        previous_end = %previous_end,
        "comparison query"
    );

    let current = revenue_analytics(
        db,
        &RevenueParams {
            start_date: params.current_start,
            end_date: params.current_end,
            granularity: params.granularity,
            product_id: params.product_id,
            category_id: params.category_id,
            platform: params.platform.clone(),
        },
    )?;
    let previous = revenue_analytics(
        db,
        &RevenueParams {
            start_date: previous_start,
            end_date: previous_end,
            granularity: params.granularity,
            product_id: params.product_id,
            category_id: params.category_id,
            platform: params.platform.clone(),
        },
    )?;

    Ok(build_comparison(
        period_revenue(params.current_start, params.current_end, current),
        period_revenue(previous_start, previous_end, previous),
    ))
}

/// Composite dashboard payload over a trailing window ending today
pub fn dashboard_summary(db: &Database, period_days: u32) -> Result<DashboardSummary, AnalyticsError> {
    let end_date = Utc::now().date_naive();
    let start_date = end_date - chrono::Duration::days(period_days as i64);

    let sales = sales_analytics(
        db,
        &SalesParams {
            start_date,
            end_date,
            product_id: None,
            category_id: None,
            platform: None,
        },
    )?;

    let comparison = compare_revenue_periods(
        db,
        &CompareParams {
            current_start: start_date,
            current_end: end_date,
            previous_start: None,
            previous_end: None,
            granularity: Default::default(),
            product_id: None,
            category_id: None,
            platform: None,
        },
    )?;

    let inventory = inventory_analytics(
        db,
        &InventoryParams {
            category_id: None,
            low_stock_only: true,
        },
    )?;

    let (top_products, platform_distribution) = db.with_connection(|conn| {
        let top = queries::top_products(conn, start_date, end_date, TOP_PRODUCT_LIMIT)?;
        let platforms = queries::platform_distribution(conn, start_date, end_date)?;
        Ok((top, platforms))
    })?;

    Ok(DashboardSummary {
        period: PeriodInfo {
            start_date: format_date(start_date),
            end_date: format_date(end_date),
            days: period_days,
        },
        sales_summary: SalesOverview {
            total_orders: sales.total_sales,
            average_order_value: sales.average_order_value,
        },
        revenue_summary: RevenueOverview {
            total_revenue: comparison.current_period.total_revenue,
            revenue_change_percent: comparison.comparison.percent_change,
        },
        inventory_summary: InventoryOverview {
            total_products: inventory.total_products,
            out_of_stock: inventory.out_of_stock_products,
            low_stock_alerts: inventory.low_stock_alerts.len() as u32,
        },
        top_products,
        platform_distribution,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::Granularity;
    use crate::db::queries::{
        insert_category, insert_customer, insert_inventory, insert_product, insert_sale,
    };
    use crate::models::{NewCategory, NewCustomer, NewInventory, NewProduct, NewSale, NewSaleItem};
    use chrono::{NaiveDate, NaiveDateTime};

    fn ts(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(14, 0, 0)
            .unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    struct Fixture {
        db: Database,
        category_a: i64,
        category_b: i64,
        product_a: i64,
        product_b: i64,
        customer: i64,
    }

    fn fixture() -> Fixture {
        let db = Database::open_in_memory().unwrap();
        db.initialize().unwrap();

        let (category_a, category_b, product_a, product_b, customer) = db
            .with_connection(|conn| {
                let cat_a = insert_category(
                    conn,
                    &NewCategory {
                        name: "Audio".to_string(),
                        description: None,
                    },
                )?;
                let cat_b = insert_category(
                    conn,
                    &NewCategory {
                        name: "Video".to_string(),
                        description: None,
                    },
                )?;
                let prod_a = insert_product(
                    conn,
                    &NewProduct {
                        name: "Headphones".to_string(),
                        description: None,
                        sku: "HP-01".to_string(),
                        price: 100.0,
                        category_id: cat_a.id,
                    },
                )?;
                let prod_b = insert_product(
                    conn,
                    &NewProduct {
                        name: "Webcam".to_string(),
                        description: None,
                        sku: "WC-01".to_string(),
                        price: 75.0,
                        category_id: cat_b.id,
                    },
                )?;
                for product_id in [prod_a.id, prod_b.id] {
                    insert_inventory(
                        conn,
                        &NewInventory {
                            product_id,
                            quantity: 100,
                            location: None,
                            low_stock_threshold: 10,
                        },
                    )?;
                }
                let customer = insert_customer(
                    conn,
                    &NewCustomer {
                        name: "Grace".to_string(),
                        email: None,
                        phone: None,
                        address: None,
                    },
                )?;
                Ok((cat_a.id, cat_b.id, prod_a.id, prod_b.id, customer.id))
            })
            .unwrap();

        Fixture {
            db,
            category_a,
            category_b,
            product_a,
            product_b,
            customer,
        }
    }

    fn add_sale(
        fx: &Fixture,
        order_number: &str,
        when: NaiveDateTime,
        platform: &str,
        amount: f64,
        product_id: i64,
    ) {
        fx.db
            .with_connection(|conn| {
                insert_sale(
                    conn,
                    &NewSale {
                        order_number: order_number.to_string(),
                        order_date: when,
                        customer_id: fx.customer,
                        total_amount: amount,
                        platform: platform.to_string(),
                        status: "completed".to_string(),
                        items: vec![NewSaleItem {
                            product_id,
                            quantity: 1,
                            unit_price: amount,
                            discount: 0.0,
                        }],
                    },
                )
            })
            .unwrap();
    }

    #[test]
    fn test_weekly_revenue_scenario() {
        let fx = fixture();
        // Jan 1 2024 is a Monday; Jan 8 falls in the next ISO week
        add_sale(&fx, "ORD-1", ts(2024, 1, 1), "amazon", 100.0, fx.product_a);
        add_sale(&fx, "ORD-2", ts(2024, 1, 2), "website", 50.0, fx.product_a);
        add_sale(&fx, "ORD-3", ts(2024, 1, 8), "amazon", 75.0, fx.product_a);

        let summary = revenue_analytics(
            &fx.db,
            &RevenueParams {
                start_date: date(2024, 1, 1),
                end_date: date(2024, 1, 31),
                granularity: Granularity::Week,
                product_id: None,
                category_id: None,
                platform: None,
            },
        )
        .unwrap();

        assert_eq!(summary.revenue_by_period.len(), 2);
        assert!((summary.revenue_by_period["2024-01-01"] - 150.0).abs() < 1e-9);
        assert!((summary.revenue_by_period["2024-01-08"] - 75.0).abs() < 1e-9);
        assert!((summary.total_revenue - 225.0).abs() < 1e-9);
    }

    #[test]
    fn test_revenue_zero_state_on_empty_range() {
        let fx = fixture();
        let summary = revenue_analytics(
            &fx.db,
            &RevenueParams {
                start_date: date(2023, 1, 1),
                end_date: date(2023, 12, 31),
                granularity: Granularity::Day,
                product_id: None,
                category_id: None,
                platform: None,
            },
        )
        .unwrap();

        assert_eq!(summary.total_revenue, 0.0);
        assert!(summary.revenue_by_period.is_empty());
    }

    #[test]
    fn test_category_filter_attributes_full_order_total() {
        let fx = fixture();
        // One order with items in both categories
        fx.db
            .with_connection(|conn| {
                insert_sale(
                    conn,
                    &NewSale {
                        order_number: "ORD-MIX".to_string(),
                        order_date: ts(2024, 2, 1),
                        customer_id: fx.customer,
                        total_amount: 175.0,
                        platform: "website".to_string(),
                        status: "completed".to_string(),
                        items: vec![
                            NewSaleItem {
                                product_id: fx.product_a,
                                quantity: 1,
                                unit_price: 100.0,
                                discount: 0.0,
                            },
                            NewSaleItem {
                                product_id: fx.product_b,
                                quantity: 1,
                                unit_price: 75.0,
                                discount: 0.0,
                            },
                        ],
                    },
                )
            })
            .unwrap();

        let summary = revenue_analytics(
            &fx.db,
            &RevenueParams {
                start_date: date(2024, 2, 1),
                end_date: date(2024, 2, 28),
                granularity: Granularity::Day,
                product_id: None,
                category_id: Some(fx.category_b),
                platform: None,
            },
        )
        .unwrap();

        // The whole order lands in the bucket, not just the matching line
        assert!((summary.total_revenue - 175.0).abs() < 1e-9);
        assert!((summary.revenue_by_period["2024-02-01"] - 175.0).abs() < 1e-9);

        let miss = revenue_analytics(
            &fx.db,
            &RevenueParams {
                start_date: date(2024, 2, 1),
                end_date: date(2024, 2, 28),
                granularity: Granularity::Day,
                product_id: None,
                category_id: Some(fx.category_b + 100),
                platform: None,
            },
        )
        .unwrap();
        assert_eq!(miss.total_revenue, 0.0);
    }

    #[test]
    fn test_sales_analytics_counts_and_daily_breakdown() {
        let fx = fixture();
        add_sale(&fx, "ORD-1", ts(2024, 3, 1), "website", 100.0, fx.product_a);
        add_sale(&fx, "ORD-2", ts(2024, 3, 1), "amazon", 50.0, fx.product_a);
        add_sale(&fx, "ORD-3", ts(2024, 3, 2), "website", 75.0, fx.product_b);

        let summary = sales_analytics(
            &fx.db,
            &SalesParams {
                start_date: date(2024, 3, 1),
                end_date: date(2024, 3, 31),
                product_id: None,
                category_id: None,
                platform: None,
            },
        )
        .unwrap();

        assert_eq!(summary.total_sales, 3);
        assert!((summary.average_order_value - 75.0).abs() < 1e-9);
        assert_eq!(summary.sales_by_date["2024-03-01"].count, 2);
        assert_eq!(summary.sales_by_date["2024-03-02"].count, 1);

        // Platform filter applies at fetch time
        let website = sales_analytics(
            &fx.db,
            &SalesParams {
                start_date: date(2024, 3, 1),
                end_date: date(2024, 3, 31),
                product_id: None,
                category_id: None,
                platform: Some("website".to_string()),
            },
        )
        .unwrap();
        assert_eq!(website.total_sales, 2);

        // Product filter applies as the second phase
        let product_b_only = sales_analytics(
            &fx.db,
            &SalesParams {
                start_date: date(2024, 3, 1),
                end_date: date(2024, 3, 31),
                product_id: Some(fx.product_b),
                category_id: None,
                platform: None,
            },
        )
        .unwrap();
        assert_eq!(product_b_only.total_sales, 1);
        assert!((product_b_only.total_revenue - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_compare_periods_with_derived_previous_window() {
        let fx = fixture();
        add_sale(&fx, "ORD-P", ts(2024, 2, 25), "website", 200.0, fx.product_a);
        add_sale(&fx, "ORD-C", ts(2024, 3, 5), "website", 250.0, fx.product_a);

        let result = compare_revenue_periods(
            &fx.db,
            &CompareParams {
                current_start: date(2024, 3, 1),
                current_end: date(2024, 3, 10),
                previous_start: None,
                previous_end: None,
                granularity: Granularity::Day,
                product_id: None,
                category_id: None,
                platform: None,
            },
        )
        .unwrap();

        // Ten-day window ending the day before the current start
        assert_eq!(result.previous_period.start_date, "2024-02-20");
        assert_eq!(result.previous_period.end_date, "2024-02-29");
        assert!((result.previous_period.total_revenue - 200.0).abs() < 1e-9);
        assert!((result.current_period.total_revenue - 250.0).abs() < 1e-9);
        assert!((result.comparison.absolute_change - 50.0).abs() < 1e-9);
        assert!((result.comparison.percent_change - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_compare_periods_infinite_growth_from_nothing() {
        let fx = fixture();
        add_sale(&fx, "ORD-C", ts(2024, 3, 5), "website", 100.0, fx.product_a);

        let result = compare_revenue_periods(
            &fx.db,
            &CompareParams {
                current_start: date(2024, 3, 1),
                current_end: date(2024, 3, 10),
                previous_start: None,
                previous_end: None,
                granularity: Granularity::Day,
                product_id: None,
                category_id: None,
                platform: None,
            },
        )
        .unwrap();
        assert_eq!(result.comparison.percent_change, f64::INFINITY);

        // Nothing in either window
        let flat = compare_revenue_periods(
            &fx.db,
            &CompareParams {
                current_start: date(2020, 1, 1),
                current_end: date(2020, 1, 10),
                previous_start: None,
                previous_end: None,
                granularity: Granularity::Day,
                product_id: None,
                category_id: None,
                platform: None,
            },
        )
        .unwrap();
        assert_eq!(flat.comparison.percent_change, 0.0);
    }

    #[test]
    fn test_inventory_endpoints_diverge_on_override() {
        let fx = fixture();
        fx.db
            .with_connection(|conn| {
                let inv = queries::get_inventory_by_product(conn, fx.product_a)?.unwrap();
                queries::update_inventory(
                    conn,
                    inv.id,
                    &crate::models::InventoryPatch::quantity(5),
                    None,
                )?;
                Ok(())
            })
            .unwrap();

        // quantity 5 <= own threshold 10: flagged by both paths
        let summary = inventory_analytics(&fx.db, &InventoryParams::default()).unwrap();
        assert_eq!(summary.total_products, 2);
        assert_eq!(summary.low_stock_alerts.len(), 1);

        let alerts = low_stock_alerts(&fx.db, None).unwrap();
        assert_eq!(alerts.len(), 1);

        // An override of 3 drops it from the dedicated listing only
        let alerts = low_stock_alerts(&fx.db, Some(3)).unwrap();
        assert!(alerts.is_empty());
        let summary = inventory_analytics(&fx.db, &InventoryParams::default()).unwrap();
        assert_eq!(summary.low_stock_alerts.len(), 1);
    }

    #[test]
    fn test_dashboard_summary_composition() {
        let fx = fixture();
        let today = Utc::now().date_naive();
        let in_window = today - chrono::Duration::days(2);
        let when = in_window.and_hms_opt(9, 0, 0).unwrap();
        add_sale(&fx, "ORD-NOW", when, "website", 120.0, fx.product_a);

        let summary = dashboard_summary(&fx.db, 30).unwrap();

        assert_eq!(summary.period.days, 30);
        assert_eq!(summary.sales_summary.total_orders, 1);
        assert!((summary.sales_summary.average_order_value - 120.0).abs() < 1e-9);
        assert!((summary.revenue_summary.total_revenue - 120.0).abs() < 1e-9);
        // No sales in the preceding window
        assert_eq!(summary.revenue_summary.revenue_change_percent, f64::INFINITY);
        assert_eq!(summary.inventory_summary.total_products, 2);
        assert_eq!(summary.inventory_summary.out_of_stock, 0);
        assert_eq!(summary.top_products.len(), 1);
        assert_eq!(summary.top_products[0].total_sold, 1);
        assert_eq!(summary.platform_distribution.len(), 1);
        assert_eq!(summary.platform_distribution[0].platform, "website");
    }
}
