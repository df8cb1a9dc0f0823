//! Analytics aggregation engine
//!
//! This module turns raw transactional records into dashboard metrics:
//! - Time-bucketed revenue series at day/week/month/year granularity
//! - Sales counts and average order value
//! - Period-over-period revenue comparisons
//! - Inventory health and low-stock detection
//!
//! Everything here is a pure, synchronous reduction over records
//! fetched up front by the store layer; no function in this module
//! touches the database.

pub mod bucket;
pub mod compare;
pub mod filter;
pub mod inventory;
pub mod revenue;
pub mod sales;

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Bucket size selector for revenue queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Day,
    Week,
    Month,
    Year,
}

impl Default for Granularity {
    fn default() -> Self {
        Granularity::Day
    }
}

impl From<&str> for Granularity {
    /// Case-insensitive; unrecognized values fall back to day
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "week" => Granularity::Week,
            "month" => Granularity::Month,
            "year" => Granularity::Year,
            _ => Granularity::Day,
        }
    }
}

impl From<Option<String>> for Granularity {
    fn from(s: Option<String>) -> Self {
        match s {
            Some(val) => Granularity::from(val.as_str()),
            None => Granularity::default(),
        }
    }
}

/// Parameters for a revenue query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevenueParams {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub granularity: Granularity,
    pub product_id: Option<i64>,
    pub category_id: Option<i64>,
    pub platform: Option<String>,
}

/// Parameters for a sales query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesParams {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub product_id: Option<i64>,
    pub category_id: Option<i64>,
    pub platform: Option<String>,
}

/// Parameters for a period comparison query
///
/// When the previous window bounds are omitted, an immediately
/// preceding window of identical length is derived.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareParams {
    pub current_start: NaiveDate,
    pub current_end: NaiveDate,
    pub previous_start: Option<NaiveDate>,
    pub previous_end: Option<NaiveDate>,
    #[serde(default)]
    pub granularity: Granularity,
    pub product_id: Option<i64>,
    pub category_id: Option<i64>,
    pub platform: Option<String>,
}

/// Parameters for an inventory health query
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InventoryParams {
    pub category_id: Option<i64>,
    #[serde(default)]
    pub low_stock_only: bool,
}

/// Revenue totals with a time-bucketed breakdown
///
/// Bucket keys sort chronologically: ISO dates for day/week/month,
/// bare integers rendered as strings for year.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevenueSummary {
    pub total_revenue: f64,
    pub revenue_by_period: BTreeMap<String, f64>,
}

impl RevenueSummary {
    /// The defined zero-state for an empty filtered set
    pub fn empty() -> Self {
        Self {
            total_revenue: 0.0,
            revenue_by_period: BTreeMap::new(),
        }
    }
}

/// Count and revenue for a single calendar date
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DailySales {
    pub count: u32,
    pub revenue: f64,
}

/// Order counts, revenue, and average order value
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesSummary {
    pub total_sales: u32,
    pub total_revenue: f64,
    pub average_order_value: f64,
    /// Fixed at day granularity regardless of any caller preference
    pub sales_by_date: BTreeMap<String, DailySales>,
}

impl SalesSummary {
    /// The defined zero-state for an empty filtered set
    pub fn empty() -> Self {
        Self {
            total_sales: 0,
            total_revenue: 0.0,
            average_order_value: 0.0,
            sales_by_date: BTreeMap::new(),
        }
    }
}

/// Revenue summary for one bounded window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodRevenue {
    pub start_date: String,
    pub end_date: String,
    pub total_revenue: f64,
    pub revenue_by_period: BTreeMap<String, f64>,
}

/// Signed deltas between two periods
///
/// `percent_change` is +infinity when the previous total is zero and
/// the current total is positive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodDelta {
    pub absolute_change: f64,
    pub percent_change: f64,
}

/// Two period summaries plus their comparison block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub current_period: PeriodRevenue,
    pub previous_period: PeriodRevenue,
    pub comparison: PeriodDelta,
}

/// Projection of a stock row at or below its applied threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LowStockAlert {
    pub product_id: i64,
    pub product_name: String,
    pub current_quantity: i64,
    /// The threshold actually applied, per-row or override
    pub threshold: i64,
}

/// Inventory health rollup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventorySummary {
    pub total_products: u32,
    pub out_of_stock_products: u32,
    pub low_stock_alerts: Vec<LowStockAlert>,
}
