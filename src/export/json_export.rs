//! JSON export functionality
//!
//! Provides JSON serialization for sales and revenue series with a
//! small envelope carrying export metadata and summary totals.

use std::path::Path;

use serde::Serialize;

use super::{ExportableRevenuePoint, ExportableSale};
use crate::AnalyticsError;

const EXPORT_VERSION: &str = "1.0.0";

/// Complete export structure for sales
#[derive(Debug, Clone, Serialize)]
pub struct SalesExportJson {
    pub export_date: String,
    pub export_version: &'static str,
    pub total_sales: usize,
    pub total_revenue: f64,
    pub sales: Vec<ExportableSale>,
}

/// Complete export structure for a revenue series
#[derive(Debug, Clone, Serialize)]
pub struct RevenueExportJson {
    pub export_date: String,
    pub export_version: &'static str,
    pub total_revenue: f64,
    pub periods: Vec<ExportableRevenuePoint>,
}

fn export_date() -> String {
    chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<(), AnalyticsError> {
    let file = std::fs::File::create(path)
        .map_err(|e| AnalyticsError::Internal(format!("Failed to create JSON file: {}", e)))?;
    serde_json::to_writer_pretty(file, value)
        .map_err(|e| AnalyticsError::Internal(format!("Failed to write JSON: {}", e)))?;
    Ok(())
}

/// Write sales to JSON format
pub fn write_sales_json(sales: &[ExportableSale], path: &Path) -> Result<(), AnalyticsError> {
    let export = SalesExportJson {
        export_date: export_date(),
        export_version: EXPORT_VERSION,
        total_sales: sales.len(),
        total_revenue: sales.iter().map(|s| s.total_amount).sum(),
        sales: sales.to_vec(),
    };
    write_json(&export, path)
}

/// Write a revenue series to JSON format
pub fn write_revenue_json(
    points: &[ExportableRevenuePoint],
    path: &Path,
) -> Result<(), AnalyticsError> {
    let export = RevenueExportJson {
        export_date: export_date(),
        export_version: EXPORT_VERSION,
        total_revenue: points.iter().map(|p| p.revenue).sum(),
        periods: points.to_vec(),
    };
    write_json(&export, path)
}
