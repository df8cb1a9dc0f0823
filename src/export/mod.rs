//! Export module for CSV and JSON export functionality
//!
//! Flattens sales rows and revenue series into exportable records and
//! writes them to disk in either format.

pub mod csv_export;
pub mod json_export;

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::models::Sale;
use crate::AnalyticsError;

/// Export format options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Json,
}

impl std::str::FromStr for ExportFormat {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            _ => Err(AnalyticsError::Internal(format!(
                "Invalid export format: {}. Use 'csv' or 'json'",
                s
            ))),
        }
    }
}

impl ExportFormat {
    /// Get file extension for format
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

/// Exportable sale record for CSV/JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportableSale {
    pub order_number: String,
    pub order_date: String,
    pub customer_id: i64,
    pub platform: String,
    pub status: String,
    pub total_amount: f64,
}

impl From<&Sale> for ExportableSale {
    fn from(sale: &Sale) -> Self {
        Self {
            order_number: sale.order_number.clone(),
            order_date: sale.order_date.format("%Y-%m-%dT%H:%M:%S").to_string(),
            customer_id: sale.customer_id,
            platform: sale.platform.clone(),
            status: sale.status.clone(),
            total_amount: sale.total_amount,
        }
    }
}

/// One point of a bucketed revenue series
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportableRevenuePoint {
    pub period: String,
    pub revenue: f64,
}

/// Flatten a revenue-by-period map into exportable points,
/// chronological order preserved
pub fn revenue_points(revenue_by_period: &BTreeMap<String, f64>) -> Vec<ExportableRevenuePoint> {
    revenue_by_period
        .iter()
        .map(|(period, revenue)| ExportableRevenuePoint {
            period: period.clone(),
            revenue: *revenue,
        })
        .collect()
}

/// Get the default export directory (Downloads folder or temp dir)
pub fn get_export_directory() -> PathBuf {
    dirs::download_dir()
        .or_else(dirs::document_dir)
        .unwrap_or_else(std::env::temp_dir)
}

/// Generate a timestamped filename for exports
pub fn generate_export_filename(prefix: &str, extension: &str) -> String {
    let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
    format!("{}_{}.{}", prefix, timestamp, extension)
}

pub use csv_export::*;
pub use json_export::*;
