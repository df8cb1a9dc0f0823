//! CSV export functionality
//!
//! Provides CSV serialization for sales and revenue series.

use std::path::Path;

use csv::Writer;

use super::{ExportableRevenuePoint, ExportableSale};
use crate::AnalyticsError;

/// Write sales to CSV format
pub fn write_sales_csv(sales: &[ExportableSale], path: &Path) -> Result<(), AnalyticsError> {
    let file = std::fs::File::create(path)
        .map_err(|e| AnalyticsError::Internal(format!("Failed to create CSV file: {}", e)))?;

    let mut writer = Writer::from_writer(file);

    for sale in sales {
        writer
            .serialize(sale)
            .map_err(|e| AnalyticsError::Internal(format!("Failed to write CSV record: {}", e)))?;
    }

    writer
        .flush()
        .map_err(|e| AnalyticsError::Internal(format!("Failed to flush CSV: {}", e)))?;

    Ok(())
}

/// Write a revenue series to CSV format
pub fn write_revenue_csv(
    points: &[ExportableRevenuePoint],
    path: &Path,
) -> Result<(), AnalyticsError> {
    let file = std::fs::File::create(path)
        .map_err(|e| AnalyticsError::Internal(format!("Failed to create CSV file: {}", e)))?;

    let mut writer = Writer::from_writer(file);

    for point in points {
        writer
            .serialize(point)
            .map_err(|e| AnalyticsError::Internal(format!("Failed to write CSV record: {}", e)))?;
    }

    writer
        .flush()
        .map_err(|e| AnalyticsError::Internal(format!("Failed to flush CSV: {}", e)))?;

    Ok(())
}
