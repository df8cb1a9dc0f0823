//! Shopmetrics - E-commerce Admin Analytics Backend
//!
//! This library provides the storage and analytics backend for an
//! e-commerce admin dashboard. It handles:
//! - SQLite storage of catalog, inventory, customer, and sales records
//! - Time-bucketed revenue aggregation (day/week/month/year)
//! - Sales summaries and period-over-period comparisons
//! - Inventory health and low-stock detection
//! - CSV/JSON export of sales and revenue data

pub mod analytics;
pub mod dashboard;
pub mod db;
pub mod export;
pub mod models;

pub use analytics::{
    CompareParams, ComparisonResult, Granularity, InventoryParams, InventorySummary,
    LowStockAlert, RevenueParams, RevenueSummary, SalesParams, SalesSummary,
};
pub use db::Database;

/// Error type for dashboard operations
#[derive(Debug, thiserror::Error)]
pub enum AnalyticsError {
    #[error("Database error: {0}")]
    Database(#[from] db::DbError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl serde::Serialize for AnalyticsError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// Initialize logging for embedding applications
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();
}

/// Open and initialize the store at the default (or `SHOPMETRICS_DB`)
/// path, creating parent directories as needed
pub fn open_default_store() -> Result<Database, AnalyticsError> {
    let db_path = db::default_db_path();
    tracing::info!("Database path: {:?}", db_path);

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| AnalyticsError::Internal(format!("Failed to create data dir: {}", e)))?;
    }

    let database = Database::new(db_path)?;
    database.initialize()?;
    Ok(database)
}
