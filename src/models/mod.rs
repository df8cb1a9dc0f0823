//! Data model types
//!
//! Row types for every stored entity, the patch structs used for
//! partial updates, and the joined read models handed to the
//! analytics engine.

pub mod catalog;
pub mod inventory;
pub mod sales;

pub use catalog::{Category, CategoryPatch, NewCategory, NewProduct, Product, ProductPatch};
pub use inventory::{Inventory, InventoryHistoryEntry, InventoryPatch, NewInventory, StockLevel};
pub use sales::{
    Customer, CustomerPatch, NewCustomer, NewSale, NewSaleItem, Sale, SaleItem, SaleItemRecord,
    SalePatch, SaleRecord,
};
