//! Database query implementations
//!
//! Entity reads and writes plus the joined fetches and SQL rollups
//! the dashboard layer builds on. Partial updates go through the
//! patch structs: a column changes only when the patch field is set.

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::Serialize;

use super::DbError;
use crate::models::{
    Category, CategoryPatch, Customer, CustomerPatch, Inventory, InventoryHistoryEntry,
    InventoryPatch, NewCategory, NewCustomer, NewInventory, NewProduct, NewSale, Product,
    ProductPatch, Sale, SaleItem, SaleItemRecord, SalePatch, SaleRecord, StockLevel,
};

/// Storage format for order timestamps
const TIMESTAMP_FMT: &str = "%Y-%m-%dT%H:%M:%S";

/// Per-product sales rollup from SQL aggregation
///
/// Revenue here is recomputed from line items
/// (unit_price * quantity - discount), not read from order totals.
#[derive(Debug, Clone, Serialize)]
pub struct TopProduct {
    pub id: i64,
    pub name: String,
    pub total_sold: i64,
    pub total_revenue: f64,
}

/// Per-platform sales rollup from SQL aggregation
#[derive(Debug, Clone, Serialize)]
pub struct PlatformStat {
    pub platform: String,
    pub order_count: i64,
    pub total_revenue: f64,
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn format_timestamp(ts: NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FMT).to_string()
}

/// Read a TEXT column as a timestamp
fn timestamp_col(row: &Row, idx: usize) -> rusqlite::Result<NaiveDateTime> {
    let raw: String = row.get(idx)?;
    NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FMT)
        .or_else(|_| NaiveDateTime::parse_from_str(&raw, "%Y-%m-%d %H:%M:%S"))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

// ============================================================================
// Categories
// ============================================================================

pub fn insert_category(conn: &Connection, category: &NewCategory) -> Result<Category, DbError> {
    conn.execute(
        "INSERT INTO categories (name, description) VALUES (?1, ?2)",
        params![category.name, category.description],
    )?;
    let id = conn.last_insert_rowid();
    get_category(conn, id)?.ok_or(DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
}

pub fn get_category(conn: &Connection, category_id: i64) -> Result<Option<Category>, DbError> {
    let category = conn
        .query_row(
            "SELECT id, name, description, created_at, updated_at FROM categories WHERE id = ?1",
            params![category_id],
            map_category,
        )
        .optional()?;
    Ok(category)
}

pub fn get_category_by_name(conn: &Connection, name: &str) -> Result<Option<Category>, DbError> {
    let category = conn
        .query_row(
            "SELECT id, name, description, created_at, updated_at FROM categories WHERE name = ?1",
            params![name],
            map_category,
        )
        .optional()?;
    Ok(category)
}

pub fn list_categories(
    conn: &Connection,
    limit: Option<u32>,
    offset: Option<u32>,
) -> Result<Vec<Category>, DbError> {
    let mut stmt = conn.prepare(
        "SELECT id, name, description, created_at, updated_at FROM categories \
         ORDER BY id LIMIT ?1 OFFSET ?2",
    )?;
    let categories = stmt
        .query_map(
            params![limit.unwrap_or(100), offset.unwrap_or(0)],
            map_category,
        )?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(categories)
}

pub fn update_category(
    conn: &Connection,
    category_id: i64,
    patch: &CategoryPatch,
) -> Result<Option<Category>, DbError> {
    let Some(mut category) = get_category(conn, category_id)? else {
        return Ok(None);
    };

    if let Some(name) = patch.name.clone() {
        category.name = name;
    }
    if let Some(description) = patch.description.clone() {
        category.description = Some(description);
    }

    conn.execute(
        "UPDATE categories SET name = ?1, description = ?2, updated_at = CURRENT_TIMESTAMP \
         WHERE id = ?3",
        params![category.name, category.description, category_id],
    )?;
    get_category(conn, category_id)
}

pub fn delete_category(conn: &Connection, category_id: i64) -> Result<bool, DbError> {
    let affected = conn.execute("DELETE FROM categories WHERE id = ?1", params![category_id])?;
    Ok(affected > 0)
}

fn map_category(row: &Row) -> rusqlite::Result<Category> {
    Ok(Category {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        created_at: row.get(3)?,
        updated_at: row.get(4)?,
    })
}

// ============================================================================
// Products
// ============================================================================

pub fn insert_product(conn: &Connection, product: &NewProduct) -> Result<Product, DbError> {
    conn.execute(
        "INSERT INTO products (name, description, sku, price, category_id) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            product.name,
            product.description,
            product.sku,
            product.price,
            product.category_id
        ],
    )?;
    let id = conn.last_insert_rowid();
    get_product(conn, id)?.ok_or(DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
}

pub fn get_product(conn: &Connection, product_id: i64) -> Result<Option<Product>, DbError> {
    let product = conn
        .query_row(
            "SELECT id, name, description, sku, price, category_id, created_at, updated_at \
             FROM products WHERE id = ?1",
            params![product_id],
            map_product,
        )
        .optional()?;
    Ok(product)
}

pub fn get_product_by_sku(conn: &Connection, sku: &str) -> Result<Option<Product>, DbError> {
    let product = conn
        .query_row(
            "SELECT id, name, description, sku, price, category_id, created_at, updated_at \
             FROM products WHERE sku = ?1",
            params![sku],
            map_product,
        )
        .optional()?;
    Ok(product)
}

pub fn list_products(
    conn: &Connection,
    category_id: Option<i64>,
    limit: Option<u32>,
    offset: Option<u32>,
) -> Result<Vec<Product>, DbError> {
    let mut stmt = conn.prepare(
        "SELECT id, name, description, sku, price, category_id, created_at, updated_at \
         FROM products \
         WHERE (?1 IS NULL OR category_id = ?1) \
         ORDER BY id LIMIT ?2 OFFSET ?3",
    )?;
    let products = stmt
        .query_map(
            params![category_id, limit.unwrap_or(100), offset.unwrap_or(0)],
            map_product,
        )?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(products)
}

pub fn update_product(
    conn: &Connection,
    product_id: i64,
    patch: &ProductPatch,
) -> Result<Option<Product>, DbError> {
    let Some(mut product) = get_product(conn, product_id)? else {
        return Ok(None);
    };

    if let Some(name) = patch.name.clone() {
        product.name = name;
    }
    if let Some(description) = patch.description.clone() {
        product.description = Some(description);
    }
    if let Some(sku) = patch.sku.clone() {
        product.sku = sku;
    }
    if let Some(price) = patch.price {
        product.price = price;
    }
    if let Some(category_id) = patch.category_id {
        product.category_id = category_id;
    }

    conn.execute(
        "UPDATE products SET name = ?1, description = ?2, sku = ?3, price = ?4, \
         category_id = ?5, updated_at = CURRENT_TIMESTAMP WHERE id = ?6",
        params![
            product.name,
            product.description,
            product.sku,
            product.price,
            product.category_id,
            product_id
        ],
    )?;
    get_product(conn, product_id)
}

pub fn delete_product(conn: &Connection, product_id: i64) -> Result<bool, DbError> {
    let affected = conn.execute("DELETE FROM products WHERE id = ?1", params![product_id])?;
    Ok(affected > 0)
}

fn map_product(row: &Row) -> rusqlite::Result<Product> {
    Ok(Product {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        sku: row.get(3)?,
        price: row.get(4)?,
        category_id: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

// ============================================================================
// Customers
// ============================================================================

pub fn insert_customer(conn: &Connection, customer: &NewCustomer) -> Result<Customer, DbError> {
    conn.execute(
        "INSERT INTO customers (name, email, phone, address) VALUES (?1, ?2, ?3, ?4)",
        params![customer.name, customer.email, customer.phone, customer.address],
    )?;
    let id = conn.last_insert_rowid();
    get_customer(conn, id)?.ok_or(DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
}

pub fn get_customer(conn: &Connection, customer_id: i64) -> Result<Option<Customer>, DbError> {
    let customer = conn
        .query_row(
            "SELECT id, name, email, phone, address, created_at, updated_at \
             FROM customers WHERE id = ?1",
            params![customer_id],
            map_customer,
        )
        .optional()?;
    Ok(customer)
}

pub fn get_customer_by_email(conn: &Connection, email: &str) -> Result<Option<Customer>, DbError> {
    let customer = conn
        .query_row(
            "SELECT id, name, email, phone, address, created_at, updated_at \
             FROM customers WHERE email = ?1",
            params![email],
            map_customer,
        )
        .optional()?;
    Ok(customer)
}

pub fn list_customers(
    conn: &Connection,
    limit: Option<u32>,
    offset: Option<u32>,
) -> Result<Vec<Customer>, DbError> {
    let mut stmt = conn.prepare(
        "SELECT id, name, email, phone, address, created_at, updated_at \
         FROM customers ORDER BY id LIMIT ?1 OFFSET ?2",
    )?;
    let customers = stmt
        .query_map(
            params![limit.unwrap_or(100), offset.unwrap_or(0)],
            map_customer,
        )?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(customers)
}

pub fn update_customer(
    conn: &Connection,
    customer_id: i64,
    patch: &CustomerPatch,
) -> Result<Option<Customer>, DbError> {
    let Some(mut customer) = get_customer(conn, customer_id)? else {
        return Ok(None);
    };

    if let Some(name) = patch.name.clone() {
        customer.name = name;
    }
    if let Some(email) = patch.email.clone() {
        customer.email = Some(email);
    }
    if let Some(phone) = patch.phone.clone() {
        customer.phone = Some(phone);
    }
    if let Some(address) = patch.address.clone() {
        customer.address = Some(address);
    }

    conn.execute(
        "UPDATE customers SET name = ?1, email = ?2, phone = ?3, address = ?4, \
         updated_at = CURRENT_TIMESTAMP WHERE id = ?5",
        params![
            customer.name,
            customer.email,
            customer.phone,
            customer.address,
            customer_id
        ],
    )?;
    get_customer(conn, customer_id)
}

fn map_customer(row: &Row) -> rusqlite::Result<Customer> {
    Ok(Customer {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        phone: row.get(3)?,
        address: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

// ============================================================================
// Inventory
// ============================================================================

pub fn insert_inventory(conn: &Connection, inventory: &NewInventory) -> Result<Inventory, DbError> {
    conn.execute(
        "INSERT INTO inventory (product_id, quantity, location, low_stock_threshold) \
         VALUES (?1, ?2, ?3, ?4)",
        params![
            inventory.product_id,
            inventory.quantity,
            inventory.location,
            inventory.low_stock_threshold
        ],
    )?;
    let id = conn.last_insert_rowid();
    get_inventory(conn, id)?.ok_or(DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
}

pub fn get_inventory(conn: &Connection, inventory_id: i64) -> Result<Option<Inventory>, DbError> {
    let inventory = conn
        .query_row(
            "SELECT id, product_id, quantity, location, low_stock_threshold, \
             last_restock_date, created_at, updated_at FROM inventory WHERE id = ?1",
            params![inventory_id],
            map_inventory,
        )
        .optional()?;
    Ok(inventory)
}

pub fn get_inventory_by_product(
    conn: &Connection,
    product_id: i64,
) -> Result<Option<Inventory>, DbError> {
    let inventory = conn
        .query_row(
            "SELECT id, product_id, quantity, location, low_stock_threshold, \
             last_restock_date, created_at, updated_at FROM inventory WHERE product_id = ?1",
            params![product_id],
            map_inventory,
        )
        .optional()?;
    Ok(inventory)
}

pub fn list_inventories(
    conn: &Connection,
    low_stock_only: bool,
    category_id: Option<i64>,
    limit: Option<u32>,
    offset: Option<u32>,
) -> Result<Vec<Inventory>, DbError> {
    let mut stmt = conn.prepare(
        "SELECT i.id, i.product_id, i.quantity, i.location, i.low_stock_threshold, \
         i.last_restock_date, i.created_at, i.updated_at \
         FROM inventory i \
         JOIN products p ON p.id = i.product_id \
         WHERE (?1 = 0 OR i.quantity <= i.low_stock_threshold) \
           AND (?2 IS NULL OR p.category_id = ?2) \
         ORDER BY i.id LIMIT ?3 OFFSET ?4",
    )?;
    let inventories = stmt
        .query_map(
            params![
                low_stock_only as i32,
                category_id,
                limit.unwrap_or(100),
                offset.unwrap_or(0)
            ],
            map_inventory,
        )?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(inventories)
}

/// Apply a patch to an inventory row
///
/// A quantity change appends an entry to the history log before the
/// row is updated.
pub fn update_inventory(
    conn: &Connection,
    inventory_id: i64,
    patch: &InventoryPatch,
    change_reason: Option<&str>,
) -> Result<Option<Inventory>, DbError> {
    let Some(mut inventory) = get_inventory(conn, inventory_id)? else {
        return Ok(None);
    };

    if let Some(quantity) = patch.quantity {
        if quantity != inventory.quantity {
            conn.execute(
                "INSERT INTO inventory_history \
                 (inventory_id, previous_quantity, new_quantity, change_reason) \
                 VALUES (?1, ?2, ?3, ?4)",
                params![inventory_id, inventory.quantity, quantity, change_reason],
            )?;
        }
        inventory.quantity = quantity;
    }
    if let Some(location) = patch.location.clone() {
        inventory.location = Some(location);
    }
    if let Some(threshold) = patch.low_stock_threshold {
        inventory.low_stock_threshold = threshold;
    }
    if let Some(restock) = patch.last_restock_date.clone() {
        inventory.last_restock_date = Some(restock);
    }

    conn.execute(
        "UPDATE inventory SET quantity = ?1, location = ?2, low_stock_threshold = ?3, \
         last_restock_date = ?4, updated_at = CURRENT_TIMESTAMP WHERE id = ?5",
        params![
            inventory.quantity,
            inventory.location,
            inventory.low_stock_threshold,
            inventory.last_restock_date,
            inventory_id
        ],
    )?;
    get_inventory(conn, inventory_id)
}

pub fn get_inventory_history(
    conn: &Connection,
    inventory_id: i64,
    limit: Option<u32>,
    offset: Option<u32>,
) -> Result<Vec<InventoryHistoryEntry>, DbError> {
    let mut stmt = conn.prepare(
        "SELECT id, inventory_id, previous_quantity, new_quantity, change_reason, created_at \
         FROM inventory_history WHERE inventory_id = ?1 \
         ORDER BY created_at DESC, id DESC LIMIT ?2 OFFSET ?3",
    )?;
    let entries = stmt
        .query_map(
            params![inventory_id, limit.unwrap_or(100), offset.unwrap_or(0)],
            |row| {
                Ok(InventoryHistoryEntry {
                    id: row.get(0)?,
                    inventory_id: row.get(1)?,
                    previous_quantity: row.get(2)?,
                    new_quantity: row.get(3)?,
                    change_reason: row.get(4)?,
                    created_at: row.get(5)?,
                })
            },
        )?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(entries)
}

fn map_inventory(row: &Row) -> rusqlite::Result<Inventory> {
    Ok(Inventory {
        id: row.get(0)?,
        product_id: row.get(1)?,
        quantity: row.get(2)?,
        location: row.get(3)?,
        low_stock_threshold: row.get(4)?,
        last_restock_date: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

// ============================================================================
// Sales
// ============================================================================

/// Insert a sale with its line items
///
/// Each line item decrements the matching product's inventory, floored
/// at zero, and the transition is logged with the order number as the
/// change reason.
pub fn insert_sale(conn: &Connection, sale: &NewSale) -> Result<Sale, DbError> {
    conn.execute(
        "INSERT INTO sales (order_number, order_date, customer_id, total_amount, platform, status) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            sale.order_number,
            format_timestamp(sale.order_date),
            sale.customer_id,
            sale.total_amount,
            sale.platform,
            sale.status
        ],
    )?;
    let sale_id = conn.last_insert_rowid();

    for item in &sale.items {
        conn.execute(
            "INSERT INTO sale_items (sale_id, product_id, quantity, unit_price, discount) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                sale_id,
                item.product_id,
                item.quantity,
                item.unit_price,
                item.discount
            ],
        )?;

        if let Some(inventory) = get_inventory_by_product(conn, item.product_id)? {
            let new_quantity = (inventory.quantity - item.quantity).max(0);
            update_inventory(
                conn,
                inventory.id,
                &InventoryPatch::quantity(new_quantity),
                Some(&format!("Sale: {}", sale.order_number)),
            )?;
        }
    }

    get_sale(conn, sale_id)?.ok_or(DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
}

pub fn get_sale(conn: &Connection, sale_id: i64) -> Result<Option<Sale>, DbError> {
    let sale = conn
        .query_row(
            "SELECT id, order_number, order_date, customer_id, total_amount, platform, status, \
             created_at, updated_at FROM sales WHERE id = ?1",
            params![sale_id],
            map_sale,
        )
        .optional()?;
    Ok(sale)
}

pub fn get_sale_by_order_number(
    conn: &Connection,
    order_number: &str,
) -> Result<Option<Sale>, DbError> {
    let sale = conn
        .query_row(
            "SELECT id, order_number, order_date, customer_id, total_amount, platform, status, \
             created_at, updated_at FROM sales WHERE order_number = ?1",
            params![order_number],
            map_sale,
        )
        .optional()?;
    Ok(sale)
}

pub fn list_sales(
    conn: &Connection,
    customer_id: Option<i64>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    platform: Option<&str>,
    limit: Option<u32>,
    offset: Option<u32>,
) -> Result<Vec<Sale>, DbError> {
    let mut stmt = conn.prepare(
        "SELECT id, order_number, order_date, customer_id, total_amount, platform, status, \
         created_at, updated_at FROM sales \
         WHERE (?1 IS NULL OR customer_id = ?1) \
           AND (?2 IS NULL OR date(order_date) >= ?2) \
           AND (?3 IS NULL OR date(order_date) <= ?3) \
           AND (?4 IS NULL OR platform = ?4) \
         ORDER BY order_date DESC LIMIT ?5 OFFSET ?6",
    )?;
    let sales = stmt
        .query_map(
            params![
                customer_id,
                start_date.map(format_date),
                end_date.map(format_date),
                platform,
                limit.unwrap_or(100),
                offset.unwrap_or(0)
            ],
            map_sale,
        )?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(sales)
}

pub fn get_sale_items(conn: &Connection, sale_id: i64) -> Result<Vec<SaleItem>, DbError> {
    let mut stmt = conn.prepare(
        "SELECT id, sale_id, product_id, quantity, unit_price, discount, created_at \
         FROM sale_items WHERE sale_id = ?1 ORDER BY id",
    )?;
    let items = stmt
        .query_map(params![sale_id], |row| {
            Ok(SaleItem {
                id: row.get(0)?,
                sale_id: row.get(1)?,
                product_id: row.get(2)?,
                quantity: row.get(3)?,
                unit_price: row.get(4)?,
                discount: row.get(5)?,
                created_at: row.get(6)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(items)
}

pub fn update_sale(
    conn: &Connection,
    sale_id: i64,
    patch: &SalePatch,
) -> Result<Option<Sale>, DbError> {
    let Some(mut sale) = get_sale(conn, sale_id)? else {
        return Ok(None);
    };

    if let Some(order_date) = patch.order_date {
        sale.order_date = order_date;
    }
    if let Some(total_amount) = patch.total_amount {
        sale.total_amount = total_amount;
    }
    if let Some(platform) = patch.platform.clone() {
        sale.platform = platform;
    }
    if let Some(status) = patch.status.clone() {
        sale.status = status;
    }

    conn.execute(
        "UPDATE sales SET order_date = ?1, total_amount = ?2, platform = ?3, status = ?4, \
         updated_at = CURRENT_TIMESTAMP WHERE id = ?5",
        params![
            format_timestamp(sale.order_date),
            sale.total_amount,
            sale.platform,
            sale.status,
            sale_id
        ],
    )?;
    get_sale(conn, sale_id)
}

fn map_sale(row: &Row) -> rusqlite::Result<Sale> {
    Ok(Sale {
        id: row.get(0)?,
        order_number: row.get(1)?,
        order_date: timestamp_col(row, 2)?,
        customer_id: row.get(3)?,
        total_amount: row.get(4)?,
        platform: row.get(5)?,
        status: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

// ============================================================================
// Analytics fetches
// ============================================================================

/// Fetch sales in a date range with their line items eagerly joined
///
/// Each line item carries the product's category, so the aggregators
/// never go back to the store while reducing.
pub fn fetch_sales_with_items(
    conn: &Connection,
    start_date: NaiveDate,
    end_date: NaiveDate,
    platform: Option<&str>,
) -> Result<Vec<SaleRecord>, DbError> {
    let start = format_date(start_date);
    let end = format_date(end_date);

    let mut stmt = conn.prepare(
        "SELECT id, order_number, order_date, customer_id, total_amount, platform, status \
         FROM sales \
         WHERE date(order_date) >= ?1 AND date(order_date) <= ?2 \
           AND (?3 IS NULL OR platform = ?3) \
         ORDER BY order_date",
    )?;

    struct SaleRow {
        id: i64,
        order_number: String,
        order_date: NaiveDateTime,
        customer_id: i64,
        total_amount: f64,
        platform: String,
        status: String,
    }

    let sale_rows = stmt
        .query_map(params![start, end, platform], |row| {
            Ok(SaleRow {
                id: row.get(0)?,
                order_number: row.get(1)?,
                order_date: timestamp_col(row, 2)?,
                customer_id: row.get(3)?,
                total_amount: row.get(4)?,
                platform: row.get(5)?,
                status: row.get(6)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let mut item_stmt = conn.prepare(
        "SELECT si.sale_id, si.product_id, p.category_id, si.quantity, si.unit_price, si.discount \
         FROM sale_items si \
         JOIN products p ON p.id = si.product_id \
         WHERE si.sale_id IN ( \
             SELECT id FROM sales \
             WHERE date(order_date) >= ?1 AND date(order_date) <= ?2 \
               AND (?3 IS NULL OR platform = ?3))",
    )?;

    let mut items_by_sale: HashMap<i64, Vec<SaleItemRecord>> = HashMap::new();
    let item_rows = item_stmt.query_map(params![start, end, platform], |row| {
        Ok((
            row.get::<_, i64>(0)?,
            SaleItemRecord {
                product_id: row.get(1)?,
                category_id: row.get(2)?,
                quantity: row.get(3)?,
                unit_price: row.get(4)?,
                discount: row.get(5)?,
            },
        ))
    })?;
    for item in item_rows {
        let (sale_id, record) = item?;
        items_by_sale.entry(sale_id).or_default().push(record);
    }

    let records = sale_rows
        .into_iter()
        .map(|row| SaleRecord {
            items: items_by_sale.remove(&row.id).unwrap_or_default(),
            id: row.id,
            order_number: row.order_number,
            order_date: row.order_date,
            customer_id: row.customer_id,
            total_amount: row.total_amount,
            platform: row.platform,
            status: row.status,
        })
        .collect();

    Ok(records)
}

/// Fetch inventory rows joined with their product names, optionally
/// restricted to one category
pub fn fetch_stock_levels(
    conn: &Connection,
    category_id: Option<i64>,
) -> Result<Vec<StockLevel>, DbError> {
    let mut stmt = conn.prepare(
        "SELECT i.product_id, p.name, i.quantity, i.low_stock_threshold \
         FROM inventory i \
         JOIN products p ON p.id = i.product_id \
         WHERE (?1 IS NULL OR p.category_id = ?1) \
         ORDER BY i.product_id",
    )?;
    let levels = stmt
        .query_map(params![category_id], |row| {
            Ok(StockLevel {
                product_id: row.get(0)?,
                product_name: row.get(1)?,
                quantity: row.get(2)?,
                low_stock_threshold: row.get(3)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(levels)
}

/// Best-selling products in a window, ranked by units sold
pub fn top_products(
    conn: &Connection,
    start_date: NaiveDate,
    end_date: NaiveDate,
    limit: u32,
) -> Result<Vec<TopProduct>, DbError> {
    let mut stmt = conn.prepare(
        "SELECT p.id, p.name, \
                SUM(si.quantity) AS total_sold, \
                SUM(si.unit_price * si.quantity - si.discount) AS total_revenue \
         FROM products p \
         JOIN sale_items si ON si.product_id = p.id \
         JOIN sales s ON s.id = si.sale_id \
         WHERE date(s.order_date) >= ?1 AND date(s.order_date) <= ?2 \
         GROUP BY p.id, p.name \
         ORDER BY total_sold DESC \
         LIMIT ?3",
    )?;
    let products = stmt
        .query_map(
            params![format_date(start_date), format_date(end_date), limit],
            |row| {
                Ok(TopProduct {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    total_sold: row.get(2)?,
                    total_revenue: row.get(3)?,
                })
            },
        )?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(products)
}

/// Order counts and revenue per sales channel, highest revenue first
pub fn platform_distribution(
    conn: &Connection,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<Vec<PlatformStat>, DbError> {
    let mut stmt = conn.prepare(
        "SELECT platform, COUNT(id) AS order_count, SUM(total_amount) AS total_revenue \
         FROM sales \
         WHERE date(order_date) >= ?1 AND date(order_date) <= ?2 \
         GROUP BY platform \
         ORDER BY total_revenue DESC",
    )?;
    let stats = stmt
        .query_map(
            params![format_date(start_date), format_date(end_date)],
            |row| {
                Ok(PlatformStat {
                    platform: row.get(0)?,
                    order_count: row.get(1)?,
                    total_revenue: row.get(2)?,
                })
            },
        )?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(stats)
}
