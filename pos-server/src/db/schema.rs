//! Fallback-store schema bootstrap
//!
//! Idempotent `CREATE TABLE IF NOT EXISTS`, safe to run on every startup.
//! The primary store is provisioned out of band and never passes through
//! here. Any single creation failure aborts the sequence.

use sqlx::AnyPool;

use crate::utils::{AppError, AppResult};

const TABLES: &[(&str, &str)] = &[
    (
        "settings",
        "CREATE TABLE IF NOT EXISTS settings (
            `key` TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at INTEGER NOT NULL
        )",
    ),
    (
        "categories",
        "CREATE TABLE IF NOT EXISTS categories (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            name_ar TEXT NOT NULL,
            display_order INTEGER NOT NULL DEFAULT 0,
            is_active INTEGER NOT NULL DEFAULT 1,
            created_at INTEGER NOT NULL
        )",
    ),
    (
        "menu_items",
        "CREATE TABLE IF NOT EXISTS menu_items (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            name_ar TEXT NOT NULL,
            category_id INTEGER,
            price REAL NOT NULL,
            cost_price REAL,
            is_available INTEGER NOT NULL DEFAULT 1,
            order_count INTEGER NOT NULL DEFAULT 0,
            created_at INTEGER NOT NULL,
            FOREIGN KEY (category_id) REFERENCES categories(id)
        )",
    ),
    (
        "orders",
        "CREATE TABLE IF NOT EXISTS orders (
            id INTEGER PRIMARY KEY,
            order_number TEXT UNIQUE NOT NULL,
            table_id INTEGER,
            type TEXT NOT NULL DEFAULT 'dine_in',
            status TEXT NOT NULL DEFAULT 'pending',
            subtotal REAL NOT NULL DEFAULT 0,
            tax_amount REAL NOT NULL DEFAULT 0,
            total REAL NOT NULL DEFAULT 0,
            paid_amount REAL NOT NULL DEFAULT 0,
            payment_status TEXT NOT NULL DEFAULT 'unpaid',
            customer_name TEXT,
            customer_phone TEXT,
            customer_address TEXT,
            notes TEXT,
            kitchen_notes TEXT,
            created_at INTEGER NOT NULL,
            completed_at INTEGER,
            cancelled_at INTEGER
        )",
    ),
    (
        "order_items",
        "CREATE TABLE IF NOT EXISTS order_items (
            id INTEGER PRIMARY KEY,
            order_id INTEGER NOT NULL,
            menu_item_id INTEGER NOT NULL,
            menu_item_name TEXT NOT NULL,
            quantity INTEGER NOT NULL DEFAULT 1,
            unit_price REAL NOT NULL,
            status TEXT NOT NULL DEFAULT 'pending',
            notes TEXT,
            created_at INTEGER NOT NULL,
            FOREIGN KEY (order_id) REFERENCES orders(id) ON DELETE CASCADE
        )",
    ),
    (
        "tables",
        "CREATE TABLE IF NOT EXISTS tables (
            id INTEGER PRIMARY KEY,
            number TEXT UNIQUE NOT NULL,
            name TEXT,
            capacity INTEGER NOT NULL DEFAULT 4,
            status TEXT NOT NULL DEFAULT 'available',
            created_at INTEGER NOT NULL
        )",
    ),
    (
        "payments",
        "CREATE TABLE IF NOT EXISTS payments (
            id INTEGER PRIMARY KEY,
            order_id INTEGER NOT NULL,
            method TEXT NOT NULL,
            amount REAL NOT NULL,
            cash_tendered REAL,
            change_amount REAL,
            created_at INTEGER NOT NULL,
            FOREIGN KEY (order_id) REFERENCES orders(id) ON DELETE CASCADE
        )",
    ),
];

/// Create the station tables if absent
pub async fn ensure_schema(pool: &AnyPool) -> AppResult<()> {
    for (name, ddl) in TABLES {
        sqlx::query(ddl)
            .execute(pool)
            .await
            .map_err(|e| AppError::schema(format!("create table {name}: {e}")))?;
    }
    tracing::info!(tables = TABLES.len(), "Schema ensured");
    Ok(())
}
