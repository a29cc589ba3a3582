//! Menu Item Repository
//!
//! Price edits here never touch captured order-line snapshots.

use sqlx::any::AnyRow;
use sqlx::{AnyPool, Row};

use crate::db::models::menu_item::{MenuItem, MenuItemUpdate, NewMenuItem};
use crate::utils::{self, AppError, AppResult};

const MENU_COLUMNS: &str =
    "id, name, name_ar, category_id, price, cost_price, is_available, order_count, created_at";

#[derive(Clone)]
pub struct MenuItemRepository {
    pool: AnyPool,
}

impl MenuItemRepository {
    pub fn new(pool: AnyPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, new: NewMenuItem) -> AppResult<MenuItem> {
        if new.name.trim().is_empty() {
            return Err(AppError::validation("menu item name is empty"));
        }
        if !new.price.is_finite() || new.price < 0.0 {
            return Err(AppError::validation(format!(
                "price must be a non-negative number, got {}",
                new.price
            )));
        }
        let id = utils::snowflake_id();
        let now = utils::now_millis();

        sqlx::query(
            "INSERT INTO menu_items (id, name, name_ar, category_id, price, cost_price, \
             is_available, order_count, created_at) VALUES (?, ?, ?, ?, ?, ?, 1, 0, ?)",
        )
        .bind(id)
        .bind(&new.name)
        .bind(&new.name_ar)
        .bind(new.category_id)
        .bind(new.price)
        .bind(new.cost_price)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::persist(format!("create menu item: {e}")))?;

        self.get(id).await
    }

    pub async fn get(&self, id: i64) -> AppResult<MenuItem> {
        let row = sqlx::query(&format!(
            "SELECT {MENU_COLUMNS} FROM menu_items WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::persist(format!("get menu item: {e}")))?;

        match row {
            Some(row) => menu_item_from_row(&row),
            None => Err(AppError::not_found(format!("menu item {id}"))),
        }
    }

    /// Available items, optionally filtered by category
    pub async fn list_available(&self, category_id: Option<i64>) -> AppResult<Vec<MenuItem>> {
        let rows = match category_id {
            Some(cid) => {
                sqlx::query(&format!(
                    "SELECT {MENU_COLUMNS} FROM menu_items \
                     WHERE is_available = 1 AND category_id = ? ORDER BY name ASC"
                ))
                .bind(cid)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query(&format!(
                    "SELECT {MENU_COLUMNS} FROM menu_items \
                     WHERE is_available = 1 ORDER BY name ASC"
                ))
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(|e| AppError::persist(format!("list menu items: {e}")))?;

        rows.iter().map(menu_item_from_row).collect()
    }

    /// Partial update; `None` fields keep their stored value
    pub async fn update(&self, id: i64, update: MenuItemUpdate) -> AppResult<MenuItem> {
        if let Some(price) = update.price {
            if !price.is_finite() || price < 0.0 {
                return Err(AppError::validation(format!(
                    "price must be a non-negative number, got {price}"
                )));
            }
        }

        let result = sqlx::query(
            "UPDATE menu_items SET \
             name = COALESCE(?, name), \
             name_ar = COALESCE(?, name_ar), \
             category_id = COALESCE(?, category_id), \
             price = COALESCE(?, price), \
             cost_price = COALESCE(?, cost_price), \
             is_available = COALESCE(?, is_available) \
             WHERE id = ?",
        )
        .bind(update.name)
        .bind(update.name_ar)
        .bind(update.category_id)
        .bind(update.price)
        .bind(update.cost_price)
        .bind(update.is_available.map(|v| if v { 1_i64 } else { 0 }))
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::persist(format!("update menu item: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("menu item {id}")));
        }
        self.get(id).await
    }

    /// Bump the sold counter after checkout
    pub async fn bump_order_count(&self, id: i64, sold: i64) -> AppResult<()> {
        sqlx::query("UPDATE menu_items SET order_count = order_count + ? WHERE id = ?")
            .bind(sold)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::persist(format!("bump order count: {e}")))?;
        Ok(())
    }
}

fn menu_item_from_row(row: &AnyRow) -> AppResult<MenuItem> {
    Ok(MenuItem {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        name_ar: row.try_get("name_ar")?,
        category_id: row.try_get("category_id")?,
        price: row.try_get("price")?,
        cost_price: row.try_get("cost_price")?,
        is_available: row.try_get::<i64, _>("is_available")? != 0,
        order_count: row.try_get("order_count")?,
        created_at: row.try_get("created_at")?,
    })
}
