//! Category Repository

use sqlx::any::AnyRow;
use sqlx::{AnyPool, Row};

use crate::db::models::category::{Category, NewCategory};
use crate::utils::{self, AppError, AppResult};

#[derive(Clone)]
pub struct CategoryRepository {
    pool: AnyPool,
}

impl CategoryRepository {
    pub fn new(pool: AnyPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, new: NewCategory) -> AppResult<Category> {
        if new.name.trim().is_empty() {
            return Err(AppError::validation("category name is empty"));
        }
        let id = utils::snowflake_id();
        let now = utils::now_millis();

        sqlx::query(
            "INSERT INTO categories (id, name, name_ar, display_order, is_active, created_at) \
             VALUES (?, ?, ?, ?, 1, ?)",
        )
        .bind(id)
        .bind(&new.name)
        .bind(&new.name_ar)
        .bind(new.display_order)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::persist(format!("create category: {e}")))?;

        self.get(id).await
    }

    pub async fn get(&self, id: i64) -> AppResult<Category> {
        let row = sqlx::query(
            "SELECT id, name, name_ar, display_order, is_active, created_at \
             FROM categories WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::persist(format!("get category: {e}")))?;

        match row {
            Some(row) => category_from_row(&row),
            None => Err(AppError::not_found(format!("category {id}"))),
        }
    }

    /// Active categories in display order
    pub async fn list_active(&self) -> AppResult<Vec<Category>> {
        let rows = sqlx::query(
            "SELECT id, name, name_ar, display_order, is_active, created_at \
             FROM categories WHERE is_active = 1 ORDER BY display_order ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::persist(format!("list categories: {e}")))?;

        rows.iter().map(category_from_row).collect()
    }

    /// Deactivation hides a category from the menu without deleting it
    pub async fn set_active(&self, id: i64, active: bool) -> AppResult<()> {
        let result = sqlx::query("UPDATE categories SET is_active = ? WHERE id = ?")
            .bind(if active { 1_i64 } else { 0 })
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::persist(format!("category {id} active: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("category {id}")));
        }
        Ok(())
    }
}

fn category_from_row(row: &AnyRow) -> AppResult<Category> {
    Ok(Category {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        name_ar: row.try_get("name_ar")?,
        display_order: row.try_get("display_order")?,
        is_active: row.try_get::<i64, _>("is_active")? != 0,
        created_at: row.try_get("created_at")?,
    })
}
