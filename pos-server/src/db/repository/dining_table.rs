//! Dining Table Repository

use sqlx::any::AnyRow;
use sqlx::{AnyPool, Row};

use crate::db::models::dining_table::{DiningTable, NewDiningTable, TableStatus};
use crate::utils::{self, AppError, AppResult};

#[derive(Clone)]
pub struct DiningTableRepository {
    pool: AnyPool,
}

impl DiningTableRepository {
    pub fn new(pool: AnyPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, new: NewDiningTable) -> AppResult<DiningTable> {
        if new.number.trim().is_empty() {
            return Err(AppError::validation("table number is empty"));
        }
        let id = utils::snowflake_id();
        let now = utils::now_millis();

        sqlx::query(
            "INSERT INTO tables (id, number, name, capacity, status, created_at) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(&new.number)
        .bind(&new.name)
        .bind(new.capacity.unwrap_or(4))
        .bind(TableStatus::Available.as_str())
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::persist(format!("create table: {e}")))?;

        self.get(id).await
    }

    pub async fn get(&self, id: i64) -> AppResult<DiningTable> {
        let row = sqlx::query(
            "SELECT id, number, name, capacity, status, created_at FROM tables WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::persist(format!("get table: {e}")))?;

        match row {
            Some(row) => table_from_row(&row),
            None => Err(AppError::not_found(format!("table {id}"))),
        }
    }

    pub async fn list(&self) -> AppResult<Vec<DiningTable>> {
        let rows = sqlx::query(
            "SELECT id, number, name, capacity, status, created_at \
             FROM tables ORDER BY number ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::persist(format!("list tables: {e}")))?;

        rows.iter().map(table_from_row).collect()
    }

    /// Tables open and close independently of any single order
    pub async fn set_status(&self, id: i64, status: TableStatus) -> AppResult<()> {
        let result = sqlx::query("UPDATE tables SET status = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::persist(format!("table {id} status: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("table {id}")));
        }
        Ok(())
    }
}

fn table_from_row(row: &AnyRow) -> AppResult<DiningTable> {
    Ok(DiningTable {
        id: row.try_get("id")?,
        number: row.try_get("number")?,
        name: row.try_get("name")?,
        capacity: row.try_get("capacity")?,
        status: TableStatus::parse(row.try_get::<String, _>("status")?.as_str())?,
        created_at: row.try_get("created_at")?,
    })
}
