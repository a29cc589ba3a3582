//! Order repository — lifecycle, lines, derived timestamps
//!
//! Status changes go through the closed transition graph; entry to a
//! terminal state stamps its timestamp in the same atomic update.

use sqlx::any::AnyRow;
use sqlx::{AnyPool, Row};

use crate::db::models::order::{
    ItemStatus, NewOrder, NewOrderItem, Order, OrderItem, OrderStatus, OrderType, PaymentStatus,
};
use crate::money;
use crate::utils::{self, AppError, AppResult};

const ORDER_COLUMNS: &str = "id, order_number, table_id, type, status, subtotal, tax_amount, \
     total, paid_amount, payment_status, customer_name, customer_phone, customer_address, \
     notes, kitchen_notes, created_at, completed_at, cancelled_at";

#[derive(Clone)]
pub struct OrderRepository {
    pool: AnyPool,
}

impl OrderRepository {
    pub fn new(pool: AnyPool) -> Self {
        Self { pool }
    }

    /// Insert a new pending order with zeroed monetary fields.
    ///
    /// The order number is `ORD-<id>`; the snowflake id is timestamp-derived
    /// and unique within the station's lifetime.
    pub async fn create(&self, new: NewOrder) -> AppResult<Order> {
        let id = utils::snowflake_id();
        let order_number = format!("ORD-{id}");
        let now = utils::now_millis();

        sqlx::query(
            "INSERT INTO orders (id, order_number, table_id, type, status, subtotal, \
             tax_amount, total, paid_amount, payment_status, customer_name, customer_phone, \
             customer_address, notes, kitchen_notes, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(&order_number)
        .bind(new.table_id)
        .bind(new.order_type.as_str())
        .bind(OrderStatus::Pending.as_str())
        .bind(0.0_f64)
        .bind(0.0_f64)
        .bind(0.0_f64)
        .bind(0.0_f64)
        .bind(PaymentStatus::Unpaid.as_str())
        .bind(&new.customer_name)
        .bind(&new.customer_phone)
        .bind(&new.customer_address)
        .bind(&new.notes)
        .bind(&new.kitchen_notes)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::persist(format!("create order: {e}")))?;

        tracing::info!(order_id = id, order_number = %order_number, "Order created");
        self.get(id).await
    }

    /// Most-recent-first summaries, line items NOT populated.
    /// Use [`Self::items`] or [`Self::get_detail`] for the lines.
    pub async fn list(&self, limit: i64) -> AppResult<Vec<Order>> {
        let rows = sqlx::query(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at DESC, id DESC LIMIT ?"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::persist(format!("list orders: {e}")))?;

        rows.iter().map(order_from_row).collect()
    }

    /// One order without its lines
    pub async fn get(&self, id: i64) -> AppResult<Order> {
        let row = sqlx::query(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::persist(format!("get order: {e}")))?;

        match row {
            Some(row) => order_from_row(&row),
            None => Err(AppError::not_found(format!("order {id}"))),
        }
    }

    /// Line items for one order — the explicit secondary fetch behind the
    /// summary view
    pub async fn items(&self, order_id: i64) -> AppResult<Vec<OrderItem>> {
        let rows = sqlx::query(
            "SELECT id, order_id, menu_item_id, menu_item_name, quantity, unit_price, \
             status, notes, created_at \
             FROM order_items WHERE order_id = ? ORDER BY created_at ASC, id ASC",
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::persist(format!("order items: {e}")))?;

        rows.iter().map(item_from_row).collect()
    }

    /// One order with its lines populated
    pub async fn get_detail(&self, id: i64) -> AppResult<Order> {
        let mut order = self.get(id).await?;
        order.items = self.items(id).await?;
        Ok(order)
    }

    /// Append lines and re-derive the monetary fields in one transaction.
    ///
    /// `tax_rate` is the settings fraction at call time; the line snapshots
    /// (name, unit price) are immutable from here on.
    pub async fn add_items(
        &self,
        order_id: i64,
        lines: &[NewOrderItem],
        tax_rate: f64,
    ) -> AppResult<Order> {
        if lines.is_empty() {
            return Err(AppError::validation("no lines to add"));
        }
        for line in lines {
            if line.quantity <= 0 {
                return Err(AppError::validation(format!(
                    "quantity must be positive, got {}",
                    line.quantity
                )));
            }
            if !line.unit_price.is_finite() || line.unit_price < 0.0 {
                return Err(AppError::validation(format!(
                    "unit price must be a non-negative number, got {}",
                    line.unit_price
                )));
            }
        }

        let order = self.get(order_id).await?;
        if order.status.is_terminal() {
            return Err(AppError::validation(format!(
                "order {order_id} is {}",
                order.status.as_str()
            )));
        }

        let now = utils::now_millis();
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::persist(format!("add items begin: {e}")))?;

        for line in lines {
            sqlx::query(
                "INSERT INTO order_items (id, order_id, menu_item_id, menu_item_name, \
                 quantity, unit_price, status, notes, created_at) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(utils::snowflake_id())
            .bind(order_id)
            .bind(line.menu_item_id)
            .bind(&line.menu_item_name)
            .bind(line.quantity)
            .bind(line.unit_price)
            .bind(ItemStatus::Pending.as_str())
            .bind(&line.notes)
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::persist(format!("insert line: {e}")))?;
        }

        // Totals derive from every live line, inside the same transaction
        let rows = sqlx::query(
            "SELECT unit_price, quantity FROM order_items \
             WHERE order_id = ? AND status != 'cancelled'",
        )
        .bind(order_id)
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| AppError::persist(format!("sum lines: {e}")))?;

        let snapshots: Vec<(f64, i64)> = rows
            .iter()
            .map(|row| Ok((row.try_get("unit_price")?, row.try_get("quantity")?)))
            .collect::<AppResult<_>>()?;
        let totals = money::order_totals(&snapshots, tax_rate);
        let payment_status = money::payment_status_for(order.paid_amount, totals.total);

        sqlx::query(
            "UPDATE orders SET subtotal = ?, tax_amount = ?, total = ?, payment_status = ? \
             WHERE id = ?",
        )
        .bind(totals.subtotal)
        .bind(totals.tax_amount)
        .bind(totals.total)
        .bind(payment_status.as_str())
        .bind(order_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::persist(format!("update totals: {e}")))?;

        tx.commit()
            .await
            .map_err(|e| AppError::persist(format!("add items commit: {e}")))?;

        self.get_detail(order_id).await
    }

    /// Validated status transition.
    ///
    /// Entry to completed/cancelled stamps the matching timestamp in the
    /// same atomic UPDATE as the status write; the two timestamps are
    /// write-once and mutually exclusive.
    pub async fn set_status(&self, order_id: i64, next: OrderStatus) -> AppResult<Order> {
        let order = self.get(order_id).await?;
        order.status.ensure_transition(next)?;

        let result = match next {
            OrderStatus::Completed => {
                sqlx::query("UPDATE orders SET status = ?, completed_at = ? WHERE id = ?")
                    .bind(next.as_str())
                    .bind(utils::now_millis())
                    .bind(order_id)
                    .execute(&self.pool)
                    .await
            }
            OrderStatus::Cancelled => {
                sqlx::query("UPDATE orders SET status = ?, cancelled_at = ? WHERE id = ?")
                    .bind(next.as_str())
                    .bind(utils::now_millis())
                    .bind(order_id)
                    .execute(&self.pool)
                    .await
            }
            _ => {
                sqlx::query("UPDATE orders SET status = ? WHERE id = ?")
                    .bind(next.as_str())
                    .bind(order_id)
                    .execute(&self.pool)
                    .await
            }
        };
        result.map_err(|e| AppError::persist(format!("order {order_id} status: {e}")))?;

        tracing::info!(
            order_id,
            from = order.status.as_str(),
            to = next.as_str(),
            "Order status changed"
        );
        self.get(order_id).await
    }

    /// Validated per-line status transition, independent of the order status
    pub async fn set_item_status(&self, item_id: i64, next: ItemStatus) -> AppResult<()> {
        let row = sqlx::query("SELECT status FROM order_items WHERE id = ?")
            .bind(item_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::persist(format!("get line: {e}")))?
            .ok_or_else(|| AppError::not_found(format!("order line {item_id}")))?;

        let current = ItemStatus::parse(row.try_get::<String, _>("status")?.as_str())?;
        current.ensure_transition(next)?;

        sqlx::query("UPDATE order_items SET status = ? WHERE id = ?")
            .bind(next.as_str())
            .bind(item_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::persist(format!("line {item_id} status: {e}")))?;
        Ok(())
    }
}

fn order_from_row(row: &AnyRow) -> AppResult<Order> {
    Ok(Order {
        id: row.try_get("id")?,
        order_number: row.try_get("order_number")?,
        table_id: row.try_get("table_id")?,
        order_type: OrderType::parse(row.try_get::<String, _>("type")?.as_str())?,
        status: OrderStatus::parse(row.try_get::<String, _>("status")?.as_str())?,
        subtotal: row.try_get("subtotal")?,
        tax_amount: row.try_get("tax_amount")?,
        total: row.try_get("total")?,
        paid_amount: row.try_get("paid_amount")?,
        payment_status: PaymentStatus::parse(
            row.try_get::<String, _>("payment_status")?.as_str(),
        )?,
        customer_name: row.try_get("customer_name")?,
        customer_phone: row.try_get("customer_phone")?,
        customer_address: row.try_get("customer_address")?,
        notes: row.try_get("notes")?,
        kitchen_notes: row.try_get("kitchen_notes")?,
        created_at: row.try_get("created_at")?,
        completed_at: row.try_get("completed_at")?,
        cancelled_at: row.try_get("cancelled_at")?,
        items: Vec::new(),
    })
}

fn item_from_row(row: &AnyRow) -> AppResult<OrderItem> {
    Ok(OrderItem {
        id: row.try_get("id")?,
        order_id: row.try_get("order_id")?,
        menu_item_id: row.try_get("menu_item_id")?,
        menu_item_name: row.try_get("menu_item_name")?,
        quantity: row.try_get("quantity")?,
        unit_price: row.try_get("unit_price")?,
        status: ItemStatus::parse(row.try_get::<String, _>("status")?.as_str())?,
        notes: row.try_get("notes")?,
        created_at: row.try_get("created_at")?,
    })
}
