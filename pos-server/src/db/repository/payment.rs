//! Payment recorder — append-only rows plus order reconciliation
//!
//! 支付行和订单对账必须同一事务落盘：绝不允许存在没有对账的支付记录。

use sqlx::{AnyPool, Row};

use crate::db::models::payment::{Payment, PaymentMethod};
use crate::money;
use crate::utils::{self, AppError, AppResult};

#[derive(Clone)]
pub struct PaymentRepository {
    pool: AnyPool,
}

impl PaymentRepository {
    pub fn new(pool: AnyPool) -> Self {
        Self { pool }
    }

    /// Record a settlement against an order and reconcile the order's
    /// paid amount and payment status, as one transaction.
    ///
    /// A cash tender below the amount due is rejected before any write.
    pub async fn record(
        &self,
        order_id: i64,
        method: PaymentMethod,
        amount: f64,
        tendered: Option<f64>,
    ) -> AppResult<Payment> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(AppError::validation(format!(
                "payment amount must be positive, got {amount}"
            )));
        }

        let (cash_tendered, change_amount) = match (method, tendered) {
            (PaymentMethod::Cash, Some(t)) => {
                if !t.is_finite() {
                    return Err(AppError::validation("tendered amount must be a number"));
                }
                if money::to_decimal(t) < money::to_decimal(amount) {
                    return Err(AppError::validation(format!(
                        "tendered {t} is less than amount due {amount}"
                    )));
                }
                (Some(t), Some(money::change_due(amount, t)))
            }
            _ => (None, None),
        };

        let order_row = sqlx::query("SELECT total FROM orders WHERE id = ?")
            .bind(order_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::persist(format!("get order: {e}")))?
            .ok_or_else(|| AppError::not_found(format!("order {order_id}")))?;
        let total: f64 = order_row.try_get("total")?;

        let id = utils::snowflake_id();
        let now = utils::now_millis();

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::persist(format!("payment begin: {e}")))?;

        sqlx::query(
            "INSERT INTO payments (id, order_id, method, amount, cash_tendered, \
             change_amount, created_at) VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(order_id)
        .bind(method.as_str())
        .bind(amount)
        .bind(cash_tendered)
        .bind(change_amount)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::persist(format!("insert payment: {e}")))?;

        // Re-sum inside the transaction so the order can never drift from
        // its payment rows
        let rows = sqlx::query("SELECT amount FROM payments WHERE order_id = ?")
            .bind(order_id)
            .fetch_all(&mut *tx)
            .await
            .map_err(|e| AppError::persist(format!("sum payments: {e}")))?;
        let amounts: Vec<f64> = rows
            .iter()
            .map(|row| row.try_get("amount").map_err(AppError::from))
            .collect::<AppResult<_>>()?;
        let paid = money::sum_amounts(&amounts);
        let payment_status = money::payment_status_for(paid, total);

        sqlx::query("UPDATE orders SET paid_amount = ?, payment_status = ? WHERE id = ?")
            .bind(paid)
            .bind(payment_status.as_str())
            .bind(order_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::persist(format!("reconcile order: {e}")))?;

        tx.commit()
            .await
            .map_err(|e| AppError::persist(format!("payment commit: {e}")))?;

        tracing::info!(
            order_id,
            payment_id = id,
            method = method.as_str(),
            amount,
            paid,
            status = payment_status.as_str(),
            "Payment recorded"
        );

        Ok(Payment {
            id,
            order_id,
            method,
            amount,
            cash_tendered,
            change_amount,
            created_at: now,
        })
    }

    /// Payments for one order, oldest first
    pub async fn list_by_order(&self, order_id: i64) -> AppResult<Vec<Payment>> {
        let rows = sqlx::query(
            "SELECT id, order_id, method, amount, cash_tendered, change_amount, created_at \
             FROM payments WHERE order_id = ? ORDER BY created_at ASC, id ASC",
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::persist(format!("list payments: {e}")))?;

        rows.iter()
            .map(|row| {
                Ok(Payment {
                    id: row.try_get("id")?,
                    order_id: row.try_get("order_id")?,
                    method: PaymentMethod::parse(row.try_get::<String, _>("method")?.as_str())?,
                    amount: row.try_get("amount")?,
                    cash_tendered: row.try_get("cash_tendered")?,
                    change_amount: row.try_get("change_amount")?,
                    created_at: row.try_get("created_at")?,
                })
            })
            .collect()
    }
}
