//! Payment record
//!
//! Append-only; never mutated after creation.

use serde::{Deserialize, Serialize};

use crate::utils::{AppError, AppResult};

/// Settlement method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Card,
    Other,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Card => "card",
            Self::Other => "other",
        }
    }

    pub fn parse(s: &str) -> AppResult<Self> {
        match s {
            "cash" => Ok(Self::Cash),
            "card" => Ok(Self::Card),
            "other" => Ok(Self::Other),
            other => Err(AppError::validation(format!(
                "unknown payment method: {other}"
            ))),
        }
    }
}

/// One settlement event against an order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: i64,
    pub order_id: i64,
    pub method: PaymentMethod,
    pub amount: f64,
    /// Cash handed over; only set for cash payments
    pub cash_tendered: Option<f64>,
    /// tendered - amount; only set for cash payments
    pub change_amount: Option<f64>,
    pub created_at: i64,
}
