//! Money calculation utilities using rust_decimal for precision
//!
//! All calculations are done using `Decimal` internally, then converted to
//! `f64` for storage/serialization.

use rust_decimal::prelude::*;

use crate::db::models::PaymentStatus;

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Tolerance for monetary comparisons (0.01)
pub const MONEY_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Convert f64 to Decimal for calculation
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Monetary fields derived from an order's line snapshots
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderTotals {
    pub subtotal: f64,
    pub tax_amount: f64,
    pub total: f64,
}

/// Derive subtotal/tax/total from `(unit_price, quantity)` line snapshots.
///
/// `total = subtotal + tax_amount`; the service charge is folded in by the
/// caller at computation time, never persisted per order.
pub fn order_totals(lines: &[(f64, i64)], tax_rate: f64) -> OrderTotals {
    let subtotal: Decimal = lines
        .iter()
        .map(|(unit_price, quantity)| {
            (to_decimal(*unit_price) * Decimal::from(*quantity))
                .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        })
        .sum();
    let tax = (subtotal * to_decimal(tax_rate))
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);

    OrderTotals {
        subtotal: to_f64(subtotal),
        tax_amount: to_f64(tax),
        total: to_f64(subtotal + tax),
    }
}

/// Sum payment amounts with precise arithmetic
pub fn sum_amounts(amounts: &[f64]) -> f64 {
    let total: Decimal = amounts.iter().map(|a| to_decimal(*a)).sum();
    to_f64(total)
}

/// Payment status derived from the accumulated paid amount.
///
/// unpaid when nothing is paid, paid when the total is covered (within
/// tolerance), partial in between.
pub fn payment_status_for(paid: f64, total: f64) -> PaymentStatus {
    let paid = to_decimal(paid);
    if paid <= Decimal::ZERO {
        return PaymentStatus::Unpaid;
    }
    if paid >= to_decimal(total) - MONEY_TOLERANCE {
        return PaymentStatus::Paid;
    }
    PaymentStatus::Partial
}

/// Change due on a cash tender. Caller validates `tendered >= amount`.
pub fn change_due(amount: f64, tendered: f64) -> f64 {
    to_f64(to_decimal(tendered) - to_decimal(amount))
}
