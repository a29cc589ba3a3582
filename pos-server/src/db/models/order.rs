//! Order domain model and status machines

use serde::{Deserialize, Serialize};

use crate::utils::{AppError, AppResult};

/// Order lifecycle status
///
/// pending → preparing → ready → completed, forward jumps allowed
/// (a counter order can go straight from pending to completed);
/// cancelled is reachable from any non-terminal state.
/// completed and cancelled are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Preparing,
    Ready,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Preparing => "preparing",
            Self::Ready => "ready",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> AppResult<Self> {
        match s {
            "pending" => Ok(Self::Pending),
            "preparing" => Ok(Self::Preparing),
            "ready" => Ok(Self::Ready),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(AppError::validation(format!(
                "unknown order status: {other}"
            ))),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Is `next` a legal move from this state?
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        match (self, next) {
            (Pending, Preparing | Ready | Completed | Cancelled) => true,
            (Preparing, Ready | Completed | Cancelled) => true,
            (Ready, Completed | Cancelled) => true,
            _ => false,
        }
    }

    pub fn ensure_transition(self, next: OrderStatus) -> AppResult<()> {
        if self.can_transition_to(next) {
            return Ok(());
        }
        Err(AppError::invalid_transition(format!(
            "order {} -> {}",
            self.as_str(),
            next.as_str()
        )))
    }
}

/// Per-line status, a subset of the order machine
///
/// pending → preparing → ready; a line can be cancelled from any
/// non-cancelled state, independent of the order's own status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    Pending,
    Preparing,
    Ready,
    Cancelled,
}

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Preparing => "preparing",
            Self::Ready => "ready",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> AppResult<Self> {
        match s {
            "pending" => Ok(Self::Pending),
            "preparing" => Ok(Self::Preparing),
            "ready" => Ok(Self::Ready),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(AppError::validation(format!("unknown line status: {other}"))),
        }
    }

    pub fn can_transition_to(self, next: ItemStatus) -> bool {
        use ItemStatus::*;
        match (self, next) {
            (Pending, Preparing | Ready | Cancelled) => true,
            (Preparing, Ready | Cancelled) => true,
            (Ready, Cancelled) => true,
            _ => false,
        }
    }

    pub fn ensure_transition(self, next: ItemStatus) -> AppResult<()> {
        if self.can_transition_to(next) {
            return Ok(());
        }
        Err(AppError::invalid_transition(format!(
            "line {} -> {}",
            self.as_str(),
            next.as_str()
        )))
    }
}

/// Order channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    #[default]
    DineIn,
    Takeaway,
    Delivery,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DineIn => "dine_in",
            Self::Takeaway => "takeaway",
            Self::Delivery => "delivery",
        }
    }

    pub fn parse(s: &str) -> AppResult<Self> {
        match s {
            "dine_in" => Ok(Self::DineIn),
            "takeaway" => Ok(Self::Takeaway),
            "delivery" => Ok(Self::Delivery),
            other => Err(AppError::validation(format!("unknown order type: {other}"))),
        }
    }
}

/// Settlement progress of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Unpaid,
    Partial,
    Paid,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unpaid => "unpaid",
            Self::Partial => "partial",
            Self::Paid => "paid",
        }
    }

    pub fn parse(s: &str) -> AppResult<Self> {
        match s {
            "unpaid" => Ok(Self::Unpaid),
            "partial" => Ok(Self::Partial),
            "paid" => Ok(Self::Paid),
            other => Err(AppError::validation(format!(
                "unknown payment status: {other}"
            ))),
        }
    }
}

/// One customer transaction. Never physically deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    /// Human-readable unique number, `ORD-<id>`
    pub order_number: String,
    pub table_id: Option<i64>,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub status: OrderStatus,
    pub subtotal: f64,
    pub tax_amount: f64,
    /// total = subtotal + tax_amount
    pub total: f64,
    pub paid_amount: f64,
    pub payment_status: PaymentStatus,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_address: Option<String>,
    pub notes: Option<String>,
    pub kitchen_notes: Option<String>,
    pub created_at: i64,
    /// Set exactly on entry to completed; mutually exclusive with cancelled_at
    pub completed_at: Option<i64>,
    /// Set exactly on entry to cancelled
    pub cancelled_at: Option<i64>,
    /// Populated only by the detail fetch; the list view leaves this empty
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<OrderItem>,
}

/// One menu item within an order. Name and unit price are captured at
/// add-time and stay fixed even if the menu item later changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub menu_item_id: i64,
    pub menu_item_name: String,
    pub quantity: i64,
    pub unit_price: f64,
    pub status: ItemStatus,
    pub notes: Option<String>,
    pub created_at: i64,
}

/// Checkout-initiation payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewOrder {
    pub table_id: Option<i64>,
    #[serde(rename = "type", default)]
    pub order_type: OrderType,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_address: Option<String>,
    pub notes: Option<String>,
    pub kitchen_notes: Option<String>,
}

/// One line to append to an order, with the menu snapshot captured by the
/// caller at add-time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrderItem {
    pub menu_item_id: i64,
    pub menu_item_name: String,
    pub quantity: i64,
    pub unit_price: f64,
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_machine_accepts_forward_moves() {
        use OrderStatus::*;
        assert!(Pending.can_transition_to(Preparing));
        assert!(Pending.can_transition_to(Completed));
        assert!(Preparing.can_transition_to(Ready));
        assert!(Ready.can_transition_to(Completed));
    }

    #[test]
    fn order_machine_allows_cancel_from_any_non_terminal() {
        use OrderStatus::*;
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Preparing.can_transition_to(Cancelled));
        assert!(Ready.can_transition_to(Cancelled));
    }

    #[test]
    fn order_machine_rejects_backward_and_terminal_moves() {
        use OrderStatus::*;
        assert!(!Preparing.can_transition_to(Pending));
        assert!(!Ready.can_transition_to(Preparing));
        assert!(!Completed.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(Pending));
        assert!(!Completed.can_transition_to(Completed));
    }

    #[test]
    fn order_machine_rejects_self_transition() {
        use OrderStatus::*;
        assert!(!Pending.can_transition_to(Pending));
        assert!(!Preparing.can_transition_to(Preparing));
    }

    #[test]
    fn line_machine_mirrors_subset() {
        use ItemStatus::*;
        assert!(Pending.can_transition_to(Ready));
        assert!(Preparing.can_transition_to(Ready));
        assert!(Ready.can_transition_to(Cancelled));
        assert!(!Ready.can_transition_to(Pending));
        assert!(!Cancelled.can_transition_to(Pending));
    }

    #[test]
    fn ensure_transition_reports_both_states() {
        let err = OrderStatus::Completed
            .ensure_transition(OrderStatus::Preparing)
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidTransition(_)));
        assert!(err.to_string().contains("completed"));
        assert!(err.to_string().contains("preparing"));
    }

    #[test]
    fn api_records_serialize_with_wire_names() {
        let new = NewOrder {
            table_id: Some(7),
            order_type: OrderType::Takeaway,
            ..Default::default()
        };
        let json = serde_json::to_value(&new).unwrap();
        assert_eq!(json["type"], "takeaway");
        assert_eq!(json["table_id"], 7);

        assert_eq!(
            serde_json::to_value(OrderStatus::Preparing).unwrap(),
            "preparing"
        );
        assert_eq!(serde_json::to_value(PaymentStatus::Unpaid).unwrap(), "unpaid");
    }

    #[test]
    fn status_strings_round_trip() {
        for s in [
            OrderStatus::Pending,
            OrderStatus::Preparing,
            OrderStatus::Ready,
            OrderStatus::Completed,
            OrderStatus::Cancelled,
        ] {
            assert_eq!(OrderStatus::parse(s.as_str()).unwrap(), s);
        }
        assert!(OrderStatus::parse("refunded").is_err());
    }
}
