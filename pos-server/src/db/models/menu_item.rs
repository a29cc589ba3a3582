//! Menu item
//!
//! Orders snapshot the name and price at add-time; edits here never rewrite
//! existing order lines.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: i64,
    pub name: String,
    pub name_ar: String,
    pub category_id: Option<i64>,
    pub price: f64,
    pub cost_price: Option<f64>,
    pub is_available: bool,
    /// Times sold, bumped on checkout for the dashboard's top-items view
    pub order_count: i64,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMenuItem {
    pub name: String,
    pub name_ar: String,
    pub category_id: Option<i64>,
    pub price: f64,
    pub cost_price: Option<f64>,
}

/// Partial update payload; `None` fields keep their stored value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MenuItemUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_ar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_available: Option<bool>,
}
