//! Menu category

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub name_ar: String,
    pub display_order: i64,
    pub is_active: bool,
    pub created_at: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: String,
    pub name_ar: String,
    #[serde(default)]
    pub display_order: i64,
}
