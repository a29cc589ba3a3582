//! Settings record (singleton)
//!
//! 每个工作站只有一条逻辑记录，持久化为 key/value 行。

use serde::{Deserialize, Serialize};

/// Station settings, persisted as key/value rows in the `settings` table.
///
/// `Default` is the type-zero record used while scanning stored rows;
/// [`Settings::defaults`] is the bundle installed on first run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Settings {
    pub restaurant_name: String,
    pub restaurant_name_ar: String,
    pub currency: String,
    /// Tax fraction in [0, 1]
    pub tax_rate: f64,
    /// Service-charge fraction in [0, 1]
    pub service_charge_rate: f64,
    pub language: String,
    pub theme_color: String,
    pub print_receipt: bool,
    pub print_kitchen: bool,
}

impl Settings {
    /// Built-in default bundle installed on first run
    pub fn defaults() -> Self {
        Self {
            restaurant_name: "مطعم".to_string(),
            restaurant_name_ar: "مطعم".to_string(),
            currency: "ج.م".to_string(),
            tax_rate: 0.14,
            service_charge_rate: 0.10,
            language: "ar".to_string(),
            theme_color: "#10b981".to_string(),
            print_receipt: true,
            print_kitchen: true,
        }
    }
}
