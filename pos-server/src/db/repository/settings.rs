//! Settings store — the singleton record over key/value rows
//!
//! 九个字段整体读写；保存必须原子，部分更新绝不可见。

use sqlx::{AnyPool, Row};

use crate::db::models::Settings;
use crate::utils::{self, AppError, AppResult};

#[derive(Clone)]
pub struct SettingsRepository {
    pool: AnyPool,
}

impl SettingsRepository {
    pub fn new(pool: AnyPool) -> Self {
        Self { pool }
    }

    /// Load the singleton record.
    ///
    /// Unknown keys are ignored (forward compatibility); missing keys keep
    /// the field's zero default. If the restaurant name is still empty after
    /// the scan, the whole record is replaced with the built-in bundle —
    /// all-or-nothing, not per-field.
    pub async fn load(&self) -> AppResult<Settings> {
        let rows = match sqlx::query("SELECT `key`, value FROM settings")
            .fetch_all(&self.pool)
            .await
        {
            Ok(rows) => rows,
            Err(e) => {
                // An absent/empty store reports defaults rather than erroring
                tracing::warn!(error = %e, "Settings scan failed, using defaults");
                return Ok(Settings::defaults());
            }
        };

        let mut settings = Settings::default();
        for row in rows {
            let key: String = row.try_get("key")?;
            let value: String = row.try_get("value")?;
            match key.as_str() {
                "restaurant_name" => settings.restaurant_name = value,
                "restaurant_name_ar" => settings.restaurant_name_ar = value,
                "currency" => settings.currency = value,
                "tax_rate" => settings.tax_rate = value.parse().unwrap_or(0.0),
                "service_charge_rate" => {
                    settings.service_charge_rate = value.parse().unwrap_or(0.0)
                }
                "language" => settings.language = value,
                "theme_color" => settings.theme_color = value,
                "print_receipt" => settings.print_receipt = parse_flag(&value),
                "print_kitchen" => settings.print_kitchen = parse_flag(&value),
                _ => {}
            }
        }

        if settings.restaurant_name.is_empty() {
            return Ok(Settings::defaults());
        }
        Ok(settings)
    }

    /// Persist all nine fields as upserts in one transaction.
    ///
    /// Any single failure rolls the whole write back; the previously
    /// persisted record stays observable unchanged.
    pub async fn save(&self, settings: &Settings) -> AppResult<()> {
        let now = utils::now_millis();
        let fields: [(&str, String); 9] = [
            ("restaurant_name", settings.restaurant_name.clone()),
            ("restaurant_name_ar", settings.restaurant_name_ar.clone()),
            ("currency", settings.currency.clone()),
            ("tax_rate", settings.tax_rate.to_string()),
            (
                "service_charge_rate",
                settings.service_charge_rate.to_string(),
            ),
            ("language", settings.language.clone()),
            ("theme_color", settings.theme_color.clone()),
            ("print_receipt", flag_str(settings.print_receipt)),
            ("print_kitchen", flag_str(settings.print_kitchen)),
        ];

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::persist(format!("settings begin: {e}")))?;

        for (key, value) in fields {
            sqlx::query("REPLACE INTO settings (`key`, value, updated_at) VALUES (?, ?, ?)")
                .bind(key)
                .bind(value)
                .bind(now)
                .execute(&mut *tx)
                .await
                .map_err(|e| AppError::persist(format!("settings key {key}: {e}")))?;
            // tx dropped on the error path above -> automatic rollback
        }

        tx.commit()
            .await
            .map_err(|e| AppError::persist(format!("settings commit: {e}")))?;
        Ok(())
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value, "true" | "1")
}

fn flag_str(value: bool) -> String {
    if value { "true" } else { "false" }.to_string()
}
