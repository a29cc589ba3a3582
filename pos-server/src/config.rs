//! Station configuration
//!
//! Fixed store descriptors and output devices, with environment overrides:
//!
//! | 环境变量 | 默认值 | 说明 |
//! |----------|--------|------|
//! | POS_PRIMARY_URL | mysql://root@localhost:3306/restaurant_pos | 主数据库 |
//! | POS_FALLBACK_PATH | ./restaurant_pos.db | 离线嵌入式数据库 |
//! | POS_PROBE_TIMEOUT_MS | 3000 | 连接探测超时(毫秒) |
//! | POS_RECEIPT_DEVICE | default | 收据打印设备 |
//! | POS_KITCHEN_DEVICE | kitchen | 厨房打印设备 |

use std::time::Duration;

/// Station configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Networked primary store descriptor
    pub primary_url: String,
    /// Embedded fallback store path, relative to the executable
    pub fallback_path: String,
    /// Liveness probe timeout (milliseconds)
    pub probe_timeout_ms: u64,
    /// Spooler device for customer receipts
    pub receipt_device: String,
    /// Spooler device for kitchen tickets
    pub kitchen_device: String,
}

impl Config {
    /// Load configuration, falling back to the built-in descriptors
    pub fn from_env() -> Self {
        Self {
            primary_url: std::env::var("POS_PRIMARY_URL")
                .unwrap_or_else(|_| "mysql://root@localhost:3306/restaurant_pos".into()),
            fallback_path: std::env::var("POS_FALLBACK_PATH")
                .unwrap_or_else(|_| "./restaurant_pos.db".into()),
            probe_timeout_ms: std::env::var("POS_PROBE_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            receipt_device: std::env::var("POS_RECEIPT_DEVICE")
                .unwrap_or_else(|_| "default".into()),
            kitchen_device: std::env::var("POS_KITCHEN_DEVICE")
                .unwrap_or_else(|_| "kitchen".into()),
        }
    }

    /// Override the store descriptors
    ///
    /// 常用于测试场景
    pub fn with_overrides(
        primary_url: impl Into<String>,
        fallback_path: impl Into<String>,
        probe_timeout_ms: u64,
    ) -> Self {
        let mut config = Self::from_env();
        config.primary_url = primary_url.into();
        config.fallback_path = fallback_path.into();
        config.probe_timeout_ms = probe_timeout_ms;
        config
    }

    /// Probe timeout as a `Duration`
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
