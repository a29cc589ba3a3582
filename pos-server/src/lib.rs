//! Restaurant POS station backend
//!
//! Single-station, single-process persistence and lifecycle core:
//! - [`db::DbService`] selects the networked primary store or the embedded
//!   fallback once at startup
//! - [`db::repository`] owns settings, orders, payments, catalog and tables
//! - [`printing`] renders and dispatches customer/kitchen tickets
//! - [`app::App`] is the in-process surface the UI layer calls

pub mod app;
pub mod config;
pub mod db;
pub mod money;
pub mod printing;
pub mod utils;

pub use app::{App, Session};
pub use config::Config;
pub use db::{Backend, DbService};
pub use utils::{AppError, AppResult};
