//! Store repositories over the active connection
//!
//! Every repository holds a clone of the active pool; multi-step writes run
//! inside scoped transactions that roll back on any failure path.

pub mod category;
pub mod dining_table;
pub mod menu_item;
pub mod order;
pub mod payment;
pub mod settings;

pub use category::CategoryRepository;
pub use dining_table::DiningTableRepository;
pub use menu_item::MenuItemRepository;
pub use order::OrderRepository;
pub use payment::PaymentRepository;
pub use settings::SettingsRepository;
