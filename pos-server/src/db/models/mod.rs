//! Domain records crossing the in-process API surface

pub mod category;
pub mod dining_table;
pub mod menu_item;
pub mod order;
pub mod payment;
pub mod settings;

pub use category::{Category, NewCategory};
pub use dining_table::{DiningTable, NewDiningTable, TableStatus};
pub use menu_item::{MenuItem, MenuItemUpdate, NewMenuItem};
pub use order::{
    ItemStatus, NewOrder, NewOrderItem, Order, OrderItem, OrderStatus, OrderType, PaymentStatus,
};
pub use payment::{Payment, PaymentMethod};
pub use settings::Settings;
