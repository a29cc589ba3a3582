//! In-process API surface consumed by the UI layer
//!
//! Thin composition over the repositories. Holds the cached settings record
//! and the session language — the language is explicit session state, never
//! implicit global state.

use tokio::sync::RwLock;

use crate::config::Config;
use crate::db::models::{
    Category, DiningTable, ItemStatus, MenuItem, MenuItemUpdate, NewCategory, NewDiningTable,
    NewMenuItem, NewOrder, NewOrderItem, Order, OrderStatus, Payment, PaymentMethod, Settings,
    TableStatus,
};
use crate::db::repository::{
    CategoryRepository, DiningTableRepository, MenuItemRepository, OrderRepository,
    PaymentRepository, SettingsRepository,
};
use crate::db::{Backend, DbService};
use crate::printing::{renderer, TicketKind, TicketService};
use crate::utils::{AppError, AppResult};

/// Mutable station session: cached settings + active language
#[derive(Debug, Clone)]
pub struct Session {
    pub settings: Settings,
    pub language: String,
}

/// The station application
pub struct App {
    db: DbService,
    settings_repo: SettingsRepository,
    orders: OrderRepository,
    payments: PaymentRepository,
    categories: CategoryRepository,
    menu: MenuItemRepository,
    tables: DiningTableRepository,
    tickets: TicketService,
    session: RwLock<Session>,
}

impl App {
    /// Establish the active store, load (or install) settings, wire the
    /// repositories and ticket devices
    pub async fn bootstrap(config: &Config) -> AppResult<Self> {
        let db = DbService::connect(config).await?;
        let settings_repo = SettingsRepository::new(db.pool.clone());

        let settings = settings_repo.load().await?;
        let language = settings.language.clone();
        tracing::info!(backend = %db.backend, language = %language, "Station state initialized");

        Ok(Self {
            settings_repo,
            orders: OrderRepository::new(db.pool.clone()),
            payments: PaymentRepository::new(db.pool.clone()),
            categories: CategoryRepository::new(db.pool.clone()),
            menu: MenuItemRepository::new(db.pool.clone()),
            tables: DiningTableRepository::new(db.pool.clone()),
            tickets: TicketService::new(config)?,
            session: RwLock::new(Session { settings, language }),
            db,
        })
    }

    pub fn backend(&self) -> Backend {
        self.db.backend
    }

    // ========== Settings ==========

    pub async fn get_settings(&self) -> Settings {
        self.session.read().await.settings.clone()
    }

    /// Replace the settings record wholesale; the cache and session
    /// language follow only after the store accepts the write
    pub async fn update_settings(&self, settings: Settings) -> AppResult<()> {
        validate_settings(&settings)?;
        self.settings_repo.save(&settings).await?;

        let mut session = self.session.write().await;
        session.language = settings.language.clone();
        session.settings = settings;
        Ok(())
    }

    pub async fn get_language(&self) -> String {
        self.session.read().await.language.clone()
    }

    /// Switch the session language and persist it with the settings record
    pub async fn set_language(&self, language: &str) -> AppResult<()> {
        let mut settings = self.get_settings().await;
        settings.language = language.to_string();
        self.update_settings(settings).await
    }

    // ========== Orders ==========

    pub async fn list_orders(&self) -> AppResult<Vec<Order>> {
        self.orders.list(50).await
    }

    pub async fn create_order(&self, new: NewOrder) -> AppResult<Order> {
        self.orders.create(new).await
    }

    pub async fn order_detail(&self, order_id: i64) -> AppResult<Order> {
        self.orders.get_detail(order_id).await
    }

    /// Append lines, re-derive totals with the configured tax rate, and
    /// bump the menu popularity counters
    pub async fn add_order_items(
        &self,
        order_id: i64,
        lines: Vec<NewOrderItem>,
    ) -> AppResult<Order> {
        let tax_rate = self.get_settings().await.tax_rate;
        let order = self.orders.add_items(order_id, &lines, tax_rate).await?;

        for line in &lines {
            // Popularity counter only; a miss must not fail the checkout
            if let Err(e) = self.menu.bump_order_count(line.menu_item_id, line.quantity).await {
                tracing::warn!(menu_item_id = line.menu_item_id, error = %e, "Order count bump failed");
            }
        }
        Ok(order)
    }

    pub async fn update_order_status(&self, order_id: i64, status: OrderStatus) -> AppResult<Order> {
        self.orders.set_status(order_id, status).await
    }

    pub async fn update_item_status(&self, item_id: i64, status: ItemStatus) -> AppResult<()> {
        self.orders.set_item_status(item_id, status).await
    }

    // ========== Payments ==========

    pub async fn record_payment(
        &self,
        order_id: i64,
        method: PaymentMethod,
        amount: f64,
        tendered: Option<f64>,
    ) -> AppResult<Payment> {
        self.payments.record(order_id, method, amount, tendered).await
    }

    pub async fn order_payments(&self, order_id: i64) -> AppResult<Vec<Payment>> {
        self.payments.list_by_order(order_id).await
    }

    // ========== Tickets ==========

    /// Render and dispatch the customer receipt. A disabled print flag is a
    /// quiet no-op; a device failure surfaces for the manual fallback.
    pub async fn print_receipt(&self, order_id: i64) -> AppResult<()> {
        let session = self.session.read().await.clone();
        if !session.settings.print_receipt {
            tracing::debug!(order_id, "Receipt printing disabled");
            return Ok(());
        }
        let order = self.orders.get_detail(order_id).await?;
        let html = renderer::receipt_html(&order, &session.settings, &session.language);
        self.tickets
            .dispatch(html.as_bytes(), TicketKind::Receipt)
            .await
    }

    /// Render and dispatch the kitchen ticket
    pub async fn print_kitchen_ticket(&self, order_id: i64) -> AppResult<()> {
        let session = self.session.read().await.clone();
        if !session.settings.print_kitchen {
            tracing::debug!(order_id, "Kitchen printing disabled");
            return Ok(());
        }
        let order = self.orders.get_detail(order_id).await?;
        let html = renderer::kitchen_html(&order);
        self.tickets
            .dispatch(html.as_bytes(), TicketKind::Kitchen)
            .await
    }

    // ========== Catalog ==========

    pub async fn list_categories(&self) -> AppResult<Vec<Category>> {
        self.categories.list_active().await
    }

    pub async fn create_category(&self, new: NewCategory) -> AppResult<Category> {
        self.categories.create(new).await
    }

    pub async fn list_menu_items(&self, category_id: Option<i64>) -> AppResult<Vec<MenuItem>> {
        self.menu.list_available(category_id).await
    }

    pub async fn create_menu_item(&self, new: NewMenuItem) -> AppResult<MenuItem> {
        self.menu.create(new).await
    }

    pub async fn update_menu_item(&self, id: i64, update: MenuItemUpdate) -> AppResult<MenuItem> {
        self.menu.update(id, update).await
    }

    // ========== Tables ==========

    pub async fn list_tables(&self) -> AppResult<Vec<DiningTable>> {
        self.tables.list().await
    }

    pub async fn create_table(&self, new: NewDiningTable) -> AppResult<DiningTable> {
        self.tables.create(new).await
    }

    pub async fn set_table_status(&self, table_id: i64, status: TableStatus) -> AppResult<()> {
        self.tables.set_status(table_id, status).await
    }
}

fn validate_settings(settings: &Settings) -> AppResult<()> {
    for (name, rate) in [
        ("tax_rate", settings.tax_rate),
        ("service_charge_rate", settings.service_charge_rate),
    ] {
        if !rate.is_finite() || !(0.0..=1.0).contains(&rate) {
            return Err(AppError::validation(format!(
                "{name} must be a fraction between 0 and 1, got {rate}"
            )));
        }
    }
    Ok(())
}
