//! Order lifecycle, payments, and derived timestamps

use pos_server::db::models::{
    ItemStatus, NewOrder, NewOrderItem, OrderStatus, PaymentMethod, PaymentStatus,
};
use pos_server::db::repository::{OrderRepository, PaymentRepository};
use pos_server::{AppError, Config, DbService};

fn fallback_config(dir: &tempfile::TempDir) -> Config {
    Config::with_overrides(
        "mysql://127.0.0.1:1/pos_test",
        dir.path().join("pos.db").display().to_string(),
        1500,
    )
}

async fn repos(dir: &tempfile::TempDir) -> (OrderRepository, PaymentRepository) {
    let db = DbService::connect(&fallback_config(dir)).await.unwrap();
    (
        OrderRepository::new(db.pool.clone()),
        PaymentRepository::new(db.pool.clone()),
    )
}

fn two_lines() -> Vec<NewOrderItem> {
    vec![
        NewOrderItem {
            menu_item_id: 1,
            menu_item_name: "Koshari".to_string(),
            quantity: 2,
            unit_price: 10.0,
            notes: None,
        },
        NewOrderItem {
            menu_item_id: 2,
            menu_item_name: "Tea".to_string(),
            quantity: 1,
            unit_price: 5.0,
            notes: None,
        },
    ]
}

#[tokio::test]
async fn checkout_flow_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let (orders, payments) = repos(&dir).await;

    let order = orders.create(NewOrder::default()).await.unwrap();
    assert!(order.order_number.starts_with("ORD-"));
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.total, 0.0);
    assert_eq!(order.payment_status, PaymentStatus::Unpaid);

    // Two lines at 14% tax: 25.00 + 3.50
    let order = orders.add_items(order.id, &two_lines(), 0.14).await.unwrap();
    assert_eq!(order.subtotal, 25.0);
    assert_eq!(order.tax_amount, 3.5);
    assert_eq!(order.total, 28.5);
    assert_eq!(order.items.len(), 2);

    // Exact cash payment covers the total
    let payment = payments
        .record(order.id, PaymentMethod::Cash, 30.0, Some(30.0))
        .await
        .unwrap();
    assert_eq!(payment.change_amount, Some(0.0));

    let order = orders.get(order.id).await.unwrap();
    assert_eq!(order.paid_amount, 30.0);
    assert_eq!(order.payment_status, PaymentStatus::Paid);

    let order = orders
        .set_status(order.id, OrderStatus::Completed)
        .await
        .unwrap();
    assert_eq!(order.status, OrderStatus::Completed);
    assert!(order.completed_at.is_some());
    assert!(order.cancelled_at.is_none());
}

#[tokio::test]
async fn cancellation_stamps_cancelled_at_only() {
    let dir = tempfile::tempdir().unwrap();
    let (orders, _) = repos(&dir).await;

    let order = orders.create(NewOrder::default()).await.unwrap();
    let order = orders
        .set_status(order.id, OrderStatus::Cancelled)
        .await
        .unwrap();
    assert_eq!(order.status, OrderStatus::Cancelled);
    assert!(order.cancelled_at.is_some());
    assert!(order.completed_at.is_none());
}

#[tokio::test]
async fn illegal_transitions_leave_the_row_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let (orders, _) = repos(&dir).await;

    let order = orders.create(NewOrder::default()).await.unwrap();
    let order = orders
        .set_status(order.id, OrderStatus::Completed)
        .await
        .unwrap();
    let completed_at = order.completed_at;

    // Terminal states accept nothing
    let err = orders
        .set_status(order.id, OrderStatus::Preparing)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidTransition(_)));
    let err = orders
        .set_status(order.id, OrderStatus::Cancelled)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidTransition(_)));

    let unchanged = orders.get(order.id).await.unwrap();
    assert_eq!(unchanged.status, OrderStatus::Completed);
    assert_eq!(unchanged.completed_at, completed_at);
    assert!(unchanged.cancelled_at.is_none());
}

#[tokio::test]
async fn payments_accumulate_monotonically() {
    let dir = tempfile::tempdir().unwrap();
    let (orders, payments) = repos(&dir).await;

    let order = orders.create(NewOrder::default()).await.unwrap();
    orders.add_items(order.id, &two_lines(), 0.14).await.unwrap();

    payments
        .record(order.id, PaymentMethod::Card, 10.0, None)
        .await
        .unwrap();
    let after_first = orders.get(order.id).await.unwrap();
    assert_eq!(after_first.paid_amount, 10.0);
    assert_eq!(after_first.payment_status, PaymentStatus::Partial);

    payments
        .record(order.id, PaymentMethod::Cash, 18.5, Some(20.0))
        .await
        .unwrap();
    let after_second = orders.get(order.id).await.unwrap();
    assert_eq!(after_second.paid_amount, 28.5);
    assert_eq!(after_second.payment_status, PaymentStatus::Paid);

    let history = payments.list_by_order(order.id).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[1].change_amount, Some(1.5));
}

#[tokio::test]
async fn cash_underpayment_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let (orders, payments) = repos(&dir).await;

    let order = orders.create(NewOrder::default()).await.unwrap();
    orders.add_items(order.id, &two_lines(), 0.14).await.unwrap();

    let err = payments
        .record(order.id, PaymentMethod::Cash, 50.0, Some(40.0))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    assert!(payments.list_by_order(order.id).await.unwrap().is_empty());
    let order = orders.get(order.id).await.unwrap();
    assert_eq!(order.paid_amount, 0.0);
    assert_eq!(order.payment_status, PaymentStatus::Unpaid);
}

#[tokio::test]
async fn payment_against_missing_order_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let (_, payments) = repos(&dir).await;

    let err = payments
        .record(424242, PaymentMethod::Card, 10.0, None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn list_is_bounded_most_recent_first_without_lines() {
    let dir = tempfile::tempdir().unwrap();
    let (orders, _) = repos(&dir).await;

    let mut ids = Vec::new();
    for _ in 0..3 {
        let order = orders.create(NewOrder::default()).await.unwrap();
        orders.add_items(order.id, &two_lines(), 0.14).await.unwrap();
        ids.push(order.id);
    }

    let listed = orders.list(50).await.unwrap();
    assert_eq!(listed.len(), 3);
    assert_eq!(listed[0].id, ids[2]);
    assert_eq!(listed[2].id, ids[0]);
    // Summary view: lines need the explicit secondary fetch
    assert!(listed.iter().all(|o| o.items.is_empty()));
    assert_eq!(orders.items(ids[0]).await.unwrap().len(), 2);

    let bounded = orders.list(2).await.unwrap();
    assert_eq!(bounded.len(), 2);
}

#[tokio::test]
async fn set_status_on_missing_order_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let (orders, _) = repos(&dir).await;

    let err = orders
        .set_status(979797, OrderStatus::Preparing)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn line_status_is_independent_of_the_order() {
    let dir = tempfile::tempdir().unwrap();
    let (orders, _) = repos(&dir).await;

    let order = orders.create(NewOrder::default()).await.unwrap();
    let order = orders.add_items(order.id, &two_lines(), 0.14).await.unwrap();
    let first = order.items[0].id;
    let second = order.items[1].id;

    orders
        .set_item_status(first, ItemStatus::Preparing)
        .await
        .unwrap();
    orders.set_item_status(first, ItemStatus::Ready).await.unwrap();

    // One line cancelled while the order itself stays pending
    orders
        .set_item_status(second, ItemStatus::Cancelled)
        .await
        .unwrap();
    let detail = orders.get_detail(order.id).await.unwrap();
    assert_eq!(detail.status, OrderStatus::Pending);
    assert_eq!(detail.items[0].status, ItemStatus::Ready);
    assert_eq!(detail.items[1].status, ItemStatus::Cancelled);

    let err = orders
        .set_item_status(first, ItemStatus::Pending)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidTransition(_)));
}

#[tokio::test]
async fn terminal_orders_accept_no_new_lines() {
    let dir = tempfile::tempdir().unwrap();
    let (orders, _) = repos(&dir).await;

    let order = orders.create(NewOrder::default()).await.unwrap();
    orders
        .set_status(order.id, OrderStatus::Cancelled)
        .await
        .unwrap();

    let err = orders
        .add_items(order.id, &two_lines(), 0.14)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}
