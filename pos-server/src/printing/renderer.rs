//! Minimal HTML ticket rendering
//!
//! 80mm thermal layout; the spooler takes the document as-is. Anything
//! fancier belongs to the UI layer.

use crate::db::models::{Order, Settings};
use crate::money;

/// Customer receipt. Direction follows the session language.
pub fn receipt_html(order: &Order, settings: &Settings, language: &str) -> String {
    let dir = if language == "ar" { "rtl" } else { "ltr" };
    let title = if language == "ar" { "فاتورة" } else { "Receipt" };

    let mut lines = String::new();
    for item in &order.items {
        let line_total = money::to_f64(
            money::to_decimal(item.unit_price) * rust_decimal::Decimal::from(item.quantity),
        );
        lines.push_str(&format!(
            "    <div class=\"item\"><span class=\"item-name\">{} x{}</span>\
             <span class=\"item-price\">{:.2} {}</span></div>\n",
            item.menu_item_name, item.quantity, line_total, settings.currency
        ));
    }

    format!(
        r#"<!DOCTYPE html>
<html dir="{dir}">
<head>
    <meta charset="UTF-8">
    <title>{title}</title>
    <style>
        body {{ font-family: 'Cairo', Arial, sans-serif; width: 80mm; margin: 0; padding: 10px; }}
        .header {{ text-align: center; margin-bottom: 10px; }}
        .header h1 {{ font-size: 16px; margin: 5px 0; }}
        .line {{ border-bottom: 1px dashed #000; margin: 10px 0; }}
        .item {{ display: flex; justify-content: space-between; margin: 5px 0; }}
        .item-name {{ flex: 1; }}
        .item-price {{ text-align: right; }}
        .totals {{ text-align: right; font-weight: bold; margin-top: 10px; }}
        .footer {{ text-align: center; margin-top: 20px; font-size: 10px; }}
    </style>
</head>
<body>
    <div class="header">
        <h1>{name}</h1>
        <p>{number}</p>
    </div>
    <div class="line"></div>
{lines}    <div class="line"></div>
    <div class="totals">
        <p>{subtotal:.2} {currency}</p>
        <p>{tax:.2} {currency}</p>
        <p>{total:.2} {currency}</p>
    </div>
    <div class="footer">
        <p>{name}</p>
    </div>
</body>
</html>"#,
        dir = dir,
        title = title,
        name = settings.restaurant_name,
        number = order.order_number,
        lines = lines,
        subtotal = order.subtotal,
        tax = order.tax_amount,
        total = order.total,
        currency = settings.currency,
    )
}

/// Kitchen ticket: order number, live lines, kitchen notes. Always LTR.
pub fn kitchen_html(order: &Order) -> String {
    let mut lines = String::new();
    for item in &order.items {
        if item.status == crate::db::models::ItemStatus::Cancelled {
            continue;
        }
        lines.push_str(&format!(
            "    <div class=\"item\"><span class=\"item-qty\">{}x</span> \
             <span class=\"item-name\">{}</span>{}</div>\n",
            item.quantity,
            item.menu_item_name,
            item.notes
                .as_deref()
                .map(|n| format!(" <em>{n}</em>"))
                .unwrap_or_default()
        ));
    }
    let notes = order
        .kitchen_notes
        .as_deref()
        .map(|n| format!("    <p>{n}</p>\n"))
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html dir="ltr">
<head>
    <meta charset="UTF-8">
    <title>Kitchen Order</title>
    <style>
        body {{ font-family: Arial, sans-serif; width: 80mm; margin: 0; padding: 10px; }}
        .header {{ text-align: center; margin-bottom: 10px; }}
        .order-number {{ font-size: 18px; font-weight: bold; }}
        .line {{ border-bottom: 1px dashed #000; margin: 10px 0; }}
        .item {{ margin: 10px 0; }}
        .item-name {{ font-weight: bold; font-size: 14px; }}
        .item-qty {{ font-size: 18px; font-weight: bold; }}
    </style>
</head>
<body>
    <div class="header">
        <p>KITCHEN ORDER</p>
        <p class="order-number">#{number}</p>
    </div>
    <div class="line"></div>
{lines}{notes}    <div class="line"></div>
</body>
</html>"#,
        number = order.order_number,
        lines = lines,
        notes = notes,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::order::{ItemStatus, OrderItem, OrderStatus, OrderType, PaymentStatus};

    fn sample_order() -> Order {
        Order {
            id: 1,
            order_number: "ORD-1".to_string(),
            table_id: None,
            order_type: OrderType::DineIn,
            status: OrderStatus::Pending,
            subtotal: 25.0,
            tax_amount: 3.5,
            total: 28.5,
            paid_amount: 0.0,
            payment_status: PaymentStatus::Unpaid,
            customer_name: None,
            customer_phone: None,
            customer_address: None,
            notes: None,
            kitchen_notes: Some("no onions".to_string()),
            created_at: 0,
            completed_at: None,
            cancelled_at: None,
            items: vec![
                OrderItem {
                    id: 10,
                    order_id: 1,
                    menu_item_id: 100,
                    menu_item_name: "Falafel".to_string(),
                    quantity: 2,
                    unit_price: 10.0,
                    status: ItemStatus::Pending,
                    notes: None,
                    created_at: 0,
                },
                OrderItem {
                    id: 11,
                    order_id: 1,
                    menu_item_id: 101,
                    menu_item_name: "Tea".to_string(),
                    quantity: 1,
                    unit_price: 5.0,
                    status: ItemStatus::Cancelled,
                    notes: None,
                    created_at: 0,
                },
            ],
        }
    }

    #[test]
    fn receipt_follows_session_direction() {
        let order = sample_order();
        let settings = Settings::defaults();
        let ar = receipt_html(&order, &settings, "ar");
        assert!(ar.contains("dir=\"rtl\""));
        assert!(ar.contains("ORD-1"));
        assert!(ar.contains("28.50"));

        let en = receipt_html(&order, &settings, "en");
        assert!(en.contains("dir=\"ltr\""));
        assert!(en.contains("Receipt"));
    }

    #[test]
    fn kitchen_ticket_skips_cancelled_lines() {
        let order = sample_order();
        let html = kitchen_html(&order);
        assert!(html.contains("Falafel"));
        assert!(!html.contains("Tea"));
        assert!(html.contains("no onions"));
    }
}
