//! WhatsApp order hand-off: message body and `wa.me` link

use resto_shared::utils::{format_money, normalize_phone};

use super::order::{Order, OrderType};

const WA_BASE_URL: &str = "https://wa.me";

/// Human-readable order summary sent to the restaurant
pub fn build_order_message(order: &Order, restaurant_name: &str, branch_name: &str, currency: &str) -> String {
    let mut lines = Vec::with_capacity(order.items.len() + 10);
    lines.push(format!("*New order {}*", order.order_number));
    lines.push(format!("{} - {}", restaurant_name, branch_name));
    lines.push(String::new());
    lines.push(format!("Name: {}", order.customer_name));
    lines.push(format!("Phone: +{}", order.customer_phone));
    lines.push(format!("Type: {}", order.order_type.label()));

    match order.order_type {
        OrderType::DineIn => {
            if let Some(table) = &order.table_number {
                lines.push(format!("Table: {}", table));
            }
        }
        OrderType::Delivery => {
            if let Some(address) = &order.delivery_address {
                lines.push(format!("Address: {}", address));
            }
        }
        OrderType::Takeaway => {}
    }

    lines.push(String::new());
    for item in &order.items {
        lines.push(format!(
            "{}x {} @ {} = {}",
            item.quantity,
            item.item_name,
            format_money(item.unit_price_cents, currency),
            format_money(item.line_total_cents, currency)
        ));
        if let Some(notes) = &item.notes {
            lines.push(format!("   note: {}", notes));
        }
    }
    lines.push(String::new());
    lines.push(format!("*Total: {}*", format_money(order.total_cents, currency)));

    if let Some(notes) = &order.notes {
        lines.push(format!("Notes: {}", notes));
    }

    lines.join("\n")
}

/// `None` when the number has no digits
pub fn whatsapp_url(phone: &str, message: &str) -> Option<String> {
    let digits = normalize_phone(phone);
    if digits.is_empty() {
        return None;
    }
    Some(format!("{}/{}?text={}", WA_BASE_URL, digits, urlencoding::encode(message)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::{OrderDraft, PricedLine};
    use uuid::Uuid;

    fn order(order_type: OrderType) -> Order {
        Order::new(
            "20260101-AAAAAA".to_string(),
            OrderDraft {
                restaurant_id: Uuid::new_v4(),
                branch_id: Uuid::new_v4(),
                customer_name: "Rina".to_string(),
                customer_phone: "628111".to_string(),
                order_type,
                table_number: Some("7".to_string()),
                delivery_address: Some("Jl. Melati 3".to_string()),
                notes: Some("no peanuts".to_string()),
            },
            vec![PricedLine {
                menu_item_id: Uuid::new_v4(),
                item_name: "Gado-gado".to_string(),
                unit_price_cents: 1500,
                quantity: 2,
                notes: Some("extra spicy".to_string()),
            }],
        )
    }

    #[test]
    fn test_message_contents() {
        let msg = build_order_message(&order(OrderType::DineIn), "Warung", "Pusat", "USD");
        assert!(msg.contains("*New order 20260101-AAAAAA*"));
        assert!(msg.contains("Table: 7"));
        assert!(!msg.contains("Address:"));
        assert!(msg.contains("2x Gado-gado @ USD 15.00 = USD 30.00"));
        assert!(msg.contains("note: extra spicy"));
        assert!(msg.contains("*Total: USD 30.00*"));
        assert!(msg.contains("Notes: no peanuts"));
    }

    #[test]
    fn test_delivery_message_has_address() {
        let msg = build_order_message(&order(OrderType::Delivery), "Warung", "Pusat", "USD");
        assert!(msg.contains("Address: Jl. Melati 3"));
        assert!(!msg.contains("Table:"));
    }

    #[test]
    fn test_whatsapp_url() {
        let url = whatsapp_url("+62 812-000", "Hi there & bye").unwrap();
        assert_eq!(url, "https://wa.me/62812000?text=Hi%20there%20%26%20bye");
        assert_eq!(whatsapp_url("n/a", "x"), None);
    }
}
