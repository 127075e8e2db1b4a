//! Kitchen order ticket renderer
//!
//! One ticket per order group, printed when the group is sent to the
//! kitchen. No prices, large type so it reads from a rail.

use chrono::{Local, TimeZone};
use dhaba_printer::EscPosBuilder;
use shared::order::OrderGroup;

const WIDTH: usize = 48;

/// Kitchen ticket renderer
pub struct KotRenderer {
    width: usize,
}

impl KotRenderer {
    pub fn new() -> Self {
        Self { width: WIDTH }
    }

    /// Render one order group for the kitchen
    ///
    /// `table_name` is None for counter orders.
    pub fn render(&self, table_name: Option<&str>, group: &OrderGroup) -> Vec<u8> {
        let mut b = EscPosBuilder::new(self.width);

        b.center();
        b.double_size();
        b.bold();
        b.line(table_name.unwrap_or("COUNTER"));
        b.bold_off();
        b.reset_size();
        b.line(&format_timestamp(group.created_at));
        b.left();
        b.sep_double();

        for item in &group.items {
            b.double_height();
            b.line(&format!("{} x{}", item.name, item.quantity));
            b.reset_size();
        }

        b.feed(3);
        b.cut();
        b.build()
    }
}

impl Default for KotRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn format_timestamp(millis: i64) -> String {
    match Local.timestamp_millis_opt(millis) {
        chrono::LocalResult::Single(dt) => dt.format("%d-%m-%Y %H:%M").to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::order::CartItem;

    #[test]
    fn test_ticket_lists_items_without_prices() {
        let group = OrderGroup::new(
            vec![
                CartItem {
                    product_id: "product:burger".to_string(),
                    name: "Burger".to_string(),
                    price: 100.0,
                    quantity: 2,
                },
                CartItem {
                    product_id: "product:dosa".to_string(),
                    name: "Masala Dosa".to_string(),
                    price: 80.0,
                    quantity: 1,
                },
            ],
            280.0,
        );

        let bytes = KotRenderer::new().render(Some("T1"), &group);
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("T1"));
        assert!(text.contains("Burger x2"));
        assert!(text.contains("Masala Dosa x1"));
        assert!(!text.contains("100"));
    }

    #[test]
    fn test_counter_ticket_header() {
        let group = OrderGroup::new(
            vec![CartItem {
                product_id: "product:chai".to_string(),
                name: "Chai".to_string(),
                price: 15.0,
                quantity: 1,
            }],
            15.0,
        );
        let bytes = KotRenderer::new().render(None, &group);
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("COUNTER"));
    }
}
