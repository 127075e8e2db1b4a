//! Receipt renderer
//!
//! Renders finalized orders into ESC/POS bytes for 80mm thermal printers.
//! Layout is fixed at 48 columns; GST is shown as equal CGST/SGST halves
//! as required on Indian tax receipts.

use chrono::{Local, TimeZone};
use dhaba_printer::{EscPosBuilder, pad_text, truncate_text};
use rust_decimal::prelude::*;

use crate::db::models::{Order, Restaurant};

/// 80mm paper
const WIDTH: usize = 48;

/// Column widths: name + qty + rate + amount = 48
const COL_NAME: usize = 22;
const COL_QTY: usize = 4;
const COL_RATE: usize = 10;
const COL_AMOUNT: usize = 12;

/// Receipt renderer for finalized orders
pub struct ReceiptRenderer {
    width: usize,
}

impl ReceiptRenderer {
    pub fn new() -> Self {
        Self { width: WIDTH }
    }

    /// Render an order to ESC/POS bytes
    pub fn render(&self, order: &Order, restaurant: &Restaurant) -> Vec<u8> {
        let mut b = EscPosBuilder::new(self.width);

        self.render_header(&mut b, restaurant);
        self.render_meta(&mut b, order);
        self.render_items(&mut b, order);
        self.render_totals(&mut b, order);
        self.render_payment(&mut b, order);
        self.render_footer(&mut b, restaurant);

        b.build()
    }

    fn render_header(&self, b: &mut EscPosBuilder, restaurant: &Restaurant) {
        b.center();
        b.double_size();
        b.bold();
        b.line(&restaurant.name);
        b.bold_off();
        b.reset_size();

        if !restaurant.address.is_empty() {
            b.line(&restaurant.address);
        }
        if !restaurant.phone.is_empty() {
            b.line(&format!("Ph: {}", restaurant.phone));
        }
        if let Some(gstin) = &restaurant.gstin {
            b.line(&format!("GSTIN: {}", gstin));
        }
        b.left();
        b.sep_double();
    }

    fn render_meta(&self, b: &mut EscPosBuilder, order: &Order) {
        b.line_lr("Receipt", &order.receipt_number);
        b.line_lr("Date", &format_timestamp(order.created_at));
        match &order.table_name {
            Some(table) => b.line_lr("Table", table),
            None => b.line_lr("Type", "Counter"),
        };
        if let Some(customer) = &order.customer {
            b.line_lr("Customer", &customer.name);
        }
        b.sep_single();
    }

    fn render_items(&self, b: &mut EscPosBuilder, order: &Order) {
        let header = format!(
            "{}{}{}{}",
            pad_text("Item", COL_NAME, false),
            pad_text("Qty", COL_QTY, true),
            pad_text("Rate", COL_RATE, true),
            pad_text("Amount", COL_AMOUNT, true),
        );
        b.bold();
        b.text(&header);
        b.bold_off();
        b.newline();

        for item in &order.items {
            let amount = item.price * item.quantity as f64;
            let row = format!(
                "{}{}{}{}",
                pad_text(&truncate_text(&item.name, COL_NAME - 1), COL_NAME, false),
                pad_text(&item.quantity.to_string(), COL_QTY, true),
                pad_text(&format!("{:.2}", item.price), COL_RATE, true),
                pad_text(&format!("{:.2}", amount), COL_AMOUNT, true),
            );
            b.line(&row);
        }
        b.sep_single();
    }

    fn render_totals(&self, b: &mut EscPosBuilder, order: &Order) {
        b.line_lr("Subtotal", &format!("{:.2}", order.subtotal));

        if order.gst > 0.0 {
            let half = half_of(order.gst);
            b.line_lr("CGST", &format!("{:.2}", half));
            b.line_lr("SGST", &format!("{:.2}", half));
        }
        if order.service > 0.0 {
            b.line_lr("Service Charge", &format!("{:.2}", order.service));
        }

        b.sep_single();
        b.bold();
        b.double_height();
        b.line_lr("TOTAL", &format!("Rs.{:.2}", order.total));
        b.reset_size();
        b.bold_off();
    }

    fn render_payment(&self, b: &mut EscPosBuilder, order: &Order) {
        b.line_lr("Paid by", payment_label(&order.payment.mode));
        if let Some(received) = order.payment.cash_received {
            b.line_lr("Cash", &format!("{:.2}", received));
        }
        if let Some(change) = order.payment.change {
            b.line_lr("Change", &format!("{:.2}", change));
        }
        b.sep_double();
    }

    fn render_footer(&self, b: &mut EscPosBuilder, restaurant: &Restaurant) {
        b.center();
        b.line(&restaurant.receipt_footer);
        b.left();
        b.feed(3);
        b.cut();
    }
}

impl Default for ReceiptRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Exact half, rounded to 2 decimals for display
fn half_of(amount: f64) -> f64 {
    let d = Decimal::from_f64(amount).unwrap_or_default() / Decimal::from(2);
    d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or(0.0)
}

fn payment_label(mode: &shared::order::PaymentMode) -> &'static str {
    use shared::order::PaymentMode;
    match mode {
        PaymentMode::Cash => "Cash",
        PaymentMode::Card => "Card",
        PaymentMode::Upi => "UPI",
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
    use shared::order::PaymentMode;

    use crate::db::models::{OrderItemLine, OrderPaymentInfo};

    fn test_restaurant() -> Restaurant {
        Restaurant {
            id: None,
            name: "Highway Dhaba".to_string(),
            address: "NH-48, Gurgaon".to_string(),
            phone: "98765 43210".to_string(),
            gstin: Some("06ABCDE1234F1Z5".to_string()),
            gst_rate: 18.0,
            service_rate: 5.0,
            receipt_footer: "Thank you, visit again!".to_string(),
            join_code: "AB12CD".to_string(),
        }
    }

    fn test_order() -> Order {
        Order {
            id: None,
            receipt_number: "DHB20260831-0001".to_string(),
            table_name: Some("T1".to_string()),
            items: vec![
                OrderItemLine {
                    product_id: "product:burger".to_string(),
                    name: "Burger".to_string(),
                    price: 100.0,
                    quantity: 2,
                },
                OrderItemLine {
                    product_id: "product:lassi".to_string(),
                    name: "Sweet Lassi".to_string(),
                    price: 50.0,
                    quantity: 1,
                },
            ],
            subtotal: 250.0,
            gst: 45.0,
            service: 12.5,
            total: 307.5,
            payment: OrderPaymentInfo {
                mode: PaymentMode::Cash,
                cash_received: Some(310.0),
                change: Some(2.5),
            },
            status: Default::default(),
            customer: None,
            created_at: 1767180600000,
            created_by: "user:test".to_string(),
        }
    }

    fn rendered_text() -> String {
        let bytes = ReceiptRenderer::new().render(&test_order(), &test_restaurant());
        String::from_utf8_lossy(&bytes).to_string()
    }

    #[test]
    fn test_receipt_contains_header_and_meta() {
        let text = rendered_text();
        assert!(text.contains("Highway Dhaba"));
        assert!(text.contains("GSTIN: 06ABCDE1234F1Z5"));
        assert!(text.contains("DHB20260831-0001"));
        assert!(text.contains("T1"));
    }

    #[test]
    fn test_gst_split_into_equal_halves() {
        let text = rendered_text();
        // gst 45.00 → CGST 22.50 + SGST 22.50
        assert!(text.contains("CGST"));
        assert!(text.contains("SGST"));
        assert_eq!(text.matches("22.50").count(), 2);
    }

    #[test]
    fn test_total_in_rupees() {
        let text = rendered_text();
        // ₹ is transliterated for the printer charset
        assert!(text.contains("Rs.307.50"));
        assert!(text.contains("Change"));
        assert!(text.contains("2.50"));
    }

    #[test]
    fn test_item_rows_fit_width() {
        let text = rendered_text();
        let row = text
            .lines()
            .find(|l| l.contains("Burger"))
            .expect("item row missing");
        assert_eq!(row.len(), WIDTH);
        assert!(row.ends_with("200.00"));
    }

    #[test]
    fn test_counter_order_has_no_table() {
        let mut order = test_order();
        order.table_name = None;
        let bytes = ReceiptRenderer::new().render(&order, &test_restaurant());
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("Counter"));
    }

    #[test]
    fn test_zero_gst_hides_tax_lines() {
        let mut order = test_order();
        order.gst = 0.0;
        let bytes = ReceiptRenderer::new().render(&order, &test_restaurant());
        let text = String::from_utf8_lossy(&bytes);
        assert!(!text.contains("CGST"));
    }

    #[test]
    fn test_half_of_rounds_at_display() {
        assert_eq!(half_of(45.0), 22.5);
        assert_eq!(half_of(0.01), 0.01); // 0.005 rounds away from zero
    }
}
