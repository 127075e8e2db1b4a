//! Order Model
//!
//! 已结账订单的扁平化快照。多个加菜单在结账时合并为一份
//! 行项目列表，金额和税率在写入时定格，之后不可变。

use serde::{Deserialize, Serialize};
use shared::order::{CartItem, CustomerInfo, PaymentMode};
use surrealdb::RecordId;

use super::serde_helpers;

/// One line on a finalized bill
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemLine {
    pub product_id: String,
    pub name: String,
    pub price: f64,
    pub quantity: i32,
}

impl From<CartItem> for OrderItemLine {
    fn from(item: CartItem) -> Self {
        Self {
            product_id: item.product_id,
            name: item.name,
            price: item.price,
            quantity: item.quantity,
        }
    }
}

/// Order lifecycle status
///
/// Orders are written as `Completed`; `Cancelled` is the only later
/// transition (void with the bill kept for the audit trail). `Saved` is
/// a parked counter sale awaiting payment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Saved,
    #[default]
    Completed,
    Cancelled,
}

/// Payment details recorded with the order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderPaymentInfo {
    pub mode: PaymentMode,
    /// Cash handed over, cash payments only
    pub cash_received: Option<f64>,
    /// Change returned, cash payments only
    pub change: Option<f64>,
}

/// Finalized order document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    /// Human-facing receipt number, e.g. "DHB20260831-0042"
    pub receipt_number: String,
    /// Table name for dine-in, None for counter sales
    pub table_name: Option<String>,
    pub items: Vec<OrderItemLine>,
    pub subtotal: f64,
    pub gst: f64,
    pub service: f64,
    pub total: f64,
    pub payment: OrderPaymentInfo,
    #[serde(default)]
    pub status: OrderStatus,
    pub customer: Option<CustomerInfo>,
    /// Unix epoch milliseconds
    pub created_at: i64,
    /// User id of the cashier
    pub created_by: String,
}
