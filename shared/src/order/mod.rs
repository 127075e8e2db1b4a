//! Shared types for table sessions and billing
//!
//! Monetary fields are `f64` at the serialization boundary; all intermediate
//! arithmetic happens in `rust_decimal` on the server side and is rounded to
//! 2 decimals only when totals are produced.

use chrono::Utc;
use serde::{Deserialize, Serialize};

// ============================================================================
// Table Status
// ============================================================================

/// Lifecycle status of a dining table
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TableStatus {
    /// 空闲
    #[default]
    Available,
    /// 使用中
    Occupied,
    /// 已预订
    Reserved,
}

// ============================================================================
// Payment Mode
// ============================================================================

/// Payment mode recorded on a finalized order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMode {
    #[default]
    Cash,
    Card,
    Upi,
}

// ============================================================================
// Cart Types
// ============================================================================

/// One line of a working cart or order group
///
/// Invariant: `quantity >= 1`. Lines for the same product are merged by
/// `product_id` when added twice.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartItem {
    /// Product ID ("product:xyz")
    pub product_id: String,
    /// Product name snapshot
    pub name: String,
    /// Unit price snapshot
    pub price: f64,
    /// Quantity (>= 1)
    pub quantity: i32,
}

impl CartItem {
    pub fn new(product_id: impl Into<String>, name: impl Into<String>, price: f64) -> Self {
        Self {
            product_id: product_id.into(),
            name: name.into(),
            price,
            quantity: 1,
        }
    }
}

/// Customer info captured when a table is occupied
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct CustomerInfo {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Number of guests
    #[serde(default)]
    pub guests: i32,
}

// ============================================================================
// Order Group
// ============================================================================

/// One batch of items added to a table's running bill
///
/// Groups are append-only: once added to a table session they are never
/// mutated, only replaced wholesale by a merge.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderGroup {
    /// Group ID (uuid)
    pub id: String,
    /// Creation time (unix millis)
    pub created_at: i64,
    /// Items in this batch
    pub items: Vec<CartItem>,
    /// Σ price × quantity over `items`, rounded to 2 decimals
    pub subtotal: f64,
}

impl OrderGroup {
    /// Create a group with a fresh id and the current timestamp
    pub fn new(items: Vec<CartItem>, subtotal: f64) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            created_at: Utc::now().timestamp_millis(),
            items,
            subtotal,
        }
    }
}

// ============================================================================
// Bill Totals
// ============================================================================

/// Computed financial totals for a cart or table session
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct BillTotals {
    pub subtotal: f64,
    /// GST amount (CGST + SGST)
    pub gst: f64,
    /// Service charge amount
    pub service: f64,
    pub total: f64,
}

/// One share of an evenly split bill
///
/// The split is informational only: every share carries the full item list,
/// only the amount is divided.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillShare {
    /// 1-based share index
    pub index: u32,
    /// Number of shares in the split
    pub of: u32,
    /// Amount due for this share
    pub amount: f64,
    /// Full item list of the table (not partitioned per share)
    pub items: Vec<CartItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_group_ids_unique() {
        let a = OrderGroup::new(vec![], 0.0);
        let b = OrderGroup::new(vec![], 0.0);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_table_status_serde() {
        let s = serde_json::to_string(&TableStatus::Occupied).unwrap();
        assert_eq!(s, "\"OCCUPIED\"");
        let back: TableStatus = serde_json::from_str(&s).unwrap();
        assert_eq!(back, TableStatus::Occupied);
    }
}
