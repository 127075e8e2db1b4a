//! Shared types for Dhaba POS
//!
//! Domain types used by both the server and future clients: cart items,
//! order groups, bill totals, table session state and the unified API
//! response envelope.

pub mod order;
pub mod response;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use order::{
    BillShare, BillTotals, CartItem, CustomerInfo, OrderGroup, PaymentMode, TableStatus,
};
pub use response::ApiResponse;
