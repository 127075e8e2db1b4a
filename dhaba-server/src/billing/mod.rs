//! Billing Module
//!
//! Counter-sale cart arithmetic and the checkout bridge that turns an
//! in-memory bill into a persisted order document.
//!
//! - **cart**: [`Cart`] — merge-by-product line items with live totals
//! - **checkout**: [`CheckoutService`] — one-shot order write with
//!   offline queue fallback

pub mod cart;
pub mod checkout;

pub use cart::Cart;
pub use checkout::{CheckoutOutcome, CheckoutService, PaymentRequest};
