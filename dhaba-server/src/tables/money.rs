//! Money calculation utilities using rust_decimal for precision
//!
//! All calculations are done using `Decimal` internally, then converted to
//! `f64` for storage/serialization. Rounding to 2 decimals happens only at
//! the boundary (`round2`), never between intermediate steps.

use rust_decimal::prelude::*;
use shared::order::{BillTotals, CartItem};

use super::error::TableError;

/// Rounding: 2 decimal places, half away from zero
const DECIMAL_PLACES: u32 = 2;

/// Maximum allowed price per item
const MAX_PRICE: f64 = 1_000_000.0;
/// Maximum allowed quantity per item
const MAX_QUANTITY: i32 = 9999;

/// Validate that a f64 value is finite (not NaN, not Infinity)
#[inline]
fn require_finite(value: f64, field_name: &str) -> Result<(), TableError> {
    if !value.is_finite() {
        return Err(TableError::InvalidInput(format!(
            "{} must be a finite number, got {}",
            field_name, value
        )));
    }
    Ok(())
}

/// Validate a cart item before it enters a session
///
/// Enforces the `quantity >= 1` invariant and price bounds.
pub fn validate_cart_item(item: &CartItem) -> Result<(), TableError> {
    require_finite(item.price, "price")?;
    if item.price < 0.0 {
        return Err(TableError::InvalidInput(format!(
            "price must be non-negative, got {}",
            item.price
        )));
    }
    if item.price > MAX_PRICE {
        return Err(TableError::InvalidInput(format!(
            "price exceeds maximum allowed ({}), got {}",
            MAX_PRICE, item.price
        )));
    }

    if item.quantity < 1 {
        return Err(TableError::InvalidInput(format!(
            "quantity must be at least 1, got {}",
            item.quantity
        )));
    }
    if item.quantity > MAX_QUANTITY {
        return Err(TableError::InvalidInput(format!(
            "quantity exceeds maximum allowed ({}), got {}",
            MAX_QUANTITY, item.quantity
        )));
    }

    Ok(())
}

/// Round a decimal to 2 places (display/serialization boundary)
pub fn round2(d: Decimal) -> f64 {
    d.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or(0.0)
}

/// Σ price × quantity over a list of items, unrounded
pub fn items_subtotal(items: &[CartItem]) -> Decimal {
    items
        .iter()
        .map(|i| {
            let price = Decimal::from_f64(i.price).unwrap_or_default();
            price * Decimal::from(i.quantity)
        })
        .sum()
}

/// Compute bill totals from a subtotal and percentage rates
///
/// gst = subtotal × gst_rate/100, service = subtotal × service_rate/100,
/// total = subtotal + gst + service. Rounding only on output.
pub fn bill_totals(subtotal: Decimal, gst_rate: f64, service_rate: f64) -> BillTotals {
    let hundred = Decimal::from(100);
    let gst = subtotal * Decimal::from_f64(gst_rate).unwrap_or_default() / hundred;
    let service = subtotal * Decimal::from_f64(service_rate).unwrap_or_default() / hundred;
    let total = subtotal + gst + service;

    BillTotals {
        subtotal: round2(subtotal),
        gst: round2(gst),
        service: round2(service),
        total: round2(total),
    }
}

/// Evenly split an amount into n shares
///
/// The first share absorbs the rounding remainder so the shares sum back
/// to the original amount.
pub fn split_amount(total: f64, n: u32) -> Result<Vec<f64>, TableError> {
    if n == 0 {
        return Err(TableError::InvalidInput(
            "split count must be at least 1".to_string(),
        ));
    }
    let total_d = Decimal::from_f64(total).unwrap_or_default();
    let n_d = Decimal::from(n);
    let base = (total_d / n_d).round_dp_with_strategy(
        DECIMAL_PLACES,
        RoundingStrategy::MidpointAwayFromZero,
    );
    let remainder = total_d - base * n_d;

    let mut shares = vec![base; n as usize];
    shares[0] += remainder;
    Ok(shares.into_iter().map(|s| round2(s)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(price: f64, quantity: i32) -> CartItem {
        CartItem {
            product_id: "product:x".to_string(),
            name: "Item".to_string(),
            price,
            quantity,
        }
    }

    #[test]
    fn test_subtotal() {
        let items = vec![item(100.0, 2), item(49.5, 1)];
        assert_eq!(round2(items_subtotal(&items)), 249.5);
    }

    #[test]
    fn test_bill_totals_example_scenario() {
        // Burger 100 x 2, gst 18%, service 5%
        let subtotal = items_subtotal(&[item(100.0, 2)]);
        let totals = bill_totals(subtotal, 18.0, 5.0);
        assert_eq!(totals.subtotal, 200.0);
        assert_eq!(totals.gst, 36.0);
        assert_eq!(totals.service, 10.0);
        assert_eq!(totals.total, 246.0);
    }

    #[test]
    fn test_no_intermediate_rounding() {
        // 3 x 33.335 = 100.005 → total rounds half-up once, at the boundary
        let subtotal = items_subtotal(&[item(33.335, 3)]);
        let totals = bill_totals(subtotal, 0.0, 0.0);
        assert_eq!(totals.subtotal, 100.01);
        assert_eq!(totals.total, 100.01);
    }

    #[test]
    fn test_validate_rejects_zero_quantity() {
        assert!(validate_cart_item(&item(10.0, 0)).is_err());
        assert!(validate_cart_item(&item(10.0, 1)).is_ok());
    }

    #[test]
    fn test_validate_rejects_nan_price() {
        assert!(validate_cart_item(&item(f64::NAN, 1)).is_err());
        assert!(validate_cart_item(&item(-1.0, 1)).is_err());
    }

    #[test]
    fn test_split_amount_sums_back() {
        let shares = split_amount(100.0, 3).unwrap();
        assert_eq!(shares.len(), 3);
        let sum: f64 = shares.iter().sum();
        assert!((sum - 100.0).abs() < 0.001);
    }

    #[test]
    fn test_split_zero_shares_rejected() {
        assert!(split_amount(100.0, 0).is_err());
    }
}
