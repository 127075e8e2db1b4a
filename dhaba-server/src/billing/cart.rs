//! Counter-sale cart
//!
//! Same money rules as table sessions: totals are recomputed from the
//! line items on every read, rounded only at the boundary.

use shared::order::{BillTotals, CartItem};

use crate::tables::money;
use crate::tables::{Rates, TableError};

/// A walk-in order under construction
#[derive(Debug, Clone, Default)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_items(items: Vec<CartItem>) -> Result<Self, TableError> {
        let mut cart = Self::new();
        for item in items {
            cart.add(item)?;
        }
        Ok(cart)
    }

    /// Add an item, merging quantity into an existing line for the same
    /// product
    pub fn add(&mut self, item: CartItem) -> Result<(), TableError> {
        money::validate_cart_item(&item)?;

        if let Some(existing) = self
            .items
            .iter_mut()
            .find(|i| i.product_id == item.product_id)
        {
            existing.quantity += item.quantity;
        } else {
            self.items.push(item);
        }
        Ok(())
    }

    /// Remove the line at `index`
    pub fn remove(&mut self, index: usize) -> Result<CartItem, TableError> {
        if index >= self.items.len() {
            return Err(TableError::InvalidInput(format!(
                "no cart line at index {}",
                index
            )));
        }
        Ok(self.items.remove(index))
    }

    /// Set the quantity of the line at `index`, removing it at zero
    pub fn set_quantity(&mut self, index: usize, quantity: i32) -> Result<(), TableError> {
        if index >= self.items.len() {
            return Err(TableError::InvalidInput(format!(
                "no cart line at index {}",
                index
            )));
        }
        if quantity == 0 {
            self.items.remove(index);
            return Ok(());
        }
        let mut updated = self.items[index].clone();
        updated.quantity = quantity;
        money::validate_cart_item(&updated)?;
        self.items[index] = updated;
        Ok(())
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Current bill totals under the given rates
    pub fn totals(&self, rates: Rates) -> BillTotals {
        let subtotal = money::items_subtotal(&self.items);
        money::bill_totals(subtotal, rates.gst_rate, rates.service_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, price: f64, quantity: i32) -> CartItem {
        CartItem {
            product_id: format!("product:{id}"),
            name: id.to_string(),
            price,
            quantity,
        }
    }

    fn rates() -> Rates {
        Rates {
            gst_rate: 18.0,
            service_rate: 5.0,
        }
    }

    #[test]
    fn test_add_merges_same_product() {
        let mut cart = Cart::new();
        cart.add(item("burger", 100.0, 1)).unwrap();
        cart.add(item("burger", 100.0, 2)).unwrap();
        cart.add(item("lassi", 50.0, 1)).unwrap();

        assert_eq!(cart.items().len(), 2);
        assert_eq!(cart.items()[0].quantity, 3);
    }

    #[test]
    fn test_totals_match_table_math() {
        let mut cart = Cart::new();
        cart.add(item("burger", 100.0, 2)).unwrap();

        let totals = cart.totals(rates());
        assert_eq!(totals.subtotal, 200.0);
        assert_eq!(totals.gst, 36.0);
        assert_eq!(totals.service, 10.0);
        assert_eq!(totals.total, 246.0);
    }

    #[test]
    fn test_remove_out_of_range() {
        let mut cart = Cart::new();
        cart.add(item("burger", 100.0, 1)).unwrap();

        assert!(cart.remove(1).is_err());
        let removed = cart.remove(0).unwrap();
        assert_eq!(removed.name, "burger");
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_zero_removes_line() {
        let mut cart = Cart::new();
        cart.add(item("burger", 100.0, 2)).unwrap();
        cart.set_quantity(0, 0).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_rejects_invalid_items() {
        let mut cart = Cart::new();
        assert!(cart.add(item("burger", -1.0, 1)).is_err());
        assert!(cart.add(item("burger", 100.0, 0)).is_err());
        assert!(cart.is_empty());
    }
}
