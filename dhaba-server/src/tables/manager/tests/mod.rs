mod test_merge;
mod test_totals;

use shared::order::{CartItem, CustomerInfo};

use super::{Rates, TableManager};

/// Standard rates used across the suite: gst 18%, service 5%
pub(super) fn rates() -> Rates {
    Rates {
        gst_rate: 18.0,
        service_rate: 5.0,
    }
}

pub(super) fn customer(name: &str) -> CustomerInfo {
    CustomerInfo {
        name: name.to_string(),
        phone: None,
        guests: 2,
    }
}

pub(super) fn item(name: &str, price: f64, quantity: i32) -> CartItem {
    CartItem {
        product_id: format!("product:{}", name.to_lowercase()),
        name: name.to_string(),
        price,
        quantity,
    }
}

/// Manager pre-seeded with three tables T1..T3
pub(super) fn seeded_manager() -> TableManager {
    let manager = TableManager::new();
    manager.register("dining_table:t1", "T1");
    manager.register("dining_table:t2", "T2");
    manager.register("dining_table:t3", "T3");
    manager
}
