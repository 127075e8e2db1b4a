//! Table merge semantics

use shared::order::TableStatus;

use super::super::TableError;
use super::{customer, item, rates, seeded_manager};

#[test]
fn test_merge_moves_groups_and_clears_source() {
    let manager = seeded_manager();
    manager
        .add_order("dining_table:t1", vec![item("Burger", 100.0, 2)], None, rates())
        .unwrap();
    manager
        .add_order("dining_table:t2", vec![item("Dosa", 80.0, 1)], None, rates())
        .unwrap();

    let target = manager
        .merge("dining_table:t1", "dining_table:t2", rates())
        .unwrap();

    // target holds groups from both tables, its own first
    assert_eq!(target.orders.len(), 2);
    assert_eq!(target.orders[0].subtotal, 80.0);
    assert_eq!(target.orders[1].subtotal, 200.0);
    // combined: 280 + 18% gst + 5% service
    assert_eq!(target.totals.subtotal, 280.0);
    assert_eq!(target.totals.total, 344.4);

    let source = manager.snapshot("dining_table:t1").unwrap();
    assert_eq!(source.status, TableStatus::Available);
    assert!(source.orders.is_empty());
    assert!(source.customer.is_none());
}

#[test]
fn test_merge_into_empty_target_occupies_it() {
    let manager = seeded_manager();
    manager
        .add_order(
            "dining_table:t1",
            vec![item("Burger", 100.0, 2)],
            Some(customer("Ravi")),
            rates(),
        )
        .unwrap();

    let target = manager
        .merge("dining_table:t1", "dining_table:t2", rates())
        .unwrap();

    assert_eq!(target.status, TableStatus::Occupied);
    // customer followed the orders because the target had none
    assert_eq!(target.customer.as_ref().unwrap().name, "Ravi");
}

#[test]
fn test_merge_keeps_target_customer() {
    let manager = seeded_manager();
    manager
        .add_order(
            "dining_table:t1",
            vec![item("Burger", 100.0, 1)],
            Some(customer("Ravi")),
            rates(),
        )
        .unwrap();
    manager
        .add_order(
            "dining_table:t2",
            vec![item("Dosa", 80.0, 1)],
            Some(customer("Meena")),
            rates(),
        )
        .unwrap();

    let target = manager
        .merge("dining_table:t1", "dining_table:t2", rates())
        .unwrap();
    assert_eq!(target.customer.as_ref().unwrap().name, "Meena");
}

#[test]
fn test_merge_empty_source_fails() {
    let manager = seeded_manager();
    manager
        .add_order("dining_table:t2", vec![item("Dosa", 80.0, 1)], None, rates())
        .unwrap();

    let err = manager
        .merge("dining_table:t1", "dining_table:t2", rates())
        .unwrap_err();
    assert_eq!(err, TableError::NotOccupied("dining_table:t1".to_string()));

    // target untouched
    let target = manager.snapshot("dining_table:t2").unwrap();
    assert_eq!(target.orders.len(), 1);
}

#[test]
fn test_merge_into_self_fails() {
    let manager = seeded_manager();
    manager
        .add_order("dining_table:t1", vec![item("Burger", 100.0, 1)], None, rates())
        .unwrap();

    let err = manager
        .merge("dining_table:t1", "dining_table:t1", rates())
        .unwrap_err();
    assert!(matches!(err, TableError::InvalidInput(_)));

    let session = manager.snapshot("dining_table:t1").unwrap();
    assert_eq!(session.orders.len(), 1);
}

#[test]
fn test_merge_unknown_target_leaves_source_intact() {
    let manager = seeded_manager();
    manager
        .add_order("dining_table:t1", vec![item("Burger", 100.0, 1)], None, rates())
        .unwrap();

    let err = manager
        .merge("dining_table:t1", "dining_table:nope", rates())
        .unwrap_err();
    assert_eq!(err, TableError::NotFound("dining_table:nope".to_string()));

    let source = manager.snapshot("dining_table:t1").unwrap();
    assert_eq!(source.status, TableStatus::Occupied);
    assert_eq!(source.orders.len(), 1);
}
