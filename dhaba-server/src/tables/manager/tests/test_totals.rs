//! Totals recomputation against live rates

use super::{item, rates, seeded_manager, Rates};

#[test]
fn test_totals_example_scenario() {
    let manager = seeded_manager();
    let session = manager
        .add_order("dining_table:t1", vec![item("Burger", 100.0, 2)], None, rates())
        .unwrap();

    assert_eq!(session.totals.subtotal, 200.0);
    assert_eq!(session.totals.gst, 36.0);
    assert_eq!(session.totals.service, 10.0);
    assert_eq!(session.totals.total, 246.0);
}

#[test]
fn test_totals_cover_all_groups() {
    let manager = seeded_manager();
    manager
        .add_order("dining_table:t1", vec![item("Burger", 100.0, 2)], None, rates())
        .unwrap();
    let session = manager
        .add_order(
            "dining_table:t1",
            vec![item("Lassi", 50.0, 2), item("Papad", 20.0, 1)],
            None,
            rates(),
        )
        .unwrap();

    // 200 + 120 = 320, gst 57.6, service 16
    assert_eq!(session.totals.subtotal, 320.0);
    assert_eq!(session.totals.gst, 57.6);
    assert_eq!(session.totals.service, 16.0);
    assert_eq!(session.totals.total, 393.6);
}

#[test]
fn test_zero_rates() {
    let manager = seeded_manager();
    let session = manager
        .add_order(
            "dining_table:t1",
            vec![item("Chai", 15.0, 3)],
            None,
            Rates::default(),
        )
        .unwrap();

    assert_eq!(session.totals.subtotal, 45.0);
    assert_eq!(session.totals.gst, 0.0);
    assert_eq!(session.totals.service, 0.0);
    assert_eq!(session.totals.total, 45.0);
}

#[test]
fn test_later_order_uses_current_rates() {
    let manager = seeded_manager();
    manager
        .add_order("dining_table:t1", vec![item("Burger", 100.0, 2)], None, rates())
        .unwrap();

    // rates changed between orders; the whole bill follows the new rates
    let new_rates = Rates {
        gst_rate: 12.0,
        service_rate: 0.0,
    };
    let session = manager
        .add_order("dining_table:t1", vec![item("Lassi", 50.0, 1)], None, new_rates)
        .unwrap();

    assert_eq!(session.totals.subtotal, 250.0);
    assert_eq!(session.totals.gst, 30.0);
    assert_eq!(session.totals.service, 0.0);
    assert_eq!(session.totals.total, 280.0);
}

#[test]
fn test_recompute_all_applies_new_rates() {
    let manager = seeded_manager();
    manager
        .add_order("dining_table:t1", vec![item("Burger", 100.0, 2)], None, rates())
        .unwrap();
    manager
        .add_order("dining_table:t2", vec![item("Dosa", 80.0, 1)], None, rates())
        .unwrap();

    manager.recompute_all(Rates {
        gst_rate: 5.0,
        service_rate: 0.0,
    });

    let t1 = manager.snapshot("dining_table:t1").unwrap();
    assert_eq!(t1.totals.gst, 10.0);
    assert_eq!(t1.totals.total, 210.0);

    let t2 = manager.snapshot("dining_table:t2").unwrap();
    assert_eq!(t2.totals.gst, 4.0);
    assert_eq!(t2.totals.total, 84.0);
}

#[test]
fn test_fractional_totals_round_at_boundary() {
    let manager = seeded_manager();
    // 3 x 33.33 = 99.99, gst 18% = 17.9982 → 18.0, service 5% = 4.9995 → 5.0
    // total = 99.99 + 17.9982 + 4.9995 = 122.9877 → 122.99
    let session = manager
        .add_order("dining_table:t1", vec![item("Thali", 33.33, 3)], None, rates())
        .unwrap();

    assert_eq!(session.totals.subtotal, 99.99);
    assert_eq!(session.totals.gst, 18.0);
    assert_eq!(session.totals.service, 5.0);
    assert_eq!(session.totals.total, 122.99);
}
