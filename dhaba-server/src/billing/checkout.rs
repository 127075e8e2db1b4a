//! Checkout - one-shot order persistence
//!
//! A finalized bill is written to the order collection exactly once.
//! When the write fails the order is parked in the redb offline queue
//! and replayed by the background drain task; the customer has already
//! paid, so checkout itself never fails on storage errors.

use serde::Deserialize;
use shared::order::{BillTotals, CartItem, CustomerInfo, PaymentMode};

use crate::db::models::{Order, OrderItemLine, OrderPaymentInfo, OrderStatus};
use crate::db::repository::OrderRepository;
use crate::services::OfflineQueue;
use crate::tables::{TableError, money};
use crate::utils::time;

/// Payment details submitted with a checkout
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentRequest {
    pub mode: PaymentMode,
    /// Required for cash payments
    pub cash_received: Option<f64>,
}

/// What happened to the order document
#[derive(Debug, Clone)]
pub struct CheckoutOutcome {
    pub order: Order,
    /// False when the write failed and the order went to the offline queue
    pub persisted: bool,
}

/// Persistence bridge between in-memory bills and the order collection
#[derive(Clone)]
pub struct CheckoutService {
    orders: OrderRepository,
    queue: OfflineQueue,
}

impl CheckoutService {
    pub fn new(orders: OrderRepository, queue: OfflineQueue) -> Self {
        Self { orders, queue }
    }

    /// Validate payment against the bill total
    ///
    /// Cash must cover the total; the change is computed here. Non-cash
    /// modes ignore `cash_received`.
    pub fn resolve_payment(
        payment: &PaymentRequest,
        total: f64,
    ) -> Result<OrderPaymentInfo, TableError> {
        match payment.mode {
            PaymentMode::Cash => {
                let received = payment.cash_received.ok_or_else(|| {
                    TableError::InvalidInput("cash_received is required for cash payments".into())
                })?;
                if !received.is_finite() || received < total {
                    return Err(TableError::InvalidInput(format!(
                        "cash received {} does not cover total {}",
                        received, total
                    )));
                }
                Ok(OrderPaymentInfo {
                    mode: PaymentMode::Cash,
                    cash_received: Some(received),
                    change: Some(money::round2(
                        rust_decimal::Decimal::try_from(received - total).unwrap_or_default(),
                    )),
                })
            }
            mode => Ok(OrderPaymentInfo {
                mode,
                cash_received: None,
                change: None,
            }),
        }
    }

    /// Finalize a bill into an order document
    ///
    /// `table_name` is None for counter sales. The receipt number falls
    /// back to a timestamp form when the counter document is unreachable,
    /// so offline checkouts still produce a printable receipt.
    pub async fn checkout(
        &self,
        table_name: Option<String>,
        items: Vec<CartItem>,
        totals: BillTotals,
        payment: OrderPaymentInfo,
        customer: Option<CustomerInfo>,
        created_by: String,
    ) -> CheckoutOutcome {
        let receipt_number = match self.orders.next_receipt_number().await {
            Ok(rn) => rn,
            Err(e) => {
                tracing::warn!(error = %e, "Receipt counter unreachable, using timestamp number");
                format!("DHB-OFF-{}", time::now_millis())
            }
        };

        let order = Order {
            id: None,
            receipt_number,
            table_name,
            items: items.into_iter().map(OrderItemLine::from).collect(),
            subtotal: totals.subtotal,
            gst: totals.gst,
            service: totals.service,
            total: totals.total,
            payment,
            status: OrderStatus::Completed,
            customer,
            created_at: time::now_millis(),
            created_by,
        };

        match self.orders.create(order.clone()).await {
            Ok(created) => {
                tracing::info!(receipt = %created.receipt_number, total = created.total, "Order persisted");
                CheckoutOutcome {
                    order: created,
                    persisted: true,
                }
            }
            Err(e) => {
                tracing::warn!(receipt = %order.receipt_number, error = %e, "Order write failed, queuing offline");
                if let Err(qe) = self.queue.enqueue(&order) {
                    // Last resort: the full order goes to the log so it can
                    // be re-entered manually.
                    tracing::error!(
                        receipt = %order.receipt_number,
                        error = %qe,
                        order = ?order,
                        "Offline queue write failed, order only in log"
                    );
                }
                CheckoutOutcome {
                    order,
                    persisted: false,
                }
            }
        }
    }

    /// Replay queued orders against the database
    ///
    /// Stops at the first failure; the remaining entries keep their
    /// position for the next drain pass.
    pub async fn drain_offline_queue(&self) -> usize {
        let pending = match self.queue.pending() {
            Ok(p) => p,
            Err(e) => {
                tracing::error!(error = %e, "Failed to read offline queue");
                return 0;
            }
        };
        if pending.is_empty() {
            return 0;
        }

        let mut replayed = 0;
        for (seq, order) in pending {
            let receipt = order.receipt_number.clone();
            match self.orders.create(order).await {
                Ok(_) => {
                    if let Err(e) = self.queue.remove(seq) {
                        tracing::error!(receipt = %receipt, error = %e, "Replayed order stuck in queue");
                        break;
                    }
                    tracing::info!(receipt = %receipt, "Offline order replayed");
                    replayed += 1;
                }
                Err(e) => {
                    tracing::debug!(receipt = %receipt, error = %e, "Database still unreachable");
                    break;
                }
            }
        }
        replayed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::order::TableStatus;

    use crate::db::DbService;
    use crate::tables::{Rates, TableManager};

    fn item(price: f64, quantity: i32) -> CartItem {
        CartItem {
            product_id: "product:burger".to_string(),
            name: "Burger".to_string(),
            price,
            quantity,
        }
    }

    fn cash(received: f64) -> PaymentRequest {
        PaymentRequest {
            mode: PaymentMode::Cash,
            cash_received: Some(received),
        }
    }

    #[test]
    fn test_cash_must_cover_total() {
        let err = CheckoutService::resolve_payment(&cash(200.0), 246.0).unwrap_err();
        assert!(matches!(err, TableError::InvalidInput(_)));

        let info = CheckoutService::resolve_payment(&cash(250.0), 246.0).unwrap();
        assert_eq!(info.cash_received, Some(250.0));
        assert_eq!(info.change, Some(4.0));
    }

    #[test]
    fn test_card_ignores_cash_fields() {
        let info = CheckoutService::resolve_payment(
            &PaymentRequest {
                mode: PaymentMode::Card,
                cash_received: Some(10.0),
            },
            246.0,
        )
        .unwrap();
        assert_eq!(info.cash_received, None);
        assert_eq!(info.change, None);
    }

    async fn service() -> CheckoutService {
        let db = DbService::new_in_memory().await.unwrap();
        CheckoutService::new(
            OrderRepository::new(db.db()),
            OfflineQueue::open_in_memory().unwrap(),
        )
    }

    #[tokio::test]
    async fn test_checkout_persists_order() {
        let svc = service().await;
        let payment = CheckoutService::resolve_payment(&cash(250.0), 246.0).unwrap();

        let outcome = svc
            .checkout(
                Some("T1".to_string()),
                vec![item(100.0, 2)],
                BillTotals {
                    subtotal: 200.0,
                    gst: 36.0,
                    service: 10.0,
                    total: 246.0,
                },
                payment,
                None,
                "user:test".to_string(),
            )
            .await;

        assert!(outcome.persisted);
        assert!(outcome.order.receipt_number.starts_with("DHB"));
        assert_eq!(outcome.order.total, 246.0);
        assert_eq!(outcome.order.payment.change, Some(4.0));

        let found = svc
            .orders
            .find_by_receipt(&outcome.order.receipt_number)
            .await
            .unwrap();
        assert!(found.is_some());
    }

    #[tokio::test]
    async fn test_receipt_numbers_increment() {
        let svc = service().await;
        let n1 = svc.orders.next_receipt_number().await.unwrap();
        let n2 = svc.orders.next_receipt_number().await.unwrap();
        assert_ne!(n1, n2);
        assert!(n1 < n2);
    }

    #[tokio::test]
    async fn test_table_checkout_clears_session_on_success() {
        let svc = service().await;
        let manager = TableManager::new();
        manager.register("dining_table:t1", "T1");
        let rates = Rates {
            gst_rate: 18.0,
            service_rate: 5.0,
        };
        let session = manager
            .add_order("dining_table:t1", vec![item(100.0, 2)], None, rates)
            .unwrap();

        let payment = CheckoutService::resolve_payment(&cash(250.0), session.totals.total).unwrap();
        let outcome = svc
            .checkout(
                Some(session.name.clone()),
                session.all_items(),
                session.totals.clone(),
                payment,
                session.customer.clone(),
                "user:test".to_string(),
            )
            .await;
        assert!(outcome.persisted);

        // Session is cleared regardless of write outcome
        manager.clear("dining_table:t1").unwrap();
        let after = manager.snapshot("dining_table:t1").unwrap();
        assert_eq!(after.status, TableStatus::Available);
    }
}
