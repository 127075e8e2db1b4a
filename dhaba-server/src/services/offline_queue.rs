//! redb-based offline queue for failed order writes
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `pending_orders` | `u64` | `Order` JSON | FIFO replay queue |
//! | `sequence_counter` | `&str` | `u64` | Monotonic enqueue key |
//!
//! # Durability
//!
//! redb commits are persistent as soon as `commit()` returns, with
//! copy-on-write and atomic pointer swap. A checkout that lands here
//! survives power loss and is replayed against SurrealDB later.

use std::path::Path;
use std::sync::Arc;

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use thiserror::Error;

use crate::db::models::Order;

/// Queue entries: key = enqueue sequence, value = JSON-serialized Order
const PENDING_ORDERS_TABLE: TableDefinition<u64, &[u8]> = TableDefinition::new("pending_orders");

/// Sequence counter: key = "seq", value = u64
const SEQUENCE_TABLE: TableDefinition<&str, u64> = TableDefinition::new("sequence_counter");

const SEQUENCE_KEY: &str = "seq";

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Offline order queue backed by redb
#[derive(Clone)]
pub struct OfflineQueue {
    db: Arc<Database>,
}

impl OfflineQueue {
    /// Open or create the queue database at the given path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;

        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(PENDING_ORDERS_TABLE)?;
            let mut seq_table = write_txn.open_table(SEQUENCE_TABLE)?;
            if seq_table.get(SEQUENCE_KEY)?.is_none() {
                seq_table.insert(SEQUENCE_KEY, 0u64)?;
            }
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Open an in-memory queue (for testing)
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;

        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(PENDING_ORDERS_TABLE)?;
            let mut seq_table = write_txn.open_table(SEQUENCE_TABLE)?;
            seq_table.insert(SEQUENCE_KEY, 0u64)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Append an order to the queue, returns its sequence key
    pub fn enqueue(&self, order: &Order) -> StorageResult<u64> {
        let txn = self.db.begin_write()?;
        let seq = {
            let mut seq_table = txn.open_table(SEQUENCE_TABLE)?;
            let current = seq_table
                .get(SEQUENCE_KEY)?
                .map(|g| g.value())
                .unwrap_or(0);
            let next = current + 1;
            seq_table.insert(SEQUENCE_KEY, next)?;

            let mut table = txn.open_table(PENDING_ORDERS_TABLE)?;
            let value = serde_json::to_vec(order)?;
            table.insert(next, value.as_slice())?;
            next
        };
        txn.commit()?;
        Ok(seq)
    }

    /// All queued orders in enqueue order
    pub fn pending(&self) -> StorageResult<Vec<(u64, Order)>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(PENDING_ORDERS_TABLE)?;

        let mut entries = Vec::new();
        for result in table.iter()? {
            let (key, value) = result?;
            let order: Order = serde_json::from_slice(value.value())?;
            entries.push((key.value(), order));
        }
        Ok(entries)
    }

    /// Remove a replayed entry
    pub fn remove(&self, seq: u64) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(PENDING_ORDERS_TABLE)?;
            table.remove(seq)?;
        }
        txn.commit()?;
        Ok(())
    }

    /// Number of queued orders
    pub fn len(&self) -> StorageResult<u64> {
        use redb::ReadableTableMetadata;
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(PENDING_ORDERS_TABLE)?;
        Ok(table.len()?)
    }

    pub fn is_empty(&self) -> StorageResult<bool> {
        Ok(self.len()? == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::order::PaymentMode;

    use crate::db::models::{OrderItemLine, OrderPaymentInfo};

    fn test_order(receipt: &str) -> Order {
        Order {
            id: None,
            receipt_number: receipt.to_string(),
            table_name: Some("T1".to_string()),
            items: vec![OrderItemLine {
                product_id: "product:burger".to_string(),
                name: "Burger".to_string(),
                price: 100.0,
                quantity: 2,
            }],
            subtotal: 200.0,
            gst: 36.0,
            service: 10.0,
            total: 246.0,
            payment: OrderPaymentInfo {
                mode: PaymentMode::Cash,
                cash_received: Some(250.0),
                change: Some(4.0),
            },
            status: Default::default(),
            customer: None,
            created_at: 1,
            created_by: "user:test".to_string(),
        }
    }

    #[test]
    fn test_enqueue_preserves_order() {
        let queue = OfflineQueue::open_in_memory().unwrap();
        assert!(queue.is_empty().unwrap());

        queue.enqueue(&test_order("R1")).unwrap();
        queue.enqueue(&test_order("R2")).unwrap();
        queue.enqueue(&test_order("R3")).unwrap();

        let pending = queue.pending().unwrap();
        let receipts: Vec<&str> = pending
            .iter()
            .map(|(_, o)| o.receipt_number.as_str())
            .collect();
        assert_eq!(receipts, vec!["R1", "R2", "R3"]);
    }

    #[test]
    fn test_remove_drains_queue() {
        let queue = OfflineQueue::open_in_memory().unwrap();
        let seq1 = queue.enqueue(&test_order("R1")).unwrap();
        let seq2 = queue.enqueue(&test_order("R2")).unwrap();

        queue.remove(seq1).unwrap();
        assert_eq!(queue.len().unwrap(), 1);

        queue.remove(seq2).unwrap();
        assert!(queue.is_empty().unwrap());
    }

    #[test]
    fn test_round_trip_preserves_totals() {
        let queue = OfflineQueue::open_in_memory().unwrap();
        queue.enqueue(&test_order("R1")).unwrap();

        let (_, order) = queue.pending().unwrap().into_iter().next().unwrap();
        assert_eq!(order.total, 246.0);
        assert_eq!(order.payment.cash_received, Some(250.0));
        assert_eq!(order.items[0].quantity, 2);
    }
}
