//! Order Repository
//!
//! Finalized orders are append-only: create and read, no update/delete.
//! Receipt numbers come from a per-day counter document so numbering
//! restarts every business day.

use serde::Deserialize;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Order, OrderStatus};
use crate::utils::time;

const TABLE: &str = "order";
const COUNTER_TABLE: &str = "order_counter";

/// Receipt number prefix, e.g. "DHB20260831-0042"
const RECEIPT_PREFIX: &str = "DHB";

#[derive(Debug, Deserialize)]
struct CounterRow {
    value: i64,
}

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Next receipt number for today
    ///
    /// Atomic upsert on the per-day counter document; concurrent callers
    /// get distinct sequence numbers.
    pub async fn next_receipt_number(&self) -> RepoResult<String> {
        let date_key = time::today_key();
        let counter = RecordId::from_table_key(COUNTER_TABLE, date_key.clone());

        let mut result = self
            .base
            .db()
            .query("UPSERT $counter SET value += 1 RETURN AFTER")
            .bind(("counter", counter))
            .await?;
        let row: Option<CounterRow> = result.take(0)?;
        let value = row
            .map(|r| r.value)
            .ok_or_else(|| RepoError::Database("Receipt counter upsert returned nothing".to_string()))?;

        Ok(format!("{}{}-{:04}", RECEIPT_PREFIX, date_key, value))
    }

    /// Persist a finalized order
    pub async fn create(&self, order: Order) -> RepoResult<Order> {
        let created: Option<Order> = self.base.db().create(TABLE).content(order).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    /// Find order by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let order: Option<Order> = self.base.db().select(thing).await?;
        Ok(order)
    }

    /// Find order by receipt number
    pub async fn find_by_receipt(&self, receipt_number: &str) -> RepoResult<Option<Order>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM order WHERE receipt_number = $rn LIMIT 1")
            .bind(("rn", receipt_number.to_string()))
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        Ok(orders.into_iter().next())
    }

    /// All orders of one calendar day (local time), newest first
    pub async fn find_by_date(&self, date: &str) -> RepoResult<Vec<Order>> {
        let day = time::parse_date(date)
            .map_err(|e| RepoError::Validation(format!("Invalid date '{}': {}", date, e)))?;
        let start = time::day_start_millis(day);
        let end = time::day_end_millis(day);

        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order WHERE created_at >= $start AND created_at < $end ORDER BY created_at DESC")
            .bind(("start", start))
            .bind(("end", end))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Void a completed order
    ///
    /// The document stays for the audit trail, only the status flips.
    /// Cancelling twice is a no-op error.
    pub async fn cancel(&self, id: &str) -> RepoResult<Order> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))?;
        if existing.status == OrderStatus::Cancelled {
            return Err(RepoError::Validation(format!(
                "Order {} is already cancelled",
                existing.receipt_number
            )));
        }

        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        self.base
            .db()
            .query("UPDATE $thing SET status = $status")
            .bind(("thing", thing))
            .bind(("status", OrderStatus::Cancelled))
            .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))
    }

    /// Most recent orders, newest first
    pub async fn find_recent(&self, limit: usize) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order ORDER BY created_at DESC LIMIT $limit")
            .bind(("limit", limit as i64))
            .await?
            .take(0)?;
        Ok(orders)
    }
}
