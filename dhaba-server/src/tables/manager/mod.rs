//! TableManager - in-memory table session registry
//!
//! Tracks the live state of every dining table: status, customer info,
//! accumulated order groups, and running totals. Sessions are held behind a
//! single `RwLock<HashMap>` so that multi-table operations (merge) are
//! atomic within the process.
//!
//! # Operation Flow
//!
//! ```text
//! occupy(table, customer)        Available → Occupied
//! add_order(table, items)        append OrderGroup, recompute totals
//! merge(source, target)          concat groups, clear source
//! split_bill(table, n)           informational even split
//! clear(table)                   drop session state → Available
//! ```
//!
//! Totals are recomputed on every mutation from the rates passed in by the
//! caller (the live settings cache). Rates are deliberately NOT snapshotted
//! per order group: a rate change retroactively changes the displayed
//! totals of every uncommitted table.

use std::collections::HashMap;

use parking_lot::RwLock;
use serde::Serialize;
use shared::order::{BillShare, BillTotals, CartItem, CustomerInfo, OrderGroup, TableStatus};

use super::error::{TableError, TableResult};
use super::money;

/// Percentage rates applied on top of the subtotal
#[derive(Debug, Clone, Copy, Default)]
pub struct Rates {
    pub gst_rate: f64,
    pub service_rate: f64,
}

/// Live state of one dining table
#[derive(Debug, Clone, Serialize)]
pub struct TableSession {
    /// Table record id ("dining_table:xyz")
    pub table_id: String,
    /// Table display name
    pub name: String,
    pub status: TableStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<CustomerInfo>,
    /// Append-only order groups
    pub orders: Vec<OrderGroup>,
    pub totals: BillTotals,
}

impl TableSession {
    fn empty(table_id: String, name: String) -> Self {
        Self {
            table_id,
            name,
            status: TableStatus::Available,
            customer: None,
            orders: Vec::new(),
            totals: BillTotals::default(),
        }
    }

    /// All items across every order group, in insertion order
    pub fn all_items(&self) -> Vec<CartItem> {
        self.orders.iter().flat_map(|g| g.items.clone()).collect()
    }

    fn reset(&mut self) {
        self.status = TableStatus::Available;
        self.customer = None;
        self.orders.clear();
        self.totals = BillTotals::default();
    }

    fn recompute(&mut self, rates: Rates) {
        let items = self.all_items();
        let subtotal = money::items_subtotal(&items);
        self.totals = money::bill_totals(subtotal, rates.gst_rate, rates.service_rate);
    }
}

/// In-memory registry of table sessions
///
/// Seeded from the `dining_table` collection at startup; tables created or
/// deleted through the admin API are registered/unregistered at the same
/// time as the document write.
pub struct TableManager {
    sessions: RwLock<HashMap<String, TableSession>>,
}

impl TableManager {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Register a table (startup seeding or admin create)
    ///
    /// Existing session state is preserved if the table is already known
    /// (re-seeding after a settings reload must not drop open sessions).
    pub fn register(&self, table_id: &str, name: &str) {
        let mut sessions = self.sessions.write();
        sessions
            .entry(table_id.to_string())
            .and_modify(|s| s.name = name.to_string())
            .or_insert_with(|| TableSession::empty(table_id.to_string(), name.to_string()));
    }

    /// Remove a table from the registry (admin delete)
    pub fn unregister(&self, table_id: &str) {
        self.sessions.write().remove(table_id);
    }

    /// Number of registered tables
    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }

    /// Snapshot of one session
    pub fn snapshot(&self, table_id: &str) -> TableResult<TableSession> {
        self.sessions
            .read()
            .get(table_id)
            .cloned()
            .ok_or_else(|| TableError::NotFound(table_id.to_string()))
    }

    /// Snapshot of all sessions, sorted by table name
    pub fn list(&self) -> Vec<TableSession> {
        let mut all: Vec<TableSession> = self.sessions.read().values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        all
    }

    /// Occupy an available table
    ///
    /// Fails with [`TableError::AlreadyOccupied`] if the table is occupied
    /// or reserved; the session is untouched on failure.
    pub fn occupy(&self, table_id: &str, customer: CustomerInfo) -> TableResult<TableSession> {
        let mut sessions = self.sessions.write();
        let session = sessions
            .get_mut(table_id)
            .ok_or_else(|| TableError::NotFound(table_id.to_string()))?;

        if session.status != TableStatus::Available {
            return Err(TableError::AlreadyOccupied(table_id.to_string()));
        }

        session.status = TableStatus::Occupied;
        session.customer = Some(customer);
        tracing::info!(table = %session.name, "Table occupied");
        Ok(session.clone())
    }

    /// Mark an available table as reserved
    pub fn reserve(&self, table_id: &str) -> TableResult<TableSession> {
        let mut sessions = self.sessions.write();
        let session = sessions
            .get_mut(table_id)
            .ok_or_else(|| TableError::NotFound(table_id.to_string()))?;

        if session.status != TableStatus::Available {
            return Err(TableError::AlreadyOccupied(table_id.to_string()));
        }

        session.status = TableStatus::Reserved;
        Ok(session.clone())
    }

    /// Append a new order group to a table
    ///
    /// An available (or reserved) table transitions to occupied on its
    /// first order. Items are validated before any state changes; the
    /// group subtotal is its own, table totals cover all groups combined.
    pub fn add_order(
        &self,
        table_id: &str,
        items: Vec<CartItem>,
        customer: Option<CustomerInfo>,
        rates: Rates,
    ) -> TableResult<TableSession> {
        if items.is_empty() {
            return Err(TableError::InvalidInput("order has no items".to_string()));
        }
        for item in &items {
            money::validate_cart_item(item)?;
        }

        let mut sessions = self.sessions.write();
        let session = sessions
            .get_mut(table_id)
            .ok_or_else(|| TableError::NotFound(table_id.to_string()))?;

        if session.status != TableStatus::Occupied {
            session.status = TableStatus::Occupied;
        }
        if session.customer.is_none() {
            session.customer = customer;
        }

        let subtotal = money::round2(money::items_subtotal(&items));
        session.orders.push(OrderGroup::new(items, subtotal));
        session.recompute(rates);

        tracing::info!(
            table = %session.name,
            groups = session.orders.len(),
            total = session.totals.total,
            "Order group added"
        );
        Ok(session.clone())
    }

    /// Clear a table back to empty/available
    ///
    /// In-progress order groups are dropped, not archived. Other tables
    /// are unaffected.
    pub fn clear(&self, table_id: &str) -> TableResult<TableSession> {
        let mut sessions = self.sessions.write();
        let session = sessions
            .get_mut(table_id)
            .ok_or_else(|| TableError::NotFound(table_id.to_string()))?;

        session.reset();
        tracing::info!(table = %session.name, "Table cleared");
        Ok(session.clone())
    }

    /// Merge source table's order groups onto target, then clear source
    ///
    /// No conflict check when both tables hold customer info: the target
    /// keeps its own customer, source customer carries over only if the
    /// target had none.
    pub fn merge(&self, source_id: &str, target_id: &str, rates: Rates) -> TableResult<TableSession> {
        if source_id == target_id {
            return Err(TableError::InvalidInput(
                "cannot merge a table into itself".to_string(),
            ));
        }

        let mut sessions = self.sessions.write();
        if !sessions.contains_key(target_id) {
            return Err(TableError::NotFound(target_id.to_string()));
        }

        let source = sessions
            .get_mut(source_id)
            .ok_or_else(|| TableError::NotFound(source_id.to_string()))?;
        if source.status != TableStatus::Occupied {
            return Err(TableError::NotOccupied(source_id.to_string()));
        }
        let moved_orders = std::mem::take(&mut source.orders);
        let moved_customer = source.customer.take();
        source.reset();

        let target = sessions
            .get_mut(target_id)
            .expect("target presence checked above");
        target.orders.extend(moved_orders);
        if target.customer.is_none() {
            target.customer = moved_customer;
        }
        target.status = TableStatus::Occupied;
        target.recompute(rates);

        tracing::info!(source = source_id, target = target_id, "Tables merged");
        Ok(target.clone())
    }

    /// Evenly split a table's bill into n shares
    ///
    /// Informational split only: the amount is divided, but every share
    /// references the full item list. Items are not partitioned per share.
    pub fn split_bill(&self, table_id: &str, n: u32) -> TableResult<Vec<BillShare>> {
        let sessions = self.sessions.read();
        let session = sessions
            .get(table_id)
            .ok_or_else(|| TableError::NotFound(table_id.to_string()))?;

        if session.status != TableStatus::Occupied {
            return Err(TableError::NotOccupied(table_id.to_string()));
        }

        let amounts = money::split_amount(session.totals.total, n)?;
        let items = session.all_items();
        Ok(amounts
            .into_iter()
            .enumerate()
            .map(|(i, amount)| BillShare {
                index: i as u32 + 1,
                of: n,
                amount,
                items: items.clone(),
            })
            .collect())
    }

    /// Recompute every occupied table's totals against new rates
    ///
    /// Called when the restaurant settings change so displayed totals of
    /// uncommitted tables follow the new rates.
    pub fn recompute_all(&self, rates: Rates) {
        let mut sessions = self.sessions.write();
        for session in sessions.values_mut() {
            if !session.orders.is_empty() {
                session.recompute(rates);
            }
        }
    }
}

impl Default for TableManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;
