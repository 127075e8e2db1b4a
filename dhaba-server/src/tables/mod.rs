//! Table/Order Aggregation Module
//!
//! The heart of the POS: tracks which tables are occupied, accumulates
//! order groups per table, and keeps running financial totals.
//!
//! - **manager**: [`TableManager`] — in-memory session registry
//! - **money**: decimal bill arithmetic and input validation
//!
//! # Data Flow
//!
//! ```text
//! occupy / add_order / merge / clear
//!          ↓
//!     TableManager (RwLock<HashMap>)
//!          ↓
//!   money::bill_totals (rust_decimal, rounded at the boundary)
//! ```
//!
//! Sessions live only in memory: a finalized bill is flattened and handed
//! to the persistence bridge (`billing::checkout`), after which the session
//! is cleared. In-progress sessions are not persisted.

pub mod error;
pub mod manager;
pub mod money;

pub use error::TableError;
pub use manager::{Rates, TableManager, TableSession};
