//! Shared types and core logic for the Meat Inventory System
//!
//! This crate contains the domain models and the inventory ledger engine
//! (FIFO allocation, reversal, lot reconciliation and low-stock
//! classification) used by the backend. It performs no I/O: the engine
//! operates on in-memory lot snapshots and reports which lots it mutated,
//! so the storage layer decides how to persist the result.

pub mod business_day;
pub mod ledger;
pub mod models;
pub mod validation;

pub use ledger::{
    allocate, adjust, reconcile_totals, restore, Adjustment, AllocationOutcome, LedgerError,
    LotMutation, RestoreOutcome, StockDimension,
};
pub use models::*;
