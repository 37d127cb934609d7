//! Daily waste and pieces tracking models
//!
//! Both are consumption records: once persisted they represent a claim
//! against the lot ledger that must stay reversible by amount.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Weight discarded for a category on a given day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WasteRecord {
    pub id: Uuid,
    pub main_category_id: Uuid,
    pub date: NaiveDate,
    pub waste_kg: Decimal,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Pieces sold for a category on a given day, outside itemised POS sales.
/// At most one record exists per (category, day).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PiecesTracking {
    pub id: Uuid,
    pub main_category_id: Uuid,
    pub date: NaiveDate,
    pub pieces_sold: i64,
    pub created_at: DateTime<Utc>,
}
