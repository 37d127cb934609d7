//! Purchase lot model
//!
//! A purchase lot is the atomic unit of the stock ledger: one recorded
//! purchase batch of a main category, carrying both the original and the
//! remaining quantities. Only the ledger engine mutates the remaining
//! fields; explicit lot edits go through [`crate::ledger::reconcile_totals`].

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseLot {
    pub id: Uuid,
    pub main_category_id: Uuid,
    pub vendor_id: Uuid,
    pub purchase_date: DateTime<Utc>,
    pub total_weight_kg: Decimal,
    pub total_pieces: Option<i64>,
    pub remaining_weight_kg: Decimal,
    pub remaining_pieces: Option<i64>,
    pub cost_per_kg: Decimal,
    pub total_cost: Decimal,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl PurchaseLot {
    /// Create a fresh lot with `remaining_* = total_*` and the total cost
    /// derived from weight and per-kg cost.
    pub fn new(
        main_category_id: Uuid,
        vendor_id: Uuid,
        total_weight_kg: Decimal,
        total_pieces: Option<i64>,
        cost_per_kg: Decimal,
    ) -> Self {
        let now = Utc::now();
        let total_weight_kg = total_weight_kg.round_dp(2);
        Self {
            id: Uuid::new_v4(),
            main_category_id,
            vendor_id,
            purchase_date: now,
            total_weight_kg,
            total_pieces,
            remaining_weight_kg: total_weight_kg,
            remaining_pieces: total_pieces,
            cost_per_kg,
            total_cost: (total_weight_kg * cost_per_kg).round_dp(2),
            notes: None,
            created_at: now,
        }
    }

    pub fn with_purchase_date(mut self, purchase_date: DateTime<Utc>) -> Self {
        self.purchase_date = purchase_date;
        self
    }

    pub fn with_notes(mut self, notes: String) -> Self {
        self.notes = Some(notes);
        self
    }

    /// Weight already consumed from this lot.
    pub fn used_weight_kg(&self) -> Decimal {
        self.total_weight_kg - self.remaining_weight_kg
    }

    /// Pieces already consumed, zero for lots without piece tracking.
    pub fn used_pieces(&self) -> i64 {
        self.total_pieces.unwrap_or(0) - self.remaining_pieces.unwrap_or(0)
    }

    /// A lot is untouched while nothing has been consumed from it. Only
    /// untouched lots may be deleted without corrupting consumption history.
    pub fn is_untouched(&self) -> bool {
        self.remaining_weight_kg == self.total_weight_kg && self.used_pieces() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_new_lot_starts_full() {
        let lot = PurchaseLot::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            dec("25.5"),
            Some(12),
            dec("180"),
        );

        assert_eq!(lot.remaining_weight_kg, dec("25.5"));
        assert_eq!(lot.remaining_pieces, Some(12));
        assert_eq!(lot.total_cost, dec("4590.00"));
        assert!(lot.is_untouched());
    }

    #[test]
    fn test_used_quantities() {
        let mut lot = PurchaseLot::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            dec("10"),
            Some(5),
            dec("200"),
        );
        lot.remaining_weight_kg = dec("7.25");
        lot.remaining_pieces = Some(2);

        assert_eq!(lot.used_weight_kg(), dec("2.75"));
        assert_eq!(lot.used_pieces(), 3);
        assert!(!lot.is_untouched());
    }
}
