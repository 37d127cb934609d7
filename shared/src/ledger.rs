//! Inventory ledger engine
//!
//! FIFO allocation of consumption (sales, waste, piece counts) across the
//! purchase lots of a category, and its inverse for edits and deletions.
//! The functions here are pure: they take a snapshot of a category's lots,
//! mutate remaining quantities in memory and report exactly which lots
//! changed, leaving persistence and locking to the caller.
//!
//! Design rules, in brief:
//! - allocation walks lots oldest-purchase-first and is allowed to come up
//!   short: the unmet portion is reported as a shortfall, not an error;
//! - restoration walks lots newest-purchase-first, fills only the room each
//!   lot has (`total - remaining`) and drops whatever no lot can absorb;
//!   restoring never creates lots;
//! - weights are rounded to 2 decimal places after every mutation, piece
//!   counts stay exact integers.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::PurchaseLot;

/// Errors for invalid ledger requests. Raised before any lot is touched.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),

    #[error("amount must not be negative, got {0}")]
    NegativeAmount(Decimal),

    #[error("piece amounts must be whole numbers, got {0}")]
    FractionalPieces(Decimal),

    #[error("lot total weight must be positive, got {0}")]
    NonPositiveTotal(Decimal),
}

/// Which parallel quantity field an operation works on. Weight and pieces
/// run the identical algorithm over their respective fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockDimension {
    WeightKg,
    Pieces,
}

impl StockDimension {
    fn remaining(&self, lot: &PurchaseLot) -> Decimal {
        match self {
            StockDimension::WeightKg => lot.remaining_weight_kg,
            // Lots without piece tracking contribute nothing.
            StockDimension::Pieces => lot.remaining_pieces.map(Decimal::from).unwrap_or_default(),
        }
    }

    fn total(&self, lot: &PurchaseLot) -> Decimal {
        match self {
            StockDimension::WeightKg => lot.total_weight_kg,
            StockDimension::Pieces => lot.total_pieces.map(Decimal::from).unwrap_or_default(),
        }
    }

    fn set_remaining(&self, lot: &mut PurchaseLot, value: Decimal) {
        match self {
            StockDimension::WeightKg => lot.remaining_weight_kg = value.round_dp(2),
            StockDimension::Pieces => {
                // Piece arithmetic only ever adds/subtracts integers, so the
                // value is integral by construction.
                lot.remaining_pieces = value.to_i64().or(lot.remaining_pieces);
            }
        }
    }

    fn validate_amount(&self, amount: Decimal) -> Result<(), LedgerError> {
        if *self == StockDimension::Pieces && !amount.fract().is_zero() {
            return Err(LedgerError::FractionalPieces(amount));
        }
        Ok(())
    }
}

/// New remaining quantities for one lot the engine touched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LotMutation {
    pub lot_id: Uuid,
    /// Quantity applied to this lot (deducted or restored).
    pub applied: Decimal,
    pub remaining_weight_kg: Decimal,
    pub remaining_pieces: Option<i64>,
}

/// Result of a forward allocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationOutcome {
    pub requested: Decimal,
    pub allocated: Decimal,
    /// Portion that could not be satisfied because the lots ran dry.
    pub shortfall: Decimal,
    pub mutations: Vec<LotMutation>,
}

impl AllocationOutcome {
    pub fn fully_satisfied(&self) -> bool {
        self.shortfall.is_zero()
    }
}

/// Result of a reverse restoration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestoreOutcome {
    pub requested: Decimal,
    pub restored: Decimal,
    /// Portion no lot had room for; dropped by policy, never re-lotted.
    pub unabsorbed: Decimal,
    pub mutations: Vec<LotMutation>,
}

/// What an [`adjust`] call ended up doing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Adjustment {
    Unchanged,
    Allocated(AllocationOutcome),
    Restored(RestoreOutcome),
}

fn sort_fifo(lots: &mut [PurchaseLot]) {
    // Oldest purchase first; creation order breaks ties (stable sort keeps
    // equal keys in slice order, which callers supply in insertion order).
    lots.sort_by(|a, b| {
        a.purchase_date
            .cmp(&b.purchase_date)
            .then(a.created_at.cmp(&b.created_at))
    });
}

/// Deduct `amount` from the category's lots, oldest purchase first.
///
/// Running out of stock is not an error: the remainder comes back as
/// `shortfall` and the deduction stands. The business accepts implied
/// negative stock over blocking a sale.
pub fn allocate(
    lots: &mut [PurchaseLot],
    dimension: StockDimension,
    amount: Decimal,
) -> Result<AllocationOutcome, LedgerError> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::NonPositiveAmount(amount));
    }
    dimension.validate_amount(amount)?;

    sort_fifo(lots);

    let mut left = amount;
    let mut mutations = Vec::new();

    for lot in lots.iter_mut() {
        if left.is_zero() {
            break;
        }
        let available = dimension.remaining(lot);
        let deduction = available.min(left);
        if deduction <= Decimal::ZERO {
            continue;
        }
        dimension.set_remaining(lot, available - deduction);
        left -= deduction;
        mutations.push(LotMutation {
            lot_id: lot.id,
            applied: deduction,
            remaining_weight_kg: lot.remaining_weight_kg,
            remaining_pieces: lot.remaining_pieces,
        });
    }

    Ok(AllocationOutcome {
        requested: amount,
        allocated: amount - left,
        shortfall: left,
        mutations,
    })
}

/// Add `amount` back into the category's lots, newest purchase first,
/// undoing the most recent FIFO draw first. A zero amount is a no-op.
///
/// Each lot absorbs at most the room it has (`total - remaining`). If the
/// lots were deleted or edited downward since the consumption, the excess is
/// reported as `unabsorbed` and dropped.
pub fn restore(
    lots: &mut [PurchaseLot],
    dimension: StockDimension,
    amount: Decimal,
) -> Result<RestoreOutcome, LedgerError> {
    if amount < Decimal::ZERO {
        return Err(LedgerError::NegativeAmount(amount));
    }
    dimension.validate_amount(amount)?;

    sort_fifo(lots);
    lots.reverse();

    let mut left = amount;
    let mut mutations = Vec::new();

    for lot in lots.iter_mut() {
        if left.is_zero() {
            break;
        }
        let room = dimension.total(lot) - dimension.remaining(lot);
        let addition = room.min(left);
        if addition <= Decimal::ZERO {
            continue;
        }
        dimension.set_remaining(lot, dimension.remaining(lot) + addition);
        left -= addition;
        mutations.push(LotMutation {
            lot_id: lot.id,
            applied: addition,
            remaining_weight_kg: lot.remaining_weight_kg,
            remaining_pieces: lot.remaining_pieces,
        });
    }

    Ok(RestoreOutcome {
        requested: amount,
        restored: amount - left,
        unabsorbed: left,
        mutations,
    })
}

/// Re-point the ledger at a corrected consumption amount: allocate the
/// increase, restore the decrease, do nothing when the amount is unchanged.
pub fn adjust(
    lots: &mut [PurchaseLot],
    dimension: StockDimension,
    old_amount: Decimal,
    new_amount: Decimal,
) -> Result<Adjustment, LedgerError> {
    if old_amount < Decimal::ZERO {
        return Err(LedgerError::NegativeAmount(old_amount));
    }
    if new_amount < Decimal::ZERO {
        return Err(LedgerError::NegativeAmount(new_amount));
    }

    let delta = new_amount - old_amount;
    if delta.is_zero() {
        Ok(Adjustment::Unchanged)
    } else if delta > Decimal::ZERO {
        allocate(lots, dimension, delta).map(Adjustment::Allocated)
    } else {
        restore(lots, dimension, -delta).map(Adjustment::Restored)
    }
}

/// Apply an explicit lot edit, reconciling remaining quantities against what
/// has already been consumed: `used = old_total - old_remaining`,
/// `new_remaining = max(0, new_total - used)`. Recomputes the total cost.
pub fn reconcile_totals(
    lot: &mut PurchaseLot,
    new_total_weight_kg: Decimal,
    new_total_pieces: Option<i64>,
    new_cost_per_kg: Decimal,
) -> Result<(), LedgerError> {
    if new_total_weight_kg <= Decimal::ZERO {
        return Err(LedgerError::NonPositiveTotal(new_total_weight_kg));
    }

    let used_weight = lot.used_weight_kg();
    lot.total_weight_kg = new_total_weight_kg.round_dp(2);
    lot.remaining_weight_kg = (lot.total_weight_kg - used_weight)
        .max(Decimal::ZERO)
        .round_dp(2);

    match new_total_pieces {
        Some(new_total) => {
            let used = lot.used_pieces();
            lot.total_pieces = Some(new_total);
            lot.remaining_pieces = Some((new_total - used).max(0));
        }
        None => {
            lot.total_pieces = None;
            lot.remaining_pieces = None;
        }
    }

    lot.cost_per_kg = new_cost_per_kg;
    lot.total_cost = (lot.total_weight_kg * new_cost_per_kg).round_dp(2);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    /// Lots purchased `day` days ago, with given weight and optional pieces.
    fn lot(days_ago: i64, weight: &str, pieces: Option<i64>) -> PurchaseLot {
        PurchaseLot::new(Uuid::new_v4(), Uuid::new_v4(), dec(weight), pieces, dec("100"))
            .with_purchase_date(Utc::now() - Duration::days(days_ago))
    }

    #[test]
    fn test_allocate_walks_oldest_first() {
        let mut lots = vec![lot(1, "10", None), lot(2, "5", None)];

        let outcome = allocate(&mut lots, StockDimension::WeightKg, dec("8")).unwrap();

        assert!(outcome.fully_satisfied());
        assert_eq!(outcome.mutations.len(), 2);
        // Oldest lot (2 days ago, 5kg) drained first.
        assert_eq!(outcome.mutations[0].applied, dec("5"));
        assert_eq!(outcome.mutations[1].applied, dec("3"));

        let newest = lots.iter().find(|l| l.total_weight_kg == dec("10")).unwrap();
        assert_eq!(newest.remaining_weight_kg, dec("7.00"));
    }

    #[test]
    fn test_allocate_reports_shortfall_and_drains_everything() {
        let mut lots = vec![lot(1, "3", None), lot(2, "2", None)];

        let outcome = allocate(&mut lots, StockDimension::WeightKg, dec("9")).unwrap();

        assert!(!outcome.fully_satisfied());
        assert_eq!(outcome.allocated, dec("5"));
        assert_eq!(outcome.shortfall, dec("4"));
        assert!(lots.iter().all(|l| l.remaining_weight_kg.is_zero()));
    }

    #[test]
    fn test_allocate_rejects_non_positive() {
        let mut lots = vec![lot(1, "3", None)];

        assert_eq!(
            allocate(&mut lots, StockDimension::WeightKg, Decimal::ZERO),
            Err(LedgerError::NonPositiveAmount(Decimal::ZERO))
        );
        assert_eq!(lots[0].remaining_weight_kg, dec("3"));
    }

    #[test]
    fn test_allocate_pieces_skips_untracked_lots() {
        let mut lots = vec![lot(3, "10", None), lot(1, "10", Some(4)), lot(2, "10", Some(6))];

        let outcome = allocate(&mut lots, StockDimension::Pieces, dec("8")).unwrap();

        assert!(outcome.fully_satisfied());
        // The weight-only lot is oldest but contributes nothing.
        assert_eq!(outcome.mutations.len(), 2);
        assert_eq!(outcome.mutations[0].applied, dec("6"));
        assert_eq!(outcome.mutations[1].applied, dec("2"));
        assert!(lots.iter().all(|l| l.remaining_weight_kg == dec("10")));
    }

    #[test]
    fn test_allocate_rejects_fractional_pieces() {
        let mut lots = vec![lot(1, "10", Some(4))];

        assert_eq!(
            allocate(&mut lots, StockDimension::Pieces, dec("1.5")),
            Err(LedgerError::FractionalPieces(dec("1.5")))
        );
    }

    #[test]
    fn test_restore_fills_newest_first() {
        let mut lots = vec![lot(2, "5", None), lot(1, "10", None)];
        allocate(&mut lots, StockDimension::WeightKg, dec("8")).unwrap();

        let outcome = restore(&mut lots, StockDimension::WeightKg, dec("8")).unwrap();

        assert_eq!(outcome.restored, dec("8"));
        assert!(outcome.unabsorbed.is_zero());
        // Newest lot had 3kg of room, takes that first; the rest goes back
        // into the oldest lot.
        assert_eq!(outcome.mutations[0].applied, dec("3"));
        assert_eq!(outcome.mutations[1].applied, dec("5"));
        assert!(lots.iter().all(|l| l.remaining_weight_kg == l.total_weight_kg));
    }

    #[test]
    fn test_restore_drops_what_no_lot_can_absorb() {
        let mut lots = vec![lot(1, "5", None)];
        allocate(&mut lots, StockDimension::WeightKg, dec("2")).unwrap();

        let outcome = restore(&mut lots, StockDimension::WeightKg, dec("6")).unwrap();

        assert_eq!(outcome.restored, dec("2"));
        assert_eq!(outcome.unabsorbed, dec("4"));
        assert_eq!(lots[0].remaining_weight_kg, dec("5.00"));
    }

    #[test]
    fn test_restore_zero_is_noop() {
        let mut lots = vec![lot(1, "5", None)];

        let outcome = restore(&mut lots, StockDimension::WeightKg, Decimal::ZERO).unwrap();

        assert!(outcome.mutations.is_empty());
        assert_eq!(outcome.restored, Decimal::ZERO);
    }

    #[test]
    fn test_adjust_dispatch() {
        let mut lots = vec![lot(1, "10", None)];
        allocate(&mut lots, StockDimension::WeightKg, dec("4")).unwrap();

        match adjust(&mut lots, StockDimension::WeightKg, dec("4"), dec("6")).unwrap() {
            Adjustment::Allocated(o) => assert_eq!(o.allocated, dec("2")),
            other => panic!("expected allocation, got {other:?}"),
        }
        assert_eq!(lots[0].remaining_weight_kg, dec("4.00"));

        match adjust(&mut lots, StockDimension::WeightKg, dec("6"), dec("1")).unwrap() {
            Adjustment::Restored(o) => assert_eq!(o.restored, dec("5")),
            other => panic!("expected restoration, got {other:?}"),
        }
        assert_eq!(lots[0].remaining_weight_kg, dec("9.00"));

        match adjust(&mut lots, StockDimension::WeightKg, dec("1"), dec("1")).unwrap() {
            Adjustment::Unchanged => {}
            other => panic!("expected no-op, got {other:?}"),
        }
    }

    #[test]
    fn test_reconcile_totals_keeps_consumed_quantity() {
        let mut l = lot(1, "20", Some(10));
        allocate(&mut std::slice::from_mut(&mut l), StockDimension::WeightKg, dec("12")).unwrap();

        // 12kg used; shrinking the total to 15 leaves 3 remaining.
        reconcile_totals(&mut l, dec("15"), Some(10), dec("110")).unwrap();
        assert_eq!(l.remaining_weight_kg, dec("3.00"));
        assert_eq!(l.total_cost, dec("1650.00"));

        // Shrinking below what was already used clamps at zero.
        reconcile_totals(&mut l, dec("10"), Some(10), dec("110")).unwrap();
        assert_eq!(l.remaining_weight_kg, dec("0.00"));
    }

    #[test]
    fn test_reconcile_rejects_non_positive_total() {
        let mut l = lot(1, "20", None);
        assert_eq!(
            reconcile_totals(&mut l, Decimal::ZERO, None, dec("100")),
            Err(LedgerError::NonPositiveTotal(Decimal::ZERO))
        );
    }

    #[test]
    fn test_weight_rounding_after_each_mutation() {
        let mut lots = vec![lot(1, "10", None)];

        allocate(&mut lots, StockDimension::WeightKg, dec("3.333")).unwrap();
        assert_eq!(lots[0].remaining_weight_kg, dec("6.67"));

        allocate(&mut lots, StockDimension::WeightKg, dec("3.333")).unwrap();
        assert_eq!(lots[0].remaining_weight_kg, dec("3.34"));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Piece draws account for the full request and conserve the
            /// category's piece total.
            #[test]
            fn prop_pieces_allocation_conserves(
                counts in prop::collection::vec(0i64..=50, 1..5),
                draw in 1i64..=200,
            ) {
                let mut lots: Vec<_> = counts
                    .iter()
                    .enumerate()
                    .map(|(i, &n)| lot(i as i64 + 1, "10", Some(n)))
                    .collect();
                let before: i64 = counts.iter().sum();

                let outcome =
                    allocate(&mut lots, StockDimension::Pieces, Decimal::from(draw)).unwrap();

                let after: i64 = lots.iter().filter_map(|l| l.remaining_pieces).sum();
                prop_assert_eq!(outcome.allocated + outcome.shortfall, Decimal::from(draw));
                prop_assert_eq!(Decimal::from(before - after), outcome.allocated);
            }
        }
    }
}
