//! Ledger engine service
//!
//! Runs the pure FIFO engine from the shared crate against the database:
//! fetch the category's lots, mutate the snapshot, write back exactly the
//! lots the engine touched. Calls for the same category are serialized with
//! a per-category async lock held across the whole read-modify-write, so
//! concurrent deductions can never double-spend the same remaining
//! quantity; different categories proceed in parallel.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use rust_decimal::Decimal;
use sqlx::PgPool;
use tokio::sync::Mutex;
use uuid::Uuid;

use shared::ledger::{self, Adjustment, AllocationOutcome, LotMutation, RestoreOutcome, StockDimension};
use shared::models::PurchaseLot;

use crate::error::{AppError, AppResult};

/// Ledger service owning the per-category lock registry
#[derive(Clone)]
pub struct LedgerService {
    db: PgPool,
    locks: Arc<DashMap<Uuid, Arc<Mutex<()>>>>,
}

/// Row mapping for `inventory_purchases`
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct LotRow {
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

impl From<LotRow> for PurchaseLot {
    fn from(row: LotRow) -> Self {
        PurchaseLot {
            id: row.id,
            main_category_id: row.main_category_id,
            vendor_id: row.vendor_id,
            purchase_date: row.purchase_date,
            total_weight_kg: row.total_weight_kg,
            total_pieces: row.total_pieces,
            remaining_weight_kg: row.remaining_weight_kg,
            remaining_pieces: row.remaining_pieces,
            cost_per_kg: row.cost_per_kg,
            total_cost: row.total_cost,
            notes: row.notes,
            created_at: row.created_at,
        }
    }
}

pub(crate) const LOT_COLUMNS: &str = "id, main_category_id, vendor_id, purchase_date, \
     total_weight_kg, total_pieces, remaining_weight_kg, remaining_pieces, \
     cost_per_kg, total_cost, notes, created_at";

/// Fetch all lots for a category in FIFO order (oldest purchase first,
/// creation order breaking ties).
pub(crate) async fn fetch_lots_for_category(
    db: &PgPool,
    category_id: Uuid,
) -> AppResult<Vec<PurchaseLot>> {
    let rows = sqlx::query_as::<_, LotRow>(&format!(
        "SELECT {LOT_COLUMNS} FROM inventory_purchases \
         WHERE main_category_id = $1 \
         ORDER BY purchase_date ASC, created_at ASC"
    ))
    .bind(category_id)
    .fetch_all(db)
    .await?;

    Ok(rows.into_iter().map(PurchaseLot::from).collect())
}

/// Check a category exists; NotFound before any mutation otherwise.
pub(crate) async fn ensure_category_exists(db: &PgPool, category_id: Uuid) -> AppResult<()> {
    let exists =
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM main_categories WHERE id = $1)")
            .bind(category_id)
            .fetch_one(db)
            .await?;

    if !exists {
        return Err(AppError::NotFound("Category".to_string()));
    }
    Ok(())
}

impl LedgerService {
    /// Create a new LedgerService instance
    pub fn new(db: PgPool) -> Self {
        Self {
            db,
            locks: Arc::new(DashMap::new()),
        }
    }

    /// The serialization lock for one category. Every read-modify-write of
    /// the category's lots, inside this service or out, must hold it.
    pub(crate) fn category_lock(&self, category_id: Uuid) -> Arc<Mutex<()>> {
        self.locks
            .entry(category_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Deduct `amount` from the category's stock, oldest lot first.
    ///
    /// A shortfall is reported in the outcome and logged, never raised as an
    /// error: the business books the consumption regardless.
    pub async fn allocate(
        &self,
        category_id: Uuid,
        dimension: StockDimension,
        amount: Decimal,
    ) -> AppResult<AllocationOutcome> {
        ensure_category_exists(&self.db, category_id).await?;

        let lock = self.category_lock(category_id);
        let _guard = lock.lock().await;

        let mut lots = fetch_lots_for_category(&self.db, category_id).await?;
        let outcome = ledger::allocate(&mut lots, dimension, amount)?;
        self.persist_mutations(&outcome.mutations).await?;

        if !outcome.fully_satisfied() {
            tracing::warn!(
                %category_id,
                ?dimension,
                requested = %outcome.requested,
                shortfall = %outcome.shortfall,
                "stock exhausted before allocation was satisfied"
            );
        }

        Ok(outcome)
    }

    /// Give `amount` back to the category's stock, newest lot first.
    pub async fn restore(
        &self,
        category_id: Uuid,
        dimension: StockDimension,
        amount: Decimal,
    ) -> AppResult<RestoreOutcome> {
        ensure_category_exists(&self.db, category_id).await?;

        let lock = self.category_lock(category_id);
        let _guard = lock.lock().await;

        let mut lots = fetch_lots_for_category(&self.db, category_id).await?;
        let outcome = ledger::restore(&mut lots, dimension, amount)?;
        self.persist_mutations(&outcome.mutations).await?;

        if !outcome.unabsorbed.is_zero() {
            tracing::warn!(
                %category_id,
                ?dimension,
                requested = %outcome.requested,
                unabsorbed = %outcome.unabsorbed,
                "restoration exceeded lot capacity; excess dropped"
            );
        }

        Ok(outcome)
    }

    /// Move the ledger from a previously recorded amount to a corrected one.
    pub async fn adjust(
        &self,
        category_id: Uuid,
        dimension: StockDimension,
        old_amount: Decimal,
        new_amount: Decimal,
    ) -> AppResult<Adjustment> {
        ensure_category_exists(&self.db, category_id).await?;

        let lock = self.category_lock(category_id);
        let _guard = lock.lock().await;

        let mut lots = fetch_lots_for_category(&self.db, category_id).await?;
        let adjustment = ledger::adjust(&mut lots, dimension, old_amount, new_amount)?;

        match &adjustment {
            Adjustment::Unchanged => {}
            Adjustment::Allocated(outcome) => {
                self.persist_mutations(&outcome.mutations).await?;
                if !outcome.fully_satisfied() {
                    tracing::warn!(
                        %category_id,
                        ?dimension,
                        shortfall = %outcome.shortfall,
                        "adjustment increase ran past available stock"
                    );
                }
            }
            Adjustment::Restored(outcome) => {
                self.persist_mutations(&outcome.mutations).await?;
                if !outcome.unabsorbed.is_zero() {
                    tracing::warn!(
                        %category_id,
                        ?dimension,
                        unabsorbed = %outcome.unabsorbed,
                        "adjustment decrease exceeded lot capacity; excess dropped"
                    );
                }
            }
        }

        Ok(adjustment)
    }

    /// Write back the lots the engine touched. A failure part-way aborts the
    /// loop and surfaces; already-written lots stay valid on their own
    /// (at-least-applied semantics).
    async fn persist_mutations(&self, mutations: &[LotMutation]) -> AppResult<()> {
        for mutation in mutations {
            sqlx::query(
                "UPDATE inventory_purchases \
                 SET remaining_weight_kg = $1, remaining_pieces = $2 \
                 WHERE id = $3",
            )
            .bind(mutation.remaining_weight_kg)
            .bind(mutation.remaining_pieces)
            .bind(mutation.lot_id)
            .execute(&self.db)
            .await?;
        }
        Ok(())
    }
}
