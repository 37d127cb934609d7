//! Purchase lot service
//!
//! CRUD over the stock ledger's lots. Creation snapshots
//! `remaining_* = total_*`; edits go through the engine's reconciliation so
//! already-consumed quantity is preserved; deletion is only allowed for
//! untouched lots.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use shared::ledger::reconcile_totals;
use shared::models::PurchaseLot;
use shared::validation::{validate_non_negative_amount, validate_non_negative_pieces, validate_positive_weight};

use crate::error::{AppError, AppResult};
use crate::services::ledger::{ensure_category_exists, fetch_lots_for_category, LotRow, LOT_COLUMNS};
use crate::services::LedgerService;

/// Service for recording and maintaining purchase lots
#[derive(Clone)]
pub struct PurchaseService {
    db: PgPool,
    ledger: LedgerService,
}

/// Input for recording a purchase
#[derive(Debug, Deserialize)]
pub struct CreatePurchaseInput {
    pub main_category_id: Uuid,
    pub vendor_id: Uuid,
    pub total_weight_kg: Decimal,
    pub total_pieces: Option<i64>,
    pub cost_per_kg: Decimal,
    pub purchase_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

/// Input for editing a purchase. Quantities are reconciled against what has
/// already been consumed from the lot.
#[derive(Debug, Deserialize)]
pub struct UpdatePurchaseInput {
    pub vendor_id: Uuid,
    pub total_weight_kg: Decimal,
    pub total_pieces: Option<i64>,
    pub cost_per_kg: Decimal,
    pub purchase_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

async fn ensure_vendor_exists(db: &PgPool, vendor_id: Uuid) -> AppResult<()> {
    let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM vendors WHERE id = $1)")
        .bind(vendor_id)
        .fetch_one(db)
        .await?;

    if !exists {
        return Err(AppError::NotFound("Vendor".to_string()));
    }
    Ok(())
}

fn validate_quantities(
    total_weight_kg: Decimal,
    total_pieces: Option<i64>,
    cost_per_kg: Decimal,
) -> AppResult<()> {
    validate_positive_weight(total_weight_kg).map_err(|msg| AppError::Validation {
        field: "total_weight_kg".to_string(),
        message: msg.to_string(),
    })?;
    if let Some(pieces) = total_pieces {
        validate_non_negative_pieces(pieces).map_err(|msg| AppError::Validation {
            field: "total_pieces".to_string(),
            message: msg.to_string(),
        })?;
    }
    validate_non_negative_amount(cost_per_kg).map_err(|msg| AppError::Validation {
        field: "cost_per_kg".to_string(),
        message: msg.to_string(),
    })
}

impl PurchaseService {
    /// Create a new PurchaseService instance
    pub fn new(db: PgPool, ledger: LedgerService) -> Self {
        Self { db, ledger }
    }

    /// Record a purchase, creating a fresh lot with full remaining stock
    pub async fn create(&self, input: CreatePurchaseInput) -> AppResult<PurchaseLot> {
        validate_quantities(input.total_weight_kg, input.total_pieces, input.cost_per_kg)?;
        ensure_category_exists(&self.db, input.main_category_id).await?;
        ensure_vendor_exists(&self.db, input.vendor_id).await?;

        let mut lot = PurchaseLot::new(
            input.main_category_id,
            input.vendor_id,
            input.total_weight_kg,
            input.total_pieces,
            input.cost_per_kg,
        );
        if let Some(date) = input.purchase_date {
            lot = lot.with_purchase_date(date);
        }
        if let Some(notes) = input.notes {
            lot = lot.with_notes(notes);
        }

        sqlx::query(
            r#"
            INSERT INTO inventory_purchases
                (id, main_category_id, vendor_id, purchase_date, total_weight_kg, total_pieces,
                 remaining_weight_kg, remaining_pieces, cost_per_kg, total_cost, notes, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(lot.id)
        .bind(lot.main_category_id)
        .bind(lot.vendor_id)
        .bind(lot.purchase_date)
        .bind(lot.total_weight_kg)
        .bind(lot.total_pieces)
        .bind(lot.remaining_weight_kg)
        .bind(lot.remaining_pieces)
        .bind(lot.cost_per_kg)
        .bind(lot.total_cost)
        .bind(&lot.notes)
        .bind(lot.created_at)
        .execute(&self.db)
        .await?;

        Ok(lot)
    }

    /// Purchase history, most recent first
    pub async fn list(&self) -> AppResult<Vec<PurchaseLot>> {
        let rows = sqlx::query_as::<_, LotRow>(&format!(
            "SELECT {LOT_COLUMNS} FROM inventory_purchases \
             ORDER BY purchase_date DESC, created_at DESC"
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(PurchaseLot::from).collect())
    }

    /// All lots of one category in FIFO order
    pub async fn list_by_category(&self, category_id: Uuid) -> AppResult<Vec<PurchaseLot>> {
        ensure_category_exists(&self.db, category_id).await?;
        fetch_lots_for_category(&self.db, category_id).await
    }

    /// Get a lot by id
    pub async fn get(&self, lot_id: Uuid) -> AppResult<PurchaseLot> {
        let row = sqlx::query_as::<_, LotRow>(&format!(
            "SELECT {LOT_COLUMNS} FROM inventory_purchases WHERE id = $1"
        ))
        .bind(lot_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Purchase".to_string()))?;

        Ok(row.into())
    }

    /// Edit a purchase. Remaining quantities are reconciled so consumption
    /// already drawn from the lot stays accounted for.
    pub async fn update(&self, lot_id: Uuid, input: UpdatePurchaseInput) -> AppResult<PurchaseLot> {
        validate_quantities(input.total_weight_kg, input.total_pieces, input.cost_per_kg)?;
        ensure_vendor_exists(&self.db, input.vendor_id).await?;

        // First read only locates the category; the reconciling read happens
        // under the category lock so a concurrent allocation cannot slip in
        // between read and write.
        let category_id = self.get(lot_id).await?.main_category_id;
        let lock = self.ledger.category_lock(category_id);
        let _guard = lock.lock().await;

        let mut lot = self.get(lot_id).await?;

        reconcile_totals(
            &mut lot,
            input.total_weight_kg,
            input.total_pieces,
            input.cost_per_kg,
        )?;

        lot.vendor_id = input.vendor_id;
        if let Some(date) = input.purchase_date {
            lot.purchase_date = date;
        }
        lot.notes = input.notes;

        sqlx::query(
            r#"
            UPDATE inventory_purchases
            SET vendor_id = $1, purchase_date = $2, total_weight_kg = $3, total_pieces = $4,
                remaining_weight_kg = $5, remaining_pieces = $6, cost_per_kg = $7,
                total_cost = $8, notes = $9
            WHERE id = $10
            "#,
        )
        .bind(lot.vendor_id)
        .bind(lot.purchase_date)
        .bind(lot.total_weight_kg)
        .bind(lot.total_pieces)
        .bind(lot.remaining_weight_kg)
        .bind(lot.remaining_pieces)
        .bind(lot.cost_per_kg)
        .bind(lot.total_cost)
        .bind(&lot.notes)
        .bind(lot_id)
        .execute(&self.db)
        .await?;

        Ok(lot)
    }

    /// Delete a purchase lot. Only untouched lots can go: removing a
    /// partially-consumed lot would corrupt recorded consumption history.
    pub async fn delete(&self, lot_id: Uuid) -> AppResult<()> {
        let category_id = self.get(lot_id).await?.main_category_id;
        let lock = self.ledger.category_lock(category_id);
        let _guard = lock.lock().await;

        // Re-read under the lock: the untouched check must not pass on a
        // stale snapshot while an allocation is in flight.
        let lot = self.get(lot_id).await?;

        if !lot.is_untouched() {
            return Err(AppError::Conflict {
                resource: "purchase".to_string(),
                message: format!(
                    "Lot has been drawn on ({} of {} kg remaining); it cannot be deleted",
                    lot.remaining_weight_kg, lot.total_weight_kg
                ),
            });
        }

        sqlx::query("DELETE FROM inventory_purchases WHERE id = $1")
            .bind(lot_id)
            .execute(&self.db)
            .await?;

        Ok(())
    }
}
