//! Daily waste tracking service
//!
//! Waste (trim, spoilage, bone-out loss) is recorded per category per
//! shop-local day and deducted from the ledger the same way a sale is.
//! Correcting a record moves the ledger by the delta; deleting one restores
//! the full recorded weight.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use shared::business_day::local_today;
use shared::ledger::StockDimension;
use shared::models::WasteRecord;
use shared::validation::validate_positive_weight;

use crate::error::{AppError, AppResult};
use crate::services::LedgerService;

/// Service for recording daily waste
#[derive(Clone)]
pub struct WasteService {
    db: PgPool,
    ledger: LedgerService,
}

/// Input for recording waste. `date` defaults to the shop-local today.
#[derive(Debug, Deserialize)]
pub struct CreateWasteInput {
    pub main_category_id: Uuid,
    pub waste_kg: Decimal,
    pub date: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// Input for correcting a waste record's weight or notes
#[derive(Debug, Deserialize)]
pub struct UpdateWasteInput {
    pub waste_kg: Decimal,
    pub notes: Option<String>,
}

type WasteRow = (
    Uuid,
    Uuid,
    NaiveDate,
    Decimal,
    Option<String>,
    chrono::DateTime<chrono::Utc>,
);

fn to_record(row: WasteRow) -> WasteRecord {
    WasteRecord {
        id: row.0,
        main_category_id: row.1,
        date: row.2,
        waste_kg: row.3,
        notes: row.4,
        created_at: row.5,
    }
}

const WASTE_COLUMNS: &str = "id, main_category_id, date, waste_kg, notes, created_at";

fn validate_weight(waste_kg: Decimal) -> AppResult<Decimal> {
    validate_positive_weight(waste_kg).map_err(|msg| AppError::Validation {
        field: "waste_kg".to_string(),
        message: msg.to_string(),
    })?;
    Ok(waste_kg.round_dp(2))
}

impl WasteService {
    /// Create a new WasteService instance
    pub fn new(db: PgPool, ledger: LedgerService) -> Self {
        Self { db, ledger }
    }

    /// Record waste for a category and deduct it from stock. Shortfalls are
    /// logged by the ledger service; the record is kept either way.
    pub async fn create(&self, input: CreateWasteInput) -> AppResult<WasteRecord> {
        let waste_kg = validate_weight(input.waste_kg)?;
        let date = input.date.unwrap_or_else(local_today);

        self.ledger
            .allocate(input.main_category_id, StockDimension::WeightKg, waste_kg)
            .await?;

        // The ledger is already deducted; a failed record write here leaves
        // it inconsistent with the waste history.
        let row = sqlx::query_as::<_, WasteRow>(&format!(
            "INSERT INTO waste_tracking (main_category_id, date, waste_kg, notes) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {WASTE_COLUMNS}"
        ))
        .bind(input.main_category_id)
        .bind(date)
        .bind(waste_kg)
        .bind(&input.notes)
        .fetch_one(&self.db)
        .await
        .map_err(|err| {
            tracing::error!(
                category_id = %input.main_category_id,
                %waste_kg,
                error = %err,
                "waste record write failed after ledger deduction; ledger is inconsistent"
            );
            AppError::LedgerInconsistency(format!(
                "Waste of {} kg was deducted from stock but could not be recorded",
                waste_kg
            ))
        })?;

        Ok(to_record(row))
    }

    /// Waste history, most recent day first
    pub async fn list(&self) -> AppResult<Vec<WasteRecord>> {
        let rows = sqlx::query_as::<_, WasteRow>(&format!(
            "SELECT {WASTE_COLUMNS} FROM waste_tracking ORDER BY date DESC, created_at DESC"
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(to_record).collect())
    }

    /// Get a waste record by id
    pub async fn get(&self, record_id: Uuid) -> AppResult<WasteRecord> {
        let row = sqlx::query_as::<_, WasteRow>(&format!(
            "SELECT {WASTE_COLUMNS} FROM waste_tracking WHERE id = $1"
        ))
        .bind(record_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Waste record".to_string()))?;

        Ok(to_record(row))
    }

    /// Correct a waste record. The ledger moves by the difference between
    /// the old and new weight.
    pub async fn update(&self, record_id: Uuid, input: UpdateWasteInput) -> AppResult<WasteRecord> {
        let new_kg = validate_weight(input.waste_kg)?;
        let existing = self.get(record_id).await?;

        self.ledger
            .adjust(
                existing.main_category_id,
                StockDimension::WeightKg,
                existing.waste_kg,
                new_kg,
            )
            .await?;

        let row = sqlx::query_as::<_, WasteRow>(&format!(
            "UPDATE waste_tracking SET waste_kg = $1, notes = $2 WHERE id = $3 \
             RETURNING {WASTE_COLUMNS}"
        ))
        .bind(new_kg)
        .bind(&input.notes)
        .bind(record_id)
        .fetch_one(&self.db)
        .await
        .map_err(|err| {
            if existing.waste_kg == new_kg {
                return AppError::DatabaseError(err);
            }
            tracing::error!(
                %record_id,
                error = %err,
                "waste record update failed after ledger adjustment; ledger is inconsistent"
            );
            AppError::LedgerInconsistency(format!(
                "Waste record {} was adjusted in stock but could not be rewritten",
                record_id
            ))
        })?;

        Ok(to_record(row))
    }

    /// Delete a waste record, restoring its full weight to stock
    pub async fn delete(&self, record_id: Uuid) -> AppResult<()> {
        let existing = self.get(record_id).await?;

        self.ledger
            .restore(
                existing.main_category_id,
                StockDimension::WeightKg,
                existing.waste_kg,
            )
            .await?;

        sqlx::query("DELETE FROM waste_tracking WHERE id = $1")
            .bind(record_id)
            .execute(&self.db)
            .await
            .map_err(|err| {
                tracing::error!(
                    %record_id,
                    error = %err,
                    "waste record delete failed after ledger restoration; ledger is inconsistent"
                );
                AppError::LedgerInconsistency(format!(
                    "Waste record {} was restored to stock but could not be removed",
                    record_id
                ))
            })?;

        Ok(())
    }
}
