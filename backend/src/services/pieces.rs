//! Daily pieces tracking service
//!
//! For categories sold by the piece (birds, fish) the shop records one
//! pieces-sold figure per category per shop-local day. The figure is
//! deducted from the lots' piece counts; edits adjust by the delta and
//! deletes restore.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use shared::business_day::local_today;
use shared::ledger::StockDimension;
use shared::models::PiecesTracking;
use shared::validation::validate_non_negative_pieces;

use crate::error::{AppError, AppResult};
use crate::services::LedgerService;

/// Service for the one-per-day pieces-sold records
#[derive(Clone)]
pub struct PiecesService {
    db: PgPool,
    ledger: LedgerService,
}

/// Input for recording pieces sold. `date` defaults to the shop-local today.
#[derive(Debug, Deserialize)]
pub struct CreatePiecesInput {
    pub main_category_id: Uuid,
    pub pieces_sold: i64,
    pub date: Option<NaiveDate>,
}

/// Input for correcting a day's pieces-sold figure
#[derive(Debug, Deserialize)]
pub struct UpdatePiecesInput {
    pub pieces_sold: i64,
}

type PiecesRow = (
    Uuid,
    Uuid,
    NaiveDate,
    i64,
    chrono::DateTime<chrono::Utc>,
);

fn to_record(row: PiecesRow) -> PiecesTracking {
    PiecesTracking {
        id: row.0,
        main_category_id: row.1,
        date: row.2,
        pieces_sold: row.3,
        created_at: row.4,
    }
}

const PIECES_COLUMNS: &str = "id, main_category_id, date, pieces_sold, created_at";

fn validate_pieces(pieces_sold: i64) -> AppResult<()> {
    validate_non_negative_pieces(pieces_sold).map_err(|msg| AppError::Validation {
        field: "pieces_sold".to_string(),
        message: msg.to_string(),
    })
}

impl PiecesService {
    /// Create a new PiecesService instance
    pub fn new(db: PgPool, ledger: LedgerService) -> Self {
        Self { db, ledger }
    }

    /// Record pieces sold for a category on one day. A second record for
    /// the same category and day is a conflict; correct the existing one
    /// instead. A zero figure is a valid placeholder and touches no stock.
    pub async fn create(&self, input: CreatePiecesInput) -> AppResult<PiecesTracking> {
        validate_pieces(input.pieces_sold)?;
        let date = input.date.unwrap_or_else(local_today);

        let duplicate = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM pieces_tracking \
             WHERE main_category_id = $1 AND date = $2)",
        )
        .bind(input.main_category_id)
        .bind(date)
        .fetch_one(&self.db)
        .await?;

        if duplicate {
            return Err(AppError::Conflict {
                resource: "pieces_tracking".to_string(),
                message: format!(
                    "Pieces already recorded for this category on {}; edit that record",
                    date
                ),
            });
        }

        if input.pieces_sold > 0 {
            self.ledger
                .allocate(
                    input.main_category_id,
                    StockDimension::Pieces,
                    Decimal::from(input.pieces_sold),
                )
                .await?;
        } else {
            // Nothing to deduct, but the category must still exist.
            super::ledger::ensure_category_exists(&self.db, input.main_category_id).await?;
        }

        // Past this point the pieces are already deducted (unless the figure
        // was zero and nothing was allocated).
        let row = sqlx::query_as::<_, PiecesRow>(&format!(
            "INSERT INTO pieces_tracking (main_category_id, date, pieces_sold) \
             VALUES ($1, $2, $3) \
             RETURNING {PIECES_COLUMNS}"
        ))
        .bind(input.main_category_id)
        .bind(date)
        .bind(input.pieces_sold)
        .fetch_one(&self.db)
        .await
        .map_err(|err| {
            if input.pieces_sold == 0 {
                return AppError::DatabaseError(err);
            }
            tracing::error!(
                category_id = %input.main_category_id,
                pieces_sold = input.pieces_sold,
                error = %err,
                "pieces record write failed after ledger deduction; ledger is inconsistent"
            );
            AppError::LedgerInconsistency(format!(
                "{} piece(s) were deducted from stock but could not be recorded",
                input.pieces_sold
            ))
        })?;

        Ok(to_record(row))
    }

    /// Pieces history, most recent day first
    pub async fn list(&self) -> AppResult<Vec<PiecesTracking>> {
        let rows = sqlx::query_as::<_, PiecesRow>(&format!(
            "SELECT {PIECES_COLUMNS} FROM pieces_tracking ORDER BY date DESC, created_at DESC"
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(to_record).collect())
    }

    /// Get a pieces record by id
    pub async fn get(&self, record_id: Uuid) -> AppResult<PiecesTracking> {
        let row = sqlx::query_as::<_, PiecesRow>(&format!(
            "SELECT {PIECES_COLUMNS} FROM pieces_tracking WHERE id = $1"
        ))
        .bind(record_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Pieces record".to_string()))?;

        Ok(to_record(row))
    }

    /// Correct a day's figure. The ledger moves by the delta.
    pub async fn update(
        &self,
        record_id: Uuid,
        input: UpdatePiecesInput,
    ) -> AppResult<PiecesTracking> {
        validate_pieces(input.pieces_sold)?;
        let existing = self.get(record_id).await?;

        self.ledger
            .adjust(
                existing.main_category_id,
                StockDimension::Pieces,
                Decimal::from(existing.pieces_sold),
                Decimal::from(input.pieces_sold),
            )
            .await?;

        let row = sqlx::query_as::<_, PiecesRow>(&format!(
            "UPDATE pieces_tracking SET pieces_sold = $1 WHERE id = $2 \
             RETURNING {PIECES_COLUMNS}"
        ))
        .bind(input.pieces_sold)
        .bind(record_id)
        .fetch_one(&self.db)
        .await
        .map_err(|err| {
            if existing.pieces_sold == input.pieces_sold {
                return AppError::DatabaseError(err);
            }
            tracing::error!(
                %record_id,
                error = %err,
                "pieces record update failed after ledger adjustment; ledger is inconsistent"
            );
            AppError::LedgerInconsistency(format!(
                "Pieces record {} was adjusted in stock but could not be rewritten",
                record_id
            ))
        })?;

        Ok(to_record(row))
    }

    /// Delete a record, restoring its pieces to stock
    pub async fn delete(&self, record_id: Uuid) -> AppResult<()> {
        let existing = self.get(record_id).await?;

        if existing.pieces_sold > 0 {
            self.ledger
                .restore(
                    existing.main_category_id,
                    StockDimension::Pieces,
                    Decimal::from(existing.pieces_sold),
                )
                .await?;
        }

        sqlx::query("DELETE FROM pieces_tracking WHERE id = $1")
            .bind(record_id)
            .execute(&self.db)
            .await
            .map_err(|err| {
                if existing.pieces_sold == 0 {
                    return AppError::DatabaseError(err);
                }
                tracing::error!(
                    %record_id,
                    error = %err,
                    "pieces record delete failed after ledger restoration; ledger is inconsistent"
                );
                AppError::LedgerInconsistency(format!(
                    "Pieces record {} was restored to stock but could not be removed",
                    record_id
                ))
            })?;

        Ok(())
    }
}
