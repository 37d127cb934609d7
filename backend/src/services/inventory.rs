//! Inventory summary service
//!
//! Read side of the ledger: per-category remaining stock with low-stock
//! classification, plus the waste figures the inventory screen shows
//! alongside (today and the trailing seven days, on the shop's clock).

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use shared::business_day::{local_today, window_start};
use shared::models::{CategorySummary, StockThresholds};

use crate::error::AppResult;

const WASTE_WINDOW_DAYS: i64 = 7;

/// Service for inventory summaries and low-stock checks
#[derive(Clone)]
pub struct InventoryService {
    db: PgPool,
    thresholds: StockThresholds,
}

/// Per-category waste totals for the inventory screen
#[derive(Debug, Serialize)]
pub struct WasteSummary {
    pub main_category_id: Uuid,
    pub main_category_name: String,
    pub date: NaiveDate,
    pub waste_today_kg: Decimal,
    pub waste_week_kg: Decimal,
}

type SummaryRow = (Uuid, String, Option<Decimal>, Option<i64>, i64);

/// Map an aggregate row to a summary. The SUM columns are NULL for a
/// category with no lots (or no piece-tracked lots); those report as zero.
fn to_summary(row: SummaryRow, thresholds: &StockThresholds) -> CategorySummary {
    let (id, name, weight, pieces, count) = row;
    let total_weight_kg = weight.unwrap_or(Decimal::ZERO);
    let alert_level = thresholds.classify(total_weight_kg);
    CategorySummary {
        main_category_id: id,
        main_category_name: name,
        total_weight_kg,
        total_pieces: pieces.unwrap_or(0),
        purchase_count: count,
        low_stock: alert_level.is_some(),
        alert_level,
    }
}

impl InventoryService {
    /// Create a new InventoryService instance
    pub fn new(db: PgPool, thresholds: StockThresholds) -> Self {
        Self { db, thresholds }
    }

    /// Remaining stock per category. Categories with no lots appear with
    /// zero totals so the screen shows every category the shop carries.
    pub async fn summarize(&self) -> AppResult<Vec<CategorySummary>> {
        let rows = sqlx::query_as::<_, SummaryRow>(
            r#"
            SELECT c.id, c.name,
                   SUM(p.remaining_weight_kg),
                   SUM(p.remaining_pieces)::BIGINT,
                   COUNT(p.id)
            FROM main_categories c
            LEFT JOIN inventory_purchases p ON p.main_category_id = c.id
            GROUP BY c.id, c.name
            ORDER BY c.name
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| to_summary(row, &self.thresholds))
            .collect())
    }

    /// Only the categories under their warning threshold
    pub async fn low_stock(&self) -> AppResult<Vec<CategorySummary>> {
        let summaries = self.summarize().await?;
        Ok(summaries.into_iter().filter(|s| s.low_stock).collect())
    }

    /// Waste recorded today and over the trailing week, per category
    pub async fn waste_summary(&self) -> AppResult<Vec<WasteSummary>> {
        let today = local_today();
        let week_start = window_start(today, WASTE_WINDOW_DAYS);

        let rows = sqlx::query_as::<_, (Uuid, String, Option<Decimal>, Option<Decimal>)>(
            r#"
            SELECT c.id, c.name,
                   SUM(w.waste_kg) FILTER (WHERE w.date = $1),
                   SUM(w.waste_kg) FILTER (WHERE w.date >= $2)
            FROM main_categories c
            LEFT JOIN waste_tracking w
              ON w.main_category_id = c.id AND w.date >= $2 AND w.date <= $1
            GROUP BY c.id, c.name
            ORDER BY c.name
            "#,
        )
        .bind(today)
        .bind(week_start)
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, name, today_kg, week_kg)| WasteSummary {
                main_category_id: id,
                main_category_name: name,
                date: today,
                waste_today_kg: today_kg.unwrap_or(Decimal::ZERO),
                waste_week_kg: week_kg.unwrap_or(Decimal::ZERO),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_summary_with_no_lots_reports_zero() {
        let row = (Uuid::new_v4(), "Chicken".to_string(), None, None, 0);

        let summary = to_summary(row, &StockThresholds::default());

        assert_eq!(summary.total_weight_kg, Decimal::ZERO);
        assert_eq!(summary.total_pieces, 0);
        assert_eq!(summary.purchase_count, 0);
        // Zero stock is critical, not hidden.
        assert!(summary.low_stock);
    }

    #[test]
    fn test_summary_with_weight_only_lots() {
        let row = (Uuid::new_v4(), "Mutton".to_string(), Some(dec("14.50")), None, 2);

        let summary = to_summary(row, &StockThresholds::default());

        assert_eq!(summary.total_weight_kg, dec("14.50"));
        assert_eq!(summary.total_pieces, 0);
        assert!(!summary.low_stock);
        assert_eq!(summary.alert_level, None);
    }
}
