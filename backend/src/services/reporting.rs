//! Dashboard reporting service
//!
//! Aggregates the landing-page numbers: today's and this month's sales on
//! the shop's clock, counts of the catalog, low-stock alerts, and the five
//! most recent sales.

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;

use shared::business_day::{day_start_utc, local_today, month_start_utc};
use shared::models::{CategorySummary, Sale};

use crate::error::AppResult;
use crate::services::sale::load_sales;
use crate::services::InventoryService;

const RECENT_SALES: i64 = 5;

/// Service computing dashboard statistics
#[derive(Clone)]
pub struct ReportingService {
    db: PgPool,
    inventory: InventoryService,
}

/// The dashboard payload
#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub today_sales_total: Decimal,
    pub today_sales_count: i64,
    pub month_sales_total: Decimal,
    pub customer_count: i64,
    pub product_count: i64,
    pub low_stock_categories: Vec<CategorySummary>,
    pub recent_sales: Vec<Sale>,
}

impl ReportingService {
    /// Create a new ReportingService instance
    pub fn new(db: PgPool, inventory: InventoryService) -> Self {
        Self { db, inventory }
    }

    /// Compute the dashboard numbers
    pub async fn dashboard(&self) -> AppResult<DashboardStats> {
        let today = local_today();
        let today_start = day_start_utc(today);
        let month_start = month_start_utc(today);

        let (today_sales_total, today_sales_count) =
            sqlx::query_as::<_, (Option<Decimal>, i64)>(
                "SELECT SUM(total), COUNT(*) FROM pos_sales WHERE created_at >= $1",
            )
            .bind(today_start)
            .fetch_one(&self.db)
            .await?;

        let month_sales_total = sqlx::query_scalar::<_, Option<Decimal>>(
            "SELECT SUM(total) FROM pos_sales WHERE created_at >= $1",
        )
        .bind(month_start)
        .fetch_one(&self.db)
        .await?;

        let customer_count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM customers")
            .fetch_one(&self.db)
            .await?;

        let product_count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM derived_products")
            .fetch_one(&self.db)
            .await?;

        let low_stock_categories = self.inventory.low_stock().await?;
        let recent_sales = load_sales(&self.db, Some(RECENT_SALES)).await?;

        Ok(DashboardStats {
            today_sales_total: today_sales_total.unwrap_or(Decimal::ZERO),
            today_sales_count,
            month_sales_total: month_sales_total.unwrap_or(Decimal::ZERO),
            customer_count,
            product_count,
            low_stock_categories,
            recent_sales,
        })
    }
}
