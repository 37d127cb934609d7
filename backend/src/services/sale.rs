//! POS sale service
//!
//! Records counter sales. Every line item is a consumption record against
//! the stock ledger: weight- and package-unit products deduct kilograms,
//! piece-unit products deduct piece counts. Deleting a sale restores each
//! line's recorded quantities before the record goes.

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use shared::ledger::StockDimension;
use shared::models::{PaymentMethod, Sale, SaleItem, SaleUnit};
use shared::validation::validate_non_negative_amount;

use crate::error::{AppError, AppResult};
use crate::services::{LedgerService, ProductService};

/// Service for recording and reading POS sales
#[derive(Clone)]
pub struct SaleService {
    db: PgPool,
    ledger: LedgerService,
}

/// Input for one POS line. `quantity` is interpreted per the product's sale
/// unit: kg for weight, number of packages for package, piece count for
/// pieces.
#[derive(Debug, Deserialize)]
pub struct SaleItemInput {
    pub derived_product_id: Uuid,
    pub quantity: Decimal,
}

/// Input for recording a sale
#[derive(Debug, Deserialize)]
pub struct CreateSaleInput {
    pub customer_id: Option<Uuid>,
    pub customer_name: Option<String>,
    pub items: Vec<SaleItemInput>,
    pub tax: Decimal,
    pub discount: Decimal,
    pub payment_method: PaymentMethod,
}

/// An allocation that came up short while booking a sale. Informational:
/// the sale is recorded regardless.
#[derive(Debug, Clone, Serialize)]
pub struct ShortfallReport {
    pub main_category_id: Uuid,
    pub dimension: StockDimension,
    pub requested: Decimal,
    pub shortfall: Decimal,
}

/// A recorded sale plus any stock shortfalls hit while booking it
#[derive(Debug, Serialize)]
pub struct CreateSaleResponse {
    #[serde(flatten)]
    pub sale: Sale,
    pub shortfalls: Vec<ShortfallReport>,
}

type SaleRow = (
    Uuid,
    Option<Uuid>,
    Option<String>,
    Decimal,
    Decimal,
    Decimal,
    Decimal,
    String,
    DateTime<Utc>,
);

type ItemRow = (
    Uuid,
    String,
    Uuid,
    String,
    Option<Decimal>,
    Option<i64>,
    Decimal,
    Decimal,
);

fn to_item(row: ItemRow) -> AppResult<SaleItem> {
    let sale_unit = SaleUnit::from_str(&row.3).ok_or_else(|| {
        AppError::ValidationError(format!("Unknown sale unit '{}' stored for sale item", row.3))
    })?;

    Ok(SaleItem {
        derived_product_id: row.0,
        derived_product_name: row.1,
        main_category_id: row.2,
        sale_unit,
        quantity_kg: row.4,
        quantity_pieces: row.5,
        selling_price: row.6,
        total: row.7,
    })
}

async fn load_items(db: &PgPool, sale_id: Uuid) -> AppResult<Vec<SaleItem>> {
    let rows = sqlx::query_as::<_, ItemRow>(
        "SELECT derived_product_id, derived_product_name, main_category_id, sale_unit, \
                quantity_kg, quantity_pieces, selling_price, total \
         FROM pos_sale_items WHERE sale_id = $1 ORDER BY position",
    )
    .bind(sale_id)
    .fetch_all(db)
    .await?;

    rows.into_iter().map(to_item).collect()
}

fn to_sale(row: SaleRow, items: Vec<SaleItem>) -> AppResult<Sale> {
    let payment_method = PaymentMethod::from_str(&row.7).ok_or_else(|| {
        AppError::ValidationError(format!("Unknown payment method '{}' stored for sale", row.7))
    })?;

    Ok(Sale {
        id: row.0,
        customer_id: row.1,
        customer_name: row.2,
        items,
        subtotal: row.3,
        tax: row.4,
        discount: row.5,
        total: row.6,
        payment_method,
        created_at: row.8,
    })
}

const SALE_COLUMNS: &str = "id, customer_id, customer_name, subtotal, tax, discount, total, \
     payment_method, created_at";

/// Load sales newest-first, optionally limited, items included. Shared with
/// the dashboard's recent-sales panel.
pub(crate) async fn load_sales(db: &PgPool, limit: Option<i64>) -> AppResult<Vec<Sale>> {
    let sql = match limit {
        Some(_) => format!(
            "SELECT {SALE_COLUMNS} FROM pos_sales ORDER BY created_at DESC LIMIT $1"
        ),
        None => format!("SELECT {SALE_COLUMNS} FROM pos_sales ORDER BY created_at DESC"),
    };

    let mut query = sqlx::query_as::<_, SaleRow>(&sql);
    if let Some(n) = limit {
        query = query.bind(n);
    }
    let rows = query.fetch_all(db).await?;

    let mut sales = Vec::with_capacity(rows.len());
    for row in rows {
        let items = load_items(db, row.0).await?;
        sales.push(to_sale(row, items)?);
    }
    Ok(sales)
}

impl SaleService {
    /// Create a new SaleService instance
    pub fn new(db: PgPool, ledger: LedgerService) -> Self {
        Self { db, ledger }
    }

    /// Record a sale and deduct every line from the stock ledger.
    ///
    /// Shortfalls do not fail the sale; they come back in the response and
    /// are logged by the ledger service.
    pub async fn create(&self, input: CreateSaleInput) -> AppResult<CreateSaleResponse> {
        if input.items.is_empty() {
            return Err(AppError::Validation {
                field: "items".to_string(),
                message: "A sale needs at least one item".to_string(),
            });
        }
        for (field, amount) in [("tax", input.tax), ("discount", input.discount)] {
            validate_non_negative_amount(amount).map_err(|msg| AppError::Validation {
                field: field.to_string(),
                message: msg.to_string(),
            })?;
        }

        // Resolve products and build the ledger plan before touching
        // anything (fail fast on bad input).
        let products = ProductService::new(self.db.clone());
        let mut items = Vec::with_capacity(input.items.len());
        for line in &input.items {
            if line.quantity <= Decimal::ZERO {
                return Err(AppError::Validation {
                    field: "quantity".to_string(),
                    message: "Item quantity must be greater than zero".to_string(),
                });
            }
            let product = products.get(line.derived_product_id).await?;

            let (quantity_kg, quantity_pieces) = match product.sale_unit {
                SaleUnit::Weight => (Some(line.quantity.round_dp(2)), None),
                SaleUnit::Package => {
                    // package_weight_kg is guaranteed present for
                    // package-sold products by the product service.
                    let per_package = product.package_weight_kg.ok_or_else(|| {
                        AppError::ValidationError(format!(
                            "Product '{}' is package-sold but has no package weight",
                            product.name
                        ))
                    })?;
                    (Some((line.quantity * per_package).round_dp(2)), None)
                }
                SaleUnit::Pieces => {
                    if !line.quantity.fract().is_zero() {
                        return Err(AppError::Validation {
                            field: "quantity".to_string(),
                            message: "Piece-sold products take whole-number quantities"
                                .to_string(),
                        });
                    }
                    (None, line.quantity.to_i64())
                }
            };

            items.push(SaleItem {
                derived_product_id: product.id,
                derived_product_name: product.name,
                main_category_id: product.main_category_id,
                sale_unit: product.sale_unit,
                quantity_kg,
                quantity_pieces,
                selling_price: product.selling_price,
                total: (line.quantity * product.selling_price).round_dp(2),
            });
        }

        // Resolve the customer up front as well.
        let customer_name = match input.customer_id {
            Some(customer_id) => {
                let name = sqlx::query_scalar::<_, String>(
                    "SELECT name FROM customers WHERE id = $1",
                )
                .bind(customer_id)
                .fetch_optional(&self.db)
                .await?
                .ok_or_else(|| AppError::NotFound("Customer".to_string()))?;
                Some(input.customer_name.clone().unwrap_or(name))
            }
            None => input.customer_name.clone(),
        };

        let subtotal: Decimal = items.iter().map(|i| i.total).sum();
        let total = (subtotal + input.tax - input.discount).round_dp(2);

        // Deduct every line from the ledger.
        let mut shortfalls = Vec::new();
        for item in &items {
            if let Some(kg) = item.quantity_kg {
                let outcome = self
                    .ledger
                    .allocate(item.main_category_id, StockDimension::WeightKg, kg)
                    .await?;
                if !outcome.fully_satisfied() {
                    shortfalls.push(ShortfallReport {
                        main_category_id: item.main_category_id,
                        dimension: StockDimension::WeightKg,
                        requested: outcome.requested,
                        shortfall: outcome.shortfall,
                    });
                }
            }
            if let Some(pieces) = item.quantity_pieces {
                if pieces > 0 {
                    let outcome = self
                        .ledger
                        .allocate(
                            item.main_category_id,
                            StockDimension::Pieces,
                            Decimal::from(pieces),
                        )
                        .await?;
                    if !outcome.fully_satisfied() {
                        shortfalls.push(ShortfallReport {
                            main_category_id: item.main_category_id,
                            dimension: StockDimension::Pieces,
                            requested: outcome.requested,
                            shortfall: outcome.shortfall,
                        });
                    }
                }
            }
        }

        let sale = Sale {
            id: Uuid::new_v4(),
            customer_id: input.customer_id,
            customer_name,
            items,
            subtotal,
            tax: input.tax,
            discount: input.discount,
            total,
            payment_method: input.payment_method,
            created_at: Utc::now(),
        };

        // The ledger is already deducted. If the record write fails now the
        // ledger and the sale history disagree; surface loudly.
        self.persist_sale(&sale).await.map_err(|err| {
            tracing::error!(
                sale_id = %sale.id,
                error = %err,
                "sale record write failed after ledger deduction; ledger is inconsistent"
            );
            AppError::LedgerInconsistency(format!(
                "Sale {} was deducted from stock but could not be recorded",
                sale.id
            ))
        })?;

        if let Some(customer_id) = sale.customer_id {
            sqlx::query(
                "UPDATE customers SET total_purchases = total_purchases + $1 WHERE id = $2",
            )
            .bind(sale.total)
            .bind(customer_id)
            .execute(&self.db)
            .await?;
        }

        Ok(CreateSaleResponse { sale, shortfalls })
    }

    async fn persist_sale(&self, sale: &Sale) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO pos_sales
                (id, customer_id, customer_name, subtotal, tax, discount, total,
                 payment_method, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(sale.id)
        .bind(sale.customer_id)
        .bind(&sale.customer_name)
        .bind(sale.subtotal)
        .bind(sale.tax)
        .bind(sale.discount)
        .bind(sale.total)
        .bind(sale.payment_method.as_str())
        .bind(sale.created_at)
        .execute(&self.db)
        .await?;

        for (position, item) in sale.items.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO pos_sale_items
                    (sale_id, position, derived_product_id, derived_product_name,
                     main_category_id, sale_unit, quantity_kg, quantity_pieces,
                     selling_price, total)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                "#,
            )
            .bind(sale.id)
            .bind(position as i32)
            .bind(item.derived_product_id)
            .bind(&item.derived_product_name)
            .bind(item.main_category_id)
            .bind(item.sale_unit.as_str())
            .bind(item.quantity_kg)
            .bind(item.quantity_pieces)
            .bind(item.selling_price)
            .bind(item.total)
            .execute(&self.db)
            .await?;
        }

        Ok(())
    }

    /// All sales, most recent first
    pub async fn list(&self) -> AppResult<Vec<Sale>> {
        load_sales(&self.db, None).await
    }

    /// Get one sale with its items
    pub async fn get(&self, sale_id: Uuid) -> AppResult<Sale> {
        let row = sqlx::query_as::<_, SaleRow>(&format!(
            "SELECT {SALE_COLUMNS} FROM pos_sales WHERE id = $1"
        ))
        .bind(sale_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Sale".to_string()))?;

        let items = load_items(&self.db, sale_id).await?;
        to_sale(row, items)
    }

    /// Delete a sale, restoring every line item's recorded quantities to the
    /// ledger first.
    pub async fn delete(&self, sale_id: Uuid) -> AppResult<()> {
        let sale = self.get(sale_id).await?;

        for item in &sale.items {
            if let Some(kg) = item.quantity_kg {
                self.ledger
                    .restore(item.main_category_id, StockDimension::WeightKg, kg)
                    .await?;
            }
            if let Some(pieces) = item.quantity_pieces {
                self.ledger
                    .restore(
                        item.main_category_id,
                        StockDimension::Pieces,
                        Decimal::from(pieces),
                    )
                    .await?;
            }
        }

        if let Some(customer_id) = sale.customer_id {
            sqlx::query(
                "UPDATE customers \
                 SET total_purchases = GREATEST(total_purchases - $1, 0) \
                 WHERE id = $2",
            )
            .bind(sale.total)
            .bind(customer_id)
            .execute(&self.db)
            .await?;
        }

        // Items cascade with the sale row.
        sqlx::query("DELETE FROM pos_sales WHERE id = $1")
            .bind(sale_id)
            .execute(&self.db)
            .await
            .map_err(|err| {
                tracing::error!(
                    %sale_id,
                    error = %err,
                    "sale delete failed after ledger restoration; ledger is inconsistent"
                );
                AppError::LedgerInconsistency(format!(
                    "Sale {} was restored to stock but could not be removed",
                    sale_id
                ))
            })?;

        Ok(())
    }
}
