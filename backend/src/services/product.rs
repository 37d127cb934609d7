//! Derived product management service
//!
//! Derived products are the sellable items under a main category. Their
//! sale unit drives how POS line items are converted into ledger deductions
//! (weight in kg, fixed-weight packages, or piece counts).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use shared::models::{DerivedProduct, SaleUnit};
use shared::validation::{validate_non_negative_amount, validate_sku};

use crate::error::{AppError, AppResult};
use crate::services::ledger::ensure_category_exists;

/// Service for managing derived products
#[derive(Clone)]
pub struct ProductService {
    db: PgPool,
}

/// Input for creating or replacing a derived product
#[derive(Debug, Deserialize)]
pub struct ProductInput {
    pub main_category_id: Uuid,
    pub name: String,
    pub sku: String,
    pub selling_price: Decimal,
    pub sale_unit: SaleUnit,
    pub package_weight_kg: Option<Decimal>,
    pub description: Option<String>,
}

type ProductRow = (
    Uuid,
    Uuid,
    String,
    String,
    Decimal,
    String,
    Option<Decimal>,
    Option<String>,
    DateTime<Utc>,
    DateTime<Utc>,
);

fn to_product(row: ProductRow) -> AppResult<DerivedProduct> {
    let sale_unit = SaleUnit::from_str(&row.5).ok_or_else(|| {
        AppError::ValidationError(format!("Unknown sale unit '{}' stored for product", row.5))
    })?;

    Ok(DerivedProduct {
        id: row.0,
        main_category_id: row.1,
        name: row.2,
        sku: row.3,
        selling_price: row.4,
        sale_unit,
        package_weight_kg: row.6,
        description: row.7,
        created_at: row.8,
        updated_at: row.9,
    })
}

const PRODUCT_COLUMNS: &str = "id, main_category_id, name, sku, selling_price, sale_unit, \
     package_weight_kg, description, created_at, updated_at";

/// Normalize and validate a product input. Returns the package weight to
/// store: present iff the product is package-sold.
fn validate_input(input: &ProductInput) -> AppResult<Option<Decimal>> {
    if input.name.trim().is_empty() {
        return Err(AppError::Validation {
            field: "name".to_string(),
            message: "Product name cannot be empty".to_string(),
        });
    }
    validate_sku(&input.sku).map_err(|msg| AppError::Validation {
        field: "sku".to_string(),
        message: msg.to_string(),
    })?;
    validate_non_negative_amount(input.selling_price).map_err(|msg| AppError::Validation {
        field: "selling_price".to_string(),
        message: msg.to_string(),
    })?;

    match input.sale_unit {
        SaleUnit::Package => match input.package_weight_kg {
            Some(w) if w > Decimal::ZERO => Ok(Some(w)),
            _ => Err(AppError::Validation {
                field: "package_weight_kg".to_string(),
                message: "Package-sold products need a positive package weight".to_string(),
            }),
        },
        // Ignore a stray package weight on other units.
        _ => Ok(None),
    }
}

impl ProductService {
    /// Create a new ProductService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a derived product under an existing category
    pub async fn create(&self, input: ProductInput) -> AppResult<DerivedProduct> {
        let package_weight = validate_input(&input)?;
        ensure_category_exists(&self.db, input.main_category_id).await?;

        let duplicate = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM derived_products WHERE sku = $1)",
        )
        .bind(&input.sku)
        .fetch_one(&self.db)
        .await?;

        if duplicate {
            return Err(AppError::Conflict {
                resource: "sku".to_string(),
                message: format!("A product with SKU '{}' already exists", input.sku),
            });
        }

        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "INSERT INTO derived_products \
             (main_category_id, name, sku, selling_price, sale_unit, package_weight_kg, description) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(input.main_category_id)
        .bind(input.name.trim())
        .bind(&input.sku)
        .bind(input.selling_price)
        .bind(input.sale_unit.as_str())
        .bind(package_weight)
        .bind(&input.description)
        .fetch_one(&self.db)
        .await?;

        to_product(row)
    }

    /// List all derived products
    pub async fn list(&self) -> AppResult<Vec<DerivedProduct>> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM derived_products ORDER BY name"
        ))
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(to_product).collect()
    }

    /// List products under one category
    pub async fn list_by_category(&self, category_id: Uuid) -> AppResult<Vec<DerivedProduct>> {
        ensure_category_exists(&self.db, category_id).await?;

        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM derived_products \
             WHERE main_category_id = $1 ORDER BY name"
        ))
        .bind(category_id)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(to_product).collect()
    }

    /// Get a product by id
    pub async fn get(&self, product_id: Uuid) -> AppResult<DerivedProduct> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM derived_products WHERE id = $1"
        ))
        .bind(product_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        to_product(row)
    }

    /// Replace a product's details
    pub async fn update(&self, product_id: Uuid, input: ProductInput) -> AppResult<DerivedProduct> {
        let package_weight = validate_input(&input)?;
        ensure_category_exists(&self.db, input.main_category_id).await?;
        self.get(product_id).await?;

        let duplicate = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM derived_products WHERE sku = $1 AND id <> $2)",
        )
        .bind(&input.sku)
        .bind(product_id)
        .fetch_one(&self.db)
        .await?;

        if duplicate {
            return Err(AppError::Conflict {
                resource: "sku".to_string(),
                message: format!("A product with SKU '{}' already exists", input.sku),
            });
        }

        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "UPDATE derived_products \
             SET main_category_id = $1, name = $2, sku = $3, selling_price = $4, \
                 sale_unit = $5, package_weight_kg = $6, description = $7, updated_at = NOW() \
             WHERE id = $8 \
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(input.main_category_id)
        .bind(input.name.trim())
        .bind(&input.sku)
        .bind(input.selling_price)
        .bind(input.sale_unit.as_str())
        .bind(package_weight)
        .bind(&input.description)
        .bind(product_id)
        .fetch_one(&self.db)
        .await?;

        to_product(row)
    }

    /// Delete a product. Past sale items keep a snapshot of the product
    /// name, so deletion is always allowed.
    pub async fn delete(&self, product_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM derived_products WHERE id = $1")
            .bind(product_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Product".to_string()));
        }

        Ok(())
    }
}
