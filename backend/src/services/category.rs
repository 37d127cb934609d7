//! Main category management service

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use shared::models::MainCategory;

use crate::error::{AppError, AppResult};

/// Service for managing main categories (product families)
#[derive(Clone)]
pub struct CategoryService {
    db: PgPool,
}

/// Input for creating a main category
#[derive(Debug, Deserialize)]
pub struct CreateCategoryInput {
    pub name: String,
    pub description: Option<String>,
}

/// Input for updating a main category
#[derive(Debug, Deserialize)]
pub struct UpdateCategoryInput {
    pub name: Option<String>,
    pub description: Option<String>,
}

type CategoryRow = (Uuid, String, Option<String>, DateTime<Utc>, DateTime<Utc>);

fn to_category(row: CategoryRow) -> MainCategory {
    MainCategory {
        id: row.0,
        name: row.1,
        description: row.2,
        created_at: row.3,
        updated_at: row.4,
    }
}

impl CategoryService {
    /// Create a new CategoryService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a main category
    pub async fn create(&self, input: CreateCategoryInput) -> AppResult<MainCategory> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(AppError::Validation {
                field: "name".to_string(),
                message: "Category name cannot be empty".to_string(),
            });
        }

        let row = sqlx::query_as::<_, CategoryRow>(
            r#"
            INSERT INTO main_categories (name, description)
            VALUES ($1, $2)
            RETURNING id, name, description, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(&input.description)
        .fetch_one(&self.db)
        .await?;

        Ok(to_category(row))
    }

    /// List all categories
    pub async fn list(&self) -> AppResult<Vec<MainCategory>> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            "SELECT id, name, description, created_at, updated_at \
             FROM main_categories ORDER BY name",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(to_category).collect())
    }

    /// Get a category by id
    pub async fn get(&self, category_id: Uuid) -> AppResult<MainCategory> {
        let row = sqlx::query_as::<_, CategoryRow>(
            "SELECT id, name, description, created_at, updated_at \
             FROM main_categories WHERE id = $1",
        )
        .bind(category_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Category".to_string()))?;

        Ok(to_category(row))
    }

    /// Rename or re-describe a category
    pub async fn update(
        &self,
        category_id: Uuid,
        input: UpdateCategoryInput,
    ) -> AppResult<MainCategory> {
        let existing = self.get(category_id).await?;

        let name = match &input.name {
            Some(n) if n.trim().is_empty() => {
                return Err(AppError::Validation {
                    field: "name".to_string(),
                    message: "Category name cannot be empty".to_string(),
                })
            }
            Some(n) => n.trim().to_string(),
            None => existing.name,
        };
        let description = input.description.or(existing.description);

        let row = sqlx::query_as::<_, CategoryRow>(
            r#"
            UPDATE main_categories
            SET name = $1, description = $2, updated_at = NOW()
            WHERE id = $3
            RETURNING id, name, description, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(description)
        .bind(category_id)
        .fetch_one(&self.db)
        .await?;

        Ok(to_category(row))
    }

    /// Delete a category. Rejected while derived products or purchase lots
    /// still reference it; removing those references first is on the caller.
    pub async fn delete(&self, category_id: Uuid) -> AppResult<()> {
        self.get(category_id).await?;

        let product_count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM derived_products WHERE main_category_id = $1",
        )
        .bind(category_id)
        .fetch_one(&self.db)
        .await?;

        if product_count > 0 {
            return Err(AppError::Conflict {
                resource: "category".to_string(),
                message: format!(
                    "Category has {} derived product(s); delete them first",
                    product_count
                ),
            });
        }

        let purchase_count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM inventory_purchases WHERE main_category_id = $1",
        )
        .bind(category_id)
        .fetch_one(&self.db)
        .await?;

        if purchase_count > 0 {
            return Err(AppError::Conflict {
                resource: "category".to_string(),
                message: format!(
                    "Category has {} purchase lot(s); the stock ledger would be orphaned",
                    purchase_count
                ),
            });
        }

        sqlx::query("DELETE FROM main_categories WHERE id = $1")
            .bind(category_id)
            .execute(&self.db)
            .await?;

        Ok(())
    }
}
