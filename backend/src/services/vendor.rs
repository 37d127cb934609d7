//! Vendor management service

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use shared::models::Vendor;
use shared::validation::validate_phone;

use crate::error::{AppError, AppResult};

/// Service for managing meat vendors
#[derive(Clone)]
pub struct VendorService {
    db: PgPool,
}

/// Input for creating or replacing a vendor
#[derive(Debug, Deserialize)]
pub struct VendorInput {
    pub name: String,
    pub contact_person: String,
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
}

type VendorRow = (
    Uuid,
    String,
    String,
    String,
    Option<String>,
    Option<String>,
    DateTime<Utc>,
);

fn to_vendor(row: VendorRow) -> Vendor {
    Vendor {
        id: row.0,
        name: row.1,
        contact_person: row.2,
        phone: row.3,
        email: row.4,
        address: row.5,
        created_at: row.6,
    }
}

fn validate_input(input: &VendorInput) -> AppResult<()> {
    if input.name.trim().is_empty() {
        return Err(AppError::Validation {
            field: "name".to_string(),
            message: "Vendor name cannot be empty".to_string(),
        });
    }
    validate_phone(&input.phone).map_err(|msg| AppError::Validation {
        field: "phone".to_string(),
        message: msg.to_string(),
    })
}

impl VendorService {
    /// Create a new VendorService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a vendor
    pub async fn create(&self, input: VendorInput) -> AppResult<Vendor> {
        validate_input(&input)?;

        let row = sqlx::query_as::<_, VendorRow>(
            r#"
            INSERT INTO vendors (name, contact_person, phone, email, address)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, contact_person, phone, email, address, created_at
            "#,
        )
        .bind(input.name.trim())
        .bind(&input.contact_person)
        .bind(&input.phone)
        .bind(&input.email)
        .bind(&input.address)
        .fetch_one(&self.db)
        .await?;

        Ok(to_vendor(row))
    }

    /// List all vendors
    pub async fn list(&self) -> AppResult<Vec<Vendor>> {
        let rows = sqlx::query_as::<_, VendorRow>(
            "SELECT id, name, contact_person, phone, email, address, created_at \
             FROM vendors ORDER BY name",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(to_vendor).collect())
    }

    /// Get a vendor by id
    pub async fn get(&self, vendor_id: Uuid) -> AppResult<Vendor> {
        let row = sqlx::query_as::<_, VendorRow>(
            "SELECT id, name, contact_person, phone, email, address, created_at \
             FROM vendors WHERE id = $1",
        )
        .bind(vendor_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Vendor".to_string()))?;

        Ok(to_vendor(row))
    }

    /// Replace a vendor's details
    pub async fn update(&self, vendor_id: Uuid, input: VendorInput) -> AppResult<Vendor> {
        validate_input(&input)?;
        self.get(vendor_id).await?;

        let row = sqlx::query_as::<_, VendorRow>(
            r#"
            UPDATE vendors
            SET name = $1, contact_person = $2, phone = $3, email = $4, address = $5
            WHERE id = $6
            RETURNING id, name, contact_person, phone, email, address, created_at
            "#,
        )
        .bind(input.name.trim())
        .bind(&input.contact_person)
        .bind(&input.phone)
        .bind(&input.email)
        .bind(&input.address)
        .bind(vendor_id)
        .fetch_one(&self.db)
        .await?;

        Ok(to_vendor(row))
    }

    /// Delete a vendor. Rejected while purchase lots reference it.
    pub async fn delete(&self, vendor_id: Uuid) -> AppResult<()> {
        self.get(vendor_id).await?;

        let purchase_count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM inventory_purchases WHERE vendor_id = $1",
        )
        .bind(vendor_id)
        .fetch_one(&self.db)
        .await?;

        if purchase_count > 0 {
            return Err(AppError::Conflict {
                resource: "vendor".to_string(),
                message: format!(
                    "Vendor has {} purchase lot(s) on record; cannot delete",
                    purchase_count
                ),
            });
        }

        sqlx::query("DELETE FROM vendors WHERE id = $1")
            .bind(vendor_id)
            .execute(&self.db)
            .await?;

        Ok(())
    }
}
