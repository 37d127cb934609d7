//! Customer management service

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use shared::models::Customer;
use shared::validation::validate_phone;

use crate::error::{AppError, AppResult};

/// Service for managing walk-in and regular customers
#[derive(Clone)]
pub struct CustomerService {
    db: PgPool,
}

/// Input for creating or replacing a customer
#[derive(Debug, Deserialize)]
pub struct CustomerInput {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
}

type CustomerRow = (
    Uuid,
    String,
    String,
    Option<String>,
    Option<String>,
    Decimal,
    DateTime<Utc>,
);

fn to_customer(row: CustomerRow) -> Customer {
    Customer {
        id: row.0,
        name: row.1,
        phone: row.2,
        email: row.3,
        address: row.4,
        total_purchases: row.5,
        created_at: row.6,
    }
}

fn validate_input(input: &CustomerInput) -> AppResult<()> {
    if input.name.trim().is_empty() {
        return Err(AppError::Validation {
            field: "name".to_string(),
            message: "Customer name cannot be empty".to_string(),
        });
    }
    validate_phone(&input.phone).map_err(|msg| AppError::Validation {
        field: "phone".to_string(),
        message: msg.to_string(),
    })
}

impl CustomerService {
    /// Create a new CustomerService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a customer
    pub async fn create(&self, input: CustomerInput) -> AppResult<Customer> {
        validate_input(&input)?;

        let row = sqlx::query_as::<_, CustomerRow>(
            r#"
            INSERT INTO customers (name, phone, email, address)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, phone, email, address, total_purchases, created_at
            "#,
        )
        .bind(input.name.trim())
        .bind(&input.phone)
        .bind(&input.email)
        .bind(&input.address)
        .fetch_one(&self.db)
        .await?;

        Ok(to_customer(row))
    }

    /// List all customers
    pub async fn list(&self) -> AppResult<Vec<Customer>> {
        let rows = sqlx::query_as::<_, CustomerRow>(
            "SELECT id, name, phone, email, address, total_purchases, created_at \
             FROM customers ORDER BY name",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(to_customer).collect())
    }

    /// Get a customer by id
    pub async fn get(&self, customer_id: Uuid) -> AppResult<Customer> {
        let row = sqlx::query_as::<_, CustomerRow>(
            "SELECT id, name, phone, email, address, total_purchases, created_at \
             FROM customers WHERE id = $1",
        )
        .bind(customer_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Customer".to_string()))?;

        Ok(to_customer(row))
    }

    /// Replace a customer's details
    pub async fn update(&self, customer_id: Uuid, input: CustomerInput) -> AppResult<Customer> {
        validate_input(&input)?;
        self.get(customer_id).await?;

        let row = sqlx::query_as::<_, CustomerRow>(
            r#"
            UPDATE customers
            SET name = $1, phone = $2, email = $3, address = $4
            WHERE id = $5
            RETURNING id, name, phone, email, address, total_purchases, created_at
            "#,
        )
        .bind(input.name.trim())
        .bind(&input.phone)
        .bind(&input.email)
        .bind(&input.address)
        .bind(customer_id)
        .fetch_one(&self.db)
        .await?;

        Ok(to_customer(row))
    }

    /// Delete a customer. Past sales keep their snapshot of the customer
    /// name, so deletion is always allowed.
    pub async fn delete(&self, customer_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(customer_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Customer".to_string()));
        }

        Ok(())
    }
}
