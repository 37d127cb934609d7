//! Derived product model
//!
//! Derived products are the sellable cuts and packs under a main category
//! (e.g. "Chicken Curry Cut" under "Chicken"). The sale unit decides how a
//! POS line item translates into ledger deductions.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How a derived product is sold at the counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaleUnit {
    /// Sold by weight, quantity entered in kg
    Weight,
    /// Sold as fixed-weight packages, quantity entered in packages
    Package,
    /// Sold per piece, quantity entered as a piece count
    Pieces,
}

impl SaleUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            SaleUnit::Weight => "weight",
            SaleUnit::Package => "package",
            SaleUnit::Pieces => "pieces",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "weight" => Some(SaleUnit::Weight),
            "package" => Some(SaleUnit::Package),
            "pieces" => Some(SaleUnit::Pieces),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DerivedProduct {
    pub id: Uuid,
    pub main_category_id: Uuid,
    pub name: String,
    pub sku: String,
    pub selling_price: Decimal,
    pub sale_unit: SaleUnit,
    /// Weight of one package in kg; only set when `sale_unit` is `Package`.
    pub package_weight_kg: Option<Decimal>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
