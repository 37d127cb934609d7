//! POS sale models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::product::SaleUnit;

/// Accepted payment methods at the counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Card,
    Upi,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
            PaymentMethod::Upi => "upi",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "cash" => Some(PaymentMethod::Cash),
            "card" => Some(PaymentMethod::Card),
            "upi" => Some(PaymentMethod::Upi),
            _ => None,
        }
    }
}

/// One line of a POS sale. Quantities are stored in the dimension the ledger
/// deducts in: weight- and package-unit products record `quantity_kg`
/// (packages are converted at entry), piece-unit products record
/// `quantity_pieces`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleItem {
    pub derived_product_id: Uuid,
    pub derived_product_name: String,
    pub main_category_id: Uuid,
    pub sale_unit: SaleUnit,
    pub quantity_kg: Option<Decimal>,
    pub quantity_pieces: Option<i64>,
    pub selling_price: Decimal,
    pub total: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sale {
    pub id: Uuid,
    pub customer_id: Option<Uuid>,
    pub customer_name: Option<String>,
    pub items: Vec<SaleItem>,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
    pub payment_method: PaymentMethod,
    pub created_at: DateTime<Utc>,
}
