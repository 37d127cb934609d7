//! Low-stock classification and per-category summaries

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default threshold below which a category is flagged low-stock (kg).
pub const DEFAULT_WARNING_KG: i64 = 10;

/// Default threshold below which a low-stock category is critical (kg).
pub const DEFAULT_CRITICAL_KG: i64 = 5;

/// Stock alert severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Warning,
    Critical,
}

impl AlertLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertLevel::Warning => "warning",
            AlertLevel::Critical => "critical",
        }
    }
}

/// Low-stock thresholds in kg of remaining weight.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StockThresholds {
    pub warning_kg: Decimal,
    pub critical_kg: Decimal,
}

impl Default for StockThresholds {
    fn default() -> Self {
        Self {
            warning_kg: Decimal::from(DEFAULT_WARNING_KG),
            critical_kg: Decimal::from(DEFAULT_CRITICAL_KG),
        }
    }
}

impl StockThresholds {
    /// Classify remaining weight against the thresholds. `None` means the
    /// category is adequately stocked.
    pub fn classify(&self, total_weight_kg: Decimal) -> Option<AlertLevel> {
        if total_weight_kg < self.critical_kg {
            Some(AlertLevel::Critical)
        } else if total_weight_kg < self.warning_kg {
            Some(AlertLevel::Warning)
        } else {
            None
        }
    }

    pub fn is_low_stock(&self, total_weight_kg: Decimal) -> bool {
        total_weight_kg < self.warning_kg
    }
}

/// Aggregated remaining stock for one main category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySummary {
    pub main_category_id: Uuid,
    pub main_category_name: String,
    pub total_weight_kg: Decimal,
    pub total_pieces: i64,
    pub purchase_count: i64,
    pub low_stock: bool,
    pub alert_level: Option<AlertLevel>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_classification_bands() {
        let t = StockThresholds::default();

        assert_eq!(t.classify(dec("4.5")), Some(AlertLevel::Critical));
        assert_eq!(t.classify(dec("7")), Some(AlertLevel::Warning));
        assert_eq!(t.classify(dec("15")), None);

        // Boundaries: exactly 5 is warning, exactly 10 is fine.
        assert_eq!(t.classify(dec("5")), Some(AlertLevel::Warning));
        assert_eq!(t.classify(dec("10")), None);
    }

    #[test]
    fn test_low_stock_flag() {
        let t = StockThresholds::default();

        assert!(t.is_low_stock(dec("9.99")));
        assert!(t.is_low_stock(dec("0")));
        assert!(!t.is_low_stock(dec("10")));
    }
}
