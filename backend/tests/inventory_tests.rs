//! Inventory summary tests
//!
//! Tests for low-stock classification and the shop-local day windows used
//! by the waste and dashboard summaries.

use chrono::{NaiveDate, TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use shared::business_day::{day_start_utc, local_date, month_start_utc, window_start};
use shared::models::{AlertLevel, StockThresholds};

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn thresholds() -> StockThresholds {
    StockThresholds::default()
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Comfortable stock carries no alert
    #[test]
    fn test_healthy_stock_is_unflagged() {
        assert_eq!(thresholds().classify(dec("15")), None);
        assert!(!thresholds().is_low_stock(dec("15")));
    }

    /// Below 10kg warns, below 5kg is critical
    #[test]
    fn test_default_threshold_bands() {
        assert_eq!(thresholds().classify(dec("7")), Some(AlertLevel::Warning));
        assert_eq!(thresholds().classify(dec("4.5")), Some(AlertLevel::Critical));
        assert_eq!(thresholds().classify(Decimal::ZERO), Some(AlertLevel::Critical));
    }

    /// Thresholds are exclusive: exactly-at-threshold stays in the milder band
    #[test]
    fn test_threshold_boundaries() {
        assert_eq!(thresholds().classify(dec("10")), None);
        assert_eq!(thresholds().classify(dec("5")), Some(AlertLevel::Warning));
    }

    /// Custom thresholds move the bands
    #[test]
    fn test_custom_thresholds() {
        let custom = StockThresholds {
            warning_kg: dec("20"),
            critical_kg: dec("8"),
        };
        assert_eq!(custom.classify(dec("15")), Some(AlertLevel::Warning));
        assert_eq!(custom.classify(dec("7.99")), Some(AlertLevel::Critical));
    }

    /// An evening UTC instant already belongs to the next shop-local day
    #[test]
    fn test_shop_day_rolls_over_before_utc() {
        let late_evening = Utc.with_ymd_and_hms(2025, 6, 1, 19, 30, 0).unwrap();
        assert_eq!(
            local_date(late_evening),
            NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()
        );
    }

    /// "Today" for the dashboard starts at shop-local midnight, not UTC
    #[test]
    fn test_dashboard_day_window() {
        let day = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        assert_eq!(
            day_start_utc(day),
            Utc.with_ymd_and_hms(2025, 6, 1, 18, 30, 0).unwrap()
        );
    }

    /// The month window starts at the first of the shop-local month
    #[test]
    fn test_dashboard_month_window() {
        let day = NaiveDate::from_ymd_opt(2025, 6, 17).unwrap();
        assert_eq!(
            month_start_utc(day),
            Utc.with_ymd_and_hms(2025, 5, 31, 18, 30, 0).unwrap()
        );
    }

    /// A 7-day trailing window includes today and the six days before
    #[test]
    fn test_waste_week_window() {
        let day = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
        assert_eq!(
            window_start(day, 7),
            NaiveDate::from_ymd_opt(2025, 6, 4).unwrap()
        );
    }
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// Classification is monotone: less stock is never a milder alert
    #[test]
    fn prop_classification_is_monotone(a in 0u32..=3_000, b in 0u32..=3_000) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let lo = Decimal::from(lo) / dec("100");
        let hi = Decimal::from(hi) / dec("100");

        let rank = |level: Option<AlertLevel>| match level {
            Some(AlertLevel::Critical) => 2,
            Some(AlertLevel::Warning) => 1,
            None => 0,
        };

        prop_assert!(rank(thresholds().classify(lo)) >= rank(thresholds().classify(hi)));
    }

    /// low_stock agrees with classify
    #[test]
    fn prop_low_stock_matches_classification(centikg in 0u32..=3_000) {
        let total = Decimal::from(centikg) / dec("100");
        prop_assert_eq!(
            thresholds().is_low_stock(total),
            thresholds().classify(total).is_some()
        );
    }

    /// Every UTC instant lands inside the day window its local date implies
    #[test]
    fn prop_instant_within_its_day_window(secs in 0i64..=86_399, day_offset in 0i64..=365) {
        let base = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let instant = base + chrono::Duration::days(day_offset) + chrono::Duration::seconds(secs);

        let day = local_date(instant);
        let start = day_start_utc(day);
        let end = day_start_utc(day + chrono::Duration::days(1));

        prop_assert!(instant >= start);
        prop_assert!(instant < end);
    }
}
