//! Shop-local calendar day helpers
//!
//! Daily tracking records and the dashboard's "today" cut-offs use the
//! shop's wall clock, not UTC. The original deployment runs on Indian
//! Standard Time, which has no daylight saving, so a fixed +05:30 offset is
//! exact.

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, TimeZone, Utc};

/// IST offset from UTC in seconds (+05:30).
pub const SHOP_UTC_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;

fn shop_offset() -> FixedOffset {
    FixedOffset::east_opt(SHOP_UTC_OFFSET_SECS).expect("offset within bounds")
}

/// The current calendar day on the shop's clock.
pub fn local_today() -> NaiveDate {
    local_date(Utc::now())
}

/// The shop-local calendar day a UTC instant falls on.
pub fn local_date(instant: DateTime<Utc>) -> NaiveDate {
    instant.with_timezone(&shop_offset()).date_naive()
}

/// UTC instant at which the given shop-local day begins.
pub fn day_start_utc(day: NaiveDate) -> DateTime<Utc> {
    let midnight = day.and_hms_opt(0, 0, 0).expect("midnight exists");
    shop_offset()
        .from_local_datetime(&midnight)
        .single()
        .expect("fixed offsets are unambiguous")
        .with_timezone(&Utc)
}

/// UTC instant at which the month containing the given shop-local day begins.
pub fn month_start_utc(day: NaiveDate) -> DateTime<Utc> {
    let first = day.with_day(1).expect("day 1 exists in every month");
    day_start_utc(first)
}

/// First day of the trailing window of `days` days ending on `day`
/// (inclusive on both ends).
pub fn window_start(day: NaiveDate, days: i64) -> NaiveDate {
    day - Duration::days(days - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_date_crosses_midnight_before_utc() {
        // 19:00 UTC is already the next day in IST (00:30).
        let instant = Utc.with_ymd_and_hms(2025, 3, 10, 19, 0, 0).unwrap();
        assert_eq!(local_date(instant), NaiveDate::from_ymd_opt(2025, 3, 11).unwrap());

        let earlier = Utc.with_ymd_and_hms(2025, 3, 10, 18, 0, 0).unwrap();
        assert_eq!(local_date(earlier), NaiveDate::from_ymd_opt(2025, 3, 10).unwrap());
    }

    #[test]
    fn test_day_start_utc() {
        let day = NaiveDate::from_ymd_opt(2025, 3, 11).unwrap();
        // IST midnight is 18:30 UTC the previous evening.
        assert_eq!(
            day_start_utc(day),
            Utc.with_ymd_and_hms(2025, 3, 10, 18, 30, 0).unwrap()
        );
    }

    #[test]
    fn test_window_start_is_inclusive() {
        let day = NaiveDate::from_ymd_opt(2025, 3, 11).unwrap();
        assert_eq!(
            window_start(day, 7),
            NaiveDate::from_ymd_opt(2025, 3, 5).unwrap()
        );
    }
}
