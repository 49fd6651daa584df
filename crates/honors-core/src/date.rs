//! Date helpers.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::HonorsError;

/// Inclusive date range `{start, end}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// A range covering exactly one day.
    pub fn single(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Parse an ISO `YYYY-MM-DD` date.
pub fn parse_iso_date(value: &str) -> Result<NaiveDate, HonorsError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| HonorsError::InvalidDate(value.to_string()))
}

/// The Saturday after `today`. A Saturday maps to the following week, never itself.
pub fn next_saturday(today: NaiveDate) -> NaiveDate {
    let from_sunday = today.weekday().num_days_from_sunday() as i64;
    let target = Weekday::Sat.num_days_from_sunday() as i64;
    let mut ahead = (target - from_sunday).rem_euclid(7);
    if ahead == 0 {
        ahead = 7;
    }
    today + Duration::days(ahead)
}

/// [`next_saturday`] formatted as `YYYY-MM-DD`.
pub fn next_saturday_iso(today: NaiveDate) -> String {
    next_saturday(today).format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_saturday_from_wednesday() {
        let wednesday = parse_iso_date("2025-06-04").unwrap();
        assert_eq!(next_saturday_iso(wednesday), "2025-06-07");
    }

    #[test]
    fn test_next_saturday_from_saturday_skips_a_week() {
        let saturday = parse_iso_date("2025-06-07").unwrap();
        assert_eq!(next_saturday_iso(saturday), "2025-06-14");
    }

    #[test]
    fn test_next_saturday_from_sunday_and_friday() {
        let sunday = parse_iso_date("2025-06-08").unwrap();
        assert_eq!(next_saturday_iso(sunday), "2025-06-14");
        let friday = parse_iso_date("2025-06-13").unwrap();
        assert_eq!(next_saturday_iso(friday), "2025-06-14");
    }

    #[test]
    fn test_next_saturday_crosses_year() {
        let wednesday = parse_iso_date("2025-12-31").unwrap();
        assert_eq!(next_saturday_iso(wednesday), "2026-01-03");
    }

    #[test]
    fn test_parse_iso_date_rejects_garbage() {
        assert_eq!(
            parse_iso_date("06/07/2025"),
            Err(HonorsError::InvalidDate("06/07/2025".to_string()))
        );
        assert!(parse_iso_date(" 2025-06-07 ").is_ok());
    }

    #[test]
    fn test_date_range_single() {
        let day = parse_iso_date("2025-06-07").unwrap();
        let range = DateRange::single(day);
        assert!(range.contains(day));
        assert!(!range.contains(day.succ_opt().unwrap()));
    }
}
