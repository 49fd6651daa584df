//! Anniversaries shown alongside the honors summary.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Kind of anniversary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnniversaryKind {
    Wedding,
    Bnai,
}

impl AnniversaryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnniversaryKind::Wedding => "wedding",
            AnniversaryKind::Bnai => "bnai",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "wedding" => Some(AnniversaryKind::Wedding),
            "bnai" => Some(AnniversaryKind::Bnai),
            _ => None,
        }
    }
}

/// A display-only anniversary record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anniversary {
    pub id: i64,
    pub name: String,
    /// Original date of the event.
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: AnniversaryKind,
}

/// Anniversaries whose month and day fall within `days` days starting at `from`,
/// ordered by how soon they come up.
///
/// A February 29 date is observed on February 28 in common years.
pub fn upcoming_anniversaries(all: &[Anniversary], from: NaiveDate, days: u32) -> Vec<Anniversary> {
    let mut upcoming = Vec::new();
    for offset in 0..days {
        let day = from + Duration::days(offset as i64);
        for anniversary in all {
            if falls_on(anniversary.date, day) {
                upcoming.push(anniversary.clone());
            }
        }
    }
    upcoming
}

fn falls_on(original: NaiveDate, day: NaiveDate) -> bool {
    let (month, dom) = (original.month(), original.day());
    if month == 2 && dom == 29 && NaiveDate::from_ymd_opt(day.year(), 2, 29).is_none() {
        return day.month() == 2 && day.day() == 28;
    }
    day.month() == month && day.day() == dom
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anniversary(id: i64, date: &str, kind: AnniversaryKind) -> Anniversary {
        Anniversary {
            id,
            name: format!("Family {}", id),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            kind,
        }
    }

    #[test]
    fn test_upcoming_within_window_in_order() {
        let all = vec![
            anniversary(1, "1990-06-10", AnniversaryKind::Wedding),
            anniversary(2, "2012-06-07", AnniversaryKind::Bnai),
            anniversary(3, "2001-07-01", AnniversaryKind::Wedding),
        ];
        let from = NaiveDate::from_ymd_opt(2025, 6, 7).unwrap();

        let ids: Vec<i64> = upcoming_anniversaries(&all, from, 7)
            .iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn test_upcoming_wraps_year_end() {
        let all = vec![anniversary(1, "1980-01-02", AnniversaryKind::Wedding)];
        let from = NaiveDate::from_ymd_opt(2025, 12, 29).unwrap();
        assert_eq!(upcoming_anniversaries(&all, from, 7).len(), 1);
    }

    #[test]
    fn test_leap_day_observed_on_feb_28() {
        let all = vec![anniversary(1, "2000-02-29", AnniversaryKind::Bnai)];
        let from = NaiveDate::from_ymd_opt(2025, 2, 28).unwrap();
        assert_eq!(upcoming_anniversaries(&all, from, 1).len(), 1);

        let leap = NaiveDate::from_ymd_opt(2028, 2, 28).unwrap();
        assert!(upcoming_anniversaries(&all, leap, 1).is_empty());
    }

    #[test]
    fn test_kind_wire_name() {
        let json = serde_json::to_value(anniversary(4, "2010-03-03", AnniversaryKind::Bnai)).unwrap();
        assert_eq!(json["type"], "bnai");
        assert_eq!(AnniversaryKind::parse("wedding"), Some(AnniversaryKind::Wedding));
        assert_eq!(AnniversaryKind::parse("birthday"), None);
    }
}
