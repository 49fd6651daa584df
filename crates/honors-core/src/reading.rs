//! Liturgical reading data as served by the calendar service.

use std::fmt;

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::date::DateRange;

/// Verse range for a single honor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HonorMeta {
    /// Book or section name (e.g., "Numbers").
    pub k: String,
    /// Starting chapter:verse.
    pub b: String,
    /// Ending chapter:verse.
    pub e: String,
    /// Number of verses, when the calendar reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub v: Option<u32>,
}

impl HonorMeta {
    /// Create a verse range without a verse count.
    pub fn new(k: impl Into<String>, b: impl Into<String>, e: impl Into<String>) -> Self {
        Self {
            k: k.into(),
            b: b.into(),
            e: e.into(),
            v: None,
        }
    }

    /// Human-readable range, e.g. "Numbers 4:21-4:37".
    pub fn range(&self) -> String {
        format!("{} {}-{}", self.k, self.b, self.e)
    }
}

/// Honor key to verse range, in the order the calendar listed them.
///
/// Keys are never re-sorted: "1".."7" followed by "M" is whatever order
/// the upstream payload used.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HonorMap(IndexMap<String, HonorMeta>);

impl HonorMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an honor, keeping insertion order.
    pub fn insert(&mut self, key: impl Into<String>, meta: HonorMeta) {
        self.0.insert(key.into(), meta);
    }

    pub fn get(&self, key: &str) -> Option<&HonorMeta> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Honor keys in upstream order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &HonorMeta)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>> FromIterator<(K, HonorMeta)> for HonorMap {
    fn from_iter<I: IntoIterator<Item = (K, HonorMeta)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Display name of a reading.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadingName {
    pub en: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub he: Option<String>,
}

/// Triennial year label. The calendar sends either a number or text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum YearLabel {
    Number(u8),
    Text(String),
}

impl fmt::Display for YearLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            YearLabel::Number(n) => write!(f, "{}", n),
            YearLabel::Text(s) => f.write_str(s),
        }
    }
}

/// One calendar date's reading data. Read-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadingItem {
    /// Gregorian date of the reading.
    pub date: NaiveDate,
    /// Reading name (parsha or holiday).
    #[serde(default)]
    pub name: ReadingName,
    /// Hebrew date string (e.g., "11 Sivan 5785").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hdate: Option<String>,
    /// Free-text summary of the reading.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Weekday (Monday/Thursday) honors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekday: Option<HonorMap>,
    /// Full kriyah (Sabbath/holiday) honors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fullkriyah: Option<HonorMap>,
    /// Triennial-cycle partition of the reading.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub triennial: Option<HonorMap>,
    /// Which year of the triennial cycle this date falls in.
    #[serde(
        default,
        rename = "triYear",
        alias = "triennialYear",
        skip_serializing_if = "Option::is_none"
    )]
    pub tri_year: Option<YearLabel>,
}

impl ReadingItem {
    /// Create an item with only a date and English name.
    pub fn new(date: NaiveDate, name: impl Into<String>) -> Self {
        Self {
            date,
            name: ReadingName {
                en: name.into(),
                he: None,
            },
            hdate: None,
            summary: None,
            weekday: None,
            fullkriyah: None,
            triennial: None,
            tri_year: None,
        }
    }
}

/// Reading fetch state exposed to views: `{ items, range, loading, error }`.
///
/// Each request takes a generation number; results carrying an older
/// generation are dropped so a superseded request can never overwrite a
/// newer one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReadingsState {
    pub items: Vec<ReadingItem>,
    pub range: Option<DateRange>,
    pub loading: bool,
    pub error: Option<String>,
    #[serde(skip)]
    generation: u64,
}

impl ReadingsState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a request for `range`, returning its generation.
    ///
    /// Items from a different range are discarded; items for the same range
    /// stay visible until the new result arrives.
    pub fn begin(&mut self, range: DateRange) -> u64 {
        if self.range != Some(range) {
            self.items.clear();
        }
        self.range = Some(range);
        self.loading = true;
        self.error = None;
        self.generation += 1;
        self.generation
    }

    /// Apply the result of request `generation`.
    ///
    /// Returns false when the result was superseded and ignored. On failure
    /// the previous items are kept.
    pub fn finish(&mut self, generation: u64, result: Result<Vec<ReadingItem>, String>) -> bool {
        if generation != self.generation {
            return false;
        }
        self.loading = false;
        match result {
            Ok(items) => {
                self.items = items;
                self.error = None;
            }
            Err(message) => self.error = Some(message),
        }
        true
    }

    /// Current request generation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The item for `date`, if one was fetched.
    pub fn item_for(&self, date: NaiveDate) -> Option<&ReadingItem> {
        self.items.iter().find(|item| item.date == date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_honor_map_keeps_payload_order() {
        let json = r#"{
            "M": {"k": "Numbers", "b": "7:87", "e": "7:89"},
            "1": {"k": "Numbers", "b": "4:21", "e": "4:37", "v": 17},
            "2": {"k": "Numbers", "b": "4:38", "e": "4:49"}
        }"#;
        let map: HonorMap = serde_json::from_str(json).unwrap();
        let keys: Vec<&str> = map.keys().collect();
        assert_eq!(keys, vec!["M", "1", "2"]);
        assert_eq!(map.get("1").unwrap().v, Some(17));
    }

    #[test]
    fn test_reading_item_from_calendar_payload() {
        let json = r#"{
            "date": "2025-06-07",
            "hdate": "11 Sivan 5785",
            "name": {"en": "Nasso", "he": "נָשׂא"},
            "summary": "Numbers 4:21-7:89",
            "fullkriyah": {"1": {"k": "Numbers", "b": "4:21", "e": "4:37"}},
            "triennial": {"1": {"k": "Numbers", "b": "5:11", "e": "5:15"}},
            "triYear": 3,
            "parsha": ["Nasso"]
        }"#;
        let item: ReadingItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.date, date("2025-06-07"));
        assert_eq!(item.name.en, "Nasso");
        assert_eq!(item.hdate.as_deref(), Some("11 Sivan 5785"));
        assert!(item.weekday.is_none());
        assert_eq!(item.tri_year, Some(YearLabel::Number(3)));
        assert_eq!(item.tri_year.unwrap().to_string(), "3");
    }

    #[test]
    fn test_honor_meta_range() {
        let meta = HonorMeta::new("Numbers", "4:21", "4:37");
        assert_eq!(meta.range(), "Numbers 4:21-4:37");
    }

    #[test]
    fn test_readings_state_drops_superseded_result() {
        let mut state = ReadingsState::new();
        let first = state.begin(DateRange::single(date("2025-06-07")));
        let second = state.begin(DateRange::single(date("2025-06-14")));

        let stale = vec![ReadingItem::new(date("2025-06-07"), "Nasso")];
        assert!(!state.finish(first, Ok(stale)));
        assert!(state.loading);
        assert!(state.items.is_empty());

        let fresh = vec![ReadingItem::new(date("2025-06-14"), "Beha'alotcha")];
        assert!(state.finish(second, Ok(fresh)));
        assert!(!state.loading);
        assert_eq!(state.items.len(), 1);
    }

    #[test]
    fn test_readings_state_keeps_items_on_failure() {
        let day = date("2025-06-07");
        let mut state = ReadingsState::new();
        let generation = state.begin(DateRange::single(day));
        state.finish(generation, Ok(vec![ReadingItem::new(day, "Nasso")]));

        let generation = state.begin(DateRange::single(day));
        state.finish(generation, Err("HTTP 500".to_string()));

        assert_eq!(state.error.as_deref(), Some("HTTP 500"));
        assert!(state.item_for(day).is_some());
    }

    #[test]
    fn test_readings_state_clears_items_on_range_change() {
        let day = date("2025-06-07");
        let mut state = ReadingsState::new();
        let generation = state.begin(DateRange::single(day));
        state.finish(generation, Ok(vec![ReadingItem::new(day, "Nasso")]));

        state.begin(DateRange::single(date("2025-06-14")));
        assert!(state.items.is_empty());
    }
}
