//! Reading-cycle selection.

use serde::{Deserialize, Serialize};

use crate::reading::{HonorMap, ReadingItem};

/// Organization-level reading cycle setting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadingCycleConfig {
    /// Read the triennial partition instead of the full annual reading.
    pub triennial: bool,
}

impl ReadingCycleConfig {
    pub fn triennial() -> Self {
        Self { triennial: true }
    }

    pub fn annual() -> Self {
        Self { triennial: false }
    }
}

/// Which honor map of a reading item supplies the roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadingCycle {
    Triennial,
    FullKriyah,
    Weekday,
    None,
}

impl ReadingCycle {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReadingCycle::Triennial => "Triennial",
            ReadingCycle::FullKriyah => "Full kriyah",
            ReadingCycle::Weekday => "Weekday",
            ReadingCycle::None => "None",
        }
    }
}

/// Decide which honor map applies, first match wins:
///
/// 1. triennial, when configured and non-empty
/// 2. full kriyah, when present
/// 3. weekday, when present
///
/// No day-of-week classification happens here; the calendar decides which
/// maps a date carries.
pub fn select_cycle(item: &ReadingItem, config: ReadingCycleConfig) -> ReadingCycle {
    if config.triennial && item.triennial.as_ref().is_some_and(|m| !m.is_empty()) {
        ReadingCycle::Triennial
    } else if item.fullkriyah.is_some() {
        ReadingCycle::FullKriyah
    } else if item.weekday.is_some() {
        ReadingCycle::Weekday
    } else {
        ReadingCycle::None
    }
}

/// The honor map for `item` under `config`, or an empty map.
pub fn select_honor_map(item: &ReadingItem, config: ReadingCycleConfig) -> HonorMap {
    let selected = match select_cycle(item, config) {
        ReadingCycle::Triennial => item.triennial.as_ref(),
        ReadingCycle::FullKriyah => item.fullkriyah.as_ref(),
        ReadingCycle::Weekday => item.weekday.as_ref(),
        ReadingCycle::None => None,
    };
    selected.cloned().unwrap_or_default()
}
