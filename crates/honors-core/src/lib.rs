//! Core types and logic for Torah honors assignment.
//!
//! This crate provides the shared domain for the honors console. It defines:
//!
//! - [`ReadingItem`] / [`HonorMap`] - Liturgical reading data as served by the calendar
//! - [`select_honor_map`] - Picks the triennial, full kriyah or weekday honors for a date
//! - [`build_roster`] - Turns an honor map into ordered, labelled [`HonorSlot`]s
//! - [`HonorsEditor`] - Reducer-style state for the assignment editor
//! - [`HonorsSource`] - The data-access trait every backend implements
//! - [`EditorController`] - Drives an editor against a source
//!
//! # Example
//!
//! ```rust
//! use honors_core::{build_roster, select_honor_map, ReadingCycleConfig, ReadingItem};
//!
//! let item: ReadingItem = serde_json::from_str(r#"{
//!     "date": "2025-06-07",
//!     "name": {"en": "Nasso"},
//!     "fullkriyah": {
//!         "1": {"k": "Numbers", "b": "4:21", "e": "4:37"},
//!         "M": {"k": "Numbers", "b": "7:87", "e": "7:89"}
//!     }
//! }"#).unwrap();
//!
//! let map = select_honor_map(&item, ReadingCycleConfig::default());
//! let roster = build_roster(&map);
//! assert_eq!(roster[0].label, "Aliyah 1");
//! assert_eq!(roster[1].label, "Maftir");
//! ```

mod anniversary;
mod assignment;
mod controller;
mod cycle;
mod date;
mod editor;
mod error;
mod reading;
mod roster;
mod source;

pub use anniversary::{upcoming_anniversaries, Anniversary, AnniversaryKind};
pub use assignment::{Assignment, MemberSummary, SaveRequest, SaveResponse};
pub use controller::EditorController;
pub use cycle::{select_cycle, select_honor_map, ReadingCycle, ReadingCycleConfig};
pub use date::{next_saturday, next_saturday_iso, parse_iso_date, DateRange};
pub use editor::{EditorEvent, EditorStatus, HonorsEditor, Notice, NoticeKind, SAVED_NOTICE};
pub use error::HonorsError;
pub use reading::{HonorMap, HonorMeta, ReadingItem, ReadingName, ReadingsState, YearLabel};
pub use roster::{build_roster, honor_label, HonorSlot, MAFTIR_KEY};
pub use source::HonorsSource;

// Re-export async_trait for implementors of HonorsSource
pub use async_trait::async_trait;
