//! Data-access trait for honors backends.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::assignment::{Assignment, MemberSummary};
use crate::cycle::ReadingCycleConfig;
use crate::date::DateRange;
use crate::error::HonorsError;
use crate::reading::ReadingItem;

/// Everything the assignment editor reads and writes.
///
/// Implemented over HTTP by `honors-client` and over the local database by
/// the admin web server. Every operation returns a `Result`; deciding how a
/// failure degrades is the caller's job.
#[async_trait]
pub trait HonorsSource: Send + Sync {
    /// Reading items for an inclusive date range.
    async fn readings(&self, range: DateRange) -> Result<Vec<ReadingItem>, HonorsError>;

    /// Member search results, at most `limit`.
    async fn members(&self, limit: usize) -> Result<Vec<MemberSummary>, HonorsError>;

    /// The organization's reading cycle setting.
    async fn reading_cycle(&self) -> Result<ReadingCycleConfig, HonorsError>;

    /// Saved assignments for a date.
    async fn load_assignments(&self, date: NaiveDate) -> Result<Vec<Assignment>, HonorsError>;

    /// Replace every assignment for `date` with `assignments`.
    async fn save_assignments(
        &self,
        date: NaiveDate,
        assignments: &[Assignment],
    ) -> Result<(), HonorsError>;
}
