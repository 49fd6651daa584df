//! Honors data source for pages rendered by this server.

use async_trait::async_trait;
use chrono::NaiveDate;
use database::{DatabaseError, Database};
use honors_client::CalendarClient;
use honors_core::{
    Assignment, DateRange, HonorsError, HonorsSource, MemberSummary, ReadingCycleConfig,
    ReadingItem,
};

/// Reads the calendar over HTTP and everything else straight from SQLite.
#[derive(Clone)]
pub struct LocalSource {
    pub db: Database,
    pub calendar: CalendarClient,
    pub triennial_default: bool,
}

fn store_error(service: &'static str, err: DatabaseError) -> HonorsError {
    match err {
        DatabaseError::Invalid(msg) => HonorsError::Rejected(msg),
        DatabaseError::NotFound { .. } => HonorsError::Rejected(err.to_string()),
        other => HonorsError::unavailable(service, other.to_string()),
    }
}

#[async_trait]
impl HonorsSource for LocalSource {
    async fn readings(&self, range: DateRange) -> Result<Vec<ReadingItem>, HonorsError> {
        self.calendar
            .readings(range)
            .await
            .map_err(|e| HonorsError::unavailable("calendar", e.to_string()))
    }

    async fn members(&self, limit: usize) -> Result<Vec<MemberSummary>, HonorsError> {
        let limit = u32::try_from(limit).unwrap_or(u32::MAX);
        let members = database::member::search_members(self.db.pool(), None, limit)
            .await
            .map_err(|e| store_error("member search", e))?;
        Ok(members.into_iter().map(MemberSummary::from).collect())
    }

    async fn reading_cycle(&self) -> Result<ReadingCycleConfig, HonorsError> {
        database::setting::reading_cycle(self.db.pool(), self.triennial_default)
            .await
            .map_err(|e| store_error("reading cycle", e))
    }

    async fn load_assignments(&self, date: NaiveDate) -> Result<Vec<Assignment>, HonorsError> {
        database::assignment::list_for_date(self.db.pool(), date)
            .await
            .map_err(|e| store_error("assignment store", e))
    }

    async fn save_assignments(
        &self,
        date: NaiveDate,
        assignments: &[Assignment],
    ) -> Result<(), HonorsError> {
        database::assignment::replace_for_date(self.db.pool(), date, assignments)
            .await
            .map_err(|e| store_error("assignment store", e))
    }
}
