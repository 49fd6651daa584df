//! Application state shared across handlers.

use database::Database;
use honors_client::CalendarClient;

use crate::source::LocalSource;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Database connection.
    pub db: Database,
    /// Liturgical calendar client.
    pub calendar: CalendarClient,
    /// Members offered per honor dropdown.
    pub member_search_limit: usize,
    /// Triennial flag used until the setting is stored.
    pub triennial_default: bool,
}

impl AppState {
    /// Create new application state.
    pub fn new(
        db: Database,
        calendar: CalendarClient,
        member_search_limit: usize,
        triennial_default: bool,
    ) -> Self {
        Self {
            db,
            calendar,
            member_search_limit,
            triennial_default,
        }
    }

    /// Honors data backed by this server's database and calendar client.
    pub fn source(&self) -> LocalSource {
        LocalSource {
            db: self.db.clone(),
            calendar: self.calendar.clone(),
            triennial_default: self.triennial_default,
        }
    }
}
