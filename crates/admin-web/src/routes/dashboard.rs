//! Dashboard routes.

use askama::Template;
use axum::extract::{Query, State};
use axum::Json;
use chrono::{Duration, Local, NaiveDate};
use honors_core::{upcoming_anniversaries, Anniversary, AnniversaryKind, EditorController};
use tracing::warn;

use crate::error::Result;
use crate::routes::honors::{resolve_date, DateQuery};
use crate::state::AppState;
use crate::views::{honor_rows, reading_summary, HonorRow, ReadingSummary};

/// Days covered by the anniversaries widget, starting at the selected date.
const ANNIVERSARY_WINDOW_DAYS: u32 = 7;

/// Weeks of upcoming assigned dates listed on the dashboard.
const UPCOMING_WEEKS: i64 = 8;

/// Dashboard page template.
#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub date: String,
    pub previous_week: String,
    pub next_week: String,
    pub reading: Option<ReadingSummary>,
    pub readings_error: Option<String>,
    pub rows: Vec<HonorRow>,
    pub anniversaries: Vec<AnniversaryView>,
    pub anniversaries_error: Option<String>,
    pub upcoming: Vec<UpcomingDate>,
    pub upcoming_error: Option<String>,
}

/// An anniversary as the widget shows it.
#[derive(Debug, Clone)]
pub struct AnniversaryView {
    pub name: String,
    pub kind: &'static str,
    /// Month and day, e.g. "June 9".
    pub day: String,
}

impl From<&Anniversary> for AnniversaryView {
    fn from(anniversary: &Anniversary) -> Self {
        let kind = match anniversary.kind {
            AnniversaryKind::Wedding => "Wedding",
            AnniversaryKind::Bnai => "B'nai Mitzvah",
        };
        Self {
            name: anniversary.name.clone(),
            kind,
            day: anniversary.date.format("%B %-d").to_string(),
        }
    }
}

/// A date that already has members assigned.
#[derive(Debug, Clone)]
pub struct UpcomingDate {
    pub date: String,
    pub assigned: i64,
}

/// Render the dashboard page.
pub async fn dashboard_page(
    State(state): State<AppState>,
    Query(query): Query<DateQuery>,
) -> Result<DashboardTemplate> {
    let date = resolve_date(query.date.as_deref())?;

    let mut controller = EditorController::new(state.source(), date, state.member_search_limit);
    let (_, anniversaries, upcoming) = tokio::join!(
        controller.mount(),
        load_anniversaries(&state, date),
        load_upcoming(&state, date)
    );
    let editor = controller.editor();

    let (anniversaries, anniversaries_error) = split(anniversaries);
    let (upcoming, upcoming_error) = split(upcoming);

    Ok(DashboardTemplate {
        date: date.to_string(),
        previous_week: (date - Duration::days(7)).to_string(),
        next_week: (date + Duration::days(7)).to_string(),
        reading: reading_summary(editor),
        readings_error: editor.readings().error.clone(),
        rows: honor_rows(editor),
        anniversaries,
        anniversaries_error,
        upcoming,
        upcoming_error,
    })
}

/// Anniversaries in the week starting at `date` (default today) as JSON.
pub async fn anniversaries_api(
    State(state): State<AppState>,
    Query(query): Query<DateQuery>,
) -> Result<Json<Vec<Anniversary>>> {
    let date = match query.date.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
        Some(value) => honors_core::parse_iso_date(value)?,
        None => Local::now().date_naive(),
    };
    let all = database::anniversary::list_anniversaries(state.db.pool()).await?;
    Ok(Json(upcoming_anniversaries(&all, date, ANNIVERSARY_WINDOW_DAYS)))
}

async fn load_anniversaries(state: &AppState, date: NaiveDate) -> Result<Vec<AnniversaryView>> {
    let all = database::anniversary::list_anniversaries(state.db.pool()).await?;
    Ok(upcoming_anniversaries(&all, date, ANNIVERSARY_WINDOW_DAYS)
        .iter()
        .map(AnniversaryView::from)
        .collect())
}

async fn load_upcoming(state: &AppState, date: NaiveDate) -> Result<Vec<UpcomingDate>> {
    let until = date + Duration::weeks(UPCOMING_WEEKS);
    let dates = database::assignment::assigned_dates(state.db.pool(), date, until).await?;
    Ok(dates
        .into_iter()
        .map(|(date, assigned)| UpcomingDate { date, assigned })
        .collect())
}

/// A failed widget renders empty with its message.
fn split<T>(result: Result<Vec<T>>) -> (Vec<T>, Option<String>) {
    match result {
        Ok(values) => (values, None),
        Err(err) => {
            warn!(error = %err, "Dashboard widget failed to load");
            (Vec::new(), Some(err.message()))
        }
    }
}
