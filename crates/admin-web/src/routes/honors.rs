//! Honors editor page and the assignment REST endpoints.

use askama::Template;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::{Form, Json};
use chrono::{Duration, Local, NaiveDate};
use honors_core::{
    next_saturday, parse_iso_date, Assignment, EditorController, EditorStatus, HonorsEditor,
    SaveRequest, SaveResponse, SAVED_NOTICE,
};
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::{AdminError, Result};
use crate::source::LocalSource;
use crate::state::AppState;
use crate::views::{honor_rows, reading_summary, HonorRow, NoticeView, ReadingSummary};

/// Prefix of form fields that carry a member choice for an honor.
const HONOR_FIELD_PREFIX: &str = "honor.";

/// Query parameters for the editor page.
#[derive(Debug, Default, Deserialize)]
pub struct HonorsQuery {
    pub date: Option<String>,
    pub saved: Option<String>,
}

/// Query parameters carrying only a date.
#[derive(Debug, Default, Deserialize)]
pub struct DateQuery {
    pub date: Option<String>,
}

/// Honors editor page template.
#[derive(Template)]
#[template(path = "honors.html")]
pub struct HonorsTemplate {
    pub date: String,
    pub previous_week: String,
    pub next_week: String,
    pub reading: Option<ReadingSummary>,
    pub readings_error: Option<String>,
    pub members_error: Option<String>,
    pub rows: Vec<HonorRow>,
    pub notice: Option<NoticeView>,
    /// Inline message under the save button.
    pub error: Option<String>,
}

impl HonorsTemplate {
    /// Render the editor's current state.
    pub fn from_editor(editor: &HonorsEditor, saved: bool) -> Self {
        let date = editor.date();
        let notice = match editor.notice() {
            Some(notice) => Some(NoticeView::from(notice)),
            None if saved => Some(NoticeView {
                class: "toast-success",
                text: SAVED_NOTICE.to_string(),
            }),
            None => None,
        };
        let error = match editor.status() {
            EditorStatus::Error { message } => Some(message.clone()),
            _ => None,
        };

        Self {
            date: date.to_string(),
            previous_week: (date - Duration::days(7)).to_string(),
            next_week: (date + Duration::days(7)).to_string(),
            reading: reading_summary(editor),
            readings_error: editor.readings().error.clone(),
            members_error: editor.members_error().map(str::to_string),
            rows: honor_rows(editor),
            notice,
            error,
        }
    }
}

/// The requested date, or the upcoming Saturday when none is given.
pub(crate) fn resolve_date(value: Option<&str>) -> Result<NaiveDate> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(value) => Ok(parse_iso_date(value)?),
        None => Ok(next_saturday(Local::now().date_naive())),
    }
}

fn parse_member_id(honor: &str, value: &str) -> Result<Option<i64>> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse()
        .map(Some)
        .map_err(|_| AdminError::BadRequest(format!("Invalid member for {}: {}", honor, value)))
}

async fn load_editor(state: &AppState, date: NaiveDate) -> EditorController<LocalSource> {
    let mut controller = EditorController::new(state.source(), date, state.member_search_limit);
    controller.mount().await;
    controller
}

/// Render the honors editor for a date.
pub async fn honors_page(
    State(state): State<AppState>,
    Query(query): Query<HonorsQuery>,
) -> Result<HonorsTemplate> {
    let date = resolve_date(query.date.as_deref())?;
    let controller = load_editor(&state, date).await;
    let saved = query.saved.as_deref() == Some("1");
    Ok(HonorsTemplate::from_editor(controller.editor(), saved))
}

/// Save the submitted form as the complete assignment set for its date.
///
/// Redirects back to the editor on success. On failure the page is
/// re-rendered with the submitted choices and the store's message.
pub async fn save_form(
    State(state): State<AppState>,
    Form(fields): Form<Vec<(String, String)>>,
) -> Result<Response> {
    let date_field = fields
        .iter()
        .find(|(name, _)| name == "date")
        .map(|(_, value)| value.as_str())
        .ok_or_else(|| AdminError::BadRequest("Missing date".to_string()))?;
    let date = resolve_date(Some(date_field))?;

    let mut choices = Vec::new();
    for (name, value) in &fields {
        if let Some(honor) = name.strip_prefix(HONOR_FIELD_PREFIX) {
            choices.push((honor.to_string(), parse_member_id(honor, value)?));
        }
    }

    let mut controller = load_editor(&state, date).await;

    // Without readings there is no roster to save against.
    if controller.editor().readings().error.is_some() {
        warn!(date = %date, "Refusing to save honors while readings are unavailable");
        let mut page = HonorsTemplate::from_editor(controller.editor(), false);
        page.error = Some("Readings are unavailable, so honors were not saved".to_string());
        return Ok((StatusCode::SERVICE_UNAVAILABLE, page).into_response());
    }

    for (honor, member_id) in choices {
        controller.select_member(honor, member_id);
    }

    match controller.save().await {
        Ok(()) => Ok(Redirect::to(&format!("/honors?date={}&saved=1", date)).into_response()),
        Err(err) => {
            let status = AdminError::from(err).status();
            let page = HonorsTemplate::from_editor(controller.editor(), false);
            Ok((status, page).into_response())
        }
    }
}

/// Saved assignments for a date as JSON.
pub async fn list_api(
    State(state): State<AppState>,
    Query(query): Query<DateQuery>,
) -> Result<Json<Vec<Assignment>>> {
    let date = parse_iso_date(query.date.as_deref().unwrap_or_default())?;
    let assignments = database::assignment::list_for_date(state.db.pool(), date).await?;
    Ok(Json(assignments))
}

/// Replace every assignment for a date.
///
/// Answers `{success: true}`, or an error status with `{success: false, message}`.
pub async fn save_api(
    State(state): State<AppState>,
    Json(request): Json<SaveRequest>,
) -> Response {
    match database::assignment::replace_for_date(
        state.db.pool(),
        request.date,
        &request.assignments,
    )
    .await
    {
        Ok(()) => {
            info!(date = %request.date, honors = request.assignments.len(), "Honors saved via API");
            Json(SaveResponse::ok()).into_response()
        }
        Err(err) => {
            let err = AdminError::from(err);
            warn!(date = %request.date, error = %err, "Honors save rejected");
            (err.status(), Json(SaveResponse::failed(err.message()))).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::header::LOCATION;

    use super::*;
    use crate::state::test_support::{calendar_failing, calendar_serving, nasso, state_with_calendar};

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 7).unwrap()
    }

    fn query(date: &str) -> Query<HonorsQuery> {
        Query(HonorsQuery {
            date: Some(date.to_string()),
            saved: None,
        })
    }

    fn form(pairs: &[(&str, &str)]) -> Form<Vec<(String, String)>> {
        Form(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_parse_member_id() {
        assert_eq!(parse_member_id("1", "").unwrap(), None);
        assert_eq!(parse_member_id("1", " 5 ").unwrap(), Some(5));
        assert!(matches!(
            parse_member_id("1", "five"),
            Err(AdminError::BadRequest(_))
        ));
    }

    #[test]
    fn test_resolve_date_defaults_to_a_saturday() {
        use chrono::Datelike;
        let date = resolve_date(None).unwrap();
        assert_eq!(date.weekday(), chrono::Weekday::Sat);
        assert!(date > Local::now().date_naive());
        assert_eq!(resolve_date(Some("2025-06-07")).unwrap(), day());
        assert!(resolve_date(Some("06/07/2025")).is_err());
    }

    #[tokio::test]
    async fn test_page_lists_roster_with_members() {
        let calendar = calendar_serving(nasso()).await;
        let state = state_with_calendar(&calendar.uri()).await;
        database::member::create_member(state.db.pool(), "Sarah", "Levi", None)
            .await
            .unwrap();

        let page = honors_page(State(state), query("2025-06-07")).await.unwrap();
        assert_eq!(page.rows.len(), 3);
        assert_eq!(page.rows[2].label, "Maftir");
        assert_eq!(page.rows[0].options.len(), 1);

        let html = page.render().unwrap();
        assert!(html.contains("Nasso"));
        assert!(html.contains("Aliyah 1"));
        assert!(html.contains("Numbers 4:21-4:37"));
        assert!(html.contains("Sarah Levi"));
    }

    #[tokio::test]
    async fn test_page_uses_triennial_setting() {
        let calendar = calendar_serving(nasso()).await;
        let state = state_with_calendar(&calendar.uri()).await;
        database::setting::set_reading_cycle(
            state.db.pool(),
            honors_core::ReadingCycleConfig::triennial(),
        )
        .await
        .unwrap();

        let page = honors_page(State(state), query("2025-06-07")).await.unwrap();
        let keys: Vec<&str> = page.rows.iter().map(|row| row.key.as_str()).collect();
        assert_eq!(keys, vec!["1", "M"]);
        assert_eq!(page.reading.unwrap().cycle, "Triennial cycle");
    }

    #[tokio::test]
    async fn test_calendar_failure_renders_empty_state() {
        let calendar = calendar_failing().await;
        let state = state_with_calendar(&calendar.uri()).await;

        let page = honors_page(State(state), query("2025-06-07")).await.unwrap();
        assert!(page.rows.is_empty());
        assert!(page.readings_error.is_some());

        let html = page.render().unwrap();
        assert!(html.contains("No honors found for this date"));
        assert!(html.contains("calendar unavailable"));
    }

    #[tokio::test]
    async fn test_saved_flag_shows_toast() {
        let calendar = calendar_serving(nasso()).await;
        let state = state_with_calendar(&calendar.uri()).await;

        let page = honors_page(
            State(state),
            Query(HonorsQuery {
                date: Some("2025-06-07".to_string()),
                saved: Some("1".to_string()),
            }),
        )
        .await
        .unwrap();
        assert_eq!(page.notice.unwrap().text, SAVED_NOTICE);
    }

    #[tokio::test]
    async fn test_form_save_redirects_and_persists() {
        let calendar = calendar_serving(nasso()).await;
        let state = state_with_calendar(&calendar.uri()).await;
        let sarah = database::member::create_member(state.db.pool(), "Sarah", "Levi", None)
            .await
            .unwrap();
        let id = sarah.id.to_string();

        let response = save_form(
            State(state.clone()),
            form(&[("date", "2025-06-07"), ("honor.1", id.as_str()), ("honor.2", ""), ("honor.M", "")]),
        )
        .await
        .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers()[LOCATION].to_str().unwrap(),
            "/honors?date=2025-06-07&saved=1"
        );

        let saved = database::assignment::list_for_date(state.db.pool(), day())
            .await
            .unwrap();
        assert_eq!(
            saved,
            vec![
                Assignment::new("1", Some(sarah.id)),
                Assignment::new("2", None),
                Assignment::new("M", None),
            ]
        );
    }

    #[tokio::test]
    async fn test_form_save_unknown_member_rerenders_with_message() {
        let calendar = calendar_serving(nasso()).await;
        let state = state_with_calendar(&calendar.uri()).await;

        let response = save_form(
            State(state.clone()),
            form(&[("date", "2025-06-07"), ("honor.1", "42")]),
        )
        .await
        .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let saved = database::assignment::list_for_date(state.db.pool(), day())
            .await
            .unwrap();
        assert!(saved.is_empty());
    }

    #[tokio::test]
    async fn test_form_save_refused_without_readings() {
        let calendar = calendar_failing().await;
        let state = state_with_calendar(&calendar.uri()).await;

        let response = save_form(State(state), form(&[("date", "2025-06-07"), ("honor.1", "")]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_api_save_then_list() {
        let calendar = calendar_failing().await;
        let state = state_with_calendar(&calendar.uri()).await;
        let sarah = database::member::create_member(state.db.pool(), "Sarah", "Levi", None)
            .await
            .unwrap();

        let request = SaveRequest {
            date: day(),
            assignments: vec![Assignment::new("1", Some(sarah.id)), Assignment::new("M", None)],
        };
        let response = save_api(State(state.clone()), Json(request)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let Json(listed) = list_api(
            State(state),
            Query(DateQuery {
                date: Some("2025-06-07".to_string()),
            }),
        )
        .await
        .unwrap();
        assert_eq!(
            listed,
            vec![Assignment::new("1", Some(sarah.id)), Assignment::new("M", None)]
        );
    }

    #[tokio::test]
    async fn test_api_rejects_duplicate_honors() {
        let calendar = calendar_failing().await;
        let state = state_with_calendar(&calendar.uri()).await;

        let request = SaveRequest {
            date: day(),
            assignments: vec![Assignment::new("1", None), Assignment::new("1", None)],
        };
        let response = save_api(State(state), Json(request)).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_api_list_requires_date() {
        let calendar = calendar_failing().await;
        let state = state_with_calendar(&calendar.uri()).await;

        let err = list_api(State(state), Query(DateQuery::default()))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
