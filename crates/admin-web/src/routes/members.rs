//! Member search endpoint.

use axum::extract::{Query, State};
use axum::Json;
use honors_core::MemberSummary;
use serde::Deserialize;

use crate::error::Result;
use crate::state::AppState;

/// Query parameters for member search.
#[derive(Debug, Default, Deserialize)]
pub struct MemberQuery {
    pub limit: Option<usize>,
    pub q: Option<String>,
}

/// Search members by name or email.
///
/// `limit` is capped at the configured search limit.
pub async fn members_api(
    State(state): State<AppState>,
    Query(query): Query<MemberQuery>,
) -> Result<Json<Vec<MemberSummary>>> {
    let limit = query
        .limit
        .unwrap_or(state.member_search_limit)
        .min(state.member_search_limit);
    let limit = u32::try_from(limit).unwrap_or(u32::MAX);
    let search = query.q.as_deref().map(str::trim).filter(|q| !q.is_empty());

    let members = database::member::search_members(state.db.pool(), search, limit).await?;
    Ok(Json(members.into_iter().map(MemberSummary::from).collect()))
}
