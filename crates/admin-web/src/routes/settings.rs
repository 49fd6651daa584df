//! Organization settings endpoints.

use axum::extract::State;
use axum::Json;
use honors_core::ReadingCycleConfig;
use tracing::info;

use crate::error::Result;
use crate::state::AppState;

/// Current reading cycle setting.
pub async fn reading_cycle_api(State(state): State<AppState>) -> Result<Json<ReadingCycleConfig>> {
    let config = database::setting::reading_cycle(state.db.pool(), state.triennial_default).await?;
    Ok(Json(config))
}

/// Store the reading cycle setting.
pub async fn update_reading_cycle_api(
    State(state): State<AppState>,
    Json(config): Json<ReadingCycleConfig>,
) -> Result<Json<ReadingCycleConfig>> {
    database::setting::set_reading_cycle(state.db.pool(), config).await?;
    info!(triennial = config.triennial, "Reading cycle updated");
    Ok(Json(config))
}
