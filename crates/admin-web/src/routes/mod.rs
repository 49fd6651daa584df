//! Route handlers for the honors console.

pub mod dashboard;
pub mod health;
pub mod honors;
pub mod members;
pub mod settings;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;

/// Build the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        // HTML pages
        .route("/", get(dashboard::dashboard_page))
        .route("/dashboard", get(dashboard::dashboard_page))
        .route("/honors", get(honors::honors_page).post(honors::save_form))
        // Health check
        .route("/health", get(health::health))
        // API endpoints
        .route("/api/honors", get(honors::list_api).post(honors::save_api))
        .route("/api/members", get(members::members_api))
        .route(
            "/api/settings/reading-cycle",
            get(settings::reading_cycle_api).put(settings::update_reading_cycle_api),
        )
        .route("/api/anniversaries", get(dashboard::anniversaries_api))
}
