//! Web console for assigning Torah honors.
//!
//! Serves the honors editor and dashboard as server-rendered HTML, plus the
//! JSON surface the `honors` CLI talks to.

mod config;
mod error;
mod routes;
mod source;
mod state;
mod views;

use database::Database;
use honors_client::{CalendarClient, ClientConfig};
use tower_http::services::ServeDir;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!(addr = %config.addr, "Starting honors console");

    // Connect to database
    let db = Database::connect(&config.database_url).await?;
    db.migrate().await?;

    // Calendar client; the console URL is this server itself
    let client_config = ClientConfig::new(&config.calendar_url, format!("http://{}", config.addr))
        .with_israel(config.calendar_israel);
    let calendar = CalendarClient::new(client_config)?;
    info!(calendar = ?calendar, "Calendar client ready");

    // Build application state
    let state = AppState::new(
        db,
        calendar,
        config.member_search_limit,
        config.triennial_default,
    );

    // Build router
    let app = routes::router()
        .nest_service("/static", ServeDir::new("static"))
        .with_state(state);

    // Start server
    info!(addr = %config.addr, "Honors console listening");
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
