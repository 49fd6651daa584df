//! HTTP clients for the honors console.
//!
//! This crate talks to the two kinds of services the assignment editor
//! consumes:
//!
//! - The liturgical calendar (Hebcal leyning API) via [`CalendarClient`]
//! - The console's own REST surface (member search, reading cycle setting,
//!   assignment store) via [`ConsoleClient`]
//!
//! [`ConsoleClient`] implements [`honors_core::HonorsSource`], so it can drive
//! an [`honors_core::EditorController`] directly. Idempotent reads share one
//! [`RetryPolicy`]; saves are never retried.
//!
//! # Example
//!
//! ```no_run
//! use honors_client::{ClientConfig, ConsoleClient};
//! use honors_core::{next_saturday, EditorController};
//!
//! # async fn example() -> Result<(), honors_client::ClientError> {
//! let client = ConsoleClient::new(ClientConfig::default())?;
//! let date = next_saturday(chrono::Local::now().date_naive());
//!
//! let mut controller = EditorController::new(client, date, 500);
//! controller.mount().await;
//! for slot in controller.editor().roster() {
//!     println!("{}: {}", slot.label, slot.meta.range());
//! }
//! # Ok(())
//! # }
//! ```

pub mod calendar;
pub mod config;
pub mod console;
pub mod error;
pub mod retry;

pub use calendar::{CalendarClient, CalendarResponse};
pub use config::ClientConfig;
pub use console::ConsoleClient;
pub use error::ClientError;
pub use retry::RetryPolicy;

/// Crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
