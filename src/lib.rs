pub mod aggregate;
pub mod app;
pub mod client;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod state;
pub mod transport;
pub mod ui;

#[cfg(test)]
mod testing;

pub use aggregate::{aggregate_daily, DailyTotals};
pub use app::router;
pub use client::HabitifyClient;
pub use config::{ClientConfig, Config};
pub use errors::{AppError, ClientError, ConfigError};
pub use state::AppState;
pub use transport::{CallOptions, HttpTransport, Transport};
