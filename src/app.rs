use crate::handlers;
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/logs", get(handlers::get_logs))
        .route("/logs/up", get(handlers::log_up))
        .route("/journal", get(handlers::get_journal))
        .with_state(state)
}
