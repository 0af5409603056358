pub mod health;

use axum::{routing::get, Router};

use crate::quiz::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::welcome_handler))
        .route("/health", get(health::health_handler))
        .route(
            "/get_quiz_data/:user_id",
            get(handlers::handle_get_quiz_data),
        )
        .route(
            "/suggest_financial_tasks/:user_id",
            get(handlers::handle_suggest_financial_tasks),
        )
        .with_state(state)
}
