use axum::Json;
use serde_json::{json, Value};

pub const WELCOME_MESSAGE: &str = "Welcome to the Finance Recommendation API!";

/// GET /
pub async fn welcome_handler() -> &'static str {
    WELCOME_MESSAGE
}

/// GET /health
/// Returns a simple status object with service version.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": env!("CARGO_PKG_NAME")
    }))
}
