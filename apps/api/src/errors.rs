use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::firestore::StoreError;
use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("No quiz data found for this user")]
    NoQuizData,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Llm(#[from] LlmError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NoQuizData => StatusCode::NOT_FOUND,
            AppError::Store(e) => {
                tracing::error!("Document store error: {e}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Llm(e) => {
                tracing::error!("LLM error: {e}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        // Upstream failures are exposed to the caller verbatim.
        let body = Json(json!({ "error": self.to_string() }));

        (status, body).into_response()
    }
}
