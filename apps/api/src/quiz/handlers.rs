//! Axum route handlers for the quiz and suggestion API.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::quiz::formatter::format_quiz;
use crate::quiz::prompts::build_suggestion_prompt;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct QuizDataResponse {
    pub quiz_data: String,
}

#[derive(Debug, Serialize)]
pub struct SuggestedTasksResponse {
    pub suggested_tasks: String,
}

/// Loads the user's latest quiz and renders it as text.
async fn load_formatted_quiz(state: &AppState, user_id: &str) -> Result<String, AppError> {
    let quiz = state
        .quiz_store
        .latest_quiz(user_id)
        .await?
        .ok_or(AppError::NoQuizData)?;

    Ok(format_quiz(&quiz))
}

/// GET /get_quiz_data/:user_id
pub async fn handle_get_quiz_data(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<QuizDataResponse>, AppError> {
    let quiz_data = load_formatted_quiz(&state, &user_id).await?;
    Ok(Json(QuizDataResponse { quiz_data }))
}

/// GET /suggest_financial_tasks/:user_id
///
/// Formats the user's latest quiz into the suggestion prompt and returns the model's text verbatim.
pub async fn handle_suggest_financial_tasks(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<SuggestedTasksResponse>, AppError> {
    let quiz_data = load_formatted_quiz(&state, &user_id).await?;
    let prompt = build_suggestion_prompt(&quiz_data);

    let suggested_tasks = state.llm.generate(&prompt).await?;
    info!("Generated financial task suggestions for user {user_id}");

    Ok(Json(SuggestedTasksResponse { suggested_tasks }))
}
