use std::sync::Arc;

use crate::firestore::QuizStore;
use crate::llm_client::TextGenerator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Read access to stored quizzes. Firestore in production.
    pub quiz_store: Arc<dyn QuizStore>,
    pub llm: Arc<dyn TextGenerator>,
}
