// Quiz data and task suggestions.
// Store access goes through firestore::QuizStore and LLM calls through llm_client::TextGenerator.

pub mod formatter;
pub mod handlers;
pub mod models;
pub mod prompts;
