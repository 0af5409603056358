use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

const USERS_COLLECTION: &str = "Users";
const QUIZZES_COLLECTION: &str = "quizzes";
const LATEST_QUIZ_DOCUMENT: &str = "latestQuiz";

/// Path segments of a user's latest quiz: `Users/{user_id}/quizzes/latestQuiz`.
pub fn latest_quiz_path(user_id: &str) -> [&str; 4] {
    [
        USERS_COLLECTION,
        user_id,
        QUIZZES_COLLECTION,
        LATEST_QUIZ_DOCUMENT,
    ]
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuizQuestion {
    /// Usually a string; null, missing or other JSON values are tolerated.
    #[serde(default)]
    pub question: Value,
}

/// A user's stored quiz. Written by the quiz-taking app, only read here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuizDocument {
    #[serde(default)]
    pub questions: Vec<QuizQuestion>,
    /// Answers keyed by the zero-based question index as a string.
    #[serde(default)]
    pub responses: HashMap<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_latest_quiz_path() {
        assert_eq!(
            latest_quiz_path("user-42"),
            ["Users", "user-42", "quizzes", "latestQuiz"]
        );
    }

    #[test]
    fn test_non_string_question_still_decodes() {
        let doc: QuizDocument = serde_json::from_value(json!({
            "questions": [{"question": null}, {"question": 5}],
            "responses": {}
        }))
        .unwrap();
        assert_eq!(doc.questions.len(), 2);
        assert_eq!(doc.questions[1].question, json!(5));
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let doc: QuizDocument = serde_json::from_value(json!({})).unwrap();
        assert!(doc.questions.is_empty());
        assert!(doc.responses.is_empty());
    }

    #[test]
    fn test_extra_question_fields_are_ignored() {
        let doc: QuizDocument = serde_json::from_value(json!({
            "questions": [{"question": "Q1?", "options": ["a", "b"]}, {}],
            "responses": {"0": "a", "1": 3},
            "completedAt": "2024-03-01T10:00:00Z"
        }))
        .unwrap();
        assert_eq!(doc.questions[0].question, json!("Q1?"));
        assert_eq!(doc.questions[1].question, Value::Null);
        assert_eq!(doc.responses["1"], json!(3));
    }
}
