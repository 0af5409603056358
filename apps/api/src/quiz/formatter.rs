//! Quiz Formatter — renders a quiz document as plain text for the LLM.

use serde_json::Value;

use crate::quiz::models::QuizDocument;

/// Placeholder for questions the user did not answer.
pub const NO_RESPONSE: &str = "No response";

/// Pairs each question with its answer, in question order:
///
/// ```text
/// Q1: {question}
/// User Response: {response}
///
/// ```
///
/// Answers are looked up by zero-based index; a missing answer becomes `"No response"`.
pub fn format_quiz(quiz: &QuizDocument) -> String {
    let mut formatted = String::new();

    for (idx, q) in quiz.questions.iter().enumerate() {
        let response = quiz
            .responses
            .get(&idx.to_string())
            .and_then(value_text)
            .unwrap_or_else(|| NO_RESPONSE.to_string());

        formatted.push_str(&format!(
            "Q{}: {}\nUser Response: {}\n\n",
            idx + 1,
            value_text(&q.question).unwrap_or_default(),
            response
        ));
    }

    formatted
}

/// Text of a stored value; `None` for null.
fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::models::QuizQuestion;
    use serde_json::json;
    use std::collections::HashMap;

    fn quiz(questions: &[&str], responses: &[(&str, Value)]) -> QuizDocument {
        QuizDocument {
            questions: questions
                .iter()
                .map(|q| QuizQuestion {
                    question: json!(q),
                })
                .collect(),
            responses: responses
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect::<HashMap<_, _>>(),
        }
    }

    #[test]
    fn test_single_answered_question() {
        let doc = quiz(&["Q1?"], &[("0", json!("Yes"))]);
        assert_eq!(format_quiz(&doc), "Q1: Q1?\nUser Response: Yes\n\n");
    }

    #[test]
    fn test_empty_quiz_formats_to_empty_string() {
        assert_eq!(format_quiz(&QuizDocument::default()), "");
    }

    #[test]
    fn test_missing_response_uses_placeholder() {
        let doc = quiz(
            &["Do you track spending?", "Do you have savings?"],
            &[("1", json!("A little"))],
        );
        assert_eq!(
            format_quiz(&doc),
            "Q1: Do you track spending?\nUser Response: No response\n\n\
             Q2: Do you have savings?\nUser Response: A little\n\n"
        );
    }

    #[test]
    fn test_one_block_per_question_in_order() {
        let questions: Vec<String> = (0..7).map(|i| format!("question {i}")).collect();
        let refs: Vec<&str> = questions.iter().map(String::as_str).collect();
        let doc = quiz(&refs, &[("3", json!("yes"))]);

        let formatted = format_quiz(&doc);
        let blocks: Vec<&str> = formatted
            .split("\n\n")
            .filter(|b| !b.is_empty())
            .collect();

        assert_eq!(blocks.len(), 7);
        for (i, block) in blocks.iter().enumerate() {
            assert!(block.starts_with(&format!("Q{}: ", i + 1)));
        }
        assert!(blocks[3].ends_with("User Response: yes"));
        assert!(blocks[4].ends_with("User Response: No response"));
    }

    #[test]
    fn test_responses_for_unknown_indexes_are_ignored() {
        let doc = quiz(&["Only question"], &[("5", json!("stray"))]);
        assert_eq!(
            format_quiz(&doc),
            "Q1: Only question\nUser Response: No response\n\n"
        );
    }

    #[test]
    fn test_non_string_responses_render_as_text() {
        let doc = quiz(
            &["Monthly income?", "Own a car?", "Skipped?"],
            &[("0", json!(25000)), ("1", json!(true)), ("2", Value::Null)],
        );
        let formatted = format_quiz(&doc);
        assert!(formatted.contains("Q1: Monthly income?\nUser Response: 25000\n\n"));
        assert!(formatted.contains("Q2: Own a car?\nUser Response: true\n\n"));
        assert!(formatted.contains("Q3: Skipped?\nUser Response: No response\n\n"));
    }

    #[test]
    fn test_null_and_numeric_questions_render() {
        let doc: QuizDocument = serde_json::from_value(json!({
            "questions": [{"question": null}, {"question": 5}],
            "responses": {"0": "Yes", "1": "No"}
        }))
        .unwrap();
        assert_eq!(
            format_quiz(&doc),
            "Q1: \nUser Response: Yes\n\nQ2: 5\nUser Response: No\n\n"
        );
    }

    #[test]
    fn test_missing_question_text_is_empty() {
        let doc: QuizDocument = serde_json::from_value(json!({
            "questions": [{}],
            "responses": {"0": "Yes"}
        }))
        .unwrap();
        assert_eq!(format_quiz(&doc), "Q1: \nUser Response: Yes\n\n");
    }
}
