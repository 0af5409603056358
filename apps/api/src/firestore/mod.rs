//! Document store client — read access to Cloud Firestore over its REST API.
//!
//! Handlers never see this type directly; they go through the `QuizStore`
//! trait carried in `AppState` as `Arc<dyn QuizStore>`.
//!
//! Reads use `documents:batchGet`, which reports an absent document as a
//! `missing` result. A 404 status therefore always means something other than
//! a missing document (unknown project or database) and is an error.

pub mod auth;
pub mod value;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use crate::quiz::models::{latest_quiz_path, QuizDocument};
use auth::{ServiceAccountKey, TokenError, TokenProvider};
use value::{decode_fields, ValueError};

const FIRESTORE_API_URL: &str = "https://firestore.googleapis.com/v1";
const DEFAULT_DATABASE: &str = "(default)";
/// Bearer token the Firestore emulator accepts as an administrator.
const EMULATOR_TOKEN: &str = "owner";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Authentication failed: {0}")]
    Auth(#[from] TokenError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Firestore API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Malformed document: {0}")]
    Decode(String),

    #[error("Invalid document path: {0}")]
    InvalidPath(String),
}

impl From<ValueError> for StoreError {
    fn from(e: ValueError) -> Self {
        StoreError::Decode(e.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Decode(e.to_string())
    }
}

/// Read access to users' stored quizzes.
#[async_trait]
pub trait QuizStore: Send + Sync {
    /// Returns `Ok(None)` when the user has no stored quiz.
    async fn latest_quiz(&self, user_id: &str) -> Result<Option<QuizDocument>, StoreError>;
}

#[derive(Debug, Serialize)]
struct BatchGetRequest<'a> {
    documents: Vec<&'a str>,
}

/// One element of the `batchGet` response array: exactly one of `found` / `missing` is set.
#[derive(Debug, Deserialize)]
struct BatchGetResult {
    found: Option<DocumentResponse>,
    missing: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DocumentResponse {
    #[serde(default)]
    fields: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct FirestoreError {
    error: FirestoreErrorBody,
}

#[derive(Debug, Deserialize)]
struct FirestoreErrorBody {
    message: String,
}

enum Credentials {
    ServiceAccount(TokenProvider),
    Emulator,
}

pub struct FirestoreClient {
    client: Client,
    base_url: Url,
    project_id: String,
    credentials: Credentials,
}

impl FirestoreClient {
    /// Client for the hosted Firestore, authenticated as the given service account.
    pub fn new(key: ServiceAccountKey) -> Result<Self, StoreError> {
        let client = Client::new();
        let project_id = key.project_id.clone();
        let tokens = TokenProvider::new(client.clone(), key)?;

        Ok(Self {
            client,
            base_url: parse_base_url(FIRESTORE_API_URL)?,
            project_id,
            credentials: Credentials::ServiceAccount(tokens),
        })
    }

    /// Client for a local Firestore emulator at `host` (e.g. `localhost:8080`).
    pub fn emulator(host: &str, project_id: String) -> Result<Self, StoreError> {
        Ok(Self {
            client: Client::new(),
            base_url: parse_base_url(&format!("http://{host}/v1"))?,
            project_id,
            credentials: Credentials::Emulator,
        })
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Fetches the document at `path` (alternating collection and document ids).
    /// Returns the decoded fields, or `None` if the document does not exist.
    pub async fn get_document(
        &self,
        path: &[&str],
    ) -> Result<Option<Map<String, Value>>, StoreError> {
        let name = document_name(&self.project_id, path)?;
        let url = batch_get_url(&self.base_url, &self.project_id)?;
        let token = match &self.credentials {
            Credentials::ServiceAccount(tokens) => tokens.access_token().await?,
            Credentials::Emulator => EMULATOR_TOKEN.to_string(),
        };

        debug!("Fetching Firestore document {name}");

        let response = self
            .client
            .post(url)
            .bearer_auth(token)
            .json(&BatchGetRequest {
                documents: vec![&name],
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<FirestoreError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(StoreError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let results: Vec<BatchGetResult> = serde_json::from_str(&body)?;

        for result in results {
            if let Some(document) = result.found {
                return Ok(Some(decode_fields(&document.fields)?));
            }
            if result.missing.is_some() {
                return Ok(None);
            }
        }

        Err(StoreError::Decode(format!(
            "batchGet returned no result for {name}"
        )))
    }
}

#[async_trait]
impl QuizStore for FirestoreClient {
    async fn latest_quiz(&self, user_id: &str) -> Result<Option<QuizDocument>, StoreError> {
        let Some(fields) = self.get_document(&latest_quiz_path(user_id)).await? else {
            return Ok(None);
        };

        let document = serde_json::from_value(Value::Object(fields))?;
        Ok(Some(document))
    }
}

fn parse_base_url(url: &str) -> Result<Url, StoreError> {
    Url::parse(url).map_err(|e| StoreError::InvalidPath(format!("{url}: {e}")))
}

/// Builds the resource name
/// `projects/{project}/databases/(default)/documents/{path...}`.
/// Every path element must be a single, non-dot id.
fn document_name(project_id: &str, path: &[&str]) -> Result<String, StoreError> {
    if path.is_empty() || path.len() % 2 != 0 {
        return Err(StoreError::InvalidPath(path.join("/")));
    }
    if let Some(bad) = path
        .iter()
        .find(|s| s.is_empty() || **s == "." || **s == ".." || s.contains('/'))
    {
        return Err(StoreError::InvalidPath(format!(
            "'{bad}' is not a valid document id"
        )));
    }

    Ok(format!(
        "projects/{project_id}/databases/{DEFAULT_DATABASE}/documents/{}",
        path.join("/")
    ))
}

/// Builds `{base}/projects/{project}/databases/(default)/documents:batchGet`.
fn batch_get_url(base: &Url, project_id: &str) -> Result<Url, StoreError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| StoreError::InvalidPath(base.to_string()))?
        .pop_if_empty()
        .extend([
            "projects",
            project_id,
            "databases",
            DEFAULT_DATABASE,
            "documents:batchGet",
        ]);

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const BATCH_GET_PATH: &str = "/v1/projects/demo/databases/(default)/documents:batchGet";
    const LATEST_QUIZ_NAME: &str =
        "projects/demo/databases/(default)/documents/Users/u1/quizzes/latestQuiz";

    fn emulator_client(server: &MockServer) -> FirestoreClient {
        FirestoreClient::emulator(&server.address().to_string(), "demo".to_string()).unwrap()
    }

    async fn mount_batch_get(server: &MockServer, response: ResponseTemplate) {
        Mock::given(method("POST"))
            .and(path(BATCH_GET_PATH))
            .and(header("authorization", "Bearer owner"))
            .and(body_json(json!({ "documents": [LATEST_QUIZ_NAME] })))
            .respond_with(response)
            .expect(1)
            .mount(server)
            .await;
    }

    #[test]
    fn test_document_name_for_latest_quiz() {
        let name = document_name("finance-quiz", &latest_quiz_path("abc123")).unwrap();
        assert_eq!(
            name,
            "projects/finance-quiz/databases/(default)/documents/Users/abc123/quizzes/latestQuiz"
        );
    }

    #[test]
    fn test_batch_get_url() {
        let base = Url::parse(FIRESTORE_API_URL).unwrap();
        let url = batch_get_url(&base, "finance-quiz").unwrap();
        assert_eq!(
            url.as_str(),
            "https://firestore.googleapis.com/v1/projects/finance-quiz/databases/(default)/documents:batchGet"
        );
    }

    #[test]
    fn test_invalid_document_ids_are_rejected() {
        for id in ["", ".", "..", "a/b"] {
            let result = document_name("p", &latest_quiz_path(id));
            assert!(matches!(result, Err(StoreError::InvalidPath(_))));
        }
    }

    #[test]
    fn test_collection_path_is_rejected() {
        let result = document_name("p", &["Users"]);
        assert!(matches!(result, Err(StoreError::InvalidPath(_))));
    }

    #[test]
    fn test_emulator_base_url() {
        let client = FirestoreClient::emulator("localhost:8080", "demo".to_string()).unwrap();
        let url = batch_get_url(&client.base_url, client.project_id()).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/v1/projects/demo/databases/(default)/documents:batchGet"
        );
    }

    #[test]
    fn test_store_error_message_is_readable() {
        let err = StoreError::Api {
            status: 403,
            message: "Missing or insufficient permissions.".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Firestore API error (status 403): Missing or insufficient permissions."
        );
    }

    #[tokio::test]
    async fn test_found_document_is_decoded() {
        let server = MockServer::start().await;
        mount_batch_get(
            &server,
            ResponseTemplate::new(200).set_body_json(json!([{
                "found": {
                    "name": LATEST_QUIZ_NAME,
                    "fields": {
                        "questions": {"arrayValue": {"values": [
                            {"mapValue": {"fields": {"question": {"stringValue": "Q1?"}}}}
                        ]}},
                        "responses": {"mapValue": {"fields": {"0": {"stringValue": "Yes"}}}}
                    },
                    "createTime": "2024-03-01T10:00:00Z",
                    "updateTime": "2024-03-01T10:00:00Z"
                },
                "readTime": "2024-03-02T08:00:00Z"
            }])),
        )
        .await;

        let quiz = emulator_client(&server)
            .latest_quiz("u1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(quiz.questions[0].question, json!("Q1?"));
        assert_eq!(quiz.responses["0"], json!("Yes"));
    }

    #[tokio::test]
    async fn test_missing_document_is_none() {
        let server = MockServer::start().await;
        mount_batch_get(
            &server,
            ResponseTemplate::new(200).set_body_json(json!([{
                "missing": LATEST_QUIZ_NAME,
                "readTime": "2024-03-02T08:00:00Z"
            }])),
        )
        .await;

        let quiz = emulator_client(&server).latest_quiz("u1").await.unwrap();
        assert!(quiz.is_none());
    }

    #[tokio::test]
    async fn test_missing_database_is_an_error() {
        let server = MockServer::start().await;
        mount_batch_get(
            &server,
            ResponseTemplate::new(404).set_body_json(json!({
                "error": {
                    "code": 404,
                    "message": "The database (default) does not exist for project demo",
                    "status": "NOT_FOUND"
                }
            })),
        )
        .await;

        let err = emulator_client(&server).latest_quiz("u1").await.unwrap_err();
        match err {
            StoreError::Api { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(
                    message,
                    "The database (default) does not exist for project demo"
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_permission_denied_carries_message() {
        let server = MockServer::start().await;
        mount_batch_get(
            &server,
            ResponseTemplate::new(403).set_body_json(json!({
                "error": {
                    "code": 403,
                    "message": "Missing or insufficient permissions.",
                    "status": "PERMISSION_DENIED"
                }
            })),
        )
        .await;

        let err = emulator_client(&server).latest_quiz("u1").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Firestore API error (status 403): Missing or insufficient permissions."
        );
    }

    #[tokio::test]
    async fn test_undecodable_document_is_an_error() {
        let server = MockServer::start().await;
        mount_batch_get(
            &server,
            ResponseTemplate::new(200).set_body_json(json!([{
                "found": {
                    "name": LATEST_QUIZ_NAME,
                    "fields": {"questions": {"vectorValue": {}}}
                }
            }])),
        )
        .await;

        let err = emulator_client(&server).latest_quiz("u1").await.unwrap_err();
        assert!(matches!(err, StoreError::Decode(_)));
    }
}
