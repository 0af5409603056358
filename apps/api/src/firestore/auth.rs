//! Service-account authentication for Google APIs.
//!
//! Mints an RS256-signed JWT assertion from the service-account key and trades
//! it at the key's `token_uri` for an OAuth2 access token (the JWT bearer grant).
//! The token is reused until shortly before it expires.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::debug;

const DATASTORE_SCOPE: &str = "https://www.googleapis.com/auth/datastore";
const GOOGLE_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
/// Tokens this close to expiry are refreshed before use.
const REFRESH_MARGIN_SECS: i64 = 60;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Invalid service account key: {0}")]
    InvalidKey(String),

    #[error("Failed to sign token assertion: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    #[error("Token request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Token endpoint returned status {status}: {message}")]
    Rejected { status: u16, message: String },
}

/// The fields of a Google service-account JSON key that this service uses.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub project_id: String,
    pub client_email: String,
    pub private_key: Secret<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    GOOGLE_TOKEN_URI.to_string()
}

impl ServiceAccountKey {
    pub fn from_json(json: &str) -> Result<Self, TokenError> {
        let key: ServiceAccountKey =
            serde_json::from_str(json).map_err(|e| TokenError::InvalidKey(e.to_string()))?;

        if key.project_id.trim().is_empty() {
            return Err(TokenError::InvalidKey("project_id is empty".to_string()));
        }
        if key.client_email.trim().is_empty() {
            return Err(TokenError::InvalidKey("client_email is empty".to_string()));
        }

        Ok(key)
    }
}

/// Claims of the signed assertion sent to the token endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssertionClaims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

pub fn build_claims(key: &ServiceAccountKey, now: DateTime<Utc>) -> AssertionClaims {
    AssertionClaims {
        iss: key.client_email.clone(),
        scope: DATASTORE_SCOPE.to_string(),
        aud: key.token_uri.clone(),
        iat: now.timestamp(),
        exp: (now + Duration::seconds(ASSERTION_LIFETIME_SECS)).timestamp(),
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    ASSERTION_LIFETIME_SECS
}

#[derive(Debug, Deserialize)]
struct TokenErrorBody {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

struct CachedToken {
    access_token: Secret<String>,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(REFRESH_MARGIN_SECS) < self.expires_at
    }
}

/// Hands out OAuth2 access tokens for a single service account.
pub struct TokenProvider {
    client: Client,
    key: ServiceAccountKey,
    encoding_key: EncodingKey,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenProvider {
    /// Fails if the key's private key is not a valid RSA PEM.
    pub fn new(client: Client, key: ServiceAccountKey) -> Result<Self, TokenError> {
        let encoding_key = EncodingKey::from_rsa_pem(key.private_key.expose_secret().as_bytes())
            .map_err(|e| TokenError::InvalidKey(format!("private_key: {e}")))?;

        Ok(Self {
            client,
            key,
            encoding_key,
            cached: Mutex::new(None),
        })
    }

    /// Signs a fresh assertion for the token endpoint.
    pub fn sign_assertion(&self, now: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = build_claims(&self.key, now);
        Ok(encode(
            &Header::new(Algorithm::RS256),
            &claims,
            &self.encoding_key,
        )?)
    }

    /// Returns a valid access token, exchanging a new assertion if the cached one is stale.
    pub async fn access_token(&self) -> Result<String, TokenError> {
        let mut cached = self.cached.lock().await;

        if let Some(token) = cached.as_ref().filter(|t| t.is_fresh(Utc::now())) {
            return Ok(token.access_token.expose_secret().clone());
        }

        let token = self.exchange().await?;
        let access_token = token.access_token.expose_secret().clone();
        *cached = Some(token);
        Ok(access_token)
    }

    async fn exchange(&self) -> Result<CachedToken, TokenError> {
        let now = Utc::now();
        let assertion = self.sign_assertion(now)?;

        let response = self
            .client
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<TokenErrorBody>(&body)
                .map(|e| match e.error_description {
                    Some(description) => format!("{}: {description}", e.error),
                    None => e.error,
                })
                .unwrap_or(body);
            return Err(TokenError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let token: TokenResponse = response.json().await?;
        debug!(
            "Obtained access token for {} (expires in {}s)",
            self.key.client_email, token.expires_in
        );

        Ok(CachedToken {
            access_token: Secret::new(token.access_token),
            expires_at: now + Duration::seconds(token.expires_in),
        })
    }
}
