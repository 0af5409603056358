use std::fmt;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use secrecy::Secret;

const DEFAULT_CREDENTIALS_PATH: &str = "firebase-adminsdk.json";

/// Where the Firebase service-account credential is read from at startup.
#[derive(Debug, Clone, PartialEq)]
pub enum CredentialSource {
    /// Path to a service-account JSON file.
    File(PathBuf),
    /// The service-account JSON itself, passed through the environment.
    InlineJson(String),
}

impl CredentialSource {
    /// Returns the raw service-account JSON, reading the file if needed.
    pub fn load(&self) -> Result<String> {
        match self {
            CredentialSource::File(path) => std::fs::read_to_string(path).with_context(|| {
                format!("Failed to read Firebase credentials from '{}'", path.display())
            }),
            CredentialSource::InlineJson(json) => Ok(json.clone()),
        }
    }
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialSource::File(path) => write!(f, "file ({})", path.display()),
            CredentialSource::InlineJson(_) => write!(f, "inline JSON"),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub groq_api_key: Secret<String>,
    pub credentials: CredentialSource,
    pub firestore_emulator_host: Option<String>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .with_context(|| format!("Required environment variable '{key}' is not set"))
        };

        let credentials = match lookup("FIREBASE_CREDENTIALS_SOURCE")
            .unwrap_or_else(|| "file".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "file" => CredentialSource::File(PathBuf::from(
                lookup("FIREBASE_CREDENTIALS_PATH")
                    .unwrap_or_else(|| DEFAULT_CREDENTIALS_PATH.to_string()),
            )),
            "inline" | "inline-json" => {
                CredentialSource::InlineJson(require("FIREBASE_CREDENTIALS_JSON")?)
            }
            other => bail!(
                "FIREBASE_CREDENTIALS_SOURCE must be 'file' or 'inline', got '{other}'"
            ),
        };

        Ok(Config {
            groq_api_key: Secret::new(require("GROQ_API_KEY")?),
            credentials,
            firestore_emulator_host: lookup("FIRESTORE_EMULATOR_HOST")
                .filter(|v| !v.trim().is_empty()),
            port: lookup("PORT")
                .unwrap_or_else(|| "5000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}
