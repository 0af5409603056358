mod config;
mod errors;
mod firestore;
mod llm_client;
mod quiz;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::firestore::auth::ServiceAccountKey;
use crate::firestore::FirestoreClient;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Finance Recommendation API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize Firestore
    let firestore = build_firestore_client(&config)?;
    info!(
        "Firestore client initialized (project: {})",
        firestore.project_id()
    );

    // Initialize LLM client
    let llm = LlmClient::new(config.groq_api_key.clone());
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let state = AppState {
        quiz_store: Arc::new(firestore),
        llm: Arc::new(llm),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Loads the service-account credential from the configured source and builds the client.
/// Any problem with the credential aborts startup.
fn build_firestore_client(config: &Config) -> Result<FirestoreClient> {
    info!("Loading Firebase credentials from {}", config.credentials);
    let raw = config.credentials.load()?;
    let key = ServiceAccountKey::from_json(&raw).context("Invalid Firebase credentials")?;

    let client = match &config.firestore_emulator_host {
        Some(host) => {
            info!("Using Firestore emulator at {host}");
            FirestoreClient::emulator(host, key.project_id)?
        }
        None => FirestoreClient::new(key)?,
    };

    Ok(client)
}
