//! Whisper speech-to-text HTTP service.
//!
//! This is the entry point for the transcription server. It initializes the
//! configuration, loads the whisper model, and starts listening for requests.

use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use whisper_stt_server::{
    config::Config,
    error::Result,
    server::{create_router, AppState},
    stt::WhisperEngine,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_thread_ids(true)
        .with_level(true)
        .json()
        .init();

    // Load configuration
    let config = Config::load()?;

    // Load the model before binding the listener; a server that cannot
    // transcribe must not accept connections.
    let engine = Arc::new(WhisperEngine::load(
        &config.model_path,
        &config.model_name,
        config.n_threads,
    )?);
    info!("Model {} ready", config.model_name);

    // Create application state
    let state = Arc::new(AppState::new(engine, &config));

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server_host, config.server_port);
    info!("Server listening on {}", addr);
    info!("Transcription endpoint: POST http://{}/transcribe", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
