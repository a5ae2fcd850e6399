//! HTTP request handlers.
//!
//! This module provides the HTTP handlers for the transcription service.
//! The transcribe handler owns the request lifecycle: validate the multipart
//! upload, spool it to a temporary file, run the engine under a timeout, and
//! map every outcome onto the wire contract.

use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartRejection, DefaultBodyLimit, Multipart, State},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use crate::error::{with_timeout, AppError, Result};
use crate::raii::TempAudioFile;
use crate::server::AppState;

/// Response body for a successful transcription.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscribeResponse {
    /// Always true on the success path
    pub ok: bool,

    /// Transcribed text, stripped of surrounding whitespace
    pub text: String,

    /// Language the decoder was steered towards
    pub language: String,
}

/// Handle a transcription request.
///
/// Malformed requests map to 400 with a bare `{"error": ...}` body,
/// processing failures to 500 with `{"ok": false, "error": ...}`, and
/// successes to 200 with the transcript.
pub async fn transcribe(
    State(state): State<Arc<AppState>>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Response {
    state.metrics.request_started();

    match transcribe_upload(&state, multipart).await {
        Ok(response) => {
            state.metrics.request_succeeded();
            Json(response).into_response()
        }
        Err(err) => {
            if err.is_client_error() {
                state.metrics.request_rejected();
            } else {
                error!("Transcription request failed: {}", err);
                state.metrics.request_failed();
            }
            err.into_response()
        }
    }
}

/// Run the transcription pipeline for one multipart upload.
async fn transcribe_upload(
    state: &AppState,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<TranscribeResponse> {
    // A request that is not multipart at all gets the same JSON 400 shape
    // as every other malformed request, not the extractor's plain-text reply.
    let mut multipart = multipart
        .map_err(|e| AppError::Validation(format!("expected multipart form data: {}", e)))?;

    let (file_name, data) = extract_audio_field(&mut multipart).await?;
    info!("Received upload {} ({} bytes)", file_name, data.len());

    // Spooled to disk so the decoder can read it back; dropping the guard
    // deletes the file no matter which path the request exits through.
    let temp = TempAudioFile::create(&state.temp_dir, &data).await?;

    let transcript = with_timeout(
        state.engine.transcribe(temp.path(), &state.language),
        state.inference_timeout,
        "transcription",
    )
    .await?;

    info!(
        "Transcribed {} into {} characters",
        file_name,
        transcript.text.len()
    );

    Ok(TranscribeResponse {
        ok: true,
        text: transcript.text.trim().to_string(),
        language: transcript.language,
    })
}

/// Pull the `audio` field out of a multipart body.
async fn extract_audio_field(multipart: &mut Multipart) -> Result<(String, Bytes)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("malformed multipart body: {}", e)))?
    {
        if field.name() != Some("audio") {
            continue;
        }

        // Browsers send an empty filename when the form's file input was left
        // blank; treat that the same as no file at all.
        let file_name = field.file_name().unwrap_or_default().to_string();
        if file_name.is_empty() {
            return Err(AppError::Validation("file is empty".to_string()));
        }

        let data: Bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("failed to read upload: {}", e)))?;
        return Ok((file_name, data));
    }

    Err(AppError::Validation("audio file required".to_string()))
}

/// Health check endpoint.
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "model": state.engine.model_name(),
    }))
}

/// Metrics endpoint.
pub async fn metrics_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.metrics.to_json())
}

/// Create the application router.
pub fn create_router(state: Arc<AppState>) -> Router {
    let max_upload_bytes = state.max_upload_bytes;

    Router::new()
        .route("/transcribe", post(transcribe))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .layer(ServiceBuilder::new().layer(CorsLayer::permissive()))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(state)
}
