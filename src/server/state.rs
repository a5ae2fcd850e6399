//! Application state for dependency injection.
//!
//! This module provides the application state that is shared
//! between all request handlers.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::server::metrics::ServiceMetrics;
use crate::stt::SpeechToText;

/// Shared application state containing dependencies.
#[derive(Clone)]
pub struct AppState {
    /// The speech-to-text engine implementation
    pub engine: Arc<dyn SpeechToText>,

    /// Service metrics
    pub metrics: Arc<ServiceMetrics>,

    /// Language hint passed to the decoder
    pub language: String,

    /// Directory for per-request temporary audio files
    pub temp_dir: PathBuf,

    /// Timeout for a single transcription request
    pub inference_timeout: Duration,

    /// Maximum accepted upload size in bytes
    pub max_upload_bytes: usize,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    /// * `engine` - The speech-to-text engine implementation
    /// * `config` - Source of the per-request settings
    ///
    /// # Returns
    /// A new application state
    pub fn new(engine: Arc<dyn SpeechToText>, config: &Config) -> Self {
        Self {
            engine,
            metrics: Arc::new(ServiceMetrics::new()),
            language: config.language.clone(),
            temp_dir: config.resolved_temp_dir(),
            inference_timeout: config.inference_timeout,
            max_upload_bytes: config.max_upload_bytes,
        }
    }
}
