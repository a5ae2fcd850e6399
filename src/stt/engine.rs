//! Speech-to-text engine definition and whisper.cpp implementation.
//!
//! The model is loaded exactly once at startup. whisper.cpp does not support
//! concurrent decoding runs over a single context, so inference runs are
//! serialized behind a mutex and executed on the blocking thread pool.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use crate::error::{AppError, ErrorContext, Result};
use crate::stt::audio::{audio_len, load_mono_16k};
use crate::stt::types::Transcript;

/// Defines the contract for a speech-to-text engine.
#[async_trait]
pub trait SpeechToText: Send + Sync {
    /// Transcribe the audio file at `audio_path`.
    ///
    /// # Arguments
    /// * `audio_path` - Path to a WAV file on disk
    /// * `language` - Language hint passed to the decoder (ISO 639-1 code)
    ///
    /// # Returns
    /// The transcript with whitespace-stripped text
    async fn transcribe(&self, audio_path: &Path, language: &str) -> Result<Transcript>;

    /// Name of the loaded model, as reported by the health endpoint.
    fn model_name(&self) -> &str;
}

/// Speech-to-text engine backed by a local whisper.cpp model.
pub struct WhisperEngine {
    /// Shared model context; immutable after load
    context: Arc<WhisperContext>,

    /// Serializes decoding runs over the context
    inference_lock: Arc<Mutex<()>>,

    /// Model name reported to clients
    model_name: String,

    /// Threads per decoding run
    n_threads: i32,
}

impl WhisperEngine {
    /// Load a ggml model from disk.
    ///
    /// This is the slow path. It runs once at startup and the server refuses
    /// to come up if it fails.
    pub fn load(model_path: &Path, model_name: &str, n_threads: usize) -> Result<Self> {
        if !model_path.exists() {
            return Err(AppError::Config(format!(
                "model file not found: {}",
                model_path.display()
            )));
        }

        let path_str = model_path.to_str().ok_or_else(|| {
            AppError::Config(format!(
                "model path is not valid UTF-8: {}",
                model_path.display()
            ))
        })?;

        info!("Loading whisper model from {}", model_path.display());
        let context = WhisperContext::new_with_params(path_str, WhisperContextParameters::default())
            .map_err(|e| AppError::Config(format!("failed to load whisper model: {}", e)))?;

        Ok(Self {
            context: Arc::new(context),
            inference_lock: Arc::new(Mutex::new(())),
            model_name: model_name.to_string(),
            n_threads: resolve_thread_count(n_threads),
        })
    }
}

#[async_trait]
impl SpeechToText for WhisperEngine {
    async fn transcribe(&self, audio_path: &Path, language: &str) -> Result<Transcript> {
        let context = Arc::clone(&self.context);
        let inference_lock = Arc::clone(&self.inference_lock);
        let path = audio_path.to_path_buf();
        let language = language.to_string();
        let n_threads = self.n_threads;

        tokio::task::spawn_blocking(move || {
            let samples = load_mono_16k(&path)?;
            if samples.is_empty() {
                return Err(AppError::Audio(
                    "uploaded file contains no audio samples".to_string(),
                ));
            }
            debug!(
                "Decoding {:.2}s of audio (language hint: {})",
                audio_len(&samples),
                language
            );

            // One decoding run at a time; later requests queue here.
            let _guard = inference_lock.lock();

            let mut state = context.create_state().map_err(|e| {
                AppError::Inference(format!("failed to create decoder state: {}", e))
            })?;

            let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
            params.set_language(Some(language.as_str()));
            params.set_translate(false);
            params.set_n_threads(n_threads);
            params.set_print_special(false);
            params.set_print_progress(false);
            params.set_print_realtime(false);
            params.set_print_timestamps(false);

            state
                .full(params, &samples)
                .map_err(|e| AppError::Inference(format!("model run failed: {}", e)))?;

            let num_segments = state
                .full_n_segments()
                .map_err(|e| AppError::Inference(format!("failed to count segments: {}", e)))?;
            let mut text = String::new();
            for i in 0..num_segments {
                let segment = state.full_get_segment_text(i).map_err(|e| {
                    AppError::Inference(format!("failed to read segment {}: {}", i, e))
                })?;
                text.push_str(&segment);
            }

            Ok(Transcript {
                text: text.trim().to_string(),
                language: language.clone(),
                audio_length_samples: samples.len(),
            })
        })
        .await
        .with_static_context("transcription task")?
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

/// Pick an inference thread count: the configured value, or a bounded
/// auto-detected one when the configuration says 0.
fn resolve_thread_count(configured: usize) -> i32 {
    if configured > 0 {
        return configured as i32;
    }
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
        .min(4) as i32
}
