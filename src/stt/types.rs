//! Core types for the speech-to-text pipeline.

use serde::{Deserialize, Serialize};

/// Sample rate whisper models are trained on. All audio is converted to this
/// rate before inference.
pub const WHISPER_SAMPLE_RATE: u32 = 16_000;

/// Result of running the decoder over one uploaded clip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    /// The transcribed text, stripped of leading and trailing whitespace
    pub text: String,

    /// Language code the decoder was steered towards
    pub language: String,

    /// Decoded audio length in samples (16 kHz mono)
    pub audio_length_samples: usize,
}
