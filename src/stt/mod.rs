//! Core speech-to-text functionality.
//!
//! This module contains the components for speech-to-text conversion:
//! the engine trait and its whisper.cpp implementation, plus audio
//! decoding utilities.

mod audio;
mod engine;
pub mod types;

pub use audio::{audio_len, load_mono_16k, resample_linear};
pub use engine::{SpeechToText, WhisperEngine};
pub use types::{Transcript, WHISPER_SAMPLE_RATE};
