//! The `whisper_stt_server` core library.
//!
//! This crate provides an HTTP speech-to-text service backed by a local
//! whisper.cpp model: multipart WAV uploads in, JSON transcripts out.

pub mod config;
pub mod error;
pub mod raii;
pub mod server;
pub mod stt;
