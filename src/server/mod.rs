//! Web server and API implementation.
//!
//! This module provides the HTTP server functionality for the
//! transcription service.

mod handlers;
mod metrics;
mod state;

pub use handlers::{create_router, health_check, metrics_handler, transcribe, TranscribeResponse};
pub use metrics::ServiceMetrics;
pub use state::AppState;
