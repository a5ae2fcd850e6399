//! Service metrics tracking.
//!
//! This module provides metrics tracking for the transcription service.

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Tracks service metrics like request counts and outcomes.
#[derive(Debug, Clone)]
pub struct ServiceMetrics {
    /// Total number of transcription requests received
    total_requests: Arc<AtomicU64>,

    /// Number of requests currently being processed
    active_requests: Arc<AtomicU32>,

    /// Maximum number of concurrent requests observed
    max_concurrent_requests: Arc<AtomicU32>,

    /// Number of requests that produced a transcript
    completed_requests: Arc<AtomicU64>,

    /// Number of requests rejected as malformed
    rejected_requests: Arc<AtomicU64>,

    /// Number of requests that failed during processing
    failed_requests: Arc<AtomicU64>,

    /// Server start time
    start_time: Instant,
}

impl ServiceMetrics {
    /// Create a new metrics tracker.
    pub fn new() -> Self {
        Self {
            total_requests: Arc::new(AtomicU64::new(0)),
            active_requests: Arc::new(AtomicU32::new(0)),
            max_concurrent_requests: Arc::new(AtomicU32::new(0)),
            completed_requests: Arc::new(AtomicU64::new(0)),
            rejected_requests: Arc::new(AtomicU64::new(0)),
            failed_requests: Arc::new(AtomicU64::new(0)),
            start_time: Instant::now(),
        }
    }

    /// Record an incoming transcription request.
    pub fn request_started(&self) {
        let active = self.active_requests.fetch_add(1, Ordering::SeqCst) + 1;
        self.total_requests.fetch_add(1, Ordering::SeqCst);

        // Update the observed concurrency peak
        self.max_concurrent_requests
            .fetch_max(active, Ordering::SeqCst);
    }

    /// Record a request that produced a transcript.
    pub fn request_succeeded(&self) {
        self.active_requests.fetch_sub(1, Ordering::SeqCst);
        self.completed_requests.fetch_add(1, Ordering::SeqCst);
    }

    /// Record a request rejected as malformed.
    pub fn request_rejected(&self) {
        self.active_requests.fetch_sub(1, Ordering::SeqCst);
        self.rejected_requests.fetch_add(1, Ordering::SeqCst);
    }

    /// Record a request that failed during processing.
    pub fn request_failed(&self) {
        self.active_requests.fetch_sub(1, Ordering::SeqCst);
        self.failed_requests.fetch_add(1, Ordering::SeqCst);
    }

    /// Get all metrics as a serde_json::Value.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "uptime_seconds": self.start_time.elapsed().as_secs(),
            "total_requests": self.total_requests.load(Ordering::SeqCst),
            "active_requests": self.active_requests.load(Ordering::SeqCst),
            "max_concurrent_requests": self.max_concurrent_requests.load(Ordering::SeqCst),
            "completed_requests": self.completed_requests.load(Ordering::SeqCst),
            "rejected_requests": self.rejected_requests.load(Ordering::SeqCst),
            "failed_requests": self.failed_requests.load(Ordering::SeqCst),
        })
    }
}

impl Default for ServiceMetrics {
    fn default() -> Self {
        Self::new()
    }
}
