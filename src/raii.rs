//! RAII guards for per-request resources.
//!
//! Every upload is spooled to a uniquely named temporary file so the decoder
//! can read it from disk. The guard in this module ties the lifetime of that
//! file to the request: whatever path the handler exits through, dropping the
//! guard removes the file.

use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::warn;
use uuid::Uuid;

use crate::error::{ErrorContext, Result};

/// File extension used for temporary audio uploads.
pub const TEMP_AUDIO_SUFFIX: &str = ".wav";

/// A temporary audio file that is deleted from disk when dropped.
pub struct TempAudioFile {
    path: Option<PathBuf>,
}

impl TempAudioFile {
    /// Write `data` to a uniquely named file under `dir`.
    pub async fn create(dir: &Path, data: &[u8]) -> Result<Self> {
        let path = dir.join(format!(
            "stt-upload-{}{}",
            Uuid::new_v4(),
            TEMP_AUDIO_SUFFIX
        ));
        fs::write(&path, data)
            .await
            .with_context(|| format!("failed to write temporary audio file {}", path.display()))?;
        Ok(Self { path: Some(path) })
    }

    /// Path of the file on disk.
    pub fn path(&self) -> &Path {
        self.path.as_ref().expect("Temp file already taken")
    }

    /// Take ownership of the path and disable deletion.
    pub fn take(mut self) -> PathBuf {
        self.path.take().expect("Temp file already taken")
    }
}

impl Drop for TempAudioFile {
    fn drop(&mut self) {
        if let Some(path) = self.path.take() {
            if path.exists() {
                if let Err(e) = std::fs::remove_file(&path) {
                    warn!(
                        "Failed to delete temporary audio file {}: {}",
                        path.display(),
                        e
                    );
                }
            }
        }
    }
}
