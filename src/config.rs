//! Application-wide configuration.
//!
//! This module centralizes all configuration values, whether loaded from environment
//! variables, configuration files, or built-in defaults.

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{AppError, Result};

/// Serde helper for Duration serialization/deserialization as seconds
mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

// Default value functions for serde defaults
fn default_max_upload_bytes() -> usize {
    25 * 1024 * 1024 // 25MB
}
fn default_n_threads() -> usize {
    0 // auto-detect
}

/// Application configuration loaded from multiple sources
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server host
    pub server_host: String,

    /// HTTP server port
    pub server_port: u16,

    /// Path to the ggml whisper model file
    pub model_path: PathBuf,

    /// Model name reported by the health endpoint
    pub model_name: String,

    /// Language hint passed to the decoder (ISO 639-1 code)
    pub language: String,

    /// Timeout for a single transcription request
    #[serde(with = "duration_secs")]
    pub inference_timeout: Duration,

    /// Maximum accepted upload size in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    /// Threads used per inference run (0 = auto-detect)
    #[serde(default = "default_n_threads")]
    pub n_threads: usize,

    /// Directory for temporary audio files (system temp dir if unset)
    #[serde(default)]
    pub temp_dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from multiple sources with precedence:
    /// 1. Environment variables (highest priority)
    /// 2. config.toml (if exists)
    /// 3. Built-in defaults (lowest priority)
    pub fn load() -> Result<Self> {
        let config: Config = Figment::new()
            .merge(Self::default_figment())
            .merge(Toml::file("config.toml"))
            .merge(Env::prefixed("STT_"))
            // Bare LANGUAGE stays off this list: it is the glibc locale
            // variable, and values like "en_US:en" are not decoder hints.
            .merge(Env::raw().only(&[
                "SERVER_HOST",
                "SERVER_PORT",
                "MODEL_PATH",
                "MODEL_NAME",
            ]))
            .extract()
            .map_err(|e| AppError::Config(format!("Failed to load configuration: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Generate default configuration values
    fn default_figment() -> Figment {
        use figment::providers::Serialized;

        Figment::from(Serialized::defaults(Config {
            server_host: "127.0.0.1".to_string(),
            server_port: 5000,
            model_path: PathBuf::from("models/ggml-base.bin"),
            model_name: "whisper-base".to_string(),
            language: "ko".to_string(),
            inference_timeout: Duration::from_secs(120),
            max_upload_bytes: default_max_upload_bytes(),
            n_threads: default_n_threads(),
            temp_dir: None,
        }))
    }

    /// Directory where per-request temporary audio files are written.
    pub fn resolved_temp_dir(&self) -> PathBuf {
        self.temp_dir.clone().unwrap_or_else(std::env::temp_dir)
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        if self.server_host.is_empty() {
            return Err(AppError::Config(
                "SERVER_HOST cannot be empty".to_string(),
            ));
        }

        if self.server_port < 1024 {
            return Err(AppError::Config(
                "SERVER_PORT must be between 1024 and 65535".to_string(),
            ));
        }

        validate_path(&self.model_path, "MODEL_PATH")?;
        if let Some(temp_dir) = &self.temp_dir {
            validate_path(temp_dir, "TEMP_DIR")?;
        }

        if self.model_name.is_empty() {
            return Err(AppError::Config(
                "MODEL_NAME cannot be empty".to_string(),
            ));
        }

        if self.language.is_empty()
            || self.language.len() > 16
            || !self
                .language
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(AppError::Config(
                "LANGUAGE must be a short alphanumeric language code".to_string(),
            ));
        }

        if self.inference_timeout.as_secs() == 0 || self.inference_timeout.as_secs() > 3600 {
            return Err(AppError::Config(
                "INFERENCE_TIMEOUT_SECS must be between 1 and 3600 seconds".to_string(),
            ));
        }

        if self.max_upload_bytes < 1024 {
            return Err(AppError::Config(
                "MAX_UPLOAD_BYTES must be at least 1024".to_string(),
            ));
        }

        if self.n_threads > 256 {
            return Err(AppError::Config(
                "N_THREADS must be at most 256".to_string(),
            ));
        }

        Ok(())
    }
}

/// Validate a file path for obviously unsafe components.
fn validate_path(path: &Path, field_name: &str) -> Result<()> {
    let path_str = path.to_string_lossy();

    // Allow simple relative paths like models/ggml-base.bin, but reject
    // traversal chains and embedded junk that has no place in a config value.
    if path_str.contains("../..") || path_str.contains("//") {
        return Err(AppError::Config(format!(
            "{} contains potentially unsafe path components",
            field_name
        )));
    }

    if path_str.contains('\0') {
        return Err(AppError::Config(format!(
            "{} contains null bytes",
            field_name
        )));
    }

    if path_str.chars().any(|c| c.is_control() && c != '\t') {
        return Err(AppError::Config(format!(
            "{} contains invalid control characters",
            field_name
        )));
    }

    if path_str.len() > 4096 {
        return Err(AppError::Config(format!(
            "{} is too long (max 4096 characters)",
            field_name
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config::default_figment().extract().unwrap()
    }

    #[test]
    fn defaults_are_valid() {
        let config = base_config();
        assert_eq!(config.server_host, "127.0.0.1");
        assert_eq!(config.server_port, 5000);
        assert_eq!(config.model_name, "whisper-base");
        assert_eq!(config.language, "ko");
        assert_eq!(config.inference_timeout, Duration::from_secs(120));
        assert_eq!(config.max_upload_bytes, 25 * 1024 * 1024);
        config.validate().unwrap();
    }

    #[test]
    fn resolved_temp_dir_falls_back_to_system() {
        let mut config = base_config();
        config.temp_dir = None;
        assert_eq!(config.resolved_temp_dir(), std::env::temp_dir());

        config.temp_dir = Some(PathBuf::from("/var/lib/stt"));
        assert_eq!(config.resolved_temp_dir(), PathBuf::from("/var/lib/stt"));
    }

    #[test]
    fn privileged_ports_are_rejected() {
        let mut config = base_config();
        config.server_port = 80;
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let mut config = base_config();
        config.inference_timeout = Duration::from_secs(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn ambient_locale_variables_are_ignored() {
        // Locale-configured hosts export LANGUAGE=en_US:en; that value must
        // neither steer the decoder nor fail validation.
        std::env::set_var("LANGUAGE", "en_US:en");
        std::env::set_var("STT_LANGUAGE", "ja");

        let config = Config::load().unwrap();
        assert_eq!(config.language, "ja");

        std::env::remove_var("LANGUAGE");
        std::env::remove_var("STT_LANGUAGE");
    }

    #[test]
    fn malformed_language_codes_are_rejected() {
        let mut config = base_config();
        config.language = String::new();
        assert!(config.validate().is_err());

        config.language = "ko; rm -rf".to_string();
        assert!(config.validate().is_err());

        config.language = "en".to_string();
        config.validate().unwrap();
    }

    #[test]
    fn traversal_heavy_model_paths_are_rejected() {
        let mut config = base_config();
        config.model_path = PathBuf::from("../../../../etc/passwd");
        assert!(config.validate().is_err());
    }

    #[test]
    fn tiny_upload_limits_are_rejected() {
        let mut config = base_config();
        config.max_upload_bytes = 16;
        assert!(config.validate().is_err());
    }
}
