//! Server Configuration
//!
//! Layered with the `config` crate: built-in defaults, then an optional
//! `satisfaction.toml` (or the file given on the command line), then
//! `SATISFACTION__*` environment variables.

use crate::error::ApiError;
use crate::rate_limit::RateLimitConfig;
use config::{Config, Environment, File};
use data_validator::ValidationConfig;
use inference_engine::ArtifactPaths;
use serde::{Deserialize, Serialize};

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address
    pub addr: String,
    /// Sessions whose latest result is retained
    pub max_sessions: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "0.0.0.0:8080".to_string(),
            max_sessions: 10_000,
        }
    }
}

/// Log output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Max level: trace, debug, info, warn or error
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub artifacts: ArtifactPaths,
    pub rate_limit: RateLimitConfig,
    pub logging: LoggingConfig,
    pub validation: ValidationConfig,
}

impl AppConfig {
    /// Load configuration. An explicit `path` must exist; the default
    /// `satisfaction.toml` is optional.
    pub fn load(path: Option<&str>) -> Result<Self, ApiError> {
        let file = match path {
            Some(path) => File::with_name(path).required(true),
            None => File::with_name("satisfaction").required(false),
        };

        let config = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix("SATISFACTION")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }
}
