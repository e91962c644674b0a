use std::time::Duration;

use config::{Config, ConfigError, Environment as EnvironmentSource, File};
use serde::Deserialize;

use crate::application::services::ClassificationLimits;

use super::Environment;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub model: ModelSettings,
    pub limits: LimitSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelSettings {
    pub provider: ModelProvider,
    pub artifact_path: String,
    pub mock_seed: Option<u64>,
    pub mock_delay_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelProvider {
    Onnx,
    Mock,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LimitSettings {
    pub max_upload_bytes: usize,
    pub max_clip_seconds: f32,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
    pub json: bool,
}

impl Settings {
    /// Layered load: built-in defaults, then `appsettings.{env}.toml` if
    /// present, then `APP__SECTION__KEY` environment variables.
    pub fn load(environment: Environment) -> Result<Self, ConfigError> {
        Self::builder()?
            .add_source(
                File::with_name(&environment.settings_file()).required(false),
            )
            .add_source(
                EnvironmentSource::with_prefix("APP")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Settings from the built-in defaults only.
    pub fn defaults() -> Result<Self, ConfigError> {
        Self::builder()?.build()?.try_deserialize()
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8001)?
            .set_default("model.provider", "onnx")?
            .set_default("model.artifact_path", "model/respire.onnx")?
            .set_default("model.mock_delay_ms", 0)?
            .set_default("limits.max_upload_bytes", 10 * 1024 * 1024)?
            .set_default("limits.max_clip_seconds", 5.0)?
            .set_default("limits.request_timeout_secs", 30)?
            .set_default("logging.level", "info,respire=debug,tower_http=debug")?
            .set_default("logging.json", false)
    }
}

impl LimitSettings {
    pub fn to_limits(&self) -> ClassificationLimits {
        ClassificationLimits {
            max_upload_bytes: self.max_upload_bytes,
            max_clip_seconds: self.max_clip_seconds,
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }
}
