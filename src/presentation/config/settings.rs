use std::collections::HashMap;

use config::{Config, Environment as EnvironmentSource, File};
use serde::Deserialize;
use uuid::Uuid;

/// Typed application settings. Every field has a default so the server
/// starts from a bare environment; `parlance.toml` and `APP__`-prefixed
/// environment variables override.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub provider: ProviderSettings,
    pub staging: StagingSettings,
    pub intake: IntakeSettings,
    pub polling: PollingSettings,
    pub database: DatabaseSettings,
    pub auth: AuthSettings,
    pub logging: LoggingSettings,
}

impl Settings {
    pub fn load() -> Result<Self, config::ConfigError> {
        let configuration = Config::builder()
            .add_source(File::with_name("parlance").required(false))
            .add_source(EnvironmentSource::with_prefix("APP").separator("__"))
            .build()?;

        configuration.try_deserialize()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    pub api_key: String,
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StagingSettings {
    pub dir: String,
}

impl Default for StagingSettings {
    fn default() -> Self {
        Self {
            dir: "uploads".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IntakeSettings {
    pub min_file_bytes: u64,
    pub max_file_bytes: u64,
}

impl Default for IntakeSettings {
    fn default() -> Self {
        Self {
            min_file_bytes: 1000,
            max_file_bytes: 50 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PollingSettings {
    pub interval_secs: u64,
    pub max_ticks: u32,
}

impl Default for PollingSettings {
    fn default() -> Self {
        Self {
            interval_secs: 3,
            max_ticks: 60,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub url: Option<String>,
    pub max_connections: u32,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 10,
        }
    }
}

/// Accepted bearer tokens mapped to the account each one authenticates.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    pub tokens: HashMap<String, Uuid>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub enable_json: bool,
}
