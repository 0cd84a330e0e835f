use std::time::Duration;

use config::{Config, Environment, File, FileFormat};
use secrecy::Secret;
use serde::Deserialize;
use thiserror::Error;
use vericode_core::VerificationSettings;

use super::constants::{CONFIG_FILE, env, prod};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to load configuration: {0}")]
    Config(#[from] config::ConfigError),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PostmarkSettings {
    pub base_url: String,
    pub sender: String,
    pub auth_token: Secret<String>,
    pub timeout_in_millis: u64,
}

impl PostmarkSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_in_millis)
    }
}

impl Default for PostmarkSettings {
    fn default() -> Self {
        Self {
            base_url: prod::email_client::BASE_URL.to_string(),
            sender: String::new(),
            auth_token: Secret::new(String::new()),
            timeout_in_millis: prod::email_client::TIMEOUT_IN_MILLIS,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RedisSettings {
    pub host_name: String,
}

impl RedisSettings {
    pub fn url(&self) -> String {
        format!("redis://{}/", self.host_name)
    }
}

impl Default for RedisSettings {
    fn default() -> Self {
        Self {
            host_name: prod::redis::HOST_NAME.to_string(),
        }
    }
}

/// Everything the verification service reads from its environment.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VericodeSettings {
    pub verification: VerificationSettings,
    pub postmark: PostmarkSettings,
    pub redis: RedisSettings,
    /// How often the in-memory store purges expired codes.
    pub sweep_interval_seconds: u64,
}

impl Default for VericodeSettings {
    fn default() -> Self {
        Self {
            verification: VerificationSettings::default(),
            postmark: PostmarkSettings::default(),
            redis: RedisSettings::default(),
            sweep_interval_seconds: prod::SWEEP_INTERVAL_SECONDS,
        }
    }
}

impl VericodeSettings {
    /// Load `.env`, then the optional settings file, then `VERICODE__*`
    /// environment overrides, in increasing precedence.
    pub fn load() -> Result<Self, SettingsError> {
        dotenvy::dotenv().ok();

        let environment = env::LIST_KEYS.iter().fold(
            Environment::with_prefix(env::ENV_PREFIX)
                .prefix_separator(env::ENV_SEPARATOR)
                .separator(env::ENV_SEPARATOR)
                .list_separator(env::LIST_SEPARATOR)
                .try_parsing(true),
            |environment, key| environment.with_list_parse_key(key),
        );

        let settings = Config::builder()
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(environment)
            .build()?
            .try_deserialize()?;

        tracing::debug!(event = "settings_loaded", "Loaded verification settings");
        Ok(settings)
    }

    /// Parse settings from a JSON document, filling gaps with defaults.
    pub fn from_json(document: &str) -> Result<Self, SettingsError> {
        Ok(Config::builder()
            .add_source(File::from_str(document, FileFormat::Json))
            .build()?
            .try_deserialize()?)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_seconds)
    }
}
