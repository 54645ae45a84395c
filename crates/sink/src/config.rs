//! Sink service configuration.

use server::config::{env_lookup, required};
use server::{ConfigError, ServerConfig};

/// Everything the sink service needs at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkConfig {
    /// Chat webhook messages are posted to (`GCHAT_WEBHOOK_URL`). Required.
    pub webhook_url: String,
    /// Listener settings.
    pub server: ServerConfig,
}

impl SinkConfig {
    /// Loads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&env_lookup)
    }

    /// Loads the configuration through `lookup`.
    pub fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            webhook_url: required(lookup, "GCHAT_WEBHOOK_URL")?,
            server: ServerConfig::from_lookup(lookup)?,
        })
    }
}
