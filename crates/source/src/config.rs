//! Source service configuration.

use server::config::{env_lookup, required};
use server::{ConfigError, ServerConfig};

/// Everything the source service needs at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    /// URL generated events are forwarded to (`SINK`). Required.
    pub sink: String,
    /// Listener settings.
    pub server: ServerConfig,
}

impl SourceConfig {
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
            sink: required(lookup, "SINK")?,
            server: ServerConfig::from_lookup(lookup)?,
        })
    }
}
