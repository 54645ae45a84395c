//! Environment-driven configuration shared by both services.
//!
//! Configuration is read once at startup into explicit structs. Every loader
//! takes a lookup function instead of reading the process environment
//! directly, so tests can supply variables without touching global state.

use std::time::Duration;

use thiserror::Error;

/// Port used when `PORT` is unset or empty.
pub const DEFAULT_PORT: u16 = 80;

/// Drain deadline used when `SHUTDOWN_TIMEOUT_SECS` is unset or empty.
pub const DEFAULT_DRAIN_TIMEOUT: Duration = Duration::from_secs(30);

/// A configuration problem detected at startup. Always fatal.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {var}")]
    Missing { var: String },

    #[error("invalid value '{value}' for {var}: {reason}")]
    Invalid {
        var: String,
        value: String,
        reason: String,
    },
}

/// Reads the process environment. Unset and non-UTF-8 variables are `None`.
pub fn env_lookup(var: &str) -> Option<String> {
    std::env::var(var).ok()
}

/// Returns the value of `var`, treating an empty value as missing.
pub fn required<F>(lookup: &F, var: &str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ConfigError::Missing {
            var: var.to_string(),
        }),
    }
}

/// Parses the value of `var`, or returns `None` if it is unset or empty.
pub fn optional<F, T>(lookup: &F, var: &str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(var) {
        Some(v) if !v.is_empty() => v.trim().parse().map(Some).map_err(|e: T::Err| {
            ConfigError::Invalid {
                var: var.to_string(),
                value: v.clone(),
                reason: e.to_string(),
            }
        }),
        _ => Ok(None),
    }
}

/// Listener settings common to both services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// TCP port to listen on (`PORT`).
    pub port: u16,
    /// Longest time in-flight requests may run after a shutdown signal
    /// (`SHUTDOWN_TIMEOUT_SECS`).
    pub drain_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            drain_timeout: DEFAULT_DRAIN_TIMEOUT,
        }
    }
}

impl ServerConfig {
    /// Loads settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&env_lookup)
    }

    /// Loads settings through `lookup`.
    pub fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match optional::<_, u16>(lookup, "PORT")? {
            Some(port) => port,
            None => {
                tracing::info!(port = DEFAULT_PORT, "No PORT provided, using default");
                DEFAULT_PORT
            }
        };

        let drain_timeout = optional::<_, u64>(lookup, "SHUTDOWN_TIMEOUT_SECS")?
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_DRAIN_TIMEOUT);

        Ok(Self {
            port,
            drain_timeout,
        })
    }
}
