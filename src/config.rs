use std::{env, net::SocketAddr, time::Duration};

use thiserror::Error;

pub const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub port: u16,
    pub log_level: String,
    pub environment: String,
    pub tool_timeout: Option<Duration>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("PORT must be a valid u16")]
    InvalidPort,
    #[error("LOG_LEVEL must be one of: error, warn, info, debug, trace")]
    InvalidLogLevel,
    #[error("TOOL_TIMEOUT_MS must be a non-negative integer")]
    InvalidToolTimeout,
    #[error("invalid bind address or port")]
    InvalidSocket,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key/value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let bind_addr = read("BIND_ADDR").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = read("PORT")
            .map(|value| value.parse::<u16>().map_err(|_| ConfigError::InvalidPort))
            .transpose()?
            .unwrap_or(3000);

        let log_level = read("LOG_LEVEL")
            .map(|value| value.to_ascii_lowercase())
            .unwrap_or_else(|| "info".to_string());
        if !LOG_LEVELS.contains(&log_level.as_str()) {
            return Err(ConfigError::InvalidLogLevel);
        }

        let environment = read("APP_ENV").unwrap_or_else(|| "development".to_string());

        let timeout_ms = read("TOOL_TIMEOUT_MS")
            .map(|value| {
                value
                    .parse::<u64>()
                    .map_err(|_| ConfigError::InvalidToolTimeout)
            })
            .transpose()?
            .unwrap_or(30_000);
        let tool_timeout = (timeout_ms > 0).then(|| Duration::from_millis(timeout_ms));

        let config = Self {
            bind_addr,
            port,
            log_level,
            environment,
            tool_timeout,
        };

        let _ = config.bind_socket()?;
        Ok(config)
    }

    pub fn bind_socket(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.bind_addr, self.port)
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidSocket)
    }
}
