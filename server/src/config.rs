//! Process configuration read from the environment.

use std::time::Duration;

use hunter_core::{DEFAULT_TIMEOUT, HUNTER_API_BASE_URL};
use thiserror::Error;

pub const API_KEY_VAR: &str = "HUNTER_API_KEY";
pub const TIMEOUT_VAR: &str = "HUNTER_TIMEOUT_SECS";
pub const BASE_URL_VAR: &str = "HUNTER_BASE_URL";
pub const HOST_VAR: &str = "HOST";
pub const PORT_VAR: &str = "PORT";

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("HUNTER_TIMEOUT_SECS must be a positive number of seconds, got {0:?}")]
    InvalidTimeout(String),

    #[error("PORT must be a port number, got {0:?}")]
    InvalidPort(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Checked per request, so the server can start without it.
    pub api_key: Option<String>,
    pub timeout: Duration,
    pub base_url: String,
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source; empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let timeout = match var(TIMEOUT_VAR) {
            Some(raw) => parse_timeout(&raw)?,
            None => DEFAULT_TIMEOUT,
        };
        let port = match var(PORT_VAR) {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(raw.clone()))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            api_key: var(API_KEY_VAR),
            timeout,
            base_url: var(BASE_URL_VAR).unwrap_or_else(|| HUNTER_API_BASE_URL.to_string()),
            host: var(HOST_VAR).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    let secs: f64 = raw
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidTimeout(raw.to_string()))?;
    if secs <= 0.0 {
        return Err(ConfigError::InvalidTimeout(raw.to_string()));
    }
    Duration::try_from_secs_f64(secs).map_err(|_| ConfigError::InvalidTimeout(raw.to_string()))
}
