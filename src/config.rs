// src/config.rs

use std::env;
use std::net::SocketAddr;
use thiserror::Error;

/// A `SITETRACK_*` variable holds a value the server cannot start with.
#[derive(Debug, Error)]
#[error("{key}: {reason}, got '{value}'")]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
    pub reason: String,
}

impl ConfigError {
    fn new(key: &'static str, value: &str, reason: impl Into<String>) -> Self {
        Self {
            key,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// Runtime settings, read once at startup from `SITETRACK_*` variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_path: String,
    pub schema_path: String,
    pub addr: SocketAddr,
    pub workers: usize,
    /// Grant every permission to every request. Development only.
    pub trust_all: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: "sitetrack.sqlite3".to_string(),
            schema_path: "sql/schema.sql".to_string(),
            addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            workers: 8,
            trust_all: false,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from any key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup("SITETRACK_DB") {
            config.db_path = path;
        }
        if let Some(path) = lookup("SITETRACK_SCHEMA") {
            config.schema_path = path;
        }
        if let Some(addr) = lookup("SITETRACK_ADDR") {
            config.addr = addr
                .parse::<SocketAddr>()
                .map_err(|e| ConfigError::new("SITETRACK_ADDR", &addr, e.to_string()))?;
        }
        if let Some(workers) = lookup("SITETRACK_WORKERS") {
            config.workers = match workers.parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::new(
                        "SITETRACK_WORKERS",
                        &workers,
                        "must be a positive integer",
                    ))
                }
            };
        }
        if let Some(flag) = lookup("SITETRACK_TRUST_ALL") {
            config.trust_all = match flag.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                _ => {
                    return Err(ConfigError::new(
                        "SITETRACK_TRUST_ALL",
                        &flag,
                        "expected one of 1/0/true/false/yes/no",
                    ))
                }
            };
        }

        Ok(config)
    }
}
