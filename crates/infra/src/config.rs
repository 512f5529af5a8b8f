//! Process configuration, read from environment variables.
//!
//! | variable | default |
//! |----------|---------|
//! | `BIND_ADDR` | `0.0.0.0:8080` |
//! | `STORE_BACKEND` | `memory` (`memory` or `sqlite`) |
//! | `DATABASE_URL` | `sqlite://repairdesk.db` (sqlite backend only) |
//! | `SEED_SAMPLE_DATA` | `false` |
//! | `LOW_STOCK_THRESHOLD` | `5` |
//! | `LOG_FORMAT` | `json` (`json` or `pretty`) |

use std::net::SocketAddr;

use thiserror::Error;

use repairdesk_observability::LogFormat;

use crate::store::StoreBackend;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_DATABASE_URL: &str = "sqlite://repairdesk.db";
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 5;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid {var}={value:?}: {reason}")]
pub struct ConfigError {
    pub var: &'static str,
    pub value: String,
    pub reason: String,
}

impl ConfigError {
    fn new(var: &'static str, value: &str, reason: impl Into<String>) -> Self {
        Self { var, value: value.to_string(), reason: reason.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub store: StoreBackend,
    pub seed_sample_data: bool,
    pub low_stock_threshold: i64,
    pub log_format: LogFormat,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup. Unset and blank variables take
    /// their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bind_raw = var("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .parse()
            .map_err(|e| ConfigError::new("BIND_ADDR", &bind_raw, format!("{e}")))?;

        let store = match var("STORE_BACKEND").as_deref().map(str::to_ascii_lowercase).as_deref() {
            None | Some("memory") => StoreBackend::Memory,
            Some("sqlite") => StoreBackend::Sqlite {
                url: var("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            },
            Some(other) => {
                return Err(ConfigError::new("STORE_BACKEND", other, "expected 'memory' or 'sqlite'"));
            }
        };

        let seed_sample_data = match var("SEED_SAMPLE_DATA") {
            None => false,
            Some(raw) => parse_bool(&raw)
                .ok_or_else(|| ConfigError::new("SEED_SAMPLE_DATA", &raw, "expected a boolean"))?,
        };

        let low_stock_threshold = match var("LOW_STOCK_THRESHOLD") {
            None => DEFAULT_LOW_STOCK_THRESHOLD,
            Some(raw) => match raw.parse::<i64>() {
                Ok(n) if n >= 0 => n,
                Ok(_) => return Err(ConfigError::new("LOW_STOCK_THRESHOLD", &raw, "must not be negative")),
                Err(e) => return Err(ConfigError::new("LOW_STOCK_THRESHOLD", &raw, e.to_string())),
            },
        };

        let log_format = match var("LOG_FORMAT") {
            None => LogFormat::default(),
            Some(raw) => raw
                .parse()
                .map_err(|e: repairdesk_observability::UnknownLogFormat| {
                    ConfigError::new("LOG_FORMAT", &raw, e.to_string())
                })?,
        };

        Ok(Self { bind_addr, store, seed_sample_data, low_stock_threshold, log_format })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
