//! Process settings read from the environment (`.env` is loaded by the binary first).

use crate::error::ConfigError;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::str::FromStr;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0";
pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost/vetclinic";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_SCHEMA: &str = "clinic";
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(StoreBackend::Postgres),
            "memory" | "mem" => Ok(StoreBackend::Memory),
            other => Err(ConfigError::UnknownBackend(other.to_string())),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Settings {
    pub bind_addr: String,
    pub port: u16,
    pub database_url: String,
    pub max_connections: u32,
    pub schema: String,
    pub cors_origin: String,
    pub backend: StoreBackend,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.into(),
            port: DEFAULT_PORT,
            database_url: DEFAULT_DATABASE_URL.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            schema: DEFAULT_SCHEMA.into(),
            cors_origin: DEFAULT_CORS_ORIGIN.into(),
            backend: StoreBackend::Postgres,
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(std::env::vars().collect())
    }

    /// Settings from an explicit variable map. Missing or empty keys take defaults.
    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self, ConfigError> {
        let get = |key: &str| vars.get(key).map(|v| v.trim()).filter(|v| !v.is_empty());
        let defaults = Settings::default();
        let settings = Settings {
            bind_addr: get("BIND_ADDR").map(str::to_string).unwrap_or(defaults.bind_addr),
            port: parse_or("PORT", get("PORT"), defaults.port)?,
            database_url: get("DATABASE_URL").map(str::to_string).unwrap_or(defaults.database_url),
            max_connections: parse_or("DATABASE_MAX_CONNECTIONS", get("DATABASE_MAX_CONNECTIONS"), defaults.max_connections)?,
            schema: get("CLINIC_SCHEMA").map(str::to_string).unwrap_or(defaults.schema),
            cors_origin: get("CORS_ORIGIN").map(str::to_string).unwrap_or(defaults.cors_origin),
            backend: get("STORE_BACKEND")
                .map(StoreBackend::from_str)
                .transpose()?
                .unwrap_or(defaults.backend),
        };
        if settings.max_connections == 0 {
            return Err(ConfigError::InvalidValue {
                key: "DATABASE_MAX_CONNECTIONS",
                message: "must be at least 1".into(),
            });
        }
        if settings.cors_origin.parse::<axum::http::HeaderValue>().is_err() {
            return Err(ConfigError::InvalidValue {
                key: "CORS_ORIGIN",
                message: format!("'{}' is not a valid header value", settings.cors_origin),
            });
        }
        settings.socket_addr()?;
        Ok(settings)
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.bind_addr, self.port)
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::InvalidValue {
                key: "BIND_ADDR",
                message: e.to_string(),
            })
    }
}

fn parse_or<T: FromStr>(key: &'static str, raw: Option<&str>, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(v) => v.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key,
            message: format!("'{}': {}", v, e),
        }),
    }
}
