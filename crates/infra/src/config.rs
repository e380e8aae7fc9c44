//! Process configuration loaded from the environment.

use std::net::SocketAddr;

use thiserror::Error;

pub const BIND_ADDR_VAR: &str = "ORDERMANAGER_BIND_ADDR";
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";
pub const DB_MAX_CONNECTIONS_VAR: &str = "ORDERMANAGER_DB_MAX_CONNECTIONS";
pub const UNIT_PRICE_VAR: &str = "ORDERMANAGER_PLACEHOLDER_UNIT_PRICE";

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} has an invalid value {value:?}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    /// Postgres connection string. `None` selects the in-memory store.
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    /// Price applied to every order line, in cents.
    pub unit_price: u64,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let defaults = Self::default();

        let bind_addr = parse_or(BIND_ADDR_VAR, get(BIND_ADDR_VAR), defaults.bind_addr)?;

        let db_max_connections = parse_or(
            DB_MAX_CONNECTIONS_VAR,
            get(DB_MAX_CONNECTIONS_VAR),
            defaults.db_max_connections,
        )?;
        if db_max_connections == 0 {
            return Err(invalid(DB_MAX_CONNECTIONS_VAR, "0", "must be at least 1"));
        }

        let unit_price = parse_or(UNIT_PRICE_VAR, get(UNIT_PRICE_VAR), defaults.unit_price)?;

        Ok(Self {
            bind_addr,
            database_url: get(DATABASE_URL_VAR),
            db_max_connections,
            unit_price,
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            database_url: None,
            db_max_connections: DEFAULT_DB_MAX_CONNECTIONS,
            unit_price: ordermanager_orders::DEFAULT_UNIT_PRICE,
        }
    }
}

fn parse_or<T>(var: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e| invalid(var, &raw, e)),
    }
}

fn invalid(var: &'static str, value: &str, reason: impl std::fmt::Display) -> ConfigError {
    ConfigError::Invalid {
        var,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
