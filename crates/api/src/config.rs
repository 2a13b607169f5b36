//! Server configuration, read from the environment.
//!
//! | Variable | Default |
//! |---|---|
//! | `SHOPLEDGER_ADDR` | `0.0.0.0:3000` |
//! | `SHOPLEDGER_DATA_FILE` | `shop-data.json` |
//! | `SHOPLEDGER_BODY_LIMIT` | `10485760` (bytes) |
//!
//! Unparseable values fall back to the default with a warning rather than
//! aborting startup.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

pub const ADDR_ENV: &str = "SHOPLEDGER_ADDR";
pub const DATA_FILE_ENV: &str = "SHOPLEDGER_DATA_FILE";
pub const BODY_LIMIT_ENV: &str = "SHOPLEDGER_BODY_LIMIT";

const DEFAULT_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_DATA_FILE: &str = "shop-data.json";
const DEFAULT_BODY_LIMIT: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub data_file: PathBuf,
    /// Largest accepted request body; restores upload the whole document.
    pub body_limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup (the environment in production).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let data_file = lookup(DATA_FILE_ENV)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.data_file);

        Self {
            addr: parse_or(ADDR_ENV, lookup(ADDR_ENV), defaults.addr),
            data_file,
            body_limit: parse_or(BODY_LIMIT_ENV, lookup(BODY_LIMIT_ENV), defaults.body_limit),
        }
    }
}

fn parse_or<T: FromStr>(key: &str, raw: Option<String>, default: T) -> T {
    let Some(raw) = raw else {
        return default;
    };
    match raw.trim().parse() {
        Ok(v) => v,
        Err(_) => {
            tracing::warn!(key, value = %raw, "ignoring invalid configuration value; using default");
            default
        }
    }
}
