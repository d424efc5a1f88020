//! Process settings read from the environment (a `.env` file is honoured by the binary).

use crate::error::ConfigError;
use std::collections::HashMap;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_DATABASE: &str = "Bdd_Systeme_ACRN_NEW.db";
pub const DEFAULT_DESCRIPTION_TABLE: &str = "TableDescriptionChamps";

#[derive(Clone, Debug)]
pub struct Settings {
    /// Path of the SQLite file. Never created by the gateway.
    pub database_path: PathBuf,
    pub bind_addr: String,
    pub port: u16,
    pub max_connections: u32,
    /// Side table holding per-field UI descriptions.
    pub description_table: String,
    pub body_limit_bytes: usize,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Settings::from_env`] but over an explicit key/value map.
    pub fn from_map(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        Self::from_lookup(|key| vars.get(key).cloned())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = get("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE.into());
        let database_path = PathBuf::from(strip_sqlite_scheme(&database_url));
        if database_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid {
                key: "DATABASE_URL",
                value: database_url,
            });
        }
        Ok(Settings {
            database_path,
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| "0.0.0.0".into()),
            port: parse_or("PORT", get("PORT"), 5000)?,
            max_connections: parse_or("DB_MAX_CONNECTIONS", get("DB_MAX_CONNECTIONS"), 5)?,
            description_table: get("DESCRIPTION_TABLE")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_DESCRIPTION_TABLE.into()),
            body_limit_bytes: parse_or("BODY_LIMIT_BYTES", get("BODY_LIMIT_BYTES"), 1024 * 1024)?,
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

/// `sqlite:///path.db` and `sqlite://path.db` both designate `path.db`.
fn strip_sqlite_scheme(url: &str) -> &str {
    url.strip_prefix("sqlite:///")
        .or_else(|| url.strip_prefix("sqlite://"))
        .or_else(|| url.strip_prefix("sqlite:"))
        .unwrap_or(url)
}

fn parse_or<T: FromStr>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(s) => s.trim().parse().map_err(|_| ConfigError::Invalid { key, value: s }),
    }
}
