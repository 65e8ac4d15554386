//! Startup configuration, read once from the environment.

use std::num::ParseIntError;

/// Optional dotenv file loaded before the environment is read.
pub const ENV_FILE: &str = "config/.env";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_ENVIRONMENT: &str = "development";
const DEFAULT_MONGO_DB: &str = "todos";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Environment-mode label; informational only.
    pub environment: String,
    /// MongoDB connection string. Unset means the in-memory store.
    pub mongo_uri: Option<String>,
    pub mongo_db: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid PORT {value:?}: {source}")]
    InvalidPort { value: String, source: ParseIntError },
}

/// Load `config/.env` into the process environment if present.
///
/// Variables already set in the environment win over the file.
pub fn load_env_file() -> bool {
    dotenv::from_path(ENV_FILE).is_ok()
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let port = match get("PORT") {
            Some(value) => value
                .trim()
                .parse()
                .map_err(|source| ConfigError::InvalidPort { value, source })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            host: get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            environment: get("APP_ENV").unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string()),
            mongo_uri: get("MONGO_URI"),
            mongo_db: get("MONGO_DB").unwrap_or_else(|| DEFAULT_MONGO_DB.to_string()),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
