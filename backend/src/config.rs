use crate::validation::Strategy;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value '{value}' for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Server settings, read from the environment.
///
/// | Variable | Default |
/// |---|---|
/// | `CATALOG_HOST` | `127.0.0.1` |
/// | `PORT` | `8080` |
/// | `CATALOG_DB_PATH` | `catalog.sqlite` (`:memory:` keeps everything in RAM) |
/// | `CATALOG_VALIDATOR` | `declarative` (or `manual`) |
/// | `CATALOG_JSON_LIMIT` | `1048576` bytes |
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub db_path: String,
    pub validator: Strategy,
    pub json_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            db_path: "catalog.sqlite".to_string(),
            validator: Strategy::Declarative,
            json_limit: 1024 * 1024,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Unset keys keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = AppConfig::default();

        if let Some(host) = lookup("CATALOG_HOST") {
            config.host = host;
        }
        if let Some(port) = lookup("PORT") {
            config.port = parse("PORT", port, |v| v.parse::<u16>().map_err(|e| e.to_string()))?;
        }
        if let Some(path) = lookup("CATALOG_DB_PATH") {
            config.db_path = path;
        }
        if let Some(strategy) = lookup("CATALOG_VALIDATOR") {
            config.validator = parse("CATALOG_VALIDATOR", strategy, |v| v.parse::<Strategy>())?;
        }
        if let Some(limit) = lookup("CATALOG_JSON_LIMIT") {
            config.json_limit = parse("CATALOG_JSON_LIMIT", limit, |v| {
                v.parse::<usize>().map_err(|e| e.to_string())
            })?;
        }

        Ok(config)
    }

    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

fn parse<T>(
    key: &'static str,
    value: String,
    f: impl FnOnce(&str) -> Result<T, String>,
) -> Result<T, ConfigError> {
    f(&value).map_err(|reason| ConfigError::Invalid { key, value, reason })
}
