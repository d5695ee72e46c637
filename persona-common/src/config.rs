//! Configuration loading
//!
//! Resolution priority (highest first):
//! 1. Command-line argument (applied by the binary)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Built-in default
//!
//! The resolved [`AppConfig`] is constructed once at startup and handed to
//! each component constructor; nothing reads configuration from global state.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::models::{SortField, SortOrder};
use crate::{Error, Result};

/// Config file looked up in the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "persona.toml";

pub const ENV_DATABASE_URL: &str = "DB_CONNECTION_STRING";
pub const ENV_PORT: &str = "PORT";
pub const ENV_LOOKUP_API_KEY: &str = "PERSONA_LOOKUP_API_KEY";

/// Complete service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// sqlx connection string, e.g. `sqlite://persona.db?mode=rwc`
    pub database_url: String,

    /// HTTP server port
    pub port: u16,

    pub logging: LoggingConfig,
    pub lookup: LookupConfig,
    pub query: QueryDefaults,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

/// Name-inference sources
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// Optional API key appended as `apikey` to every lookup request
    pub api_key: Option<String>,
    pub age_url: String,
    pub gender_url: String,
    pub nationality_url: String,
    /// Per-request HTTP timeout
    pub timeout_secs: u64,
}

/// Defaults applied by the query assembler when a list request omits a modifier
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryDefaults {
    pub default_page: i64,
    pub default_per_page: i64,
    pub max_per_page: i64,
    pub default_sort_field: String,
    pub default_sort_order: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite://persona.db?mode=rwc".to_string(),
            port: 5050,
            logging: LoggingConfig::default(),
            lookup: LookupConfig::default(),
            query: QueryDefaults::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            age_url: "https://api.agify.io".to_string(),
            gender_url: "https://api.genderize.io".to_string(),
            nationality_url: "https://api.nationalize.io".to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for QueryDefaults {
    fn default() -> Self {
        Self {
            default_page: 0,
            default_per_page: 10,
            max_per_page: 100,
            default_sort_field: "id".to_string(),
            default_sort_order: "asc".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from TOML (if any), then apply environment overrides
    ///
    /// An explicitly given path must exist. Without a path, `persona.toml` in the
    /// working directory is used when present and built-in defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_toml_file(path)?,
            None => {
                let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
                if fallback.exists() {
                    Self::from_toml_file(&fallback)?
                } else {
                    info!("No config file found, using built-in defaults");
                    Self::default()
                }
            }
        };

        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML file; missing keys take built-in defaults
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            warn!("Cannot read config {}: {}", path.display(), e);
            Error::Io(e)
        })?;
        let config = Self::from_toml_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))
    }

    /// Environment variables override TOML values
    pub fn apply_env(&mut self) {
        if let Some(url) = non_blank_env(ENV_DATABASE_URL) {
            self.database_url = url;
        }

        if let Some(port) = non_blank_env(ENV_PORT) {
            match port.parse::<u16>() {
                Ok(port) => self.port = port,
                Err(_) => warn!("Ignoring {}='{}': not a valid port", ENV_PORT, port),
            }
        }

        if let Some(key) = non_blank_env(ENV_LOOKUP_API_KEY) {
            self.lookup.api_key = Some(key);
        }
    }

    /// Reject values the rest of the service cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.database_url.trim().is_empty() {
            return Err(Error::Config("database_url must not be empty".to_string()));
        }
        if self.lookup.timeout_secs == 0 {
            return Err(Error::Config("lookup.timeout_secs must be positive".to_string()));
        }

        let q = &self.query;
        if q.default_page < 0 {
            return Err(Error::Config("query.default_page must be >= 0".to_string()));
        }
        if q.default_per_page < 1 || q.max_per_page < q.default_per_page {
            return Err(Error::Config(format!(
                "query.default_per_page must be in 1..={} (max_per_page)",
                q.max_per_page
            )));
        }
        q.default_sort_field
            .parse::<SortField>()
            .map_err(|e| Error::Config(format!("query.default_sort_field: {}", e)))?;
        q.default_sort_order
            .parse::<SortOrder>()
            .map_err(|e| Error::Config(format!("query.default_sort_order: {}", e)))?;

        Ok(())
    }
}

fn non_blank_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.query.default_sort_field, "id");
        assert_eq!(config.lookup.api_key, None);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            port = 8080

            [query]
            default_per_page = 25
            "#,
        )
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.query.default_per_page, 25);
        assert_eq!(config.query.max_per_page, 100);
        assert_eq!(config.lookup.age_url, "https://api.agify.io");
    }

    #[test]
    fn test_invalid_sort_order_rejected() {
        let mut config = AppConfig::default();
        config.query.default_sort_order = "random".to_string();
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_per_page_above_max_rejected() {
        let mut config = AppConfig::default();
        config.query.default_per_page = 500;
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        let result = AppConfig::from_toml_str("port = \"not a number\"");
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
