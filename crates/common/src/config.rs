//! Application configuration.

use serde::Deserialize;
use std::path::Path;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Activity feed configuration.
    #[serde(default)]
    pub feed: FeedConfig,
    /// Popular films configuration.
    #[serde(default)]
    pub popular: PopularConfig,
}

/// Database connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Connection URL (`postgres://...` in production, `sqlite::memory:` in tests).
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// Whether to log every SQL statement at debug level.
    #[serde(default)]
    pub sqlx_logging: bool,
}

/// Activity feed configuration.
///
/// A feed read without a limit returns every matching event.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    /// Upper bound for any caller-supplied limit.
    #[serde(default = "default_feed_max_limit")]
    pub max_limit: u64,
}

/// Popular films configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PopularConfig {
    /// Number of films returned when the caller gives no limit.
    #[serde(default = "default_popular_limit")]
    pub default_limit: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            max_limit: default_feed_max_limit(),
        }
    }
}

impl Default for PopularConfig {
    fn default() -> Self {
        Self {
            default_limit: default_popular_limit(),
        }
    }
}

const fn default_max_connections() -> u32 {
    10
}

const fn default_min_connections() -> u32 {
    1
}

const fn default_feed_max_limit() -> u64 {
    100
}

const fn default_popular_limit() -> u64 {
    10
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `.env` (if present, exported into the process environment)
    /// 2. `config/default.toml`
    /// 3. `config/{environment}.toml` (based on `FILMGRAPH_ENV`)
    /// 4. Environment variables with `FILMGRAPH__` prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let _ = dotenvy::dotenv();
        let env = std::env::var("FILMGRAPH_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("FILMGRAPH")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration from a specific file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("FILMGRAPH")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration from an inline TOML document.
    pub fn from_toml_str(toml: &str) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
    }
}
