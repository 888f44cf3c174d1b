//! Configuration management for the inventory planner server
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (config/development.toml, config/production.toml)
//! 3. Environment variable overrides with PLANNER__ prefix

use config::{builder::DefaultState, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Log output configuration
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,

    /// Seconds to wait for a pooled connection
    pub acquire_timeout_secs: u64,

    /// Apply pending migrations at startup
    pub run_migrations: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("PLANNER_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        Self::defaults(&environment)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (PLANNER__ prefix)
            .add_source(
                Environment::with_prefix("PLANNER")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Builder seeded with the in-code defaults
    fn defaults(environment: &str) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        config::Config::builder()
            .set_default("environment", environment)?
            .set_default("server.port", 8080)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("database.acquire_timeout_secs", 30)?
            .set_default("database.run_migrations", environment == "development")?
            .set_default("logging.json", false)
    }

    /// Socket address string the server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load_with(environment: &str, overrides: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let mut builder = Config::defaults(environment)?;
        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }
        builder.build()?.try_deserialize()
    }

    #[test]
    fn test_defaults_apply() {
        let config = load_with("development", &[("database.url", "postgres://localhost/test")])
            .unwrap();

        assert_eq!(config.environment, "development");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.database.min_connections, 2);
        assert!(config.database.run_migrations);
        assert!(!config.logging.json);
    }

    #[test]
    fn test_migrations_off_outside_development() {
        let config =
            load_with("production", &[("database.url", "postgres://db/prod")]).unwrap();
        assert!(!config.database.run_migrations);
    }

    #[test]
    fn test_database_url_is_required() {
        assert!(load_with("development", &[]).is_err());
    }

    #[test]
    fn test_overrides_take_precedence() {
        let config = load_with(
            "development",
            &[
                ("database.url", "postgres://localhost/test"),
                ("server.port", "9090"),
                ("logging.json", "true"),
            ],
        )
        .unwrap();

        assert_eq!(config.server.port, 9090);
        assert!(config.logging.json);
    }
}
