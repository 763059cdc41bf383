//! Application configuration structs
//!
//! Loads configuration from environment variables.

use serde::Deserialize;
use std::env;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub gateway: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub snowflake: SnowflakeConfig,
    pub fanout: FanoutConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

/// Gateway server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Access-token verification configuration
///
/// Tokens are minted by the identity collaborator; this service only
/// verifies signatures, so a shared secret is all it needs.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    pub secret: String,
}

/// Snowflake ID generator configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SnowflakeConfig {
    #[serde(default)]
    pub worker_id: u16,
}

/// Fan-out queue and per-entity mutation lock configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FanoutConfig {
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
    #[serde(default = "default_lock_wait_ms")]
    pub lock_wait_ms: u64,
}

// Default value functions
fn default_app_name() -> String {
    "forum-fabric".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    5
}

fn default_queue_capacity() -> usize {
    1024
}

fn default_lock_wait_ms() -> u64 {
    5000
}

/// Read an environment variable and parse it, keeping "absent" and
/// "present but malformed" distinct
fn parse_var<T: std::str::FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue(name, raw)),
        Err(_) => Ok(None),
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or
    /// fail to parse
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Ok(Self {
            app: AppSettings {
                name: env::var("APP_NAME").unwrap_or_else(|_| default_app_name()),
                env: env::var("APP_ENV")
                    .ok()
                    .and_then(|s| match s.to_lowercase().as_str() {
                        "production" => Some(Environment::Production),
                        "staging" => Some(Environment::Staging),
                        "development" => Some(Environment::Development),
                        _ => None,
                    })
                    .unwrap_or_default(),
            },
            gateway: ServerConfig {
                host: env::var("GATEWAY_HOST").unwrap_or_else(|_| default_host()),
                port: parse_var("GATEWAY_PORT")?
                    .ok_or(ConfigError::MissingVar("GATEWAY_PORT"))?,
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").map_err(|_| ConfigError::MissingVar("DATABASE_URL"))?,
                max_connections: parse_var("DATABASE_MAX_CONNECTIONS")?
                    .unwrap_or_else(default_max_connections),
                min_connections: parse_var("DATABASE_MIN_CONNECTIONS")?
                    .unwrap_or_else(default_min_connections),
            },
            auth: AuthConfig {
                secret: env::var("JWT_SECRET").map_err(|_| ConfigError::MissingVar("JWT_SECRET"))?,
            },
            snowflake: SnowflakeConfig {
                worker_id: parse_var("WORKER_ID")?.unwrap_or(0),
            },
            fanout: FanoutConfig {
                queue_capacity: parse_var("FANOUT_QUEUE_CAPACITY")?
                    .unwrap_or_else(default_queue_capacity),
                lock_wait_ms: parse_var("MUTATION_LOCK_WAIT_MS")?
                    .unwrap_or_else(default_lock_wait_ms),
            },
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
