use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

/// Fallback signing secret, only ever accepted in development.
const DEV_JWT_SECRET: &str = "mygram-dev-secret-change-me";

/// Upper bound for SECURITY_JWT_EXPIRY_HOURS (ten years)
pub const MAX_JWT_EXPIRY_HOURS: u64 = 24 * 365 * 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Full connection URL, either taken from DATABASE_URL or assembled from PG* variables
    #[serde(skip_serializing)]
    pub url: String,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub port: u16,
    pub enable_request_logging: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
    pub cors_origins: Vec<String>,
}

/// Connection parameters read from the PG* variables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PgParams {
    pub host: String,
    pub user: String,
    pub password: String,
    pub dbname: String,
    pub port: u16,
}

impl PgParams {
    fn from_env() -> Result<Self, ConfigError> {
        let port_raw = required("PGPORT")?;
        let port = port_raw.parse().map_err(|_| ConfigError::Invalid {
            name: "PGPORT",
            value: port_raw.clone(),
        })?;

        Ok(Self {
            host: required("PGHOST")?,
            user: required("PGUSER")?,
            password: required("PGPASSWORD")?,
            dbname: required("PGDBNAME")?,
            port,
        })
    }

    /// Build a postgres:// URL with percent-encoded credentials
    pub fn to_url(&self) -> Result<String, ConfigError> {
        let invalid = |value: &str| ConfigError::Invalid {
            name: "PGHOST",
            value: value.to_string(),
        };

        let mut url = url::Url::parse(&format!("postgres://{}", self.host))
            .map_err(|_| invalid(&self.host))?;
        url.set_username(&self.user).map_err(|_| invalid(&self.host))?;
        url.set_password(Some(&self.password)).map_err(|_| invalid(&self.host))?;
        url.set_port(Some(self.port)).map_err(|_| invalid(&self.host))?;
        url.set_path(&format!("/{}", self.dbname));
        url.set_query(Some("sslmode=disable"));
        Ok(url.into())
    }
}

impl AppConfig {
    /// Load configuration from the process environment.
    ///
    /// Database settings are mandatory; a missing variable is returned as an
    /// error so the binary can refuse to start.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(true)
    }

    /// Same as `from_env`, but the PG* variables are not consulted
    pub fn from_env_in_memory() -> Result<Self, ConfigError> {
        Self::load(false)
    }

    fn load(require_database: bool) -> Result<Self, ConfigError> {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        let database_url = match env::var("DATABASE_URL") {
            _ if !require_database => String::new(),
            Ok(url) if !url.trim().is_empty() => url,
            _ => PgParams::from_env()?.to_url()?,
        };

        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => secret,
            _ if environment == Environment::Development => {
                tracing::warn!("JWT_SECRET not set, using development secret");
                DEV_JWT_SECRET.to_string()
            }
            _ => return Err(ConfigError::Missing("JWT_SECRET")),
        };

        let config = Self::defaults(environment, database_url, jwt_secret).with_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Reject values that parse but cannot be used
    pub fn validate(&self) -> Result<(), ConfigError> {
        let hours = self.security.jwt_expiry_hours;
        if hours == 0 || hours > MAX_JWT_EXPIRY_HOURS {
            return Err(ConfigError::Invalid {
                name: "SECURITY_JWT_EXPIRY_HOURS",
                value: hours.to_string(),
            });
        }
        Ok(())
    }

    /// Configuration for running without PostgreSQL (in-memory store, tests)
    pub fn in_memory(jwt_secret: impl Into<String>) -> Self {
        Self::defaults(Environment::Development, String::new(), jwt_secret.into())
    }

    fn with_env_overrides(mut self) -> Self {
        // Database overrides
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }

        // API overrides
        if let Some(port) = env::var("MYGRAM_API_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|s| s.parse::<u16>().ok())
        {
            self.api.port = port;
        }
        if let Ok(v) = env::var("API_ENABLE_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Ok(v) = env::var("SECURITY_JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }

        self
    }

    fn defaults(environment: Environment, url: String, jwt_secret: String) -> Self {
        let (max_connections, connection_timeout, enable_request_logging, cors_origins) =
            match environment {
                Environment::Development => (
                    10,
                    30,
                    true,
                    vec!["http://localhost:3000".to_string(), "http://localhost:5173".to_string()],
                ),
                Environment::Staging => (20, 10, true, vec!["https://staging.example.com".to_string()]),
                Environment::Production => (50, 5, false, vec!["https://app.example.com".to_string()]),
            };

        Self {
            environment,
            database: DatabaseConfig {
                url,
                max_connections,
                connection_timeout,
            },
            api: ApiConfig {
                port: 8080,
                enable_request_logging,
            },
            security: SecurityConfig {
                jwt_secret,
                jwt_expiry_hours: 24,
                cors_origins,
            },
        }
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(v) if !v.is_empty() => Ok(v),
        _ => Err(ConfigError::Missing(name)),
    }
}
