use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing configuration: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageBackend {
    Supabase,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub backend: StorageBackend,
    pub supabase_url: Option<String>,
    #[serde(skip_serializing)]
    pub supabase_key: Option<String>,
    pub request_timeout_secs: u64,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    #[serde(skip_serializing)]
    pub secret_key: String,
    pub algorithm: jsonwebtoken::Algorithm,
    pub access_token_expire_minutes: i64,
    pub cors_origins: Vec<String>,
}

// Keeps the signing secret out of `{:?}` output.
impl std::fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("secret_key", &"<redacted>")
            .field("algorithm", &self.algorithm)
            .field("access_token_expire_minutes", &self.access_token_expire_minutes)
            .field("cors_origins", &self.cors_origins)
            .finish()
    }
}

/// Minimum signing secret length accepted outside development.
pub const MIN_PRODUCTION_SECRET_LEN: usize = 32;

impl AppConfig {
    /// Build configuration from the process environment.
    ///
    /// Called once in `main`; the result is shared through `AppState`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match lookup("APP_ENV").as_deref() {
            Some("production") | Some("prod") => Environment::Production,
            Some("staging") | Some("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        let config = match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_overrides(&lookup)?;

        config.validate()?;
        Ok(config)
    }

    fn with_overrides<F>(mut self, lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Server
        if let Some(v) = lookup("HOST") {
            self.server.host = v;
        }
        if let Some(v) = lookup("PORT") {
            self.server.port = v.parse().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                reason: format!("'{}' is not a port number", v),
            })?;
        }

        // Database
        if let Some(v) = lookup("STORAGE_BACKEND") {
            self.database.backend = match v.to_ascii_lowercase().as_str() {
                "supabase" => StorageBackend::Supabase,
                "memory" => StorageBackend::Memory,
                other => {
                    return Err(ConfigError::Invalid {
                        name: "STORAGE_BACKEND",
                        reason: format!("unknown backend '{}'", other),
                    })
                }
            };
        }
        self.database.supabase_url = lookup("SUPABASE_URL").filter(|v| !v.trim().is_empty());
        self.database.supabase_key = lookup("SUPABASE_KEY").filter(|v| !v.trim().is_empty());
        if let Some(v) = lookup("DATABASE_TIMEOUT_SECS") {
            self.database.request_timeout_secs = v.parse().map_err(|_| ConfigError::Invalid {
                name: "DATABASE_TIMEOUT_SECS",
                reason: format!("'{}' is not a whole number of seconds", v),
            })?;
        }

        // Security
        self.security.secret_key = lookup("SECRET_KEY").unwrap_or_default();
        if let Some(v) = lookup("ALGORITHM") {
            self.security.algorithm = parse_algorithm(&v)?;
        }
        if let Some(v) = lookup("ACCESS_TOKEN_EXPIRE_MINUTES") {
            self.security.access_token_expire_minutes = v.parse().map_err(|_| ConfigError::Invalid {
                name: "ACCESS_TOKEN_EXPIRE_MINUTES",
                reason: format!("'{}' is not a whole number of minutes", v),
            })?;
        }
        if let Some(v) = lookup("BACKEND_CORS_ORIGINS") {
            let origins = parse_cors_origins(&v)?;
            if !origins.is_empty() {
                self.security.cors_origins = origins;
            }
        }

        Ok(self)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.security.secret_key.is_empty() {
            return Err(ConfigError::Missing("SECRET_KEY"));
        }
        if self.environment == Environment::Production
            && self.security.secret_key.len() < MIN_PRODUCTION_SECRET_LEN
        {
            return Err(ConfigError::Invalid {
                name: "SECRET_KEY",
                reason: format!("must be at least {} bytes in production", MIN_PRODUCTION_SECRET_LEN),
            });
        }
        if self.security.access_token_expire_minutes <= 0 {
            return Err(ConfigError::Invalid {
                name: "ACCESS_TOKEN_EXPIRE_MINUTES",
                reason: "must be greater than zero".to_string(),
            });
        }
        // Expiry timestamps must stay representable
        let expiry = chrono::Duration::try_minutes(self.security.access_token_expire_minutes)
            .and_then(|ttl| chrono::Utc::now().checked_add_signed(ttl));
        if expiry.is_none() {
            return Err(ConfigError::Invalid {
                name: "ACCESS_TOKEN_EXPIRE_MINUTES",
                reason: "token lifetime is out of range".to_string(),
            });
        }
        if self.database.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                name: "DATABASE_TIMEOUT_SECS",
                reason: "must be greater than zero".to_string(),
            });
        }

        if self.database.backend == StorageBackend::Supabase {
            let raw = self
                .database
                .supabase_url
                .as_deref()
                .ok_or(ConfigError::Missing("SUPABASE_URL"))?;
            Url::parse(raw).map_err(|e| ConfigError::Invalid {
                name: "SUPABASE_URL",
                reason: e.to_string(),
            })?;
            if self.database.supabase_key.is_none() {
                return Err(ConfigError::Missing("SUPABASE_KEY"));
            }
        }

        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8000,
            },
            database: DatabaseConfig {
                backend: StorageBackend::Supabase,
                supabase_url: None,
                supabase_key: None,
                request_timeout_secs: 30,
            },
            security: SecurityConfig {
                secret_key: String::new(),
                algorithm: jsonwebtoken::Algorithm::HS256,
                access_token_expire_minutes: 30,
                cors_origins: vec!["http://localhost:3000".to_string(), "http://127.0.0.1:3000".to_string()],
            },
        }
    }

    fn staging() -> Self {
        let mut config = Self::development();
        config.environment = Environment::Staging;
        config.database.request_timeout_secs = 10;
        config
    }

    fn production() -> Self {
        let mut config = Self::development();
        config.environment = Environment::Production;
        config.database.request_timeout_secs = 5;
        config
    }
}

fn parse_algorithm(value: &str) -> Result<jsonwebtoken::Algorithm, ConfigError> {
    match value.trim().to_ascii_uppercase().as_str() {
        "HS256" => Ok(jsonwebtoken::Algorithm::HS256),
        "HS384" => Ok(jsonwebtoken::Algorithm::HS384),
        "HS512" => Ok(jsonwebtoken::Algorithm::HS512),
        other => Err(ConfigError::Invalid {
            name: "ALGORITHM",
            reason: format!("unsupported signing algorithm '{}'", other),
        }),
    }
}

/// Accepts either a JSON array (single quotes tolerated) or a comma-separated list.
fn parse_cors_origins(value: &str) -> Result<Vec<String>, ConfigError> {
    let trimmed = value.trim();
    if trimmed.starts_with('[') {
        let normalized = trimmed.replace('\'', "\"");
        let origins: Vec<String> = serde_json::from_str(&normalized).map_err(|e| ConfigError::Invalid {
            name: "BACKEND_CORS_ORIGINS",
            reason: e.to_string(),
        })?;
        return Ok(origins);
    }

    Ok(trimmed
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect())
}
