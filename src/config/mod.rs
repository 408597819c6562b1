use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use thiserror::Error;

use crate::api::format::FormatPolicy;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing configuration: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
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

impl Environment {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Some(Environment::Development),
            "staging" | "stage" => Some(Environment::Staging),
            "production" | "prod" => Some(Environment::Production),
            _ => None,
        }
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| ConfigError::Invalid {
            name: "APP_ENV",
            value: s.to_string(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    /// Seconds to wait for a pooled connection.
    pub connection_timeout: u64,
    pub enable_query_logging: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub format_policy: FormatPolicy,
    /// Include the store's diagnostic text in 500 responses.
    pub expose_error_details: bool,
    pub enable_request_logging: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    pub token_ttl_secs: i64,
    pub admin_username: String,
    #[serde(skip_serializing)]
    pub admin_password: String,
    pub enable_cors: bool,
}

impl AppConfig {
    /// Build the configuration from `APP_ENV` defaults plus environment overrides.
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = match env::var("APP_ENV") {
            Ok(name) => name.parse()?,
            Err(_) => Environment::Development,
        };
        Self::for_environment(environment).with_env_overrides()
    }

    pub fn for_environment(environment: Environment) -> Self {
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
    }

    pub fn with_env_overrides(mut self) -> Result<Self, ConfigError> {
        // Server overrides
        if let Ok(v) = env::var("HOST") {
            self.server.host = v;
        }
        if let Ok(v) = env::var("STUDENTS_API_PORT").or_else(|_| env::var("PORT")) {
            self.server.port = parse_var("PORT", &v)?;
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = v;
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = parse_var("DATABASE_MAX_CONNECTIONS", &v)?;
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = parse_var("DATABASE_CONNECTION_TIMEOUT", &v)?;
        }
        if let Ok(v) = env::var("DATABASE_ENABLE_QUERY_LOGGING") {
            self.database.enable_query_logging = parse_var("DATABASE_ENABLE_QUERY_LOGGING", &v)?;
        }

        // API overrides
        if let Ok(v) = env::var("API_FORMAT_POLICY") {
            self.api.format_policy = parse_var("API_FORMAT_POLICY", &v)?;
        }
        if let Ok(v) = env::var("API_EXPOSE_ERROR_DETAILS") {
            self.api.expose_error_details = parse_var("API_EXPOSE_ERROR_DETAILS", &v)?;
        }
        if let Ok(v) = env::var("API_ENABLE_REQUEST_LOGGING") {
            self.api.enable_request_logging = parse_var("API_ENABLE_REQUEST_LOGGING", &v)?;
        }

        // Security overrides
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("SECURITY_TOKEN_TTL_SECS") {
            self.security.token_ttl_secs = parse_var("SECURITY_TOKEN_TTL_SECS", &v)?;
        }
        if let Ok(v) = env::var("ADMIN_USERNAME") {
            self.security.admin_username = v;
        }
        if let Ok(v) = env::var("ADMIN_PASSWORD") {
            self.security.admin_password = v;
        }
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = parse_var("SECURITY_ENABLE_CORS", &v)?;
        }

        Ok(self)
    }

    /// Reject configurations the server cannot start with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.url.trim().is_empty() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }
        self.validate_security()
    }

    /// Checks only the token and credential settings.
    pub fn validate_security(&self) -> Result<(), ConfigError> {
        if self.security.jwt_secret.is_empty() {
            return Err(ConfigError::Missing("JWT_SECRET"));
        }
        if self.security.admin_username.is_empty() {
            return Err(ConfigError::Missing("ADMIN_USERNAME"));
        }
        if self.security.admin_password.is_empty() {
            return Err(ConfigError::Missing("ADMIN_PASSWORD"));
        }
        if self.security.token_ttl_secs <= 0 {
            return Err(ConfigError::Invalid {
                name: "SECURITY_TOKEN_TTL_SECS",
                value: self.security.token_ttl_secs.to_string(),
            });
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 5000,
            },
            database: DatabaseConfig {
                url: String::new(),
                max_connections: 5,
                connection_timeout: 30,
                enable_query_logging: true,
            },
            api: ApiConfig {
                format_policy: FormatPolicy::Strict,
                expose_error_details: true,
                enable_request_logging: true,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                token_ttl_secs: 60 * 60,
                admin_username: String::new(),
                admin_password: String::new(),
                enable_cors: true,
            },
        }
    }

    pub fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 5000,
            },
            database: DatabaseConfig {
                url: String::new(),
                max_connections: 10,
                connection_timeout: 10,
                enable_query_logging: true,
            },
            api: ApiConfig {
                format_policy: FormatPolicy::Strict,
                expose_error_details: false,
                enable_request_logging: true,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                token_ttl_secs: 60 * 60,
                admin_username: String::new(),
                admin_password: String::new(),
                enable_cors: true,
            },
        }
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            database: DatabaseConfig {
                url: String::new(),
                max_connections: 20,
                connection_timeout: 5,
                enable_query_logging: false,
            },
            api: ApiConfig {
                format_policy: FormatPolicy::Strict,
                expose_error_details: false,
                enable_request_logging: false,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                token_ttl_secs: 60 * 60,
                admin_username: String::new(),
                admin_password: String::new(),
                enable_cors: false,
            },
        }
    }
}

fn parse_var<T: FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        name,
        value: value.to_string(),
    })
}
