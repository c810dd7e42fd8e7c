//! Server configuration: command-line flags with environment fallbacks.

use std::net::SocketAddr;

use clap::{Parser, ValueEnum};
use formhub_auth::AuthConfig;
use formhub_db::DbConfig;
use thiserror::Error;

/// Upper bound for the access token lifetime: one year.
pub const MAX_TOKEN_LIFETIME_SECS: u64 = 365 * 24 * 60 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must not be blank")]
    Blank(&'static str),

    #[error("token lifetime must be positive")]
    ZeroTokenLifetime,

    #[error("token lifetime must not exceed one year")]
    TokenLifetimeTooLong,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "formhub", about = "FormHub multi-tenant form builder API server")]
pub struct ServerConfig {
    /// Address the HTTP server binds to.
    #[arg(long, env = "FORMHUB_LISTEN", default_value = "127.0.0.1:5000")]
    pub listen: SocketAddr,

    /// SurrealDB WebSocket address, e.g. `ws://127.0.0.1:8000`.
    #[arg(long, env = "FORMHUB_DATABASE_URL")]
    pub database_url: String,

    #[arg(long, env = "FORMHUB_DB_NAMESPACE", default_value = "formhub")]
    pub db_namespace: String,

    #[arg(long, env = "FORMHUB_DB_NAME", default_value = "main")]
    pub db_name: String,

    #[arg(long, env = "FORMHUB_DB_USERNAME", default_value = "root")]
    pub db_username: String,

    #[arg(
        long,
        env = "FORMHUB_DB_PASSWORD",
        default_value = "root",
        hide_env_values = true
    )]
    pub db_password: String,

    /// Secret used to sign and verify access tokens.
    #[arg(long, env = "FORMHUB_JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: String,

    #[arg(long, env = "FORMHUB_TOKEN_LIFETIME_SECS", default_value_t = 3600)]
    pub token_lifetime_secs: u64,

    /// Optional pepper prepended to passwords before hashing.
    #[arg(long, env = "FORMHUB_PASSWORD_PEPPER", hide_env_values = true)]
    pub password_pepper: Option<String>,

    #[arg(long, env = "FORMHUB_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

impl ServerConfig {
    /// Reject settings the server cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database_url.trim().is_empty() {
            return Err(ConfigError::Blank("database URL"));
        }
        if self.jwt_secret.trim().is_empty() {
            return Err(ConfigError::Blank("JWT secret"));
        }
        if self.token_lifetime_secs == 0 {
            return Err(ConfigError::ZeroTokenLifetime);
        }
        if self.token_lifetime_secs > MAX_TOKEN_LIFETIME_SECS {
            return Err(ConfigError::TokenLifetimeTooLong);
        }
        Ok(())
    }

    pub fn db_config(&self) -> DbConfig {
        DbConfig {
            url: self.database_url.trim().to_string(),
            namespace: self.db_namespace.clone(),
            database: self.db_name.clone(),
            username: self.db_username.clone(),
            password: self.db_password.clone(),
        }
    }

    pub fn auth_config(&self) -> AuthConfig {
        AuthConfig {
            jwt_secret: self.jwt_secret.clone(),
            access_token_lifetime_secs: self.token_lifetime_secs,
            pepper: self
                .password_pepper
                .clone()
                .filter(|p| !p.is_empty()),
            ..AuthConfig::default()
        }
    }
}
