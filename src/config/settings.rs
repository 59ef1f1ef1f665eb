//! Application settings loaded from environment variables.

use std::env;

use thiserror::Error;

use super::constants::{
    DEFAULT_DATABASE_URL, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT, MIN_JWT_SECRET_LENGTH,
};
use crate::infra::cipher::KeyMaterial;

/// Errors raised while loading configuration. The process refuses to start on any of them.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} environment variable must be set")]
    Missing(&'static str),

    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Deployment environment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Dev,
    Qa,
    Prod,
}

impl AppEnv {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value {
            "dev" => Ok(AppEnv::Dev),
            "qa" => Ok(AppEnv::Qa),
            "prod" => Ok(AppEnv::Prod),
            other => Err(ConfigError::Invalid {
                name: "APP_ENV",
                reason: format!("expected one of dev, qa, prod, got `{}`", other),
            }),
        }
    }
}

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub app_env: AppEnv,
    pub database_url: String,
    jwt_secret: String,
    pub server_host: String,
    pub server_port: u16,
    pub identity_url: String,
    identity_key: String,
    key_material: KeyMaterial,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("app_env", &self.app_env)
            .field("database_url", &"[REDACTED]")
            .field("jwt_secret", &"[REDACTED]")
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("identity_url", &self.identity_url)
            .field("identity_key", &"[REDACTED]")
            .field("key_material", &self.key_material)
            .finish()
    }
}

impl Config {
    /// Load configuration from the process environment (and `.env`, if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let app_env = match lookup("APP_ENV") {
            Some(value) => AppEnv::parse(&value)?,
            None => AppEnv::Dev,
        };

        let jwt_secret = match lookup("JWT_SECRET") {
            Some(secret) => secret,
            None if cfg!(debug_assertions) && app_env == AppEnv::Dev => {
                tracing::warn!("JWT_SECRET not set, using insecure default for development");
                "dev-secret-key-minimum-32-chars!!".to_string()
            }
            None => return Err(ConfigError::Missing("JWT_SECRET")),
        };

        if jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(ConfigError::Invalid {
                name: "JWT_SECRET",
                reason: format!("must be at least {} characters long", MIN_JWT_SECRET_LENGTH),
            });
        }

        let server_port = match lookup("SERVER_PORT").or_else(|| lookup("PORT")) {
            Some(port) => port.parse().map_err(|_| ConfigError::Invalid {
                name: "SERVER_PORT",
                reason: format!("`{}` is not a valid port", port),
            })?,
            None => DEFAULT_SERVER_PORT,
        };

        let secret = lookup("CRYPTO_SECRET").ok_or(ConfigError::Missing("CRYPTO_SECRET"))?;
        let iv = lookup("CRYPTO_IV").ok_or(ConfigError::Missing("CRYPTO_IV"))?;
        let key_material = KeyMaterial::from_hex(&secret, &iv).map_err(|e| ConfigError::Invalid {
            name: "CRYPTO_SECRET/CRYPTO_IV",
            reason: e.to_string(),
        })?;

        Ok(Self {
            app_env,
            database_url: lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            jwt_secret,
            server_host: lookup("SERVER_HOST").unwrap_or_else(|| DEFAULT_SERVER_HOST.to_string()),
            server_port,
            identity_url: lookup("SUPABASE_URL").ok_or(ConfigError::Missing("SUPABASE_URL"))?,
            identity_key: lookup("SUPABASE_KEY").ok_or(ConfigError::Missing("SUPABASE_KEY"))?,
            key_material,
        })
    }

    /// Get JWT secret bytes for bearer token verification.
    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }

    /// API key sent to the identity provider.
    pub fn identity_key(&self) -> &str {
        &self.identity_key
    }

    /// Field cipher key material.
    pub fn key_material(&self) -> &KeyMaterial {
        &self.key_material
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}
