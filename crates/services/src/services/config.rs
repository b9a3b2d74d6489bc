//! Runtime configuration read from the environment.

use std::env;

use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_ttl_hours: i64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:data/maison.db".to_string());
        let port = match env::var("PORT") {
            Ok(value) => value.parse().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                value,
            })?,
            Err(_) => 3001,
        };
        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            warn!("JWT_SECRET not set, using an insecure development secret");
            "insecure-dev-secret".to_string()
        });
        let jwt_ttl_hours = match env::var("JWT_TTL_HOURS") {
            Ok(value) => value.parse().map_err(|_| ConfigError::Invalid {
                name: "JWT_TTL_HOURS",
                value,
            })?,
            Err(_) => 24,
        };
        Ok(Self {
            database_url,
            port,
            jwt_secret,
            jwt_ttl_hours,
        })
    }
}
