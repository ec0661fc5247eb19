use std::net::SocketAddr;

use axum::http::HeaderValue;
use chrono::Duration;
use env_helpers::get_env_default;
use secrecy::{ExposeSecret, SecretString};

use crate::infra::error::InfraError;

/// Longest lifetime any token may be configured with.
pub const MAX_TOKEN_TTL_DAYS: i64 = 365;

/// Signing secret and token lifetimes. Built once at startup and shared
/// read-only by the token service.
#[derive(Debug, Clone)]
pub struct TokenSettings {
    pub secret: SecretString,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
}

impl TokenSettings {
    pub fn new(
        secret: SecretString,
        access_ttl: Duration,
        refresh_ttl: Duration,
    ) -> Result<Self, InfraError> {
        if secret.expose_secret().is_empty() {
            return Err(InfraError::ConfigMissing { var: "JWT_SECRET" });
        }
        if access_ttl <= Duration::zero() {
            return Err(InfraError::ConfigInvalid {
                var: "ACCESS_TOKEN_TTL_MINUTES",
                reason: "must be positive",
            });
        }
        if refresh_ttl > Duration::days(MAX_TOKEN_TTL_DAYS) {
            return Err(InfraError::ConfigInvalid {
                var: "REFRESH_TOKEN_TTL_DAYS",
                reason: "must not exceed 365 days",
            });
        }
        if refresh_ttl <= access_ttl {
            return Err(InfraError::ConfigInvalid {
                var: "REFRESH_TOKEN_TTL_DAYS",
                reason: "refresh tokens must outlive access tokens",
            });
        }
        Ok(Self {
            secret,
            access_ttl,
            refresh_ttl,
        })
    }
}

pub struct AppConfig {
    pub tokens: TokenSettings,
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub cors_origin: HeaderValue,
    /// Emit JSON log lines instead of the pretty console format.
    pub log_json: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, InfraError> {
        let jwt_secret = SecretString::from(required("JWT_SECRET")?);
        let access_token_ttl_minutes: i64 = get_env_default("ACCESS_TOKEN_TTL_MINUTES", 15);
        let refresh_token_ttl_days: i64 = get_env_default("REFRESH_TOKEN_TTL_DAYS", 30);

        let (access_ttl, refresh_ttl) =
            token_lifetimes(access_token_ttl_minutes, refresh_token_ttl_days)?;
        let tokens = TokenSettings::new(jwt_secret, access_ttl, refresh_ttl)?;

        let database_url = required("DATABASE_URL")?;
        let bind_addr: SocketAddr =
            get_env_default("BIND_ADDR", SocketAddr::from(([127, 0, 0, 1], 3001)));
        let cors_origin: HeaderValue =
            get_env_default("CORS_ORIGIN", String::from("http://localhost:3000"))
                .parse()
                .map_err(|_| InfraError::ConfigInvalid {
                    var: "CORS_ORIGIN",
                    reason: "must be a valid header value",
                })?;
        let log_json: bool = get_env_default("LOG_JSON", false);

        Ok(Self {
            tokens,
            database_url,
            bind_addr,
            cors_origin,
            log_json,
        })
    }
}

fn token_lifetimes(
    access_minutes: i64,
    refresh_days: i64,
) -> Result<(Duration, Duration), InfraError> {
    let access_ttl = Duration::try_minutes(access_minutes).ok_or(InfraError::ConfigInvalid {
        var: "ACCESS_TOKEN_TTL_MINUTES",
        reason: "is out of range",
    })?;
    let refresh_ttl = Duration::try_days(refresh_days).ok_or(InfraError::ConfigInvalid {
        var: "REFRESH_TOKEN_TTL_DAYS",
        reason: "is out of range",
    })?;
    Ok((access_ttl, refresh_ttl))
}

fn required(var: &'static str) -> Result<String, InfraError> {
    std::env::var(var)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or(InfraError::ConfigMissing { var })
}
