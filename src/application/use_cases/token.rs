use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    app_error::{AppError, AppResult},
    application::{jwt, ports::clock::Clock},
    domain::entities::token::{NewTokenRecord, TokenRecord, TokenType},
    infra::config::TokenSettings,
};

#[async_trait]
pub trait TokenRepo: Send + Sync {
    async fn create_token(&self, record: NewTokenRecord) -> AppResult<TokenRecord>;
    /// Marks a record revoked. Verification never consults this.
    async fn invalidate_token(&self, token_id: Uuid) -> AppResult<()>;
}

/// A signed token as handed back to callers.
#[derive(Debug, Clone, Serialize)]
pub struct IssuedToken {
    #[serde(rename = "token")]
    pub value: String,
    #[serde(rename = "expires")]
    pub expires_at: DateTime<Utc>,
    #[serde(skip)]
    pub token_type: TokenType,
    #[serde(skip)]
    pub user_id: Uuid,
    #[serde(skip)]
    pub record_id: Uuid,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthTokens {
    pub access: IssuedToken,
    pub refresh: IssuedToken,
}

#[derive(Clone)]
pub struct TokenService {
    repo: Arc<dyn TokenRepo>,
    settings: Arc<TokenSettings>,
    clock: Arc<dyn Clock>,
}

impl TokenService {
    pub fn new(
        repo: Arc<dyn TokenRepo>,
        settings: Arc<TokenSettings>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repo,
            settings,
            clock,
        }
    }

    /// Signs a token of `token_type` for `user_id` and persists its record.
    /// Nothing is returned unless both steps succeed.
    #[instrument(skip(self))]
    pub async fn generate_token(
        &self,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
        token_type: TokenType,
    ) -> AppResult<IssuedToken> {
        let now = self.clock.now();
        let expires_at = whole_seconds(expires_at);
        if expires_at <= now {
            return Err(AppError::ValidationFailed(
                "token expiry must be in the future".into(),
            ));
        }

        let token_id = Uuid::new_v4();
        let value = jwt::issue(
            user_id,
            token_type,
            token_id,
            now,
            expires_at,
            &self.settings.secret,
        )
        .inspect_err(|e| tracing::error!(error = %e, "token signing failed"))?;

        let record = self
            .repo
            .create_token(NewTokenRecord {
                id: token_id,
                user_id,
                token_type,
                token_hash: hash_token(&value),
                expires_at,
            })
            .await
            .inspect_err(|e| tracing::error!(error = %e, "token record not persisted"))?;

        tracing::debug!(record_id = %record.id, %expires_at, "token issued");

        Ok(IssuedToken {
            value,
            expires_at,
            token_type,
            user_id,
            record_id: record.id,
        })
    }

    /// Issues an access/refresh pair. Either both tokens come back or an error
    /// does; a token persisted before its sibling failed is left to expire.
    #[instrument(skip(self))]
    pub async fn generate_auth_tokens(&self, user_id: Uuid) -> AppResult<AuthTokens> {
        let now = self.clock.now();
        let access_expiry = expiry_after(now, self.settings.access_ttl)?;
        let refresh_expiry = expiry_after(now, self.settings.refresh_ttl)?;
        let (access, refresh) = tokio::try_join!(
            self.generate_token(user_id, access_expiry, TokenType::Access),
            self.generate_token(user_id, refresh_expiry, TokenType::Refresh),
        )?;
        Ok(AuthTokens { access, refresh })
    }

    /// Checks a presented token against the configured secret and the current
    /// time. Pure: no store lookups.
    pub fn verify_token(&self, token: &str, expected: TokenType) -> AppResult<Uuid> {
        jwt::verify(token, &self.settings.secret, expected, self.clock.now())
    }

    pub fn access_expiry(&self) -> AppResult<DateTime<Utc>> {
        expiry_after(self.clock.now(), self.settings.access_ttl)
    }
}

// Only this digest is persisted, never the signed value.
pub fn hash_token(raw: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw.as_bytes());
    hex::encode(hasher.finalize())
}

fn expiry_after(now: DateTime<Utc>, ttl: Duration) -> AppResult<DateTime<Utc>> {
    now.checked_add_signed(ttl)
        .ok_or_else(|| AppError::Signing("token lifetime overflows the calendar".into()))
}

fn whole_seconds(instant: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp(instant.timestamp(), 0).unwrap_or(instant)
}
