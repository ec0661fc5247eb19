use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::instrument;
use uuid::Uuid;

use crate::{
    app_error::{AppError, AppResult},
    application::ports::password::PasswordScheme,
    domain::entities::{
        token::TokenType,
        user::{NewUser, User, UserSummary, normalize_email},
    },
    use_cases::token::{AuthTokens, IssuedToken, TokenService},
};

#[async_trait]
pub trait UserRepo: Send + Sync {
    /// Fails with `ValidationFailed` when the email is already registered.
    async fn create_user(&self, new_user: NewUser) -> AppResult<User>;
    async fn get_by_email(&self, email: &str) -> AppResult<Option<User>>;
    async fn get_by_id(&self, user_id: Uuid) -> AppResult<Option<User>>;
}

#[derive(Debug)]
pub struct RegisterCommand {
    pub email: String,
    pub username: String,
    pub password: String,
}

/// Result of a successful register or login.
#[derive(Debug, Clone, Serialize)]
pub struct AuthSession {
    pub user: UserSummary,
    pub tokens: AuthTokens,
}

#[derive(Clone)]
pub struct AuthUseCases {
    users: Arc<dyn UserRepo>,
    passwords: Arc<dyn PasswordScheme>,
    tokens: TokenService,
}

impl AuthUseCases {
    pub fn new(
        users: Arc<dyn UserRepo>,
        passwords: Arc<dyn PasswordScheme>,
        tokens: TokenService,
    ) -> Self {
        Self {
            users,
            passwords,
            tokens,
        }
    }

    /// Creates the user, then issues a token pair. A user created before
    /// token issuance failed is kept.
    #[instrument(skip(self, command), fields(email = %command.email))]
    pub async fn register(&self, command: RegisterCommand) -> AppResult<AuthSession> {
        let username = command.username.trim();
        if username.is_empty() {
            return Err(AppError::ValidationFailed("username must not be blank".into()));
        }
        let password_hash = self.passwords.hash(&command.password)?;
        let user = self
            .users
            .create_user(NewUser {
                email: normalize_email(&command.email),
                username: username.to_string(),
                password_hash,
            })
            .await?;
        tracing::info!(user_id = %user.id, "user registered");

        let tokens = self.tokens.generate_auth_tokens(user.id).await?;
        Ok(AuthSession {
            user: UserSummary::from(&user),
            tokens,
        })
    }

    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> AppResult<AuthSession> {
        let Some(user) = self.users.get_by_email(&normalize_email(email)).await? else {
            tracing::warn!(reason = "unknown_email", "login rejected");
            return Err(AppError::NotFound);
        };

        if !self.passwords.compare(password, &user.password_hash)? {
            tracing::warn!(reason = "password_mismatch", user_id = %user.id, "login rejected");
            return Err(AppError::Forbidden);
        }

        let tokens = self.tokens.generate_auth_tokens(user.id).await?;
        tracing::info!(user_id = %user.id, "user logged in");
        Ok(AuthSession {
            user: UserSummary::from(&user),
            tokens,
        })
    }

    /// Extends the access window: a still-valid *access* token buys a new
    /// access token. Refresh tokens are not consulted here.
    #[instrument(skip_all)]
    pub async fn refresh(&self, presented_access_token: &str) -> AppResult<IssuedToken> {
        let user_id = self
            .tokens
            .verify_token(presented_access_token, TokenType::Access)
            .inspect_err(|e| tracing::warn!(error = %e, "refresh rejected"))?;

        self.tokens
            .generate_token(user_id, self.tokens.access_expiry()?, TokenType::Access)
            .await
    }

    /// Resolves the owner of a valid access token.
    #[instrument(skip_all)]
    pub async fn current_user(&self, access_token: &str) -> AppResult<UserSummary> {
        let user_id = self.tokens.verify_token(access_token, TokenType::Access)?;
        let user = self
            .users
            .get_by_id(user_id)
            .await?
            .ok_or(AppError::NotFound)?;
        Ok(UserSummary::from(&user))
    }
}
