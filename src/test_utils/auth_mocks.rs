//! In-memory mock implementations for the credential store, clock and
//! password ports.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use secrecy::{ExposeSecret, SecretString};
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

use crate::{
    app_error::{AppError, AppResult},
    application::ports::{clock::Clock, password::PasswordScheme},
    domain::entities::{
        token::{NewTokenRecord, TokenRecord, TokenType},
        user::{NewUser, Role, User},
    },
    use_cases::{token::TokenRepo, user::UserRepo},
};

// ============================================================================
// InMemoryUserRepo
// ============================================================================

/// In-memory implementation of UserRepo. Enforces email uniqueness like the
/// database constraint does.
#[derive(Default)]
pub struct InMemoryUserRepo {
    pub users: Mutex<HashMap<Uuid, User>>,
}

impl InMemoryUserRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: Vec<User>) -> Self {
        let map: HashMap<Uuid, User> = users.into_iter().map(|u| (u.id, u)).collect();
        Self {
            users: Mutex::new(map),
        }
    }

    pub fn count(&self) -> usize {
        self.users.lock().unwrap().len()
    }
}

#[async_trait]
impl UserRepo for InMemoryUserRepo {
    async fn create_user(&self, new_user: NewUser) -> AppResult<User> {
        let mut users = self.users.lock().unwrap();
        if users.values().any(|u| u.email == new_user.email) {
            return Err(AppError::ValidationFailed(
                "A user with this email already exists".into(),
            ));
        }

        let user = User {
            id: Uuid::new_v4(),
            email: new_user.email,
            username: new_user.username,
            password_hash: new_user.password_hash,
            verified_email: false,
            role: Role::User,
            created_at: Utc::now(),
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn get_by_id(&self, user_id: Uuid) -> AppResult<Option<User>> {
        Ok(self.users.lock().unwrap().get(&user_id).cloned())
    }
}

// ============================================================================
// InMemoryTokenRepo
// ============================================================================

#[derive(Default)]
pub struct InMemoryTokenRepo {
    pub records: Mutex<Vec<TokenRecord>>,
}

impl InMemoryTokenRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<TokenRecord> {
        self.records.lock().unwrap().clone()
    }

    pub fn count_of(&self, token_type: TokenType) -> usize {
        self.records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.token_type == token_type)
            .count()
    }
}

#[async_trait]
impl TokenRepo for InMemoryTokenRepo {
    async fn create_token(&self, record: NewTokenRecord) -> AppResult<TokenRecord> {
        let stored = TokenRecord {
            id: record.id,
            user_id: record.user_id,
            token_type: record.token_type,
            token_hash: record.token_hash,
            expires_at: record.expires_at,
            created_at: Utc::now(),
            revoked_at: None,
        };
        self.records.lock().unwrap().push(stored.clone());
        Ok(stored)
    }

    async fn invalidate_token(&self, token_id: Uuid) -> AppResult<()> {
        let mut records = self.records.lock().unwrap();
        let record = records
            .iter_mut()
            .find(|r| r.id == token_id)
            .ok_or(AppError::NotFound)?;
        record.revoked_at.get_or_insert_with(Utc::now);
        Ok(())
    }
}

/// Token repo that accepts records until a given type shows up, then fails.
pub struct FailingTokenRepo {
    pub fail_on: Option<TokenType>,
    pub inner: InMemoryTokenRepo,
}

impl FailingTokenRepo {
    /// Fails every write.
    pub fn always() -> Self {
        Self {
            fail_on: None,
            inner: InMemoryTokenRepo::new(),
        }
    }

    pub fn on(token_type: TokenType) -> Self {
        Self {
            fail_on: Some(token_type),
            inner: InMemoryTokenRepo::new(),
        }
    }
}

#[async_trait]
impl TokenRepo for FailingTokenRepo {
    async fn create_token(&self, record: NewTokenRecord) -> AppResult<TokenRecord> {
        match self.fail_on {
            Some(token_type) if token_type != record.token_type => {
                self.inner.create_token(record).await
            }
            _ => Err(AppError::Storage("token store unavailable".into())),
        }
    }

    async fn invalidate_token(&self, token_id: Uuid) -> AppResult<()> {
        self.inner.invalidate_token(token_id).await
    }
}

// ============================================================================
// ManualClock
// ============================================================================

/// Clock that only moves when told to.
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().unwrap() = now;
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock().unwrap() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

// ============================================================================
// PlainPasswordScheme
// ============================================================================

/// Cheap stand-in for Argon2 in tests. Stores `plain$<password>`.
#[derive(Default)]
pub struct PlainPasswordScheme;

impl PasswordScheme for PlainPasswordScheme {
    fn hash(&self, plaintext: &str) -> AppResult<SecretString> {
        Ok(SecretString::from(format!("plain${plaintext}")))
    }

    fn compare(&self, plaintext: &str, hash: &SecretString) -> AppResult<bool> {
        let stored = hash
            .expose_secret()
            .strip_prefix("plain$")
            .ok_or_else(|| AppError::Storage("unknown hash format".into()))?;
        Ok(stored == plaintext)
    }
}
