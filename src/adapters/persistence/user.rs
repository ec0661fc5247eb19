use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use uuid::Uuid;

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::{AppError, AppResult},
    domain::entities::user::{NewUser, Role, User},
    use_cases::user::UserRepo,
};

const USER_COLUMNS: &str =
    "id, email, username, password_hash, verified_email, role, created_at";

// User row as stored in the db.
#[derive(sqlx::FromRow, Debug)]
struct UserDb {
    id: Uuid,
    email: String,
    username: String,
    password_hash: String,
    verified_email: bool,
    role: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserDb> for User {
    type Error = AppError;

    fn try_from(row: UserDb) -> Result<Self, Self::Error> {
        let role: Role = row.role.parse().map_err(|_| {
            tracing::error!(user_id = %row.id, role = %row.role, "Unknown role in users table");
            AppError::Storage("Corrupt user record".into())
        })?;
        Ok(User {
            id: row.id,
            email: row.email,
            username: row.username,
            password_hash: SecretString::from(row.password_hash),
            verified_email: row.verified_email,
            role,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl UserRepo for PostgresPersistence {
    async fn create_user(&self, new_user: NewUser) -> AppResult<User> {
        let query = format!(
            "INSERT INTO users (id, email, username, password_hash, role) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {USER_COLUMNS}"
        );
        let row = sqlx::query_as::<_, UserDb>(&query)
            .bind(Uuid::new_v4())
            .bind(&new_user.email)
            .bind(&new_user.username)
            .bind(new_user.password_hash.expose_secret())
            .bind(Role::default().as_ref())
            .fetch_one(self.pool())
            .await
            .map_err(|err| match AppError::from(err) {
                AppError::ValidationFailed(_) => {
                    AppError::ValidationFailed("A user with this email already exists".into())
                }
                other => other,
            })?;
        row.try_into()
    }

    async fn get_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        let row = sqlx::query_as::<_, UserDb>(&query)
            .bind(email)
            .fetch_optional(self.pool())
            .await?;
        row.map(User::try_from).transpose()
    }

    async fn get_by_id(&self, user_id: Uuid) -> AppResult<Option<User>> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let row = sqlx::query_as::<_, UserDb>(&query)
            .bind(user_id)
            .fetch_optional(self.pool())
            .await?;
        row.map(User::try_from).transpose()
    }
}
