use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::{AppError, AppResult},
    domain::entities::token::{NewTokenRecord, TokenRecord, TokenType},
    use_cases::token::TokenRepo,
};

#[derive(sqlx::FromRow, Debug)]
struct TokenDb {
    id: Uuid,
    user_id: Uuid,
    token_type: String,
    token_hash: String,
    expires_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
    revoked_at: Option<DateTime<Utc>>,
}

impl TryFrom<TokenDb> for TokenRecord {
    type Error = AppError;

    fn try_from(row: TokenDb) -> Result<Self, Self::Error> {
        let token_type: TokenType = row.token_type.parse().map_err(|_| {
            tracing::error!(token_id = %row.id, token_type = %row.token_type, "Unknown token type");
            AppError::Storage("Corrupt token record".into())
        })?;
        Ok(TokenRecord {
            id: row.id,
            user_id: row.user_id,
            token_type,
            token_hash: row.token_hash,
            expires_at: row.expires_at,
            created_at: row.created_at,
            revoked_at: row.revoked_at,
        })
    }
}

#[async_trait]
impl TokenRepo for PostgresPersistence {
    async fn create_token(&self, record: NewTokenRecord) -> AppResult<TokenRecord> {
        let row = sqlx::query_as::<_, TokenDb>(
            r#"INSERT INTO tokens (id, user_id, token_type, token_hash, expires_at)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING id, user_id, token_type, token_hash, expires_at, created_at, revoked_at"#,
        )
        .bind(record.id)
        .bind(record.user_id)
        .bind(record.token_type.as_ref())
        .bind(&record.token_hash)
        .bind(record.expires_at)
        .fetch_one(self.pool())
        .await?;
        row.try_into()
    }

    async fn invalidate_token(&self, token_id: Uuid) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE tokens SET revoked_at = COALESCE(revoked_at, now()) WHERE id = $1",
        )
        .bind(token_id)
        .execute(self.pool())
        .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}
