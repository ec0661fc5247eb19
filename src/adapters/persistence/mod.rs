use sqlx::PgPool;

use crate::app_error::AppError;

pub mod token;
pub mod user;

#[derive(Clone)]
pub struct PostgresPersistence {
    pool: PgPool,
}

impl PostgresPersistence {
    pub fn new(pool: PgPool) -> Self {
        PostgresPersistence { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => AppError::NotFound,
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AppError::ValidationFailed("A record with this value already exists".into())
            }
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                AppError::ValidationFailed("Referenced record not found".into())
            }
            _ => {
                // Details stay in the log, never in the response.
                tracing::error!(error = ?err, "Database error");
                AppError::Storage("Database operation failed".into())
            }
        }
    }
}
