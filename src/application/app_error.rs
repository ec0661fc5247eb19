use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Not found")]
    NotFound,

    #[error("Invalid password")]
    Forbidden,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Wrong token type")]
    WrongTokenType,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Signing error: {0}")]
    Signing(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorCode {
    MalformedInput,
    ValidationFailed,
    NotFound,
    Forbidden,
    InvalidToken,
    TokenExpired,
    WrongTokenType,
    StorageFailure,
    SigningFailure,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::MalformedInput => "MALFORMED_INPUT",
            ErrorCode::ValidationFailed => "VALIDATION_FAILED",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::Forbidden => "FORBIDDEN",
            ErrorCode::InvalidToken => "INVALID_TOKEN",
            ErrorCode::TokenExpired => "TOKEN_EXPIRED",
            ErrorCode::WrongTokenType => "WRONG_TOKEN_TYPE",
            ErrorCode::StorageFailure => "STORAGE_FAILURE",
            ErrorCode::SigningFailure => "SIGNING_FAILURE",
        }
    }
}

impl AppError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::MalformedInput(_) => ErrorCode::MalformedInput,
            AppError::ValidationFailed(_) => ErrorCode::ValidationFailed,
            AppError::NotFound => ErrorCode::NotFound,
            AppError::Forbidden => ErrorCode::Forbidden,
            AppError::InvalidToken => ErrorCode::InvalidToken,
            AppError::TokenExpired => ErrorCode::TokenExpired,
            AppError::WrongTokenType => ErrorCode::WrongTokenType,
            AppError::Storage(_) => ErrorCode::StorageFailure,
            AppError::Signing(_) => ErrorCode::SigningFailure,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
