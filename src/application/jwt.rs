use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::app_error::{AppError, AppResult};
use crate::domain::entities::token::TokenType;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    #[serde(rename = "type")]
    pub token_type: TokenType,
    pub exp: i64,
    pub iat: i64,
    pub jti: String,
}

/// Signs a token. `exp` and `type` are inside the HMAC, so altering either
/// invalidates the signature.
pub fn issue(
    user_id: Uuid,
    token_type: TokenType,
    token_id: Uuid,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    secret: &SecretString,
) -> AppResult<String> {
    let key = signing_bytes(secret)?;
    let claims = Claims {
        sub: user_id.to_string(),
        token_type,
        exp: expires_at.timestamp(),
        iat: issued_at.timestamp(),
        jti: token_id.to_string(),
    };
    let header = Header::new(Algorithm::HS256);
    encode(&header, &claims, &EncodingKey::from_secret(key))
        .map_err(|e| AppError::Signing(e.to_string()))
}

/// Verifies signature, expiry and type, in that order, and returns the
/// subject. A token is expired at its `exp` second, not after it.
pub fn verify(
    token: &str,
    secret: &SecretString,
    expected: TokenType,
    now: DateTime<Utc>,
) -> AppResult<Uuid> {
    let key = signing_bytes(secret)?;

    // Expiry is checked below against the caller's clock, with no leeway.
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;
    validation.leeway = 0;
    validation.set_required_spec_claims(&["exp", "sub"]);

    let claims = decode::<Claims>(token, &DecodingKey::from_secret(key), &validation)
        .map(|data| data.claims)
        .map_err(|e| {
            tracing::debug!(error = %e, "token failed to decode");
            AppError::InvalidToken
        })?;

    if now.timestamp() >= claims.exp {
        return Err(AppError::TokenExpired);
    }
    if claims.token_type != expected {
        return Err(AppError::WrongTokenType);
    }

    Uuid::parse_str(&claims.sub).map_err(|_| AppError::InvalidToken)
}

fn signing_bytes(secret: &SecretString) -> AppResult<&[u8]> {
    let bytes = secret.expose_secret().as_bytes();
    if bytes.is_empty() {
        return Err(AppError::Signing("signing secret is not configured".into()));
    }
    Ok(bytes)
}
