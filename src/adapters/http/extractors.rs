//! Request extractors that turn bad input into `AppError`s.

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Request, rejection::JsonRejection},
    http::{header::AUTHORIZATION, request::Parts},
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::app_error::AppError;

/// JSON body that has been deserialized and then checked with `validator`.
///
/// Unparseable bodies become `MalformedInput`; rule violations become
/// `ValidationFailed`.
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + 'static,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e: JsonRejection| AppError::MalformedInput(e.body_text()))?;

        value
            .validate()
            .map_err(|e| AppError::ValidationFailed(e.to_string()))?;

        Ok(ValidatedJson(value))
    }
}

/// Raw token from an `Authorization: Bearer <token>` header.
pub struct BearerToken(pub String);

impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::InvalidToken)?;

        let (scheme, token) = header.split_once(' ').ok_or(AppError::InvalidToken)?;
        let token = token.trim();
        if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
            return Err(AppError::InvalidToken);
        }
        Ok(BearerToken(token.to_string()))
    }
}
