use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::{
    adapters::http::{
        app_state::AppState,
        extractors::{BearerToken, ValidatedJson},
    },
    app_error::AppResult,
    use_cases::user::RegisterCommand,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh", post(refresh))
        .route("/me", get(get_me))
}

// ============================================================================
// Request Types
// ============================================================================

#[derive(Deserialize, Validate)]
struct RegisterPayload {
    #[validate(email)]
    email: String,
    #[validate(length(min = 1, max = 64), custom(function = "not_blank"))]
    username: String,
    #[validate(length(min = 1, max = 128))]
    password: String,
}

#[derive(Deserialize, Validate)]
struct LoginPayload {
    #[validate(email)]
    email: String,
    #[validate(length(min = 1, max = 128))]
    password: String,
}

#[derive(Deserialize, Validate)]
struct RefreshPayload {
    #[validate(length(min = 1))]
    token: String,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /user/register
async fn register(
    State(app_state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterPayload>,
) -> AppResult<impl IntoResponse> {
    let session = app_state
        .auth_use_cases
        .register(RegisterCommand {
            email: payload.email,
            username: payload.username,
            password: payload.password,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(session)))
}

/// POST /user/login
async fn login(
    State(app_state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginPayload>,
) -> AppResult<impl IntoResponse> {
    let session = app_state
        .auth_use_cases
        .login(&payload.email, &payload.password)
        .await?;
    Ok(Json(session))
}

/// POST /user/refresh
/// Takes a still-valid access token and answers with a fresh one.
async fn refresh(
    State(app_state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RefreshPayload>,
) -> AppResult<impl IntoResponse> {
    let token = app_state.auth_use_cases.refresh(&payload.token).await?;
    Ok(Json(token))
}

/// GET /user/me
/// Profile of the access token's owner.
async fn get_me(
    State(app_state): State<AppState>,
    BearerToken(token): BearerToken,
) -> AppResult<impl IntoResponse> {
    let user = app_state.auth_use_cases.current_user(&token).await?;
    Ok(Json(user))
}
