use crate::app_error::{AppError, ErrorCode};
use axum::Json;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = status_for(&self);
        if status.is_server_error() {
            tracing::error!(error = ?self, "Request failed");
        } else {
            tracing::debug!(error = ?self, "Request rejected");
        }

        // Storage and signing details stay in the log.
        let message = match &self {
            AppError::Storage(_) => "Storage failure".to_string(),
            AppError::Signing(_) => "Token signing failed".to_string(),
            AppError::MalformedInput(msg) | AppError::ValidationFailed(msg) => msg.clone(),
            other => other.to_string(),
        };
        error_resp(status, self.code(), message)
    }
}

fn status_for(err: &AppError) -> StatusCode {
    match err {
        AppError::MalformedInput(_) | AppError::ValidationFailed(_) => StatusCode::BAD_REQUEST,
        AppError::NotFound => StatusCode::NOT_FOUND,
        AppError::Forbidden => StatusCode::FORBIDDEN,
        AppError::InvalidToken | AppError::TokenExpired | AppError::WrongTokenType => {
            StatusCode::UNAUTHORIZED
        }
        AppError::Storage(_) | AppError::Signing(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_resp(status: StatusCode, code: ErrorCode, message: String) -> Response {
    let body = serde_json::json!({ "code": code.as_str(), "message": message });
    (status, Json(body)).into_response()
}
