use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::auth::jwt::TokenError;

/// Custom numeric sub-codes returned alongside 401 on login failures.
pub const CUST_ERROR_BAD_EMAIL: u32 = 40101;
pub const CUST_ERROR_BAD_PASSWORD: u32 = 40102;

/// Every way a request can fail, mapped to the JSON error bodies the
/// frontend expects.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Username, email, and password are required")]
    MissingFields,

    #[error("User with this email already exists")]
    EmailTaken,

    #[error("Invalid Email")]
    UnknownEmail,

    #[error("Invalid Password")]
    WrongPassword,

    /// No session cookie on /auth-check.
    #[error("Not Authenticated")]
    NotAuthenticated,

    /// No session cookie on /getusername.
    #[error("Missing token")]
    MissingToken,

    #[error("Invalid token")]
    InvalidToken(#[source] TokenError),

    #[error("User not found")]
    UserNotFound,

    #[error("database error")]
    Database(#[from] sqlx::Error),

    #[error("password hashing error")]
    Hash(#[source] anyhow::Error),

    #[error("internal error")]
    Internal(#[source] anyhow::Error),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingFields | ApiError::EmailTaken => StatusCode::BAD_REQUEST,
            ApiError::UnknownEmail
            | ApiError::WrongPassword
            | ApiError::NotAuthenticated
            | ApiError::MissingToken
            | ApiError::InvalidToken(_) => StatusCode::UNAUTHORIZED,
            ApiError::UserNotFound => StatusCode::NOT_FOUND,
            ApiError::Database(_) | ApiError::Hash(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match &self {
            ApiError::UnknownEmail => {
                json!({ "message": self.to_string(), "cust_error": CUST_ERROR_BAD_EMAIL })
            }
            ApiError::WrongPassword => {
                json!({ "message": self.to_string(), "cust_error": CUST_ERROR_BAD_PASSWORD })
            }
            ApiError::InvalidToken(reason) => {
                json!({ "message": self.to_string(), "error": reason.to_string() })
            }
            ApiError::Database(e) => {
                error!(error = %e, "database error");
                json!({ "message": "Internal server error" })
            }
            ApiError::Hash(e) => {
                error!(error = %e, "password hashing error");
                json!({ "message": "Internal server error" })
            }
            ApiError::Internal(e) => {
                error!(error = %e, "internal error");
                json!({ "message": "Internal server error" })
            }
            _ => json!({ "message": self.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        (status, serde_json::from_slice(&bytes).expect("json body"))
    }

    #[tokio::test]
    async fn unknown_email_carries_cust_error() {
        let (status, body) = body_json(ApiError::UnknownEmail).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Invalid Email");
        assert_eq!(body["cust_error"], 40101);
    }

    #[tokio::test]
    async fn wrong_password_carries_cust_error() {
        let (status, body) = body_json(ApiError::WrongPassword).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["cust_error"], 40102);
    }

    #[tokio::test]
    async fn invalid_token_exposes_decode_detail_only() {
        let (status, body) = body_json(ApiError::InvalidToken(TokenError::Expired)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Invalid token");
        assert_eq!(body["error"], TokenError::Expired.to_string());
        assert!(body.get("username").is_none());
    }

    #[tokio::test]
    async fn missing_fields_is_bad_request() {
        let (status, body) = body_json(ApiError::MissingFields).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Username, email, and password are required");
    }

    #[tokio::test]
    async fn user_not_found_is_404() {
        let (status, body) = body_json(ApiError::UserNotFound).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "User not found");
    }
}
