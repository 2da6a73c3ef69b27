use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request body for signup. Fields are optional so missing ones can be
/// reported as a 400 instead of a deserialization failure.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Plain status message.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Response after a successful login. `session_token` is the legacy opaque
/// fingerprint, not the credential; the credential travels in the cookie.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub session_token: String,
}

/// Response for /auth-check with a valid cookie.
#[derive(Debug, Serialize)]
pub struct AuthCheckResponse {
    pub message: String,
    pub user_id: Uuid,
}

/// Response for /getusername with a valid cookie.
#[derive(Debug, Serialize)]
pub struct UsernameResponse {
    pub username: String,
    pub email: String,
}
