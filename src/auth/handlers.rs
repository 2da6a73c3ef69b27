use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{
            AuthCheckResponse, LoginRequest, LoginResponse, MessageResponse, SignupRequest,
            UsernameResponse,
        },
        jwt::JwtKeys,
        password::{hash_password, verify_password},
        repo::User,
        session,
    },
    error::ApiError,
    state::AppState,
};

/// Name of the session cookie. Lifetime lives in the embedded token, not in
/// a cookie Max-Age.
pub const SESSION_COOKIE: &str = "access_token";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/auth-check", get(auth_check))
        .route("/getusername", get(getusername))
}

fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .http_only(true)
        .secure(false)
        .same_site(SameSite::Lax)
        .path("/")
        .build()
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let (Some(username), Some(email), Some(password)) =
        (payload.username, payload.email, payload.password)
    else {
        warn!("signup with missing fields");
        return Err(ApiError::MissingFields);
    };
    // Emails are stored and compared verbatim; the only client errors on
    // this surface are absent/empty fields and a duplicate email.
    if username.is_empty() || email.is_empty() || password.is_empty() {
        warn!("signup with empty fields");
        return Err(ApiError::MissingFields);
    }

    let hash = hash_password(&password).map_err(ApiError::Hash)?;

    // Uniqueness is enforced by the unique index, so a concurrent duplicate
    // signup is a single rejected insert rather than a check-then-insert race.
    let user = User::create(&state.db, &username, &email, &hash)
        .await
        .map_err(|e| map_insert_error(e, &email))?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "User registered successfully".into(),
        }),
    ))
}

/// Maps an insert failure to the client error space. A unique violation is
/// the store-enforced email uniqueness check firing.
fn map_insert_error(e: sqlx::Error, email: &str) -> ApiError {
    let duplicate = e
        .as_database_error()
        .map(|db| db.is_unique_violation())
        .unwrap_or(false);
    if duplicate {
        warn!(email = %email, "email already registered");
        ApiError::EmailTaken
    } else {
        ApiError::Database(e)
    }
}

#[instrument(skip(state, jar, payload))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>), ApiError> {
    let user = User::find_by_email(&state.db, &payload.email)
        .await?
        .ok_or_else(|| {
            warn!(email = %payload.email, "login unknown email");
            ApiError::UnknownEmail
        })?;

    let ok = verify_password(&payload.password, &user.password_hash).map_err(ApiError::Hash)?;
    if !ok {
        warn!(user_id = %user.id, "login invalid password");
        return Err(ApiError::WrongPassword);
    }

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id).map_err(ApiError::Internal)?;
    let jar = jar.add(session_cookie(token));

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok((
        jar,
        Json(LoginResponse {
            message: "Login successful".into(),
            session_token: session::fingerprint(&user.email),
        }),
    ))
}

/// Clears the session cookie. Succeeds whether or not the caller was
/// authenticated.
#[instrument(skip(jar))]
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<MessageResponse>) {
    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/").build());
    (
        jar,
        Json(MessageResponse {
            message: "Logout successful".into(),
        }),
    )
}

#[instrument(skip(state, jar))]
pub async fn auth_check(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Json<AuthCheckResponse>, ApiError> {
    let cookie = jar.get(SESSION_COOKIE).ok_or(ApiError::NotAuthenticated)?;

    let claims = JwtKeys::from_ref(&state)
        .verify(cookie.value())
        .map_err(|e| {
            warn!(reason = %e, "session token rejected");
            ApiError::InvalidToken(e)
        })?;

    Ok(Json(AuthCheckResponse {
        message: "Authenticated".into(),
        user_id: claims.sub,
    }))
}

#[instrument(skip(state, jar))]
pub async fn getusername(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Json<UsernameResponse>, ApiError> {
    let cookie = jar.get(SESSION_COOKIE).ok_or(ApiError::MissingToken)?;

    let claims = JwtKeys::from_ref(&state)
        .verify(cookie.value())
        .map_err(|e| {
            warn!(reason = %e, "session token rejected");
            ApiError::InvalidToken(e)
        })?;

    let user = User::find_by_id(&state.db, claims.sub)
        .await?
        .ok_or_else(|| {
            warn!(user_id = %claims.sub, "token subject has no user record");
            ApiError::UserNotFound
        })?;

    Ok(Json(UsernameResponse {
        username: user.username,
        email: user.email,
    }))
}
