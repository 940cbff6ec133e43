//! Account sign-up and sign-in.
//!
//! Emails are lowercased before storage and lookup. Login failures do not
//! reveal whether the email exists.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use lungrisk_core::error::CoreError;
use lungrisk_core::types::DbId;
use lungrisk_core::prediction::describe_validation_errors;
use lungrisk_db::models::session::CreateSession;
use lungrisk_db::models::user::{CreateUser, User, UserResponse};
use lungrisk_db::repositories::{SessionRepo, UserRepo};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::jwt::{generate_access_token, hash_refresh_token, RefreshToken};
use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

const BAD_CREDENTIALS: &str = "Invalid email or password";

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 200, message = "must be 1-200 characters"))]
    pub name: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Body returned by register, login, and refresh. Not wrapped in `data`.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Seconds until `access_token` expires.
    pub expires_in: i64,
    pub user: UserResponse,
}

fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

fn unauthorized(message: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(message.to_string()))
}

/// POST /api/v1/auth/register
pub async fn register(
    State(state): State<AppState>,
    AppJson(input): AppJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    input
        .validate()
        .map_err(|e| CoreError::Validation(describe_validation_errors(&e)))?;
    validate_password_strength(&input.password)?;

    let email = normalize_email(&input.email);
    if UserRepo::email_taken(&state.pool, &email).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "An account with this email already exists".into(),
        )));
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {e}")))?;
    // A concurrent sign-up with the same email still trips `uq_users_email`.
    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            name: input.name.trim().to_string(),
            email,
            password_hash,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, "Account created");
    let body = sign_in(&state, user).await?;
    Ok((StatusCode::CREATED, Json(body)))
}

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    AppJson(input): AppJson<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let Some(user) = UserRepo::find_by_email(&state.pool, &normalize_email(&input.email)).await?
    else {
        return Err(unauthorized(BAD_CREDENTIALS));
    };

    let matches = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Stored password hash unreadable: {e}")))?;
    if !matches {
        tracing::warn!(user_id = user.id, "Rejected login");
        return Err(unauthorized(BAD_CREDENTIALS));
    }

    Ok(Json(sign_in(&state, user).await?))
}

/// POST /api/v1/auth/refresh
///
/// The presented refresh token is consumed; a new pair is returned.
pub async fn refresh(
    State(state): State<AppState>,
    AppJson(input): AppJson<RefreshRequest>,
) -> AppResult<Json<AuthResponse>> {
    let replacement = RefreshToken::generate();
    let session = SessionRepo::rotate(
        &state.pool,
        &hash_refresh_token(&input.refresh_token),
        &replacement.hash,
        Utc::now() + state.config.jwt.refresh_ttl(),
    )
    .await?
    .ok_or_else(|| unauthorized("Invalid or expired refresh token"))?;

    let user = UserRepo::find_by_id(&state.pool, session.user_id)
        .await?
        .ok_or_else(|| unauthorized("Account no longer exists"))?;

    let access_token = issue_access_token(&state, user.id)?;
    Ok(Json(AuthResponse {
        access_token,
        refresh_token: replacement.plaintext,
        expires_in: state.config.jwt.access_ttl().num_seconds(),
        user: user.into(),
    }))
}

/// POST /api/v1/auth/logout
///
/// Revokes every refresh session of the caller. Access tokens already
/// issued stay valid until they expire.
pub async fn logout(State(state): State<AppState>, auth: AuthUser) -> AppResult<StatusCode> {
    let revoked = SessionRepo::revoke_all_for_user(&state.pool, auth.user_id).await?;
    tracing::info!(user_id = auth.user_id, revoked, "Signed out");
    Ok(StatusCode::NO_CONTENT)
}

fn issue_access_token(state: &AppState, user_id: DbId) -> AppResult<String> {
    generate_access_token(user_id, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Access token signing failed: {e}")))
}

/// Open a new refresh session for `user` and build the token pair.
async fn sign_in(state: &AppState, user: User) -> AppResult<AuthResponse> {
    let access_token = issue_access_token(state, user.id)?;
    let refresh = RefreshToken::generate();

    SessionRepo::create(
        &state.pool,
        &CreateSession {
            user_id: user.id,
            refresh_token_hash: refresh.hash,
            expires_at: Utc::now() + state.config.jwt.refresh_ttl(),
        },
    )
    .await?;

    Ok(AuthResponse {
        access_token,
        refresh_token: refresh.plaintext,
        expires_in: state.config.jwt.access_ttl().num_seconds(),
        user: user.into(),
    })
}
