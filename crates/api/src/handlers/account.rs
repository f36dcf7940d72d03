//! Session and credential plumbing shared by the adopter and doctor handlers.
//!
//! Both account kinds log in the same way: a short-lived access token in the
//! response body and an opaque refresh token in an HttpOnly cookie, backed by
//! a row in `sessions`.

use axum::extract::Multipart;
use axum::http::header::SET_COOKIE;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use petpals_core::error::CoreError;
use petpals_core::roles::AccountRole;
use petpals_core::types::DbId;
use petpals_core::validation::validate_password_confirmation;
use petpals_db::models::session::{CreateSession, Session};
use petpals_db::repositories::SessionRepo;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::cookie::{clear_refresh_cookie, read_refresh_cookie, refresh_cookie};
use crate::auth::jwt::{generate_access_token, generate_refresh_token, hash_refresh_token};
use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::error::{AppError, AppResult};
use crate::handlers::upload::{read_image_field, UploadedFile};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /login`.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Request body for `PUT /me/password`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1))]
    pub old_password: String,
    pub new_password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokenResponse {
    pub access_token: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Returned after a profile photo upload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoResponse {
    pub message: String,
    pub photo_url: String,
}

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// Check a registration password and its confirmation, then hash it.
pub fn hash_new_password(password: &str, confirm: &str) -> AppResult<String> {
    validate_password_confirmation(password, confirm)?;
    hash_strong_password(password)
}

/// Check a password's strength, then hash it.
pub fn hash_strong_password(password: &str) -> AppResult<String> {
    validate_password_strength(password).map_err(CoreError::Validation)?;
    hash_password(password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))
}

/// Whether `password` matches the stored hash.
pub fn password_matches(password: &str, hash: &str) -> AppResult<bool> {
    verify_password(password, hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))
}

/// Login failure. The same message is used for unknown email and bad password.
pub fn invalid_credentials() -> AppError {
    AppError::Core(CoreError::Unauthorized("Invalid email or password".into()))
}

/// Verify the old password and hash the new one for a password change.
///
/// A wrong old password is a 400, matching the password-change form.
pub fn rehash_for_change(input: &ChangePasswordRequest, current_hash: &str) -> AppResult<String> {
    input.validate()?;
    if !password_matches(&input.old_password, current_hash)? {
        return Err(AppError::BadRequest("Invalid old password".into()));
    }
    hash_strong_password(&input.new_password)
}

/// Hash for a password change made through the profile form, if both the
/// old and new passwords are given.
///
/// A wrong old password is a 401 here. The hash is returned rather than
/// written so it lands in the same `UPDATE` as the other profile fields.
pub fn profile_password_hash(
    old_password: Option<&str>,
    new_password: Option<&str>,
    current_hash: &str,
) -> AppResult<Option<String>> {
    let (Some(old_password), Some(new_password)) = (old_password, new_password) else {
        return Ok(None);
    };
    if !password_matches(old_password, current_hash)? {
        return Err(CoreError::Unauthorized("Old password is incorrect".into()).into());
    }
    hash_strong_password(new_password).map(Some)
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

fn access_token(state: &AppState, role: AccountRole, id: DbId, email: &str) -> AppResult<String> {
    generate_access_token(id, role, email, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))
}

/// Start a session: persist the refresh-token hash and answer with the
/// access token plus the refresh cookie.
pub async fn start_session(
    state: &AppState,
    role: AccountRole,
    account_id: DbId,
    email: &str,
) -> AppResult<Response> {
    let access_token = access_token(state, role, account_id, email)?;
    let (refresh_plaintext, refresh_hash) = generate_refresh_token();

    let jwt = &state.config.jwt;
    let expires_at = Utc::now() + chrono::Duration::days(jwt.refresh_token_expiry_days);
    SessionRepo::create(
        &state.pool,
        &CreateSession {
            role: role.as_str().to_string(),
            account_id,
            refresh_token_hash: refresh_hash,
            expires_at,
        },
    )
    .await?;

    tracing::info!(account_id, %role, "Session started");

    let cookie = refresh_cookie(
        &refresh_plaintext,
        jwt.refresh_token_max_age_secs(),
        state.config.cookie_secure,
    );
    Ok((
        [(SET_COOKIE, cookie)],
        Json(AccessTokenResponse { access_token }),
    )
        .into_response())
}

/// Resolve the active session behind the request's refresh cookie.
///
/// Fails with 401 when the cookie is missing, unknown, revoked, expired or
/// belongs to the other account kind.
pub async fn active_session(
    state: &AppState,
    headers: &HeaderMap,
    role: AccountRole,
) -> AppResult<Session> {
    let token = read_refresh_cookie(headers)
        .ok_or_else(|| CoreError::Unauthorized("Missing refresh token".into()))?;

    SessionRepo::find_active_by_hash(&state.pool, &hash_refresh_token(&token))
        .await?
        .filter(|session| session.account_role() == Some(role))
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid or expired refresh token".into(),
            ))
        })
}

/// Issue a fresh access token for a session whose account still exists.
pub fn refreshed_access_token(
    state: &AppState,
    role: AccountRole,
    account_id: DbId,
    email: &str,
) -> AppResult<Json<AccessTokenResponse>> {
    let access_token = access_token(state, role, account_id, email)?;
    Ok(Json(AccessTokenResponse { access_token }))
}

/// Revoke the session behind the refresh cookie and clear the cookie.
///
/// Answers 204 when there is nothing to revoke, 200 otherwise.
pub async fn end_session(
    state: &AppState,
    headers: &HeaderMap,
    role: AccountRole,
) -> AppResult<Response> {
    let clear = [(SET_COOKIE, clear_refresh_cookie(state.config.cookie_secure))];

    let Some(token) = read_refresh_cookie(headers) else {
        return Ok(StatusCode::NO_CONTENT.into_response());
    };

    let session = SessionRepo::find_active_by_hash(&state.pool, &hash_refresh_token(&token))
        .await?
        .filter(|session| session.account_role() == Some(role));
    let Some(session) = session else {
        return Ok((StatusCode::NO_CONTENT, clear).into_response());
    };

    SessionRepo::revoke(&state.pool, session.id).await?;
    tracing::info!(account_id = session.account_id, %role, "Session ended");

    Ok((clear, Json(MessageResponse::new("Logged out successfully"))).into_response())
}

/// Revoke every session of a deleted account and clear the cookie.
pub async fn close_account_sessions(
    state: &AppState,
    role: AccountRole,
    account_id: DbId,
) -> AppResult<Response> {
    let revoked =
        SessionRepo::revoke_all_for_account(&state.pool, role.as_str(), account_id).await?;
    tracing::info!(account_id, %role, revoked, "Account deleted");

    Ok((
        [(SET_COOKIE, clear_refresh_cookie(state.config.cookie_secure))],
        Json(MessageResponse::new("Account deleted successfully")),
    )
        .into_response())
}

// ---------------------------------------------------------------------------
// Profile photos
// ---------------------------------------------------------------------------

/// Read the single `file` field of a profile photo upload.
pub async fn read_profile_photo(mut multipart: Multipart) -> AppResult<UploadedFile> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() == Some("file") {
            return read_image_field(field).await;
        }
    }
    Err(AppError::BadRequest("No file uploaded".into()))
}
