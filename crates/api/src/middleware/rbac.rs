//! Role extractors.
//!
//! Each wraps [`AuthUser`] and rejects tokens issued for the other account
//! kind with 403 Forbidden.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use petpals_core::error::CoreError;
use petpals_core::roles::AccountRole;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

async fn require_role(
    parts: &mut Parts,
    state: &AppState,
    role: AccountRole,
) -> Result<AuthUser, AppError> {
    let user = AuthUser::from_request_parts(parts, state).await?;
    if user.role != role {
        return Err(AppError::Core(CoreError::Forbidden(format!(
            "{role} account required"
        ))));
    }
    Ok(user)
}

/// Requires an adopter access token.
///
/// ```ignore
/// async fn my_pets(RequireAdopter(user): RequireAdopter) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdopter(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdopter {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        require_role(parts, state, AccountRole::Adopter)
            .await
            .map(RequireAdopter)
    }
}

/// Requires a doctor access token.
pub struct RequireDoctor(pub AuthUser);

impl FromRequestParts<AppState> for RequireDoctor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        require_role(parts, state, AccountRole::Doctor)
            .await
            .map(RequireDoctor)
    }
}
