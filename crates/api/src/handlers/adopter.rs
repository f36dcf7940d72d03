//! Handlers for the `/adopters` resource.

use axum::extract::{Multipart, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::Response;
use axum::Json;
use petpals_cloud::FOLDER_PROFILE;
use petpals_core::error::CoreError;
use petpals_core::roles::AccountRole;
use petpals_core::types::DbId;
use petpals_db::models::adopter::{Adopter, AdopterProfile, CreateAdopter, UpdateAdopter};
use petpals_db::repositories::{AdopterRepo, PetPhotoRepo, PetRepo};
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::account::{
    self, ChangePasswordRequest, LoginRequest, MessageResponse, PhotoResponse,
};
use crate::handlers::upload::{destroy_best_effort, host_image};
use crate::middleware::rbac::RequireAdopter;
use crate::state::AppState;

const ROLE: AccountRole = AccountRole::Adopter;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /adopters/register`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterAdopterRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1, max = 30))]
    pub phone: String,
    #[validate(email)]
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub gender: Option<String>,
    #[validate(range(min = 0, max = 150))]
    pub age: Option<i32>,
    pub address: Option<String>,
}

/// Request body for `PUT /adopters/me`.
///
/// The password is changed only when both `oldPassword` and `newPassword`
/// are present.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAdopterRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 30))]
    pub phone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub gender: Option<String>,
    #[validate(range(min = 0, max = 150))]
    pub age: Option<i32>,
    pub address: Option<String>,
    pub old_password: Option<String>,
    pub new_password: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/adopters/register
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterAdopterRequest>,
) -> AppResult<(StatusCode, Json<MessageResponse>)> {
    input.validate()?;
    let password_hash = account::hash_new_password(&input.password, &input.confirm_password)?;

    let adopter = AdopterRepo::create(
        &state.pool,
        &CreateAdopter {
            name: input.name,
            phone: input.phone,
            email: input.email,
            password_hash,
            gender: input.gender,
            age: input.age,
            address: input.address,
        },
    )
    .await?;

    tracing::info!(adopter_id = adopter.id, "Adopter registered");
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Adopter registered successfully")),
    ))
}

/// POST /api/adopters/login
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Response> {
    input.validate()?;
    let adopter = AdopterRepo::find_by_email(&state.pool, &input.email)
        .await?
        .ok_or_else(account::invalid_credentials)?;

    if !account::password_matches(&input.password, &adopter.password_hash)? {
        return Err(account::invalid_credentials());
    }

    account::start_session(&state, ROLE, adopter.id, &adopter.email).await
}

/// POST /api/adopters/token
pub async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<Json<account::AccessTokenResponse>> {
    let session = account::active_session(&state, &headers, ROLE).await?;
    let adopter = AdopterRepo::find_by_id(&state.pool, session.account_id)
        .await?
        .ok_or_else(|| CoreError::Unauthorized("Account no longer exists".into()))?;

    account::refreshed_access_token(&state, ROLE, adopter.id, &adopter.email)
}

/// DELETE /api/adopters/logout
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> AppResult<Response> {
    account::end_session(&state, &headers, ROLE).await
}

/// GET /api/adopters/me
pub async fn profile(
    State(state): State<AppState>,
    RequireAdopter(user): RequireAdopter,
) -> AppResult<Json<AdopterProfile>> {
    let adopter = find_adopter(&state, user.account_id).await?;
    Ok(Json(adopter.into()))
}

/// PUT /api/adopters/me
pub async fn update_profile(
    State(state): State<AppState>,
    RequireAdopter(user): RequireAdopter,
    Json(input): Json<UpdateAdopterRequest>,
) -> AppResult<Json<AdopterProfile>> {
    input.validate()?;
    let current = find_adopter(&state, user.account_id).await?;

    let password_hash = account::profile_password_hash(
        input.old_password.as_deref(),
        input.new_password.as_deref(),
        &current.password_hash,
    )?;

    let changes = UpdateAdopter {
        name: input.name,
        phone: input.phone,
        email: input.email,
        gender: input.gender,
        age: input.age,
        address: input.address,
        password_hash,
    };
    let updated = AdopterRepo::update(&state.pool, current.id, &changes)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Adopter",
            id: current.id,
        })?;

    Ok(Json(updated.into()))
}

/// PUT /api/adopters/me/password
pub async fn change_password(
    State(state): State<AppState>,
    RequireAdopter(user): RequireAdopter,
    Json(input): Json<ChangePasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    let adopter = find_adopter(&state, user.account_id).await?;
    let new_hash = account::rehash_for_change(&input, &adopter.password_hash)?;
    AdopterRepo::update_password(&state.pool, adopter.id, &new_hash).await?;

    Ok(Json(MessageResponse::new("Password updated successfully")))
}

/// PUT /api/adopters/me/photo
pub async fn upload_photo(
    State(state): State<AppState>,
    RequireAdopter(user): RequireAdopter,
    multipart: Multipart,
) -> AppResult<Json<PhotoResponse>> {
    let adopter = find_adopter(&state, user.account_id).await?;
    let file = account::read_profile_photo(multipart).await?;

    let hosted = host_image(state.images.as_ref(), FOLDER_PROFILE, file).await?;
    if let Err(e) = AdopterRepo::set_photo(
        &state.pool,
        adopter.id,
        Some(&hosted.public_id),
        Some(&hosted.secure_url),
    )
    .await
    {
        destroy_best_effort(state.images.as_ref(), &hosted.public_id).await;
        return Err(e.into());
    }

    if let Some(old_ref) = &adopter.photo_ref {
        destroy_best_effort(state.images.as_ref(), old_ref).await;
    }

    Ok(Json(PhotoResponse {
        message: "Profile photo updated successfully".into(),
        photo_url: hosted.secure_url,
    }))
}

/// DELETE /api/adopters/me/photo
pub async fn delete_photo(
    State(state): State<AppState>,
    RequireAdopter(user): RequireAdopter,
) -> AppResult<Json<MessageResponse>> {
    let adopter = find_adopter(&state, user.account_id).await?;
    if let Some(photo_ref) = &adopter.photo_ref {
        state.images.destroy(photo_ref).await?;
    }
    AdopterRepo::set_photo(&state.pool, adopter.id, None, None).await?;

    Ok(Json(MessageResponse::new("Profile photo deleted successfully")))
}

/// DELETE /api/adopters/me
///
/// Pets and their photos cascade in the database; their hosted images are
/// destroyed first.
pub async fn delete_account(
    State(state): State<AppState>,
    RequireAdopter(user): RequireAdopter,
) -> AppResult<Response> {
    let adopter = find_adopter(&state, user.account_id).await?;

    let mut hosted_refs: Vec<String> = adopter.photo_ref.iter().cloned().collect();
    for pet in PetRepo::list_by_owner(&state.pool, adopter.id).await? {
        hosted_refs.push(pet.primary_photo_ref);
        let photos = PetPhotoRepo::list_for_pet(&state.pool, pet.id).await?;
        hosted_refs.extend(photos.into_iter().map(|photo| photo.photo_ref));
    }

    if !AdopterRepo::delete(&state.pool, adopter.id).await? {
        return Err(CoreError::NotFound {
            entity: "Adopter",
            id: adopter.id,
        }
        .into());
    }

    futures::future::join_all(
        hosted_refs
            .iter()
            .map(|public_id| destroy_best_effort(state.images.as_ref(), public_id)),
    )
    .await;

    account::close_account_sessions(&state, ROLE, adopter.id).await
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_adopter(state: &AppState, id: DbId) -> AppResult<Adopter> {
    AdopterRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Adopter",
                id,
            })
        })
}
