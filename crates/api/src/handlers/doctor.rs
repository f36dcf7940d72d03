//! Handlers for the `/doctors` resource.
//!
//! Same account lifecycle as adopters, plus a public directory.

use axum::extract::{Multipart, Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::Response;
use axum::Json;
use petpals_cloud::FOLDER_PROFILE;
use petpals_core::error::CoreError;
use petpals_core::roles::AccountRole;
use petpals_core::types::DbId;
use petpals_db::models::doctor::{CreateDoctor, Doctor, DoctorProfile, UpdateDoctor};
use petpals_db::repositories::DoctorRepo;
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::account::{
    self, ChangePasswordRequest, LoginRequest, MessageResponse, PhotoResponse,
};
use crate::handlers::upload::{destroy_best_effort, host_image};
use crate::middleware::rbac::RequireDoctor;
use crate::state::AppState;

const ROLE: AccountRole = AccountRole::Doctor;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /doctors/register`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterDoctorRequest {
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
    pub specialty: Option<String>,
    pub education: Option<String>,
    #[validate(range(min = 0, max = 80))]
    pub experience_years: Option<i32>,
}

/// Request body for `PUT /doctors/me`.
///
/// The password is changed only when both `oldPassword` and `newPassword`
/// are present.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDoctorRequest {
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
    pub specialty: Option<String>,
    pub education: Option<String>,
    #[validate(range(min = 0, max = 80))]
    pub experience_years: Option<i32>,
    pub old_password: Option<String>,
    pub new_password: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/doctors/register
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterDoctorRequest>,
) -> AppResult<(StatusCode, Json<MessageResponse>)> {
    input.validate()?;
    let password_hash = account::hash_new_password(&input.password, &input.confirm_password)?;

    let doctor = DoctorRepo::create(
        &state.pool,
        &CreateDoctor {
            name: input.name,
            phone: input.phone,
            email: input.email,
            password_hash,
            gender: input.gender,
            age: input.age,
            address: input.address,
            specialty: input.specialty,
            education: input.education,
            experience_years: input.experience_years,
        },
    )
    .await?;

    tracing::info!(doctor_id = doctor.id, "Doctor registered");
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Doctor registered successfully")),
    ))
}

/// POST /api/doctors/login
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Response> {
    input.validate()?;
    let doctor = DoctorRepo::find_by_email(&state.pool, &input.email)
        .await?
        .ok_or_else(account::invalid_credentials)?;

    if !account::password_matches(&input.password, &doctor.password_hash)? {
        return Err(account::invalid_credentials());
    }

    account::start_session(&state, ROLE, doctor.id, &doctor.email).await
}

/// POST /api/doctors/token
pub async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<Json<account::AccessTokenResponse>> {
    let session = account::active_session(&state, &headers, ROLE).await?;
    let doctor = DoctorRepo::find_by_id(&state.pool, session.account_id)
        .await?
        .ok_or_else(|| CoreError::Unauthorized("Account no longer exists".into()))?;

    account::refreshed_access_token(&state, ROLE, doctor.id, &doctor.email)
}

/// DELETE /api/doctors/logout
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> AppResult<Response> {
    account::end_session(&state, &headers, ROLE).await
}

/// GET /api/doctors/me
pub async fn profile(
    State(state): State<AppState>,
    RequireDoctor(user): RequireDoctor,
) -> AppResult<Json<DoctorProfile>> {
    let doctor = find_doctor(&state, user.account_id).await?;
    Ok(Json(doctor.into()))
}

/// PUT /api/doctors/me
pub async fn update_profile(
    State(state): State<AppState>,
    RequireDoctor(user): RequireDoctor,
    Json(input): Json<UpdateDoctorRequest>,
) -> AppResult<Json<DoctorProfile>> {
    input.validate()?;
    let current = find_doctor(&state, user.account_id).await?;

    let password_hash = account::profile_password_hash(
        input.old_password.as_deref(),
        input.new_password.as_deref(),
        &current.password_hash,
    )?;

    let changes = UpdateDoctor {
        name: input.name,
        phone: input.phone,
        email: input.email,
        gender: input.gender,
        age: input.age,
        address: input.address,
        specialty: input.specialty,
        education: input.education,
        experience_years: input.experience_years,
        password_hash,
    };
    let updated = DoctorRepo::update(&state.pool, current.id, &changes)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Doctor",
            id: current.id,
        })?;

    Ok(Json(updated.into()))
}

/// PUT /api/doctors/me/password
pub async fn change_password(
    State(state): State<AppState>,
    RequireDoctor(user): RequireDoctor,
    Json(input): Json<ChangePasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    let doctor = find_doctor(&state, user.account_id).await?;
    let new_hash = account::rehash_for_change(&input, &doctor.password_hash)?;
    DoctorRepo::update_password(&state.pool, doctor.id, &new_hash).await?;

    Ok(Json(MessageResponse::new("Password updated successfully")))
}

/// PUT /api/doctors/me/photo
pub async fn upload_photo(
    State(state): State<AppState>,
    RequireDoctor(user): RequireDoctor,
    multipart: Multipart,
) -> AppResult<Json<PhotoResponse>> {
    let doctor = find_doctor(&state, user.account_id).await?;
    let file = account::read_profile_photo(multipart).await?;

    let hosted = host_image(state.images.as_ref(), FOLDER_PROFILE, file).await?;
    if let Err(e) = DoctorRepo::set_photo(
        &state.pool,
        doctor.id,
        Some(&hosted.public_id),
        Some(&hosted.secure_url),
    )
    .await
    {
        destroy_best_effort(state.images.as_ref(), &hosted.public_id).await;
        return Err(e.into());
    }

    if let Some(old_ref) = &doctor.photo_ref {
        destroy_best_effort(state.images.as_ref(), old_ref).await;
    }

    Ok(Json(PhotoResponse {
        message: "Profile photo updated successfully".into(),
        photo_url: hosted.secure_url,
    }))
}

/// DELETE /api/doctors/me/photo
pub async fn delete_photo(
    State(state): State<AppState>,
    RequireDoctor(user): RequireDoctor,
) -> AppResult<Json<MessageResponse>> {
    let doctor = find_doctor(&state, user.account_id).await?;
    if let Some(photo_ref) = &doctor.photo_ref {
        state.images.destroy(photo_ref).await?;
    }
    DoctorRepo::set_photo(&state.pool, doctor.id, None, None).await?;

    Ok(Json(MessageResponse::new("Profile photo deleted successfully")))
}

/// DELETE /api/doctors/me
pub async fn delete_account(
    State(state): State<AppState>,
    RequireDoctor(user): RequireDoctor,
) -> AppResult<Response> {
    let doctor = find_doctor(&state, user.account_id).await?;

    if !DoctorRepo::delete(&state.pool, doctor.id).await? {
        return Err(CoreError::NotFound {
            entity: "Doctor",
            id: doctor.id,
        }
        .into());
    }
    if let Some(photo_ref) = &doctor.photo_ref {
        destroy_best_effort(state.images.as_ref(), photo_ref).await;
    }

    account::close_account_sessions(&state, ROLE, doctor.id).await
}

/// GET /api/doctors
///
/// Public directory, ordered by name.
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<DoctorProfile>>> {
    let doctors = DoctorRepo::list(&state.pool).await?;
    Ok(Json(doctors.into_iter().map(DoctorProfile::from).collect()))
}

/// GET /api/doctors/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DoctorProfile>> {
    let doctor = find_doctor(&state, id).await?;
    Ok(Json(doctor.into()))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_doctor(state: &AppState, id: DbId) -> AppResult<Doctor> {
    DoctorRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Doctor",
                id,
            })
        })
}
