//! Handlers for the `/pets` resource.
//!
//! Listing endpoints fetch the flat pet/owner/photo join and fold it into
//! one record per pet with [`group_joined_rows`].

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use petpals_cloud::{HostedImage, FOLDER_PETS};
use petpals_core::dates::parse_publish_date;
use petpals_core::error::CoreError;
use petpals_core::grouping::{group_joined_rows, group_single};
use petpals_core::types::DbId;
use petpals_core::validation::{substring_pattern, validate_photo_capacity};
use petpals_db::models::pet::{CreatePet, CreatePetPhoto, PetFilter, PetWithPhotos};
use petpals_db::repositories::{PetPhotoRepo, PetRepo};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::account::MessageResponse;
use crate::handlers::upload::{
    destroy_best_effort, host_image, read_image_field, read_text_field, UploadedFile,
};
use crate::middleware::rbac::RequireAdopter;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /pets/search`.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub category: Option<String>,
}

/// Text fields of the `POST /pets` multipart form.
#[derive(Debug, Default, Validate)]
pub struct PetForm {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1, max = 50))]
    pub category: String,
    #[validate(length(min = 1, max = 20))]
    pub gender: String,
    #[validate(range(min = 0, max = 100))]
    pub age: Option<i32>,
    pub color: Option<String>,
    pub location: Option<String>,
    pub publish_date: Option<NaiveDate>,
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedPetResponse {
    pub message: String,
    pub pet_id: DbId,
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

/// GET /api/pets
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<PetWithPhotos>>> {
    let pets = fetch_grouped(&state, &PetFilter::All).await?;
    Ok(Json(pets))
}

/// GET /api/pets/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<PetWithPhotos>> {
    let rows = PetRepo::fetch_joined_rows(&state.pool, &PetFilter::ById(id)).await?;
    let pet = group_single(&rows, "Pet", id)?;
    Ok(Json(pet))
}

/// GET /api/pets/search?category=
///
/// Case-insensitive substring match; an empty result is still a 200.
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<Vec<PetWithPhotos>>> {
    let term = params.category.unwrap_or_default();
    if term.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Query parameter 'category' is required".into(),
        ));
    }

    let filter = PetFilter::CategoryLike(substring_pattern(&term));
    let pets = fetch_grouped(&state, &filter).await?;
    Ok(Json(pets))
}

/// GET /api/pets/mine
pub async fn mine(
    State(state): State<AppState>,
    RequireAdopter(user): RequireAdopter,
) -> AppResult<Json<Vec<PetWithPhotos>>> {
    let pets = fetch_grouped(&state, &PetFilter::ByOwner(user.account_id)).await?;
    Ok(Json(pets))
}

// ---------------------------------------------------------------------------
// Mutations
// ---------------------------------------------------------------------------

/// POST /api/pets
///
/// Multipart form with the pet's text fields and a `main_photo` file. The
/// photo is hosted first; if the insert then fails it is destroyed again.
pub async fn create(
    State(state): State<AppState>,
    RequireAdopter(user): RequireAdopter,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<CreatedPetResponse>)> {
    let mut form = PetForm::default();
    let mut main_photo: Option<UploadedFile> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "main_photo" => main_photo = Some(read_image_field(field).await?),
            "name" => form.name = read_text_field(field).await?,
            "category" => form.category = read_text_field(field).await?,
            "gender" => form.gender = read_text_field(field).await?,
            "age" => form.age = parse_age(&read_text_field(field).await?)?,
            "color" => form.color = non_empty(read_text_field(field).await?),
            "location" => form.location = non_empty(read_text_field(field).await?),
            "publishDate" => {
                form.publish_date = non_empty(read_text_field(field).await?)
                    .map(|date| parse_publish_date(&date))
                    .transpose()?;
            }
            "description" => form.description = non_empty(read_text_field(field).await?),
            _ => {} // ignore unknown fields
        }
    }

    let main_photo =
        main_photo.ok_or_else(|| AppError::BadRequest("No main photo uploaded".into()))?;
    form.validate()?;

    let hosted = host_image(state.images.as_ref(), FOLDER_PETS, main_photo).await?;

    let input = CreatePet {
        owner_id: user.account_id,
        name: form.name,
        category: form.category,
        gender: form.gender,
        age: form.age,
        color: form.color,
        location: form.location,
        publish_date: form.publish_date,
        description: form.description,
        primary_photo_ref: hosted.public_id.clone(),
        primary_photo_url: hosted.secure_url,
    };

    let pet = match PetRepo::create(&state.pool, &input).await {
        Ok(pet) => pet,
        Err(e) => {
            destroy_best_effort(state.images.as_ref(), &hosted.public_id).await;
            return Err(e.into());
        }
    };

    tracing::info!(pet_id = pet.id, owner_id = pet.owner_id, "Pet created");
    Ok((
        StatusCode::CREATED,
        Json(CreatedPetResponse {
            message: "Pet uploaded successfully".into(),
            pet_id: pet.id,
        }),
    ))
}

/// POST /api/pets/{id}/photos
///
/// Multipart form with repeated `photos` files. Only the owner may add
/// photos, and a pet holds at most five.
pub async fn upload_photos(
    State(state): State<AppState>,
    RequireAdopter(user): RequireAdopter,
    Path(id): Path<DbId>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<MessageResponse>)> {
    let pet = PetRepo::find_owned(&state.pool, id, user.account_id)
        .await?
        .ok_or(CoreError::NotFound { entity: "Pet", id })?;

    let mut files = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() == Some("photos") {
            files.push(read_image_field(field).await?);
        }
    }

    let existing = PetPhotoRepo::count_for_pet(&state.pool, pet.id).await?;
    validate_photo_capacity(existing, files.len())?;

    let hosted = host_all(&state, files).await?;

    let inputs: Vec<CreatePetPhoto> = hosted
        .iter()
        .map(|image| CreatePetPhoto {
            pet_id: pet.id,
            photo_ref: image.public_id.clone(),
            photo_url: image.secure_url.clone(),
        })
        .collect();

    if let Err(e) = PetPhotoRepo::create_batch(&state.pool, &inputs).await {
        destroy_all(&state, &hosted).await;
        return Err(e.into());
    }

    tracing::info!(pet_id = pet.id, count = hosted.len(), "Pet photos attached");
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Photos uploaded successfully")),
    ))
}

/// DELETE /api/pets/{id}
///
/// Removes the rows first, then the hosted images. Host failures are logged
/// and do not undo the deletion.
pub async fn delete(
    State(state): State<AppState>,
    RequireAdopter(user): RequireAdopter,
    Path(id): Path<DbId>,
) -> AppResult<Json<MessageResponse>> {
    let pet = PetRepo::find_owned(&state.pool, id, user.account_id)
        .await?
        .ok_or(CoreError::NotFound { entity: "Pet", id })?;
    let photos = PetPhotoRepo::list_for_pet(&state.pool, pet.id).await?;

    if !PetRepo::delete_owned(&state.pool, pet.id, user.account_id).await? {
        return Err(CoreError::NotFound { entity: "Pet", id }.into());
    }

    let refs = std::iter::once(pet.primary_photo_ref.as_str())
        .chain(photos.iter().map(|photo| photo.photo_ref.as_str()));
    futures::future::join_all(
        refs.map(|public_id| destroy_best_effort(state.images.as_ref(), public_id)),
    )
    .await;

    tracing::info!(pet_id = pet.id, "Pet deleted");
    Ok(Json(MessageResponse::new("Pet deleted successfully")))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn fetch_grouped(state: &AppState, filter: &PetFilter) -> AppResult<Vec<PetWithPhotos>> {
    let rows = PetRepo::fetch_joined_rows(&state.pool, filter).await?;
    Ok(group_joined_rows(&rows)?)
}

/// Upload every file concurrently. If any upload fails, the ones that
/// succeeded are destroyed and the first error is returned.
async fn host_all(state: &AppState, files: Vec<UploadedFile>) -> AppResult<Vec<HostedImage>> {
    let results = futures::future::join_all(
        files
            .into_iter()
            .map(|file| host_image(state.images.as_ref(), FOLDER_PETS, file)),
    )
    .await;

    let mut hosted = Vec::with_capacity(results.len());
    let mut first_error = None;
    for result in results {
        match result {
            Ok(image) => hosted.push(image),
            Err(e) => {
                first_error.get_or_insert(e);
            }
        }
    }

    match first_error {
        Some(e) => {
            destroy_all(state, &hosted).await;
            Err(e)
        }
        None => Ok(hosted),
    }
}

async fn destroy_all(state: &AppState, images: &[HostedImage]) {
    futures::future::join_all(
        images
            .iter()
            .map(|image| destroy_best_effort(state.images.as_ref(), &image.public_id)),
    )
    .await;
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn parse_age(value: &str) -> AppResult<Option<i32>> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse()
        .map(Some)
        .map_err(|_| AppError::BadRequest(format!("Invalid age '{value}'")))
}
