//! Multipart helpers shared by the profile-photo and pet handlers.

use axum::extract::multipart::Field;
use petpals_cloud::{HostedImage, ImageHost};
use petpals_core::validation::validate_image_file_name;

use crate::error::{AppError, AppResult};

/// An image file read from a multipart field, extension already checked.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Read a file field into memory.
///
/// Rejects fields without a file name and names whose extension is not an
/// accepted image type.
pub async fn read_image_field(field: Field<'_>) -> AppResult<UploadedFile> {
    let file_name = field
        .file_name()
        .map(str::to_string)
        .ok_or_else(|| AppError::BadRequest("File field is missing a file name".into()))?;
    validate_image_file_name(&file_name)?;

    let bytes = field
        .bytes()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    if bytes.is_empty() {
        return Err(AppError::BadRequest(format!("File '{file_name}' is empty")));
    }

    Ok(UploadedFile {
        file_name,
        bytes: bytes.to_vec(),
    })
}

/// Read a text field, mapping multipart errors to 400.
pub async fn read_text_field(field: Field<'_>) -> AppResult<String> {
    field
        .text()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))
}

/// Upload a file into `folder` on the image host.
pub async fn host_image(
    images: &dyn ImageHost,
    folder: &str,
    file: UploadedFile,
) -> AppResult<HostedImage> {
    let hosted = images.upload(folder, &file.file_name, file.bytes).await?;
    tracing::debug!(public_id = %hosted.public_id, folder, "Image uploaded");
    Ok(hosted)
}

/// Destroy a hosted image, logging instead of failing.
///
/// Used on cleanup paths where the database change must still go through.
pub async fn destroy_best_effort(images: &dyn ImageHost, public_id: &str) {
    if let Err(e) = images.destroy(public_id).await {
        tracing::warn!(public_id, error = %e, "Failed to destroy hosted image");
    }
}
