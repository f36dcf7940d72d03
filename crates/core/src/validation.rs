//! Input validation shared by the account and pet handlers.

use crate::error::CoreError;

/// Image file extensions accepted for profile and pet photos.
pub const ALLOWED_IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Maximum number of additional photos attached to one pet.
pub const MAX_PHOTOS_PER_PET: i64 = 5;

/// Validate an uploaded file name and return its lowercase extension.
pub fn validate_image_file_name(file_name: &str) -> Result<String, CoreError> {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default();

    if ALLOWED_IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        Ok(ext)
    } else {
        Err(CoreError::Validation(format!(
            "Only image files are allowed ({}), got '{file_name}'",
            ALLOWED_IMAGE_EXTENSIONS.join(", ")
        )))
    }
}

/// Ensure attaching `incoming` photos keeps a pet within [`MAX_PHOTOS_PER_PET`].
pub fn validate_photo_capacity(existing: i64, incoming: usize) -> Result<(), CoreError> {
    if incoming == 0 {
        return Err(CoreError::Validation("No files uploaded".into()));
    }
    let total = existing.saturating_add(incoming as i64);
    if total > MAX_PHOTOS_PER_PET {
        return Err(CoreError::Validation(format!(
            "A pet can only have up to {MAX_PHOTOS_PER_PET} photos ({existing} already attached)"
        )));
    }
    Ok(())
}

/// Registration requires the password to be typed twice.
pub fn validate_password_confirmation(password: &str, confirm: &str) -> Result<(), CoreError> {
    if password != confirm {
        return Err(CoreError::Validation("Passwords do not match".into()));
    }
    Ok(())
}

/// Build a `LIKE`/`ILIKE` substring pattern, escaping `%`, `_` and `\`.
pub fn substring_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.trim().chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}
