//! Adopter account model and DTOs.

use petpals_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Full row from the `adopters` table.
///
/// Contains the password hash -- never serialize this directly.
/// Use [`AdopterProfile`] for API output.
#[derive(Debug, Clone, FromRow)]
pub struct Adopter {
    pub id: DbId,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub password_hash: String,
    pub gender: Option<String>,
    pub age: Option<i32>,
    pub address: Option<String>,
    pub photo_ref: Option<String>,
    pub photo_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Public adopter profile.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdopterProfile {
    pub id: DbId,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub gender: Option<String>,
    pub age: Option<i32>,
    pub address: Option<String>,
    pub photo_url: Option<String>,
}

impl From<Adopter> for AdopterProfile {
    fn from(row: Adopter) -> Self {
        Self {
            id: row.id,
            name: row.name,
            phone: row.phone,
            email: row.email,
            gender: row.gender,
            age: row.age,
            address: row.address,
            photo_url: row.photo_url,
        }
    }
}

/// DTO for inserting a new adopter. The password is already hashed.
#[derive(Debug, Clone)]
pub struct CreateAdopter {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub password_hash: String,
    pub gender: Option<String>,
    pub age: Option<i32>,
    pub address: Option<String>,
}

/// DTO for updating an adopter profile. `None` leaves the column unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateAdopter {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub gender: Option<String>,
    pub age: Option<i32>,
    pub address: Option<String>,
    /// Replacement hash, written in the same statement as the profile fields.
    pub password_hash: Option<String>,
}
