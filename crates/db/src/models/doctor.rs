//! Doctor (veterinarian) account model and DTOs.

use petpals_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Full row from the `doctors` table. Contains the password hash.
#[derive(Debug, Clone, FromRow)]
pub struct Doctor {
    pub id: DbId,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub password_hash: String,
    pub gender: Option<String>,
    pub age: Option<i32>,
    pub address: Option<String>,
    pub specialty: Option<String>,
    pub education: Option<String>,
    pub experience_years: Option<i32>,
    pub photo_ref: Option<String>,
    pub photo_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Public doctor profile, also used for the public directory.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorProfile {
    pub id: DbId,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub gender: Option<String>,
    pub age: Option<i32>,
    pub address: Option<String>,
    pub specialty: Option<String>,
    pub education: Option<String>,
    pub experience_years: Option<i32>,
    pub photo_url: Option<String>,
}

impl From<Doctor> for DoctorProfile {
    fn from(row: Doctor) -> Self {
        Self {
            id: row.id,
            name: row.name,
            phone: row.phone,
            email: row.email,
            gender: row.gender,
            age: row.age,
            address: row.address,
            specialty: row.specialty,
            education: row.education,
            experience_years: row.experience_years,
            photo_url: row.photo_url,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateDoctor {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub password_hash: String,
    pub gender: Option<String>,
    pub age: Option<i32>,
    pub address: Option<String>,
    pub specialty: Option<String>,
    pub education: Option<String>,
    pub experience_years: Option<i32>,
}

/// Partial doctor profile update. `None` leaves the column unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateDoctor {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub gender: Option<String>,
    pub age: Option<i32>,
    pub address: Option<String>,
    pub specialty: Option<String>,
    pub education: Option<String>,
    pub experience_years: Option<i32>,
    /// Replacement hash, applied together with the profile fields.
    pub password_hash: Option<String>,
}
