//! Repository for the `doctors` table.

use petpals_core::types::DbId;
use sqlx::PgPool;

use crate::models::doctor::{CreateDoctor, Doctor, UpdateDoctor};

const COLUMNS: &str = "id, name, phone, email, password_hash, gender, age, address, \
                        specialty, education, experience_years, photo_ref, photo_url, \
                        created_at, updated_at";

/// Provides CRUD operations for doctor accounts.
pub struct DoctorRepo;

impl DoctorRepo {
    pub async fn create(pool: &PgPool, input: &CreateDoctor) -> Result<Doctor, sqlx::Error> {
        let query = format!(
            "INSERT INTO doctors (name, phone, email, password_hash, gender, age, address,
                                  specialty, education, experience_years)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Doctor>(&query)
            .bind(&input.name)
            .bind(&input.phone)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(&input.gender)
            .bind(input.age)
            .bind(&input.address)
            .bind(&input.specialty)
            .bind(&input.education)
            .bind(input.experience_years)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Doctor>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM doctors WHERE id = $1");
        sqlx::query_as::<_, Doctor>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Doctor>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM doctors WHERE email = $1");
        sqlx::query_as::<_, Doctor>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// List all doctors ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<Doctor>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM doctors ORDER BY name, id");
        sqlx::query_as::<_, Doctor>(&query).fetch_all(pool).await
    }

    /// Update profile fields. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateDoctor,
    ) -> Result<Option<Doctor>, sqlx::Error> {
        let query = format!(
            "UPDATE doctors SET
                name = COALESCE($2, name),
                phone = COALESCE($3, phone),
                email = COALESCE($4, email),
                gender = COALESCE($5, gender),
                age = COALESCE($6, age),
                address = COALESCE($7, address),
                specialty = COALESCE($8, specialty),
                education = COALESCE($9, education),
                experience_years = COALESCE($10, experience_years),
                password_hash = COALESCE($11, password_hash)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Doctor>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.phone)
            .bind(&input.email)
            .bind(&input.gender)
            .bind(input.age)
            .bind(&input.address)
            .bind(&input.specialty)
            .bind(&input.education)
            .bind(input.experience_years)
            .bind(&input.password_hash)
            .fetch_optional(pool)
            .await
    }

    pub async fn update_password(
        pool: &PgPool,
        id: DbId,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE doctors SET password_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Set or clear (`None`) the hosted profile photo.
    pub async fn set_photo(
        pool: &PgPool,
        id: DbId,
        photo_ref: Option<&str>,
        photo_url: Option<&str>,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE doctors SET photo_ref = $2, photo_url = $3 WHERE id = $1")
            .bind(id)
            .bind(photo_ref)
            .bind(photo_url)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM doctors WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
