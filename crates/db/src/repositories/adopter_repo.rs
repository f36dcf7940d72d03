//! Repository for the `adopters` table.

use petpals_core::types::DbId;
use sqlx::PgPool;

use crate::models::adopter::{Adopter, CreateAdopter, UpdateAdopter};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, phone, email, password_hash, gender, age, address, \
                        photo_ref, photo_url, created_at, updated_at";

/// Provides CRUD operations for adopter accounts.
pub struct AdopterRepo;

impl AdopterRepo {
    /// Insert a new adopter, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateAdopter) -> Result<Adopter, sqlx::Error> {
        let query = format!(
            "INSERT INTO adopters (name, phone, email, password_hash, gender, age, address)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Adopter>(&query)
            .bind(&input.name)
            .bind(&input.phone)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(&input.gender)
            .bind(input.age)
            .bind(&input.address)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Adopter>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM adopters WHERE id = $1");
        sqlx::query_as::<_, Adopter>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an adopter by email (case-sensitive).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Adopter>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM adopters WHERE email = $1");
        sqlx::query_as::<_, Adopter>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Update profile fields and, optionally, the password hash in one
    /// statement. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateAdopter,
    ) -> Result<Option<Adopter>, sqlx::Error> {
        let query = format!(
            "UPDATE adopters SET
                name = COALESCE($2, name),
                phone = COALESCE($3, phone),
                email = COALESCE($4, email),
                gender = COALESCE($5, gender),
                age = COALESCE($6, age),
                address = COALESCE($7, address),
                password_hash = COALESCE($8, password_hash)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Adopter>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.phone)
            .bind(&input.email)
            .bind(&input.gender)
            .bind(input.age)
            .bind(&input.address)
            .bind(&input.password_hash)
            .fetch_optional(pool)
            .await
    }

    /// Update the password hash. Returns `true` if the row was updated.
    pub async fn update_password(
        pool: &PgPool,
        id: DbId,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE adopters SET password_hash = $2 WHERE id = $1")
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
        let result = sqlx::query("UPDATE adopters SET photo_ref = $2, photo_url = $3 WHERE id = $1")
            .bind(id)
            .bind(photo_ref)
            .bind(photo_url)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete an adopter. Their pets and pet photos cascade.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM adopters WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
