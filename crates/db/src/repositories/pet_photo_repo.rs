//! Repository for the `pet_photos` table.

use petpals_core::types::DbId;
use sqlx::PgPool;

use crate::models::pet::{CreatePetPhoto, PetPhoto};

const COLUMNS: &str = "id, pet_id, photo_ref, photo_url, created_at";

pub struct PetPhotoRepo;

impl PetPhotoRepo {
    /// Insert several photos in one transaction, all or nothing.
    pub async fn create_batch(
        pool: &PgPool,
        inputs: &[CreatePetPhoto],
    ) -> Result<Vec<PetPhoto>, sqlx::Error> {
        let query = format!(
            "INSERT INTO pet_photos (pet_id, photo_ref, photo_url)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );

        let mut tx = pool.begin().await?;
        let mut created = Vec::with_capacity(inputs.len());
        for input in inputs {
            let photo = sqlx::query_as::<_, PetPhoto>(&query)
                .bind(input.pet_id)
                .bind(&input.photo_ref)
                .bind(&input.photo_url)
                .fetch_one(&mut *tx)
                .await?;
            created.push(photo);
        }
        tx.commit().await?;

        Ok(created)
    }

    /// Number of extra photos attached to a pet.
    pub async fn count_for_pet(pool: &PgPool, pet_id: DbId) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM pet_photos WHERE pet_id = $1")
            .bind(pet_id)
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    /// Extra photos of a pet in upload order.
    pub async fn list_for_pet(pool: &PgPool, pet_id: DbId) -> Result<Vec<PetPhoto>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM pet_photos WHERE pet_id = $1 ORDER BY id");
        sqlx::query_as::<_, PetPhoto>(&query)
            .bind(pet_id)
            .fetch_all(pool)
            .await
    }
}
