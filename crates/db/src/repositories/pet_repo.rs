//! Repository for the `pets` table and the joined listing query.

use petpals_core::types::DbId;
use sqlx::PgPool;

use crate::models::pet::{CreatePet, Pet, PetFilter, PetJoinRow};

const COLUMNS: &str = "id, owner_id, name, category, gender, age, color, location, publish_date, \
                        description, primary_photo_ref, primary_photo_url, created_at, updated_at";

/// Select list for `pets p JOIN adopters a LEFT JOIN pet_photos ph`.
const JOIN_COLUMNS: &str = "p.id AS pet_id, p.name, p.category, p.gender, p.age, p.color, \
                             p.location, p.publish_date, p.description, p.primary_photo_ref, \
                             p.primary_photo_url, \
                             a.name AS owner_name, a.address AS owner_location, \
                             a.phone AS owner_phone, a.photo_url AS owner_photo_url, \
                             ph.id AS photo_id, ph.photo_ref, ph.photo_url";

pub struct PetRepo;

impl PetRepo {
    /// Insert a pet inside a transaction, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreatePet) -> Result<Pet, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO pets (owner_id, name, category, gender, age, color, location,
                               publish_date, description, primary_photo_ref, primary_photo_url)
             VALUES ($1, $2, $3, $4, $5, $6, $7, COALESCE($8, CURRENT_DATE), $9, $10, $11)
             RETURNING {COLUMNS}"
        );
        let pet = sqlx::query_as::<_, Pet>(&query)
            .bind(input.owner_id)
            .bind(&input.name)
            .bind(&input.category)
            .bind(&input.gender)
            .bind(input.age)
            .bind(&input.color)
            .bind(&input.location)
            .bind(input.publish_date)
            .bind(&input.description)
            .bind(&input.primary_photo_ref)
            .bind(&input.primary_photo_url)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(pet)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Pet>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM pets WHERE id = $1");
        sqlx::query_as::<_, Pet>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a pet only if it belongs to `owner_id`.
    pub async fn find_owned(
        pool: &PgPool,
        id: DbId,
        owner_id: DbId,
    ) -> Result<Option<Pet>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM pets WHERE id = $1 AND owner_id = $2");
        sqlx::query_as::<_, Pet>(&query)
            .bind(id)
            .bind(owner_id)
            .fetch_optional(pool)
            .await
    }

    /// All pets owned by an adopter, oldest first.
    pub async fn list_by_owner(pool: &PgPool, owner_id: DbId) -> Result<Vec<Pet>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM pets WHERE owner_id = $1 ORDER BY id");
        sqlx::query_as::<_, Pet>(&query)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }

    /// Delete a pet owned by `owner_id`. Its photos cascade.
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete_owned(pool: &PgPool, id: DbId, owner_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM pets WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Fetch the flat pet/owner/photo join for the given filter.
    ///
    /// Rows are ordered by pet id, then photo id, so all rows of one pet are
    /// contiguous and photos come back in upload order.
    pub async fn fetch_joined_rows(
        pool: &PgPool,
        filter: &PetFilter,
    ) -> Result<Vec<PetJoinRow>, sqlx::Error> {
        let where_clause = match filter {
            PetFilter::All => "",
            PetFilter::ById(_) => "WHERE p.id = $1",
            PetFilter::ByOwner(_) => "WHERE p.owner_id = $1",
            PetFilter::CategoryLike(_) => "WHERE p.category ILIKE $1",
        };
        let query = format!(
            "SELECT {JOIN_COLUMNS}
             FROM pets p
             JOIN adopters a ON a.id = p.owner_id
             LEFT JOIN pet_photos ph ON ph.pet_id = p.id
             {where_clause}
             ORDER BY p.id, ph.id"
        );

        let rows = sqlx::query_as::<_, PetJoinRow>(&query);
        let rows = match filter {
            PetFilter::All => rows,
            PetFilter::ById(id) | PetFilter::ByOwner(id) => rows.bind(*id),
            PetFilter::CategoryLike(pattern) => rows.bind(pattern.as_str()),
        };
        rows.fetch_all(pool).await
    }
}
