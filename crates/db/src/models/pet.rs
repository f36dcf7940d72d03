//! Pet listing models, the joined listing row, and its grouped wire shape.

use chrono::NaiveDate;
use petpals_core::dates::serialize_publish_date;
use petpals_core::error::CoreError;
use petpals_core::grouping::{Grouped, JoinedRow};
use petpals_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `pets` table.
#[derive(Debug, Clone, FromRow)]
pub struct Pet {
    pub id: DbId,
    pub owner_id: DbId,
    pub name: String,
    pub category: String,
    pub gender: String,
    pub age: Option<i32>,
    pub color: Option<String>,
    pub location: Option<String>,
    pub publish_date: NaiveDate,
    pub description: Option<String>,
    pub primary_photo_ref: String,
    pub primary_photo_url: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a pet. The primary photo is already hosted.
#[derive(Debug, Clone)]
pub struct CreatePet {
    pub owner_id: DbId,
    pub name: String,
    pub category: String,
    pub gender: String,
    pub age: Option<i32>,
    pub color: Option<String>,
    pub location: Option<String>,
    /// `None` lets the database default to the current date.
    pub publish_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub primary_photo_ref: String,
    pub primary_photo_url: String,
}

/// A row from the `pet_photos` table.
#[derive(Debug, Clone, FromRow)]
pub struct PetPhoto {
    pub id: DbId,
    pub pet_id: DbId,
    pub photo_ref: String,
    pub photo_url: String,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone)]
pub struct CreatePetPhoto {
    pub pet_id: DbId,
    pub photo_ref: String,
    pub photo_url: String,
}

/// One row of `pets JOIN adopters LEFT JOIN pet_photos`.
///
/// Pet and owner columns repeat once per photo; the photo columns are all
/// `NULL` when the pet has no extra photos. The key is decoded as an
/// `Option` so a malformed result set is rejected by the grouping step
/// instead of failing deep inside the driver.
#[derive(Debug, Clone, FromRow)]
pub struct PetJoinRow {
    pub pet_id: Option<DbId>,
    pub name: String,
    pub category: String,
    pub gender: String,
    pub age: Option<i32>,
    pub color: Option<String>,
    pub location: Option<String>,
    pub publish_date: NaiveDate,
    pub description: Option<String>,
    pub primary_photo_ref: String,
    pub primary_photo_url: String,
    pub owner_name: String,
    pub owner_location: Option<String>,
    pub owner_phone: String,
    pub owner_photo_url: Option<String>,
    pub photo_id: Option<DbId>,
    pub photo_ref: Option<String>,
    pub photo_url: Option<String>,
}

/// Pet plus owner fields as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PetListing {
    pub id: DbId,
    pub name: String,
    pub category: String,
    pub gender: String,
    pub age: Option<i32>,
    pub color: Option<String>,
    pub location: Option<String>,
    #[serde(serialize_with = "serialize_publish_date")]
    pub publish_date: NaiveDate,
    pub description: Option<String>,
    pub primary_photo_ref: String,
    pub primary_photo_url: String,
    pub owner_name: String,
    pub owner_location: Option<String>,
    pub owner_phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_photo_url: Option<String>,
}

/// An additional pet photo as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingPhoto {
    pub photo_id: DbId,
    pub photo_ref: String,
    pub photo_url: String,
}

/// A pet listing with its owner and all extra photos.
pub type PetWithPhotos = Grouped<PetListing, ListingPhoto>;

impl JoinedRow for PetJoinRow {
    type Parent = PetListing;
    type Child = ListingPhoto;

    fn parent_key(&self) -> Option<DbId> {
        self.pet_id
    }

    fn parent(&self) -> PetListing {
        PetListing {
            id: self.pet_id.unwrap_or_default(),
            name: self.name.clone(),
            category: self.category.clone(),
            gender: self.gender.clone(),
            age: self.age,
            color: self.color.clone(),
            location: self.location.clone(),
            publish_date: self.publish_date,
            description: self.description.clone(),
            primary_photo_ref: self.primary_photo_ref.clone(),
            primary_photo_url: self.primary_photo_url.clone(),
            owner_name: self.owner_name.clone(),
            owner_location: self.owner_location.clone(),
            owner_phone: self.owner_phone.clone(),
            owner_photo_url: self.owner_photo_url.clone(),
        }
    }

    fn child_key(&self) -> Option<DbId> {
        self.photo_id
    }

    fn child(&self) -> Result<ListingPhoto, CoreError> {
        let (Some(photo_id), Some(photo_ref), Some(photo_url)) =
            (self.photo_id, &self.photo_ref, &self.photo_url)
        else {
            return Err(CoreError::InvalidInput(format!(
                "pet {:?} has a photo row with missing columns",
                self.pet_id
            )));
        };
        Ok(ListingPhoto {
            photo_id,
            photo_ref: photo_ref.clone(),
            photo_url: photo_url.clone(),
        })
    }
}

/// Which pets a joined listing query should return.
#[derive(Debug, Clone)]
pub enum PetFilter {
    All,
    ById(DbId),
    ByOwner(DbId),
    /// Case-insensitive `ILIKE` pattern on the category column.
    CategoryLike(String),
}

#[cfg(test)]
mod tests {
    use petpals_core::grouping::group_joined_rows;

    use super::*;

    fn join_row(pet_id: DbId, photo_id: Option<DbId>) -> PetJoinRow {
        PetJoinRow {
            pet_id: Some(pet_id),
            name: "Luna".into(),
            category: "Cat".into(),
            gender: "female".into(),
            age: Some(2),
            color: Some("black".into()),
            location: Some("Bandung".into()),
            publish_date: NaiveDate::from_ymd_opt(2024, 5, 17).unwrap(),
            description: None,
            primary_photo_ref: "pets/luna".into(),
            primary_photo_url: "https://img.test/pets/luna.png".into(),
            owner_name: "Dewi".into(),
            owner_location: Some("Jl. Merdeka 1".into()),
            owner_phone: "0812".into(),
            owner_photo_url: None,
            photo_id,
            photo_ref: photo_id.map(|id| format!("pets/extra_{id}")),
            photo_url: photo_id.map(|id| format!("https://img.test/pets/extra_{id}.png")),
        }
    }

    #[test]
    fn grouped_listing_uses_wire_field_names() {
        let groups = group_joined_rows(&[join_row(4, Some(40)), join_row(4, Some(41))]).unwrap();
        let json = serde_json::to_value(&groups).unwrap();
        let pet = &json[0];

        assert_eq!(pet["id"], 4);
        assert_eq!(pet["publishDate"], "2024-05-17");
        assert_eq!(pet["primaryPhotoUrl"], "https://img.test/pets/luna.png");
        assert_eq!(pet["ownerName"], "Dewi");
        assert_eq!(pet["ownerLocation"], "Jl. Merdeka 1");
        assert!(pet.get("ownerPhotoUrl").is_none());
        assert_eq!(pet["children"][0]["photoId"], 40);
        assert_eq!(pet["children"][1]["photoRef"], "pets/extra_41");
        assert_eq!(pet["children"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn owner_photo_is_serialized_when_present() {
        let mut row = join_row(1, None);
        row.owner_photo_url = Some("https://img.test/profile/dewi.png".into());
        let groups = group_joined_rows(&[row]).unwrap();
        let json = serde_json::to_value(&groups[0]).unwrap();

        assert_eq!(json["ownerPhotoUrl"], "https://img.test/profile/dewi.png");
        assert_eq!(json["children"], serde_json::json!([]));
    }

    #[test]
    fn photo_row_without_url_is_rejected() {
        let mut row = join_row(1, Some(10));
        row.photo_url = None;

        assert!(matches!(
            group_joined_rows(&[row]),
            Err(CoreError::InvalidInput(_))
        ));
    }
}
