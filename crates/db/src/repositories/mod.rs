//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod adopter_repo;
pub mod doctor_repo;
pub mod pet_photo_repo;
pub mod pet_repo;
pub mod session_repo;

pub use adopter_repo::AdopterRepo;
pub use doctor_repo::DoctorRepo;
pub use pet_photo_repo::PetPhotoRepo;
pub use pet_repo::PetRepo;
pub use session_repo::SessionRepo;
