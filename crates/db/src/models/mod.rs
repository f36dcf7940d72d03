//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - A `Serialize` response shape where the row carries secrets
//! - `Create` / `Update` DTOs consumed by the repositories

pub mod adopter;
pub mod doctor;
pub mod pet;
pub mod session;
