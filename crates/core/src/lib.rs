//! Domain types and pure logic for the PetPals platform.
//!
//! Nothing in this crate performs I/O; the database, image host and HTTP
//! layers depend on it.

pub mod dates;
pub mod error;
pub mod grouping;
pub mod roles;
pub mod types;
pub mod validation;
