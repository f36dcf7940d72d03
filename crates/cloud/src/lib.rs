//! Image hosting for profile and pet photos.
//!
//! - [`provider`] -- the [`ImageHost`] trait and its error type.
//! - [`cloudinary`] -- signed uploads to a Cloudinary-compatible HTTP API.
//! - [`memory`] -- an in-process host for local development and tests.

pub mod cloudinary;
pub mod memory;
pub mod provider;

pub use cloudinary::{CloudinaryConfig, CloudinaryHost};
pub use memory::MemoryHost;
pub use provider::{HostedImage, ImageHost, ImageHostError};

/// Folder for adopter and doctor profile photos.
pub const FOLDER_PROFILE: &str = "profile";

/// Folder for pet primary and extra photos.
pub const FOLDER_PETS: &str = "pets";
