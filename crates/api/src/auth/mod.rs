//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- JWT access-token generation/validation and refresh-token helpers.
//! - [`cookie`] -- The HttpOnly `refreshToken` cookie.

pub mod cookie;
pub mod jwt;
pub mod password;
