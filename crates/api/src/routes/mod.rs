pub mod adopter;
pub mod doctor;
pub mod health;
pub mod pet;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /adopters/register                 register (public)
/// /adopters/login                    login, sets refresh cookie (public)
/// /adopters/token                    refresh access token (cookie)
/// /adopters/logout                   end session (cookie)
/// /adopters/me                       profile, update, delete account
/// /adopters/me/password              change password
/// /adopters/me/photo                 upload, delete profile photo
///
/// /doctors                           public directory
/// /doctors/{id}                      public profile
/// /doctors/...                       same account routes as adopters
///
/// /pets                              list (public), create (adopter)
/// /pets/search?category=             search by category (public)
/// /pets/mine                         caller's pets (adopter)
/// /pets/{id}                         get (public), delete (owner)
/// /pets/{id}/photos                  attach photos (owner)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/adopters", adopter::router())
        .nest("/doctors", doctor::router())
        .nest("/pets", pet::router())
}
