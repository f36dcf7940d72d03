//! Route definitions for the `/adopters` resource.

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::adopter;
use crate::state::AppState;

/// Routes mounted at `/adopters`.
///
/// ```text
/// POST   /register     -> register
/// POST   /login        -> login
/// POST   /token        -> refresh
/// DELETE /logout       -> logout
/// GET    /me           -> profile
/// PUT    /me           -> update_profile
/// DELETE /me           -> delete_account
/// PUT    /me/password  -> change_password
/// PUT    /me/photo     -> upload_photo
/// DELETE /me/photo     -> delete_photo
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(adopter::register))
        .route("/login", post(adopter::login))
        .route("/token", post(adopter::refresh))
        .route("/logout", delete(adopter::logout))
        .route(
            "/me",
            get(adopter::profile)
                .put(adopter::update_profile)
                .delete(adopter::delete_account),
        )
        .route("/me/password", put(adopter::change_password))
        .route(
            "/me/photo",
            put(adopter::upload_photo).delete(adopter::delete_photo),
        )
}
