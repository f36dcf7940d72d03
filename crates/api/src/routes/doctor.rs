//! Route definitions for the `/doctors` resource.

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::doctor;
use crate::state::AppState;

/// Routes mounted at `/doctors`.
///
/// ```text
/// GET    /             -> list (public)
/// GET    /{id}         -> get_by_id (public)
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
        .route("/", get(doctor::list))
        .route("/register", post(doctor::register))
        .route("/login", post(doctor::login))
        .route("/token", post(doctor::refresh))
        .route("/logout", delete(doctor::logout))
        .route(
            "/me",
            get(doctor::profile)
                .put(doctor::update_profile)
                .delete(doctor::delete_account),
        )
        .route("/me/password", put(doctor::change_password))
        .route(
            "/me/photo",
            put(doctor::upload_photo).delete(doctor::delete_photo),
        )
        .route("/{id}", get(doctor::get_by_id))
}
