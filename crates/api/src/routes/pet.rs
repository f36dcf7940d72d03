//! Route definitions for the `/pets` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::pet;
use crate::state::AppState;

/// Routes mounted at `/pets`.
///
/// ```text
/// GET    /               -> list
/// POST   /               -> create (adopter)
/// GET    /search         -> search
/// GET    /mine           -> mine (adopter)
/// GET    /{id}           -> get_by_id
/// DELETE /{id}           -> delete (owner)
/// POST   /{id}/photos    -> upload_photos (owner)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(pet::list).post(pet::create))
        .route("/search", get(pet::search))
        .route("/mine", get(pet::mine))
        .route("/{id}", get(pet::get_by_id).delete(pet::delete))
        .route("/{id}/photos", post(pet::upload_photos))
}
