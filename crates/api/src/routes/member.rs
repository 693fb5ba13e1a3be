//! Route definitions for the `/member` resource.

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::member;
use crate::state::AppState;

/// Routes mounted at `/member`.
///
/// ```text
/// GET    /                                 -> list
/// POST   /                                 -> create
/// GET    /{id}                             -> get_by_id
/// GET    /{id}/skills                      -> get_skills
/// PUT    /{id}/skills                      -> update_skills
/// DELETE /{id}/skills/{skill_name}         -> delete_skill
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(member::list).post(member::create))
        .route("/{id}", get(member::get_by_id))
        .route(
            "/{id}/skills",
            get(member::get_skills).put(member::update_skills),
        )
        .route("/{id}/skills/{skill_name}", delete(member::delete_skill))
}
