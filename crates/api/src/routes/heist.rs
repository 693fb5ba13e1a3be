//! Route definitions for the `/heist` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::heist;
use crate::state::AppState;

/// Routes mounted at `/heist`.
///
/// ```text
/// GET    /                                 -> list
/// POST   /                                 -> create
/// GET    /{id}                             -> get_by_id
/// GET    /{id}/skills                      -> get_skills
/// PATCH  /{id}/skills                      -> update_skills
/// GET    /{id}/status                      -> get_status
/// GET    /{id}/members                     -> get_members
/// PUT    /{id}/members                     -> confirm_members
/// GET    /{id}/eligible_members            -> eligible_members
/// PUT    /{id}/start                       -> start
/// PUT    /{id}/outcome                     -> resolve_outcome
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(heist::list).post(heist::create))
        .route("/{id}", get(heist::get_by_id))
        .route(
            "/{id}/skills",
            get(heist::get_skills).patch(heist::update_skills),
        )
        .route("/{id}/status", get(heist::get_status))
        .route(
            "/{id}/members",
            get(heist::get_members).put(heist::confirm_members),
        )
        .route("/{id}/eligible_members", get(heist::eligible_members))
        .route("/{id}/start", put(heist::start))
        .route("/{id}/outcome", put(heist::resolve_outcome))
}
