pub mod health;
pub mod heist;
pub mod member;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /member                                  list, create
/// /member/{id}                             get
/// /member/{id}/skills                      get, upsert (PUT)
/// /member/{id}/skills/{skill_name}         delete
///
/// /heist                                   list, create
/// /heist/{id}                              get
/// /heist/{id}/skills                       get, upsert (PATCH)
/// /heist/{id}/status                       get
/// /heist/{id}/members                      crew (GET), confirm crew (PUT)
/// /heist/{id}/eligible_members             get
/// /heist/{id}/start                        start (PUT)
/// /heist/{id}/outcome                      resolve outcome (PUT)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/member", member::router())
        .nest("/heist", heist::router())
}
