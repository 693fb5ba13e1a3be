//! Explicit heist start.

use heist_core::error::CoreError;
use heist_core::lifecycle::{self, HeistTrigger};
use heist_core::types::DbId;
use heist_db::models::heist::Heist;
use heist_db::repositories::HeistRepo;
use sqlx::PgPool;

use crate::error::{AppError, AppResult};

fn not_found(heist_id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Heist",
        id: heist_id,
    })
}

/// Move a READY heist to IN_PROGRESS.
///
/// The write only applies if the heist is still in the status read here.
/// If it lost a race (another start, or the sweep) the fresh status is
/// judged again, giving the same "not READY" rejection as any other
/// non-READY heist.
pub async fn start(pool: &PgPool, heist_id: DbId) -> AppResult<Heist> {
    let heist = HeistRepo::find_by_id(pool, heist_id)
        .await?
        .ok_or_else(|| not_found(heist_id))?;

    let target = lifecycle::apply(heist.status, HeistTrigger::Start)?;

    if let Some(started) = HeistRepo::transition(pool, heist_id, heist.status, target).await? {
        tracing::info!(heist_id, "Heist started");
        return Ok(started);
    }

    let current = HeistRepo::find_by_id(pool, heist_id)
        .await?
        .ok_or_else(|| not_found(heist_id))?;
    lifecycle::apply(current.status, HeistTrigger::Start)?;

    Err(AppError::InternalError(format!(
        "Heist {heist_id} is READY but the start did not apply"
    )))
}
