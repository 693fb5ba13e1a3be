//! Heist outcome resolution.

use heist_core::error::CoreError;
use heist_core::lifecycle;
use heist_core::outcome::{self, CrewMember, FateSource, HeistOutcome, Resolution};
use heist_core::skill::RequiredSkill;
use heist_core::types::DbId;
use heist_db::repositories::{HeistRepo, MemberRepo};
use serde::Serialize;
use sqlx::PgPool;

use crate::error::{AppError, AppResult};

/// Response for `PUT /heist/{id}/outcome`.
#[derive(Debug, Serialize)]
pub struct OutcomeResponse {
    pub outcome: HeistOutcome,
}

/// Classify the heist by staffing and write every crew member's fate.
///
/// The heist row and the crew's member rows are locked for the duration,
/// and all member updates commit together. The outcome itself is returned,
/// not stored.
pub async fn resolve(
    pool: &PgPool,
    heist_id: DbId,
    fate: &dyn FateSource,
) -> AppResult<Resolution> {
    let mut tx = pool.begin().await?;

    HeistRepo::find_by_id_for_update(&mut tx, heist_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Heist",
            id: heist_id,
        }))?;

    let required: Vec<RequiredSkill> = HeistRepo::skills_in_tx(&mut tx, heist_id)
        .await?
        .iter()
        .map(RequiredSkill::from)
        .collect();

    let crew: Vec<CrewMember> = HeistRepo::lock_crew_members(&mut tx, heist_id)
        .await?
        .iter()
        .map(|m| CrewMember {
            member_id: m.id,
            status: m.status,
        })
        .collect();

    let resolution = outcome::resolve(&required, &crew, fate)?;

    for &(member_id, status) in &resolution.member_updates {
        if let Some(current) = crew.iter().find(|c| c.member_id == member_id) {
            lifecycle::validate_member_transition(current.status, status)?;
        }
        MemberRepo::set_status(&mut tx, member_id, status).await?;
    }

    tx.commit().await?;

    tracing::info!(
        heist_id,
        outcome = %resolution.outcome,
        ratio = resolution.ratio,
        required = resolution.required,
        confirmed = resolution.confirmed,
        "Heist outcome resolved",
    );
    Ok(resolution)
}
