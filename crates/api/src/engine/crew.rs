//! Crew confirmation.
//!
//! The heist row is locked first, then every member matching a requested
//! name in id order. READY commitments are read only after those locks are
//! held, so two confirmations sharing a member serialize on that member's
//! row and the later one sees the earlier one's committed crew.

use heist_core::crew::{self, CrewPlan};
use heist_core::eligibility::HeistView;
use heist_core::error::CoreError;
use heist_core::skill::RequiredSkill;
use heist_core::types::DbId;
use heist_db::repositories::{HeistRepo, MemberRepo};
use sqlx::PgPool;

use crate::engine::roster::build_candidates;
use crate::error::{AppError, AppResult};

/// Validate `requested` as the crew of `heist_id` and commit it.
///
/// An unknown heist is reported before the roster is looked at. On success
/// the heist is READY and its crew is exactly the resolved members. On any
/// failure nothing is written.
pub async fn confirm(
    pool: &PgPool,
    heist_id: DbId,
    requested: Option<&[String]>,
) -> AppResult<CrewPlan> {
    let mut tx = pool.begin().await?;

    let heist = HeistRepo::find_by_id_for_update(&mut tx, heist_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Heist",
            id: heist_id,
        }))?;

    let names = crew::requested_names(requested)?;

    let required: Vec<RequiredSkill> = HeistRepo::skills_in_tx(&mut tx, heist_id)
        .await?
        .iter()
        .map(RequiredSkill::from)
        .collect();

    let members = MemberRepo::lock_by_names(&mut tx, &names).await?;
    let ids: Vec<DbId> = members.iter().map(|m| m.id).collect();
    let skills = MemberRepo::skills_for_members_in_tx(&mut tx, &ids).await?;
    let commitments = HeistRepo::ready_commitments_in_tx(&mut tx, &ids).await?;
    let candidates = build_candidates(&members, &skills, &commitments);

    let view = HeistView {
        id: heist.id,
        window: heist.window(),
        required_skills: &required,
    };
    let plan = crew::plan_confirmation(heist.status, &view, &names, &candidates)?;

    HeistRepo::replace_crew(&mut tx, heist.id, &plan.member_ids).await?;
    HeistRepo::set_status(&mut tx, heist.id, plan.status).await?;
    tx.commit().await?;

    tracing::info!(
        heist_id,
        crew_size = plan.member_ids.len(),
        from = %heist.status,
        to = %plan.status,
        "Crew confirmed",
    );
    Ok(plan)
}
