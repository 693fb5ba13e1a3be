//! Assembling crew candidates from stored rows, and the eligible-member
//! listing built on them.

use heist_core::crew::CrewCandidate;
use heist_core::eligibility::{self, Commitment, HeistView, MemberView};
use heist_core::error::CoreError;
use heist_core::skill::{HeldSkill, RequiredSkill};
use heist_core::types::DbId;
use heist_db::models::heist::{CrewCommitment, CrewMemberView, RequiredSkillInput};
use heist_db::models::member::{Member, MemberSkill, SkillView};
use heist_db::repositories::{HeistRepo, MemberRepo};
use serde::Serialize;
use sqlx::PgPool;

use crate::error::{AppError, AppResult};

/// Response for `GET /heist/{id}/eligible_members`.
#[derive(Debug, Serialize)]
pub struct EligibleMembers {
    pub skills: Vec<RequiredSkillInput>,
    pub members: Vec<CrewMemberView>,
}

/// Pair each member with their skills and READY commitments.
///
/// Member order is preserved.
pub fn build_candidates(
    members: &[Member],
    skills: &[MemberSkill],
    commitments: &[CrewCommitment],
) -> Vec<CrewCandidate> {
    members
        .iter()
        .map(|m| CrewCandidate {
            member_id: m.id,
            name: m.name.clone(),
            status: m.status,
            skills: skills
                .iter()
                .filter(|s| s.member_id == m.id)
                .map(HeldSkill::from)
                .collect(),
            commitments: commitments
                .iter()
                .filter(|c| c.member_id == m.id)
                .map(Commitment::from)
                .collect(),
        })
        .collect()
}

/// Name and skills of each member, in the given order.
pub fn crew_views(members: &[Member], skills: &[MemberSkill]) -> Vec<CrewMemberView> {
    members
        .iter()
        .map(|m| CrewMemberView {
            name: m.name.clone(),
            skills: skills
                .iter()
                .filter(|s| s.member_id == m.id)
                .map(SkillView::from)
                .collect(),
        })
        .collect()
}

/// List every member who could currently be confirmed for the heist.
///
/// Applies the same check as crew confirmation: assignable status, no
/// overlapping READY commitment elsewhere, and at least one matching skill.
/// This is a read-only snapshot; confirmation re-checks under locks.
pub async fn eligible_members(pool: &PgPool, heist_id: DbId) -> AppResult<EligibleMembers> {
    let heist = HeistRepo::find_by_id(pool, heist_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Heist",
            id: heist_id,
        }))?;

    let skill_rows = HeistRepo::list_skills(pool, heist_id).await?;
    let required: Vec<RequiredSkill> = skill_rows.iter().map(RequiredSkill::from).collect();

    let members = MemberRepo::list_assignable(pool).await?;
    let ids: Vec<DbId> = members.iter().map(|m| m.id).collect();
    let held = MemberRepo::list_skills_for_members(pool, &ids).await?;
    let commitments = HeistRepo::ready_commitments(pool, &ids).await?;

    let view = HeistView {
        id: heist.id,
        window: heist.window(),
        required_skills: &required,
    };

    let eligible: Vec<Member> = build_candidates(&members, &held, &commitments)
        .iter()
        .zip(members.iter())
        .filter(|(candidate, _)| {
            eligibility::is_eligible(
                &view,
                &MemberView {
                    status: candidate.status,
                    skills: &candidate.skills,
                    commitments: &candidate.commitments,
                },
            )
        })
        .map(|(_, member)| member.clone())
        .collect();

    tracing::debug!(
        heist_id,
        considered = members.len(),
        eligible = eligible.len(),
        "Computed eligible members",
    );

    Ok(EligibleMembers {
        skills: skill_rows.iter().map(RequiredSkillInput::from).collect(),
        members: crew_views(&eligible, &held),
    })
}
