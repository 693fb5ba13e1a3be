//! Handlers for the `/member` resource.

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::Json;
use heist_core::error::CoreError;
use heist_core::skill::HeldSkill;
use heist_core::types::DbId;
use heist_core::validation;
use heist_db::models::member::{
    CreateMember, MemberSkillsResponse, MemberWithSkills, SkillInput, SkillView,
    UpdateMemberSkills,
};
use heist_db::repositories::MemberRepo;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

fn member_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Member",
        id,
    })
}

/// Resolve default levels and validate a submitted skill list.
fn resolve_skills(input: &[SkillInput]) -> Result<Vec<(String, String)>, CoreError> {
    let skills: Vec<HeldSkill> = input
        .iter()
        .map(|s| HeldSkill {
            name: s.name.clone(),
            level: validation::level_or_default(s.level.as_deref()),
        })
        .collect();
    validation::validate_held_skills(&skills)?;
    Ok(skills.into_iter().map(|s| (s.name, s.level)).collect())
}

/// POST /api/v1/member
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateMember>,
) -> AppResult<(StatusCode, [(header::HeaderName, String); 1], Json<MemberWithSkills>)> {
    validation::validate_member_fields(&input.name, &input.email)?;
    let skills = resolve_skills(&input.skills)?;
    if let Some(main_skill) = &input.main_skill {
        validation::validate_main_skill(main_skill, skills.iter().map(|(n, _)| n.as_str()))?;
    }

    if MemberRepo::find_by_email(&state.pool, &input.email)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Validation(format!(
            "A member with email '{}' already exists.",
            input.email
        ))));
    }

    let member = MemberRepo::create(&state.pool, &input, &skills).await?;
    let rows = MemberRepo::list_skills(&state.pool, member.id).await?;
    tracing::info!(member_id = member.id, "Member registered");

    let location = format!("/member/{}", member.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(MemberWithSkills::assemble(member, &rows)),
    ))
}

/// GET /api/v1/member
pub async fn list(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<MemberWithSkills>>>> {
    let members = MemberRepo::list(&state.pool).await?;
    let ids: Vec<DbId> = members.iter().map(|m| m.id).collect();
    let skills = MemberRepo::list_skills_for_members(&state.pool, &ids).await?;

    let data = members
        .into_iter()
        .map(|m| MemberWithSkills::assemble(m, &skills))
        .collect();
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/member/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<MemberWithSkills>> {
    let member = MemberRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| member_not_found(id))?;
    let skills = MemberRepo::list_skills(&state.pool, id).await?;
    Ok(Json(MemberWithSkills::assemble(member, &skills)))
}

/// GET /api/v1/member/{id}/skills
pub async fn get_skills(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<MemberSkillsResponse>> {
    let member = MemberRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| member_not_found(id))?;
    let skills = MemberRepo::list_skills(&state.pool, id).await?;
    Ok(Json(MemberSkillsResponse {
        skills: skills.iter().map(SkillView::from).collect(),
        main_skill: member.main_skill,
    }))
}

/// PUT /api/v1/member/{id}/skills
///
/// Upserts skills by case-insensitive name and optionally sets the main
/// skill, which must name one of the member's skills afterwards.
pub async fn update_skills(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateMemberSkills>,
) -> AppResult<StatusCode> {
    let submitted = match input.skills.as_deref() {
        Some(skills) if !skills.is_empty() => skills,
        _ => {
            return Err(AppError::Core(CoreError::Validation(
                "No skills were provided in request".to_string(),
            )))
        }
    };
    let skills = resolve_skills(submitted)?;

    let mut tx = state.pool.begin().await?;
    MemberRepo::find_by_id_for_update(&mut tx, id)
        .await?
        .ok_or_else(|| member_not_found(id))?;

    MemberRepo::upsert_skills(&mut tx, id, &skills).await?;

    if let Some(main_skill) = &input.main_skill {
        let current = MemberRepo::skills_for_members_in_tx(&mut tx, &[id]).await?;
        validation::validate_main_skill(main_skill, current.iter().map(|s| s.name.as_str()))?;
        MemberRepo::set_main_skill(&mut tx, id, main_skill).await?;
    }

    tx.commit().await?;
    tracing::info!(member_id = id, count = skills.len(), "Member skills updated");
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/member/{id}/skills/{skill_name}
pub async fn delete_skill(
    State(state): State<AppState>,
    Path((id, skill_name)): Path<(DbId, String)>,
) -> AppResult<StatusCode> {
    MemberRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| member_not_found(id))?;

    if MemberRepo::delete_skill(&state.pool, id, &skill_name).await? {
        tracing::info!(member_id = id, skill = %skill_name, "Member skill removed");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::Missing(format!(
            "Skill '{skill_name}' not found for member with ID {id}."
        ))))
    }
}
