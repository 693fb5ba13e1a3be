//! Handlers for the `/heist` resource.

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::Json;
use chrono::Utc;
use heist_core::error::CoreError;
use heist_core::lifecycle;
use heist_core::skill::RequiredSkill;
use heist_core::types::DbId;
use heist_core::validation;
use heist_db::models::heist::{
    ConfirmCrew, CreateHeist, CrewMemberView, Heist, HeistStatusResponse, HeistWithSkills,
    RequiredSkillInput, UpdateHeistSkills,
};
use heist_db::repositories::{HeistRepo, MemberRepo};

use crate::engine;
use crate::engine::outcome::OutcomeResponse;
use crate::engine::roster::EligibleMembers;
use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

fn heist_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Heist",
        id,
    })
}

async fn find_heist(state: &AppState, id: DbId) -> AppResult<Heist> {
    HeistRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| heist_not_found(id))
}

/// POST /api/v1/heist
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateHeist>,
) -> AppResult<(StatusCode, [(header::HeaderName, String); 1], Json<HeistWithSkills>)> {
    validation::validate_heist_fields(&input.name, &input.location)?;
    validation::validate_schedule(input.start_time, input.end_time, Utc::now())?;
    let required: Vec<RequiredSkill> = input.skills.iter().map(RequiredSkill::from).collect();
    validation::validate_required_skills(&required)?;

    if HeistRepo::find_by_name(&state.pool, &input.name)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Validation(format!(
            "A heist named '{}' already exists.",
            input.name
        ))));
    }

    let heist = HeistRepo::create(&state.pool, &input).await?;
    let skills = HeistRepo::list_skills(&state.pool, heist.id).await?;
    tracing::info!(heist_id = heist.id, name = %heist.name, "Heist created");

    let location = format!("/heist/{}", heist.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(HeistWithSkills::assemble(heist, &skills, &[])),
    ))
}

/// GET /api/v1/heist
pub async fn list(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<HeistWithSkills>>>> {
    let heists = HeistRepo::list(&state.pool).await?;
    let ids: Vec<DbId> = heists.iter().map(|h| h.id).collect();
    let skills = HeistRepo::list_skills_for_heists(&state.pool, &ids).await?;
    let crew = HeistRepo::list_crew_for_heists(&state.pool, &ids).await?;

    let data = heists
        .into_iter()
        .map(|h| HeistWithSkills::assemble(h, &skills, &crew))
        .collect();
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/heist/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<HeistWithSkills>> {
    let heist = find_heist(&state, id).await?;
    let skills = HeistRepo::list_skills(&state.pool, id).await?;
    let crew = HeistRepo::list_crew_for_heists(&state.pool, &[id]).await?;
    Ok(Json(HeistWithSkills::assemble(heist, &skills, &crew)))
}

/// GET /api/v1/heist/{id}/skills
pub async fn get_skills(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<RequiredSkillInput>>>> {
    find_heist(&state, id).await?;
    let skills = HeistRepo::list_skills(&state.pool, id).await?;
    Ok(Json(DataResponse {
        data: skills.iter().map(RequiredSkillInput::from).collect(),
    }))
}

/// PATCH /api/v1/heist/{id}/skills
///
/// Matching `(name, level)` pairs get their member count replaced, new
/// pairs are appended. Only allowed while the heist is PLANNING.
pub async fn update_skills(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateHeistSkills>,
) -> AppResult<StatusCode> {
    let submitted = match input.skills.as_deref() {
        Some(skills) if !skills.is_empty() => skills,
        _ => {
            return Err(AppError::Core(CoreError::Validation(
                "No skills were provided in request".to_string(),
            )))
        }
    };
    let required: Vec<RequiredSkill> = submitted.iter().map(RequiredSkill::from).collect();
    validation::validate_required_skills(&required)?;

    let mut tx = state.pool.begin().await?;
    let heist = HeistRepo::find_by_id_for_update(&mut tx, id)
        .await?
        .ok_or_else(|| heist_not_found(id))?;
    lifecycle::ensure_skills_editable(heist.status)?;

    HeistRepo::upsert_skills(&mut tx, id, submitted).await?;
    tx.commit().await?;

    tracing::info!(heist_id = id, count = submitted.len(), "Heist skills updated");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/heist/{id}/status
pub async fn get_status(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<HeistStatusResponse>> {
    let heist = find_heist(&state, id).await?;
    Ok(Json(HeistStatusResponse {
        status: heist.status,
    }))
}

/// GET /api/v1/heist/{id}/members
pub async fn get_members(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<CrewMemberView>>>> {
    let heist = find_heist(&state, id).await?;
    lifecycle::ensure_crew_visible(heist.status)?;

    let crew = HeistRepo::list_crew_members(&state.pool, id).await?;
    if crew.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "No members found in heist".to_string(),
        )));
    }
    let ids: Vec<DbId> = crew.iter().map(|m| m.id).collect();
    let skills = MemberRepo::list_skills_for_members(&state.pool, &ids).await?;

    Ok(Json(DataResponse {
        data: engine::roster::crew_views(&crew, &skills),
    }))
}

/// GET /api/v1/heist/{id}/eligible_members
pub async fn eligible_members(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<EligibleMembers>> {
    let eligible = engine::roster::eligible_members(&state.pool, id).await?;
    Ok(Json(eligible))
}

/// PUT /api/v1/heist/{id}/members
pub async fn confirm_members(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ConfirmCrew>,
) -> AppResult<StatusCode> {
    engine::crew::confirm(&state.pool, id, input.members.as_deref()).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/heist/{id}/start
pub async fn start(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Heist>> {
    let heist = engine::lifecycle::start(&state.pool, id).await?;
    Ok(Json(heist))
}

/// PUT /api/v1/heist/{id}/outcome
pub async fn resolve_outcome(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<OutcomeResponse>> {
    let resolution = engine::outcome::resolve(&state.pool, id, state.fate.as_ref()).await?;
    Ok(Json(OutcomeResponse {
        outcome: resolution.outcome,
    }))
}
