//! Heist entity model, required skills, crew and DTOs.

use heist_core::eligibility::{Commitment, TimeWindow};
use heist_core::skill::RequiredSkill;
use heist_core::sweep::SweepCandidate;
use heist_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::member::SkillView;
use crate::models::status::HeistStatus;

/// A heist row from the `heists` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Heist {
    pub id: DbId,
    pub name: String,
    pub location: String,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    #[sqlx(rename = "status_id", try_from = "i16")]
    pub status: HeistStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Heist {
    pub fn window(&self) -> TimeWindow {
        TimeWindow::new(self.start_time, self.end_time)
    }
}

impl From<&Heist> for SweepCandidate {
    fn from(heist: &Heist) -> Self {
        SweepCandidate {
            id: heist.id,
            status: heist.status,
            start_time: heist.start_time,
            end_time: heist.end_time,
        }
    }
}

/// A required skill row from the `heist_skills` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct HeistSkill {
    pub id: DbId,
    pub heist_id: DbId,
    pub name: String,
    pub level: String,
    pub members: i32,
    pub sort_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<&HeistSkill> for RequiredSkill {
    fn from(row: &HeistSkill) -> Self {
        RequiredSkill {
            name: row.name.clone(),
            level: row.level.clone(),
            members: row.members,
        }
    }
}

/// `{ name, level, members }` as submitted and returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredSkillInput {
    pub name: String,
    pub level: String,
    pub members: i32,
}

impl From<&RequiredSkillInput> for RequiredSkill {
    fn from(input: &RequiredSkillInput) -> Self {
        RequiredSkill {
            name: input.name.clone(),
            level: input.level.clone(),
            members: input.members,
        }
    }
}

impl From<&HeistSkill> for RequiredSkillInput {
    fn from(row: &HeistSkill) -> Self {
        RequiredSkillInput {
            name: row.name.clone(),
            level: row.level.clone(),
            members: row.members,
        }
    }
}

/// DTO for creating a heist. Status always starts at PLANNING.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateHeist {
    pub name: String,
    pub location: String,
    #[serde(alias = "startTime")]
    pub start_time: Timestamp,
    #[serde(alias = "endTime")]
    pub end_time: Timestamp,
    #[serde(default)]
    pub skills: Vec<RequiredSkillInput>,
}

/// DTO for `PATCH /heist/{id}/skills`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateHeistSkills {
    pub skills: Option<Vec<RequiredSkillInput>>,
}

/// DTO for `PUT /heist/{id}/members`.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfirmCrew {
    pub members: Option<Vec<String>>,
}

/// A heist with its required skills and the ids of its crew.
#[derive(Debug, Clone, Serialize)]
pub struct HeistWithSkills {
    #[serde(flatten)]
    pub heist: Heist,
    pub skills: Vec<RequiredSkillInput>,
    pub crew: Vec<DbId>,
}

impl HeistWithSkills {
    /// Attach the skill rows and `(heist_id, member_id)` crew pairs that
    /// belong to `heist`.
    pub fn assemble(heist: Heist, skills: &[HeistSkill], crew: &[(DbId, DbId)]) -> Self {
        let skills = skills
            .iter()
            .filter(|s| s.heist_id == heist.id)
            .map(RequiredSkillInput::from)
            .collect();
        let crew = crew
            .iter()
            .filter(|(heist_id, _)| *heist_id == heist.id)
            .map(|&(_, member_id)| member_id)
            .collect();
        Self { heist, skills, crew }
    }
}

/// A row of `heist_crew` joined to its heist, used for conflict checks.
#[derive(Debug, Clone, FromRow)]
pub struct CrewCommitment {
    pub member_id: DbId,
    pub heist_id: DbId,
    #[sqlx(rename = "status_id", try_from = "i16")]
    pub status: HeistStatus,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
}

impl From<&CrewCommitment> for Commitment {
    fn from(row: &CrewCommitment) -> Self {
        Commitment {
            heist_id: row.heist_id,
            status: row.status,
            window: TimeWindow::new(row.start_time, row.end_time),
        }
    }
}

/// A crew member with their skills, as listed by `GET /heist/{id}/members`
/// and `GET /heist/{id}/eligible_members`.
#[derive(Debug, Clone, Serialize)]
pub struct CrewMemberView {
    pub name: String,
    pub skills: Vec<SkillView>,
}

/// Response for `GET /heist/{id}/status`.
#[derive(Debug, Clone, Serialize)]
pub struct HeistStatusResponse {
    pub status: HeistStatus,
}
