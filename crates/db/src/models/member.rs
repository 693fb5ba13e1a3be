//! Member entity model and DTOs.

use heist_core::skill::HeldSkill;
use heist_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::status::MemberStatus;

/// Sex as recorded at registration, stored as `'M'` / `'F'`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    M,
    F,
}

impl Sex {
    pub fn as_str(self) -> &'static str {
        match self {
            Sex::M => "M",
            Sex::F => "F",
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown sex code '{0}'")]
pub struct UnknownSex(String);

impl TryFrom<String> for Sex {
    type Error = UnknownSex;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "M" => Ok(Sex::M),
            "F" => Ok(Sex::F),
            _ => Err(UnknownSex(value)),
        }
    }
}

/// A member row from the `members` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Member {
    pub id: DbId,
    pub name: String,
    #[sqlx(try_from = "String")]
    pub sex: Sex,
    pub email: String,
    pub main_skill: Option<String>,
    #[sqlx(rename = "status_id", try_from = "i16")]
    pub status: MemberStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A held skill row from the `member_skills` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MemberSkill {
    pub id: DbId,
    pub member_id: DbId,
    pub name: String,
    pub level: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<&MemberSkill> for HeldSkill {
    fn from(row: &MemberSkill) -> Self {
        HeldSkill {
            name: row.name.clone(),
            level: row.level.clone(),
        }
    }
}

/// A skill as submitted by a client. `level` defaults to `"*"`.
#[derive(Debug, Clone, Deserialize)]
pub struct SkillInput {
    pub name: String,
    pub level: Option<String>,
}

/// DTO for registering a new member.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMember {
    pub name: String,
    pub sex: Sex,
    pub email: String,
    #[serde(default, alias = "mainSkill")]
    pub main_skill: Option<String>,
    /// Defaults to AVAILABLE if omitted.
    pub status: Option<MemberStatus>,
    #[serde(default)]
    pub skills: Vec<SkillInput>,
}

/// DTO for `PUT /member/{id}/skills`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateMemberSkills {
    pub skills: Option<Vec<SkillInput>>,
    #[serde(default, alias = "mainSkill")]
    pub main_skill: Option<String>,
}

/// `{ name, level }` as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillView {
    pub name: String,
    pub level: String,
}

impl From<&MemberSkill> for SkillView {
    fn from(row: &MemberSkill) -> Self {
        SkillView {
            name: row.name.clone(),
            level: row.level.clone(),
        }
    }
}

/// A member together with their held skills.
#[derive(Debug, Clone, Serialize)]
pub struct MemberWithSkills {
    #[serde(flatten)]
    pub member: Member,
    pub skills: Vec<SkillView>,
}

impl MemberWithSkills {
    /// Attach the rows in `skills` that belong to `member`.
    pub fn assemble(member: Member, skills: &[MemberSkill]) -> Self {
        let skills = skills
            .iter()
            .filter(|s| s.member_id == member.id)
            .map(SkillView::from)
            .collect();
        Self { member, skills }
    }
}

/// Response for `GET /member/{id}/skills`.
#[derive(Debug, Clone, Serialize)]
pub struct MemberSkillsResponse {
    pub skills: Vec<SkillView>,
    pub main_skill: Option<String>,
}
