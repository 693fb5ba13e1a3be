//! Heist outcome resolution.
//!
//! The outcome depends only on the staffing ratio
//! `confirmed / required * 100`: below [`SUCCESS_THRESHOLD_PERCENT`] the
//! heist fails, at or above it succeeds. Independently of the outcome,
//! every crew member is then either caught or vanishes, decided by a fair
//! coin drawn from a [`FateSource`].

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::skill::{self, RequiredSkill};
use crate::status::MemberStatus;
use crate::types::DbId;

/// Staffing percentage at which a heist counts as a success.
pub const SUCCESS_THRESHOLD_PERCENT: f64 = 75.0;

/// Result of a resolved heist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HeistOutcome {
    Succeeded,
    Failed,
}

impl std::fmt::Display for HeistOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            HeistOutcome::Succeeded => "SUCCEEDED",
            HeistOutcome::Failed => "FAILED",
        })
    }
}

/// What happens to a crew member after the heist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberFate {
    Expired,
    Incarcerated,
}

impl From<MemberFate> for MemberStatus {
    fn from(fate: MemberFate) -> Self {
        match fate {
            MemberFate::Expired => MemberStatus::Expired,
            MemberFate::Incarcerated => MemberStatus::Incarcerated,
        }
    }
}

/// Source of post-heist fates.
pub trait FateSource: Send + Sync {
    fn draw(&self) -> MemberFate;
}

/// Production source: a fair coin from the thread-local RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomFate;

impl FateSource for RandomFate {
    fn draw(&self) -> MemberFate {
        if rand::rng().random_bool(0.5) {
            MemberFate::Expired
        } else {
            MemberFate::Incarcerated
        }
    }
}

/// Always returns the same fate.
#[derive(Debug, Clone, Copy)]
pub struct FixedFate(pub MemberFate);

impl FateSource for FixedFate {
    fn draw(&self) -> MemberFate {
        self.0
    }
}

/// Cycles through a fixed sequence of fates.
#[derive(Debug)]
pub struct ScriptedFate {
    script: Vec<MemberFate>,
    cursor: std::sync::atomic::AtomicUsize,
}

impl ScriptedFate {
    /// Panics if `script` is empty.
    pub fn new(script: Vec<MemberFate>) -> Self {
        assert!(!script.is_empty(), "ScriptedFate needs at least one fate");
        Self {
            script,
            cursor: std::sync::atomic::AtomicUsize::new(0),
        }
    }
}

impl FateSource for ScriptedFate {
    fn draw(&self) -> MemberFate {
        let i = self
            .cursor
            .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        self.script[i % self.script.len()]
    }
}

/// Percentage of required crew slots that are filled.
pub fn staffing_ratio(confirmed: usize, required: i64) -> f64 {
    confirmed as f64 / required as f64 * 100.0
}

/// Single cut at [`SUCCESS_THRESHOLD_PERCENT`].
pub fn classify(ratio: f64) -> HeistOutcome {
    if ratio < SUCCESS_THRESHOLD_PERCENT {
        HeistOutcome::Failed
    } else {
        HeistOutcome::Succeeded
    }
}

/// A crew member as seen at resolution time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrewMember {
    pub member_id: DbId,
    pub status: MemberStatus,
}

/// Computed resolution: the outcome and the member status writes it implies.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub outcome: HeistOutcome,
    pub ratio: f64,
    pub required: i64,
    pub confirmed: usize,
    /// `(member_id, new_status)` for every crew member whose status changes.
    pub member_updates: Vec<(DbId, MemberStatus)>,
}

/// Resolve a heist from its required skills and confirmed crew.
///
/// Members already in a terminal status keep it; everyone else draws a fate.
pub fn resolve(
    required_skills: &[RequiredSkill],
    crew: &[CrewMember],
    fate: &dyn FateSource,
) -> Result<Resolution, CoreError> {
    if required_skills.is_empty() {
        return Err(CoreError::Validation(
            "No skills have been defined for this heist.".to_string(),
        ));
    }
    if crew.is_empty() {
        return Err(CoreError::Validation("No members found in heist".to_string()));
    }

    let required = skill::total_members_required(required_skills);
    if required <= 0 {
        return Err(CoreError::Validation(
            "Required skills must ask for at least one member.".to_string(),
        ));
    }

    let confirmed = crew.len();
    let ratio = staffing_ratio(confirmed, required);
    let outcome = classify(ratio);

    let member_updates = crew
        .iter()
        .filter(|m| !crate::lifecycle::member_is_terminal(m.status))
        .map(|m| (m.member_id, MemberStatus::from(fate.draw())))
        .collect();

    Ok(Resolution {
        outcome,
        ratio,
        required,
        confirmed,
        member_updates,
    })
}
