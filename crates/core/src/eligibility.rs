//! Eligibility and scheduling-conflict checks for crew assignment.
//!
//! A member may join a heist when:
//! 1. their status is AVAILABLE or RETIRED,
//! 2. they are not on the crew of another READY heist whose window overlaps,
//! 3. at least one held skill meets at least one required skill.
//!
//! Checks run in that order and the first failure is reported.

use crate::lifecycle;
use crate::skill::{self, HeldSkill, RequiredSkill};
use crate::status::{HeistStatus, MemberStatus};
use crate::types::{DbId, Timestamp};

/// Half-open time interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: Timestamp,
    pub end: Timestamp,
}

impl TimeWindow {
    pub fn new(start: Timestamp, end: Timestamp) -> Self {
        Self { start, end }
    }

    /// Two windows overlap unless one ends at or before the other starts.
    /// Abutting windows (`a.end == b.start`) do not overlap.
    pub fn overlaps(&self, other: &TimeWindow) -> bool {
        !(self.end <= other.start || self.start >= other.end)
    }
}

/// A heist the member is already on the crew of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Commitment {
    pub heist_id: DbId,
    pub status: HeistStatus,
    pub window: TimeWindow,
}

/// The heist being staffed.
#[derive(Debug, Clone, Copy)]
pub struct HeistView<'a> {
    pub id: DbId,
    pub window: TimeWindow,
    pub required_skills: &'a [RequiredSkill],
}

/// The member being considered, with every heist whose crew they are on.
#[derive(Debug, Clone, Copy)]
pub struct MemberView<'a> {
    pub status: MemberStatus,
    pub skills: &'a [HeldSkill],
    pub commitments: &'a [Commitment],
}

/// Why a member cannot be assigned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Ineligibility {
    #[error("is not available or retired (status {0})")]
    NotAssignable(MemberStatus),

    #[error("is already confirmed for heist {heist_id} happening at the same time")]
    ScheduleConflict { heist_id: DbId },

    #[error("does not have matching skills for this heist")]
    NoMatchingSkill,
}

/// Decide whether `member` may join the crew of `heist`.
pub fn check(heist: &HeistView<'_>, member: &MemberView<'_>) -> Result<(), Ineligibility> {
    if !lifecycle::member_is_assignable(member.status) {
        return Err(Ineligibility::NotAssignable(member.status));
    }

    if let Some(conflict) = find_conflict(heist, member.commitments) {
        return Err(Ineligibility::ScheduleConflict {
            heist_id: conflict.heist_id,
        });
    }

    if !skill::any_match(member.skills, heist.required_skills) {
        return Err(Ineligibility::NoMatchingSkill);
    }

    Ok(())
}

/// Convenience wrapper returning a plain bool.
pub fn is_eligible(heist: &HeistView<'_>, member: &MemberView<'_>) -> bool {
    check(heist, member).is_ok()
}

/// First commitment to another READY heist overlapping `heist`'s window.
fn find_conflict<'c>(heist: &HeistView<'_>, commitments: &'c [Commitment]) -> Option<&'c Commitment> {
    commitments.iter().find(|c| {
        c.heist_id != heist.id
            && c.status == HeistStatus::Ready
            && heist.window.overlaps(&c.window)
    })
}
