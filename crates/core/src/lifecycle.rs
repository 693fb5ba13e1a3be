//! Heist and member state machines.
//!
//! Heist: `PLANNING -> READY -> IN_PROGRESS -> FINISHED`. READY is reached
//! only by confirming a crew; IN_PROGRESS by an explicit start (READY only)
//! or by the time sweep (PLANNING only); FINISHED only by the time sweep.
//!
//! Member: AVAILABLE and RETIRED are the assignable states; EXPIRED and
//! INCARCERATED are terminal post-heist outcomes.

use crate::error::CoreError;
use crate::status::{HeistStatus, MemberStatus};

/// What is driving a heist status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeistTrigger {
    /// A full crew was confirmed by an operator.
    ConfirmCrew,
    /// An operator asked to start the heist.
    Start,
    /// The sweep saw the start instant pass.
    StartTimeReached,
    /// The sweep saw the end instant pass.
    EndTimeReached,
}

/// Apply `trigger` to a heist in status `from`.
///
/// Every rejection is a [`CoreError::PreconditionFailed`] so callers can
/// surface it as "not allowed in the current state".
pub fn apply(from: HeistStatus, trigger: HeistTrigger) -> Result<HeistStatus, CoreError> {
    use HeistStatus::*;
    use HeistTrigger::*;

    match (from, trigger) {
        // Re-confirming a READY heist replaces its crew.
        (Planning | Ready, ConfirmCrew) => Ok(Ready),
        (Ready, Start) => Ok(InProgress),
        // The sweep does not require READY.
        (Planning, StartTimeReached) => Ok(InProgress),
        (InProgress, EndTimeReached) => Ok(Finished),
        (_, Start) => Err(CoreError::PreconditionFailed(format!(
            "Heist status is not READY (currently {from})."
        ))),
        (_, ConfirmCrew) => Err(CoreError::PreconditionFailed(format!(
            "Crew can only be confirmed while the heist is PLANNING or READY (currently {from})."
        ))),
        (_, StartTimeReached | EndTimeReached) => Err(CoreError::PreconditionFailed(format!(
            "Heist in status {from} is not advanced by the time sweep."
        ))),
    }
}

/// Required skills may only change before a crew is confirmed.
pub fn ensure_skills_editable(status: HeistStatus) -> Result<(), CoreError> {
    if status == HeistStatus::Planning {
        Ok(())
    } else {
        Err(CoreError::PreconditionFailed(format!(
            "Required skills can only be changed while the heist is PLANNING (currently {status})."
        )))
    }
}

/// The crew listing is meaningless until a crew has been confirmed.
pub fn ensure_crew_visible(status: HeistStatus) -> Result<(), CoreError> {
    if status == HeistStatus::Planning {
        Err(CoreError::PreconditionFailed(
            "Heist is in PLANNING status.".to_string(),
        ))
    } else {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Member availability
// ---------------------------------------------------------------------------

/// Only AVAILABLE and RETIRED members may be put on a crew.
pub fn member_is_assignable(status: MemberStatus) -> bool {
    matches!(status, MemberStatus::Available | MemberStatus::Retired)
}

/// EXPIRED and INCARCERATED have no way back.
pub fn member_is_terminal(status: MemberStatus) -> bool {
    matches!(status, MemberStatus::Expired | MemberStatus::Incarcerated)
}

/// Target statuses reachable from `from`.
pub fn member_transitions(from: MemberStatus) -> &'static [MemberStatus] {
    match from {
        MemberStatus::Available => &[
            MemberStatus::Retired,
            MemberStatus::Expired,
            MemberStatus::Incarcerated,
        ],
        MemberStatus::Retired => &[
            MemberStatus::Available,
            MemberStatus::Expired,
            MemberStatus::Incarcerated,
        ],
        MemberStatus::Expired | MemberStatus::Incarcerated => &[],
    }
}

/// Validate a member status change, returning an error message for invalid ones.
pub fn validate_member_transition(from: MemberStatus, to: MemberStatus) -> Result<(), CoreError> {
    if member_transitions(from).contains(&to) {
        Ok(())
    } else {
        Err(CoreError::PreconditionFailed(format!(
            "Invalid member transition: {from} -> {to}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    // -----------------------------------------------------------------------
    // Heist triggers
    // -----------------------------------------------------------------------

    #[test]
    fn confirm_moves_planning_to_ready() {
        assert_eq!(
            apply(HeistStatus::Planning, HeistTrigger::ConfirmCrew).unwrap(),
            HeistStatus::Ready
        );
    }

    #[test]
    fn reconfirm_keeps_ready() {
        assert_eq!(
            apply(HeistStatus::Ready, HeistTrigger::ConfirmCrew).unwrap(),
            HeistStatus::Ready
        );
    }

    #[test]
    fn confirm_rejected_once_started() {
        for from in [HeistStatus::InProgress, HeistStatus::Finished] {
            assert_matches!(
                apply(from, HeistTrigger::ConfirmCrew),
                Err(CoreError::PreconditionFailed(_))
            );
        }
    }

    #[test]
    fn start_requires_ready() {
        assert_eq!(
            apply(HeistStatus::Ready, HeistTrigger::Start).unwrap(),
            HeistStatus::InProgress
        );
        for from in [
            HeistStatus::Planning,
            HeistStatus::InProgress,
            HeistStatus::Finished,
        ] {
            let err = apply(from, HeistTrigger::Start).unwrap_err();
            assert_matches!(err, CoreError::PreconditionFailed(ref msg) if msg.contains("not READY"));
        }
    }

    #[test]
    fn sweep_starts_planning_heists_without_ready_gate() {
        assert_eq!(
            apply(HeistStatus::Planning, HeistTrigger::StartTimeReached).unwrap(),
            HeistStatus::InProgress
        );
    }

    #[test]
    fn sweep_does_not_start_ready_heists() {
        assert!(apply(HeistStatus::Ready, HeistTrigger::StartTimeReached).is_err());
    }

    #[test]
    fn sweep_finishes_in_progress_heists() {
        assert_eq!(
            apply(HeistStatus::InProgress, HeistTrigger::EndTimeReached).unwrap(),
            HeistStatus::Finished
        );
        assert!(apply(HeistStatus::Planning, HeistTrigger::EndTimeReached).is_err());
    }

    #[test]
    fn finished_is_terminal() {
        for trigger in [
            HeistTrigger::ConfirmCrew,
            HeistTrigger::Start,
            HeistTrigger::StartTimeReached,
            HeistTrigger::EndTimeReached,
        ] {
            assert!(apply(HeistStatus::Finished, trigger).is_err());
        }
    }

    #[test]
    fn skills_editable_only_while_planning() {
        assert!(ensure_skills_editable(HeistStatus::Planning).is_ok());
        assert!(ensure_skills_editable(HeistStatus::Ready).is_err());
    }

    #[test]
    fn crew_hidden_while_planning() {
        assert!(ensure_crew_visible(HeistStatus::Planning).is_err());
        assert!(ensure_crew_visible(HeistStatus::Ready).is_ok());
        assert!(ensure_crew_visible(HeistStatus::Finished).is_ok());
    }

    // -----------------------------------------------------------------------
    // Member availability
    // -----------------------------------------------------------------------

    #[test]
    fn assignable_statuses() {
        assert!(member_is_assignable(MemberStatus::Available));
        assert!(member_is_assignable(MemberStatus::Retired));
        assert!(!member_is_assignable(MemberStatus::Expired));
        assert!(!member_is_assignable(MemberStatus::Incarcerated));
    }

    #[test]
    fn terminal_members_never_return() {
        for from in [MemberStatus::Expired, MemberStatus::Incarcerated] {
            assert!(member_is_terminal(from));
            assert!(member_transitions(from).is_empty());
            assert!(validate_member_transition(from, MemberStatus::Available).is_err());
        }
    }

    #[test]
    fn assignable_members_can_meet_either_fate() {
        for from in [MemberStatus::Available, MemberStatus::Retired] {
            assert!(validate_member_transition(from, MemberStatus::Expired).is_ok());
            assert!(validate_member_transition(from, MemberStatus::Incarcerated).is_ok());
        }
    }
}
