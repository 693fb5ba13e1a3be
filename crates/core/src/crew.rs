//! Crew roster validation for confirmation.
//!
//! Confirmation is all-or-nothing: the roster is resolved and every member
//! checked before anything is written. The first failing name aborts the
//! whole roster with a message naming that member.

use crate::eligibility::{self, Commitment, HeistView, MemberView};
use crate::error::CoreError;
use crate::lifecycle::{self, HeistTrigger};
use crate::skill::HeldSkill;
use crate::status::{HeistStatus, MemberStatus};
use crate::types::DbId;

/// A member loaded as a possible match for one of the requested names.
#[derive(Debug, Clone)]
pub struct CrewCandidate {
    pub member_id: DbId,
    pub name: String,
    pub status: MemberStatus,
    pub skills: Vec<HeldSkill>,
    pub commitments: Vec<Commitment>,
}

/// What to write when the roster is accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrewPlan {
    pub status: HeistStatus,
    /// Member ids in roster order, without duplicates.
    pub member_ids: Vec<DbId>,
}

/// Reject a missing or empty roster and drop repeated names, keeping the
/// first occurrence.
pub fn requested_names(names: Option<&[String]>) -> Result<Vec<&str>, CoreError> {
    let names = match names {
        Some(names) if !names.is_empty() => names,
        _ => {
            return Err(CoreError::Validation(
                "No members were provided in request".to_string(),
            ))
        }
    };

    let mut unique: Vec<&str> = Vec::with_capacity(names.len());
    for name in names {
        if !unique.contains(&name.as_str()) {
            unique.push(name.as_str());
        }
    }
    Ok(unique)
}

/// Validate a roster against `heist` and produce the crew to commit.
///
/// `candidates` are searched in slice order, so when several members share
/// a name the first one wins; callers load them ordered by id.
pub fn plan_confirmation(
    heist_status: HeistStatus,
    heist: &HeistView<'_>,
    names: &[&str],
    candidates: &[CrewCandidate],
) -> Result<CrewPlan, CoreError> {
    if names.is_empty() {
        return Err(CoreError::Validation(
            "No members were provided in request".to_string(),
        ));
    }

    let status = lifecycle::apply(heist_status, HeistTrigger::ConfirmCrew)?;

    let mut member_ids = Vec::with_capacity(names.len());
    for &name in names {
        let candidate = candidates
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| CoreError::Validation(format!("Member '{name}' does not exist.")))?;

        let member = MemberView {
            status: candidate.status,
            skills: &candidate.skills,
            commitments: &candidate.commitments,
        };
        eligibility::check(heist, &member)
            .map_err(|reason| CoreError::Validation(format!("Member '{name}' {reason}.")))?;

        if !member_ids.contains(&candidate.member_id) {
            member_ids.push(candidate.member_id);
        }
    }

    Ok(CrewPlan { status, member_ids })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eligibility::TimeWindow;
    use crate::skill::RequiredSkill;
    use assert_matches::assert_matches;
    use chrono::{TimeZone, Utc};

    fn window(start: u32, end: u32) -> TimeWindow {
        TimeWindow::new(
            Utc.with_ymd_and_hms(2030, 6, 1, start, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2030, 6, 1, end, 0, 0).unwrap(),
        )
    }

    fn candidate(id: DbId, name: &str, level: &str) -> CrewCandidate {
        CrewCandidate {
            member_id: id,
            name: name.to_string(),
            status: MemberStatus::Available,
            skills: vec![HeldSkill {
                name: "driving".into(),
                level: level.into(),
            }],
            commitments: Vec::new(),
        }
    }

    fn skills() -> Vec<RequiredSkill> {
        vec![RequiredSkill {
            name: "driving".into(),
            level: "**".into(),
            members: 2,
        }]
    }

    #[test]
    fn missing_roster_is_a_validation_error() {
        assert_matches!(requested_names(None), Err(CoreError::Validation(_)));
        assert_matches!(requested_names(Some(&[])), Err(CoreError::Validation(_)));
    }

    #[test]
    fn repeated_names_are_collapsed() {
        let names = vec!["Ana".to_string(), "Bo".to_string(), "Ana".to_string()];
        assert_eq!(requested_names(Some(&names)).unwrap(), vec!["Ana", "Bo"]);
    }

    #[test]
    fn valid_roster_produces_ready_plan() {
        let required = skills();
        let heist = HeistView {
            id: 1,
            window: window(10, 12),
            required_skills: &required,
        };
        let candidates = vec![candidate(7, "Ana", "**"), candidate(9, "Bo", "***")];

        let plan =
            plan_confirmation(HeistStatus::Planning, &heist, &["Bo", "Ana"], &candidates).unwrap();

        assert_eq!(plan.status, HeistStatus::Ready);
        assert_eq!(plan.member_ids, vec![9, 7]);
    }

    #[test]
    fn unknown_member_is_named_in_error() {
        let required = skills();
        let heist = HeistView {
            id: 1,
            window: window(10, 12),
            required_skills: &required,
        };
        let candidates = vec![candidate(7, "Ana", "**")];

        let err = plan_confirmation(HeistStatus::Planning, &heist, &["Ana", "Zed"], &candidates)
            .unwrap_err();
        assert_matches!(err, CoreError::Validation(ref msg) if msg == "Member 'Zed' does not exist.");
    }

    #[test]
    fn first_ineligible_member_aborts_roster() {
        let required = skills();
        let heist = HeistView {
            id: 1,
            window: window(10, 12),
            required_skills: &required,
        };
        let mut busy = candidate(8, "Cy", "***");
        busy.status = MemberStatus::Incarcerated;
        let candidates = vec![
            candidate(7, "Ana", "**"),
            candidate(9, "Bo", "*"),
            busy,
        ];

        let err = plan_confirmation(
            HeistStatus::Planning,
            &heist,
            &["Ana", "Bo", "Cy"],
            &candidates,
        )
        .unwrap_err();
        assert_matches!(
            err,
            CoreError::Validation(ref msg)
                if msg == "Member 'Bo' does not have matching skills for this heist."
        );
    }

    #[test]
    fn conflicting_member_is_rejected() {
        let required = skills();
        let heist = HeistView {
            id: 2,
            window: window(11, 13),
            required_skills: &required,
        };
        let mut ana = candidate(7, "Ana", "**");
        ana.commitments.push(Commitment {
            heist_id: 1,
            status: HeistStatus::Ready,
            window: window(10, 12),
        });

        let err = plan_confirmation(HeistStatus::Planning, &heist, &["Ana"], &[ana]).unwrap_err();
        assert_matches!(err, CoreError::Validation(ref msg) if msg.contains("Member 'Ana'") && msg.contains("heist 1"));
    }

    #[test]
    fn first_candidate_wins_for_shared_name() {
        let required = skills();
        let heist = HeistView {
            id: 1,
            window: window(10, 12),
            required_skills: &required,
        };
        let candidates = vec![candidate(3, "Ana", "**"), candidate(4, "Ana", "***")];

        let plan =
            plan_confirmation(HeistStatus::Ready, &heist, &["Ana"], &candidates).unwrap();
        assert_eq!(plan.member_ids, vec![3]);
    }

    #[test]
    fn started_heist_cannot_be_restaffed() {
        let required = skills();
        let heist = HeistView {
            id: 1,
            window: window(10, 12),
            required_skills: &required,
        };
        let candidates = vec![candidate(7, "Ana", "**")];
        assert_matches!(
            plan_confirmation(HeistStatus::InProgress, &heist, &["Ana"], &candidates),
            Err(CoreError::PreconditionFailed(_))
        );
    }
}
