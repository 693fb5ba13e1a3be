//! Time-driven heist status advancement.
//!
//! Each sweep looks at heists as they were when the sweep began: a PLANNING
//! heist whose start has passed moves to IN_PROGRESS, an IN_PROGRESS heist
//! whose end has passed moves to FINISHED. A heist started by this sweep is
//! not also finished by it, even if its end has passed too; the next sweep
//! does that.

use crate::status::HeistStatus;
use crate::types::{DbId, Timestamp};

/// The fields of a heist the sweep looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepCandidate {
    pub id: DbId,
    pub status: HeistStatus,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
}

/// Heists to advance in one sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepPlan {
    /// PLANNING -> IN_PROGRESS.
    pub to_start: Vec<DbId>,
    /// IN_PROGRESS -> FINISHED.
    pub to_finish: Vec<DbId>,
}

impl SweepPlan {
    pub fn is_empty(&self) -> bool {
        self.to_start.is_empty() && self.to_finish.is_empty()
    }
}

/// Decide which candidates advance at `now`. Boundaries are inclusive.
pub fn plan(candidates: &[SweepCandidate], now: Timestamp) -> SweepPlan {
    let mut plan = SweepPlan::default();
    for heist in candidates {
        match heist.status {
            HeistStatus::Planning if heist.start_time <= now => plan.to_start.push(heist.id),
            HeistStatus::InProgress if heist.end_time <= now => plan.to_finish.push(heist.id),
            _ => {}
        }
    }
    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn now() -> Timestamp {
        Utc.with_ymd_and_hms(2030, 3, 1, 12, 0, 0).unwrap()
    }

    fn heist(id: DbId, status: HeistStatus, start_offset_h: i64, end_offset_h: i64) -> SweepCandidate {
        SweepCandidate {
            id,
            status,
            start_time: now() + Duration::hours(start_offset_h),
            end_time: now() + Duration::hours(end_offset_h),
        }
    }

    #[test]
    fn planning_heist_past_start_is_started() {
        let p = plan(&[heist(1, HeistStatus::Planning, -1, 2)], now());
        assert_eq!(p.to_start, vec![1]);
        assert!(p.to_finish.is_empty());
    }

    #[test]
    fn in_progress_heist_past_end_is_finished() {
        let p = plan(&[heist(2, HeistStatus::InProgress, -3, -1)], now());
        assert_eq!(p.to_finish, vec![2]);
        assert!(p.to_start.is_empty());
    }

    #[test]
    fn future_planning_heist_is_untouched() {
        let p = plan(&[heist(3, HeistStatus::Planning, 1, 2)], now());
        assert!(p.is_empty());
    }

    #[test]
    fn boundaries_are_inclusive() {
        let p = plan(
            &[
                heist(1, HeistStatus::Planning, 0, 2),
                heist(2, HeistStatus::InProgress, -2, 0),
            ],
            now(),
        );
        assert_eq!(p.to_start, vec![1]);
        assert_eq!(p.to_finish, vec![2]);
    }

    #[test]
    fn ready_and_finished_heists_are_ignored() {
        let p = plan(
            &[
                heist(1, HeistStatus::Ready, -5, -1),
                heist(2, HeistStatus::Finished, -5, -1),
            ],
            now(),
        );
        assert!(p.is_empty());
    }

    #[test]
    fn started_heist_is_not_finished_in_same_sweep() {
        let p = plan(&[heist(1, HeistStatus::Planning, -5, -1)], now());
        assert_eq!(p.to_start, vec![1]);
        assert!(p.to_finish.is_empty());
    }
}
