//! Report lifecycle state machine.
//!
//! Pure and stateless: the transition table below is the single source of
//! truth for every status change in the workflow engine. Services never
//! write a status without going through [`transition`] (or the documented
//! first-assignment override in the workflow facade).

use campuswatch_common::{AppError, AppResult};
use campuswatch_db::entities::report::ReportStatus;

/// Whether moving a report from `current` to `target` is legal.
///
/// Self-transitions are always illegal; `Rejected` and `Closed` are
/// terminal.
#[must_use]
pub const fn can_transition(current: ReportStatus, target: ReportStatus) -> bool {
    use ReportStatus::{Closed, InProgress, Pending, Rejected, Resolved, UnderReview};

    matches!(
        (current, target),
        (Pending, UnderReview)
            | (Pending, Rejected)
            | (UnderReview, InProgress)
            | (UnderReview, Rejected)
            | (InProgress, Resolved)
            | (InProgress, UnderReview)
            | (Resolved, Closed)
    )
}

/// Validate a status move, returning the new status.
pub fn transition(current: ReportStatus, target: ReportStatus) -> AppResult<ReportStatus> {
    if can_transition(current, target) {
        Ok(target)
    } else {
        Err(AppError::InvalidTransition(format!(
            "{current:?} -> {target:?} is not a legal status transition"
        )))
    }
}

/// Whether a status has no outgoing transitions.
#[must_use]
pub const fn is_terminal(status: ReportStatus) -> bool {
    status.is_terminal()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::Iterable;

    fn legal_pairs() -> Vec<(ReportStatus, ReportStatus)> {
        use ReportStatus::{Closed, InProgress, Pending, Rejected, Resolved, UnderReview};
        vec![
            (Pending, UnderReview),
            (Pending, Rejected),
            (UnderReview, InProgress),
            (UnderReview, Rejected),
            (InProgress, Resolved),
            (InProgress, UnderReview),
            (Resolved, Closed),
        ]
    }

    #[test]
    fn test_every_legal_pair_transitions() {
        for (current, target) in legal_pairs() {
            let new_status = transition(current, target).unwrap();
            assert_eq!(new_status, target);
        }
    }

    #[test]
    fn test_every_other_pair_is_rejected() {
        let legal = legal_pairs();

        for current in ReportStatus::iter() {
            for target in ReportStatus::iter() {
                if legal.contains(&(current, target)) {
                    continue;
                }
                let err = transition(current, target).unwrap_err();
                assert!(
                    matches!(err, AppError::InvalidTransition(_)),
                    "expected InvalidTransition for {current:?} -> {target:?}"
                );
            }
        }
    }

    #[test]
    fn test_self_transitions_are_rejected() {
        for status in ReportStatus::iter() {
            assert!(!can_transition(status, status));
        }
    }

    #[test]
    fn test_terminal_states_have_no_exits() {
        for target in ReportStatus::iter() {
            assert!(!can_transition(ReportStatus::Rejected, target));
            assert!(!can_transition(ReportStatus::Closed, target));
        }
    }

    #[test]
    fn test_resolved_only_closes() {
        for target in ReportStatus::iter() {
            let legal = can_transition(ReportStatus::Resolved, target);
            assert_eq!(legal, target == ReportStatus::Closed);
        }
    }
}
