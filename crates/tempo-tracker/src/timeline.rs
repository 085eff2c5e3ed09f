//! Per-issue timeline reconstruction from status changelogs.
//!
//! Changelogs arrive in whatever order the tracker API pages them out, so
//! every function here sorts by timestamp before walking the transitions.
//! The walk itself is a fold over flow classes: the same changelog always
//! produces the same answer no matter how the entries were shuffled.

use chrono::{DateTime, Utc};

use crate::mapping::{StatusClass, StatusMapping};
use crate::model::Issue;

const SECONDS_PER_DAY: f64 = 86_400.0;

fn sorted_transitions(issue: &Issue) -> Vec<&crate::model::StatusTransition> {
    let mut transitions: Vec<_> = issue.transitions.iter().collect();
    transitions.sort_by_key(|t| t.at);
    transitions
}

/// Timestamp of the first transition into an in-progress status.
///
/// Returns `None` for issues whose work never started, which excludes them
/// from cycle time.
///
/// # Examples
///
/// ```
/// use tempo_tracker::mapping::StatusMapping;
/// use tempo_tracker::model::Issue;
/// use tempo_tracker::timeline::work_started_at;
///
/// let issue: Issue = serde_json::from_str(
///     r#"{
///         "key": "PROJ-1", "summary": "", "issueType": "Task",
///         "status": "In Progress", "assignee": null, "priority": null,
///         "created": "2024-01-01T00:00:00Z", "resolved": null,
///         "transitions": [
///             {"at": "2024-01-03T00:00:00Z", "fromStatus": "To Do", "toStatus": "In Progress"}
///         ]
///     }"#,
/// )
/// .unwrap();
/// let started = work_started_at(&issue, &StatusMapping::default()).unwrap();
/// assert_eq!(started.to_rfc3339(), "2024-01-03T00:00:00+00:00");
/// ```
#[must_use]
pub fn work_started_at(issue: &Issue, mapping: &StatusMapping) -> Option<DateTime<Utc>> {
    sorted_transitions(issue)
        .iter()
        .find(|t| mapping.classify(&t.to_status) == StatusClass::InProgress)
        .map(|t| t.at)
}

/// Timestamp the issue was finished.
///
/// The tracker's own resolution timestamp wins when present; otherwise the
/// last transition into a done-class status is used. Issues that were
/// reopened after a premature "Done" therefore report their final
/// completion, not the first one.
#[must_use]
pub fn done_at(issue: &Issue, mapping: &StatusMapping) -> Option<DateTime<Utc>> {
    if let Some(resolved) = issue.resolved {
        return Some(resolved);
    }
    sorted_transitions(issue)
        .iter()
        .rev()
        .find(|t| mapping.classify(&t.to_status) == StatusClass::Done)
        .map(|t| t.at)
}

/// Closed `(entered, left)` blocked intervals for an issue.
///
/// An interval opens on a transition into a blocked-class status while no
/// interval is open, and closes on the next transition into any other
/// class. An interval still open at the end of the changelog closes at
/// `now`, so currently blocked issues accrue time.
#[must_use]
pub fn blocked_intervals(
    issue: &Issue,
    mapping: &StatusMapping,
    now: DateTime<Utc>,
) -> Vec<(DateTime<Utc>, DateTime<Utc>)> {
    let mut intervals = Vec::new();
    let mut open: Option<DateTime<Utc>> = None;

    for transition in sorted_transitions(issue) {
        let blocked = mapping.classify(&transition.to_status) == StatusClass::Blocked;
        match open {
            None if blocked => open = Some(transition.at),
            Some(entered) if !blocked => {
                intervals.push((entered, transition.at));
                open = None;
            }
            _ => {}
        }
    }

    if let Some(entered) = open {
        intervals.push((entered, now.max(entered)));
    }

    intervals
}

/// Total days the issue spent in blocked-class statuses.
#[must_use]
pub fn blocked_days(issue: &Issue, mapping: &StatusMapping, now: DateTime<Utc>) -> f64 {
    blocked_intervals(issue, mapping, now)
        .iter()
        .map(|(entered, left)| (*left - *entered).num_seconds() as f64 / SECONDS_PER_DAY)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::StatusTransition;
    use chrono::TimeZone;

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, d, 0, 0, 0).unwrap()
    }

    fn transition(at: DateTime<Utc>, from: &str, to: &str) -> StatusTransition {
        StatusTransition {
            at,
            from_status: from.to_string(),
            to_status: to.to_string(),
        }
    }

    fn make_issue(transitions: Vec<StatusTransition>) -> Issue {
        Issue {
            key: "PROJ-1".to_string(),
            summary: String::new(),
            issue_type: "Task".to_string(),
            status: "To Do".to_string(),
            assignee: None,
            priority: None,
            created: day(1),
            resolved: None,
            transitions,
        }
    }

    #[test]
    fn work_start_is_first_in_progress_transition() {
        let issue = make_issue(vec![
            transition(day(5), "Review", "In Progress"),
            transition(day(3), "To Do", "In Progress"),
            transition(day(4), "In Progress", "Review"),
        ]);
        let mapping = StatusMapping::default();
        assert_eq!(work_started_at(&issue, &mapping), Some(day(3)));
    }

    #[test]
    fn work_start_missing_when_never_in_progress() {
        let issue = make_issue(vec![transition(day(2), "To Do", "Done")]);
        let mapping = StatusMapping::default();
        assert_eq!(work_started_at(&issue, &mapping), None);
    }

    #[test]
    fn resolution_timestamp_wins_over_transitions() {
        let mut issue = make_issue(vec![transition(day(8), "In Progress", "Done")]);
        issue.resolved = Some(day(10));
        let mapping = StatusMapping::default();
        assert_eq!(done_at(&issue, &mapping), Some(day(10)));
    }

    #[test]
    fn done_falls_back_to_last_done_transition() {
        // Reopened once: the second completion is the one that counts.
        let issue = make_issue(vec![
            transition(day(4), "In Progress", "Done"),
            transition(day(5), "Done", "In Progress"),
            transition(day(9), "In Progress", "Done"),
        ]);
        let mapping = StatusMapping::default();
        assert_eq!(done_at(&issue, &mapping), Some(day(9)));
    }

    #[test]
    fn done_missing_without_resolution_or_transition() {
        let issue = make_issue(vec![transition(day(3), "To Do", "In Progress")]);
        let mapping = StatusMapping::default();
        assert_eq!(done_at(&issue, &mapping), None);
    }

    #[test]
    fn blocked_days_sum_closed_intervals() {
        // Blocked on day 1, released day 3 (2 days), blocked again day 6,
        // finished day 10 (4 days): 6 blocked days total.
        let issue = make_issue(vec![
            transition(day(1), "To Do", "Blocked"),
            transition(day(3), "Blocked", "In Progress"),
            transition(day(6), "In Progress", "Blocked"),
            transition(day(10), "Blocked", "Done"),
        ]);
        let mapping = StatusMapping::default();
        let now = day(20);
        assert_eq!(blocked_intervals(&issue, &mapping, now).len(), 2);
        assert!((blocked_days(&issue, &mapping, now) - 6.0).abs() < 1e-9);
    }

    #[test]
    fn blocked_fold_ignores_changelog_order() {
        let ordered = make_issue(vec![
            transition(day(1), "To Do", "Blocked"),
            transition(day(3), "Blocked", "In Progress"),
            transition(day(6), "In Progress", "Blocked"),
            transition(day(10), "Blocked", "Done"),
        ]);
        let mut shuffled = ordered.clone();
        shuffled.transitions.reverse();
        shuffled.transitions.swap(1, 2);

        let mapping = StatusMapping::default();
        let now = day(20);
        assert_eq!(
            blocked_intervals(&ordered, &mapping, now),
            blocked_intervals(&shuffled, &mapping, now)
        );
    }

    #[test]
    fn open_blocked_interval_closes_at_now() {
        let issue = make_issue(vec![transition(day(5), "In Progress", "Blocked")]);
        let mapping = StatusMapping::default();
        let now = day(8);
        assert_eq!(blocked_intervals(&issue, &mapping, now), vec![(day(5), day(8))]);
        assert!((blocked_days(&issue, &mapping, now) - 3.0).abs() < 1e-9);
    }

    #[test]
    fn consecutive_blocked_statuses_extend_one_interval() {
        // Blocked -> On Hold stays one interval; only the exit closes it.
        let issue = make_issue(vec![
            transition(day(2), "In Progress", "Blocked"),
            transition(day(4), "Blocked", "On Hold"),
            transition(day(7), "On Hold", "In Progress"),
        ]);
        let mapping = StatusMapping::default();
        let now = day(10);
        assert_eq!(blocked_intervals(&issue, &mapping, now), vec![(day(2), day(7))]);
        assert!((blocked_days(&issue, &mapping, now) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn unblocked_issue_reports_zero() {
        let issue = make_issue(vec![
            transition(day(2), "To Do", "In Progress"),
            transition(day(5), "In Progress", "Done"),
        ]);
        let mapping = StatusMapping::default();
        assert!(blocked_intervals(&issue, &mapping, day(9)).is_empty());
        assert_eq!(blocked_days(&issue, &mapping, day(9)), 0.0);
    }

    #[test]
    fn now_before_open_interval_clamps_to_zero() {
        let issue = make_issue(vec![transition(day(5), "In Progress", "Blocked")]);
        let mapping = StatusMapping::default();
        // A skewed clock must not produce negative blocked time.
        assert_eq!(blocked_days(&issue, &mapping, day(4)), 0.0);
    }
}
