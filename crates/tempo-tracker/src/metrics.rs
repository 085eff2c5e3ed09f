//! Flow metrics derived from issue timelines.
//!
//! [`analyze`] is a pure fold over a slice of [`Issue`]s: fetch and
//! classification happen elsewhere, so the whole module is testable with
//! hand-built fixtures. All durations are fractional days rounded to two
//! decimals.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tempo_core::Period;
use tempo_stats::{average, max_value, median, min_value, percentage, percentile, round2, sum, week_key};

use crate::mapping::{StatusClass, StatusMapping};
use crate::model::Issue;
use crate::timeline::{blocked_days, done_at, work_started_at};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Distribution summary over a set of durations, in days.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DurationStats {
    pub avg: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    pub p90: f64,
    /// Number of issues the distribution was computed from.
    pub count: usize,
}

impl DurationStats {
    /// Summarizes `days`, or `None` when there is nothing to summarize.
    #[must_use]
    pub fn from_days(days: &[f64]) -> Option<Self> {
        if days.is_empty() {
            return None;
        }
        Some(Self {
            avg: round2(average(days)),
            median: round2(median(days)),
            min: round2(min_value(days)),
            max: round2(max_value(days)),
            p90: round2(percentile(days, 90.0)),
            count: days.len(),
        })
    }
}

/// Duration distribution plus a per-issue-type average breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DurationBreakdown {
    pub days: DurationStats,
    /// Average days keyed by issue type.
    pub avg_by_type: BTreeMap<String, f64>,
}

/// Time issues spent in blocked-class statuses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockedStats {
    /// Sum of blocked days across all issues.
    pub total_days: f64,
    /// Distribution over issues that were blocked at least once.
    pub days: Option<DurationStats>,
    pub issues_blocked: usize,
    /// Share of all analyzed issues that were ever blocked.
    pub pct_issues_blocked: f64,
}

/// Issues currently in an in-progress status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WipStats {
    pub total: usize,
    pub by_assignee: BTreeMap<String, usize>,
    pub by_type: BTreeMap<String, usize>,
}

/// Completed issues, bucketed by ISO week of completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThroughputStats {
    pub total: usize,
    /// `total` divided by the period length in weeks; equals `total` when
    /// the period is open-ended.
    pub weekly_avg: f64,
    pub by_week: BTreeMap<String, usize>,
    pub by_assignee: BTreeMap<String, usize>,
    pub by_type: BTreeMap<String, usize>,
}

/// Bug share and bug resolution times.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BugRatioStats {
    pub bugs: usize,
    pub total: usize,
    /// Bugs as a percentage of all analyzed issues.
    pub ratio: f64,
    /// Creation-to-done distribution over resolved bugs.
    pub resolution_days: Option<DurationStats>,
    /// Bug counts keyed by priority; issues without one land under `none`.
    pub by_priority: BTreeMap<String, usize>,
}

/// Full set of tracker-derived flow metrics for one period.
///
/// `cycle_time` and `lead_time` are `None` when no issue finished in the
/// period; the counting sections are always present when the tracker was
/// reachable, zeroed if there was nothing to count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerMetrics {
    /// Human-readable period label, e.g. `2024-01-01..2024-03-31`.
    pub period: String,
    /// `false` when the tracker was not configured or unreachable.
    pub available: bool,
    pub issues_analyzed: usize,
    pub cycle_time: Option<DurationBreakdown>,
    pub lead_time: Option<DurationBreakdown>,
    pub blocked: Option<BlockedStats>,
    pub wip: Option<WipStats>,
    pub throughput: Option<ThroughputStats>,
    pub bug_ratio: Option<BugRatioStats>,
}

impl TrackerMetrics {
    /// Placeholder emitted when no tracker is configured, so snapshot JSON
    /// keeps a stable shape.
    #[must_use]
    pub fn unavailable(period: &Period) -> Self {
        Self {
            period: period.label(),
            available: false,
            issues_analyzed: 0,
            cycle_time: None,
            lead_time: None,
            blocked: None,
            wip: None,
            throughput: None,
            bug_ratio: None,
        }
    }
}

/// Knobs for [`analyze`].
#[derive(Debug, Clone, Copy)]
pub struct AnalyzerOptions {
    /// Clock used to close still-open blocked intervals.
    pub now: DateTime<Utc>,
    /// Reporting period; bounds feed the weekly throughput average.
    pub period: Period,
}

impl Default for AnalyzerOptions {
    fn default() -> Self {
        Self {
            now: Utc::now(),
            period: Period::open(),
        }
    }
}

fn days_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_seconds() as f64 / SECONDS_PER_DAY
}

fn breakdown(entries: &[(f64, &str)]) -> Option<DurationBreakdown> {
    let days: Vec<f64> = entries.iter().map(|(d, _)| *d).collect();
    let stats = DurationStats::from_days(&days)?;

    let mut by_type: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for (d, issue_type) in entries {
        by_type.entry((*issue_type).to_string()).or_default().push(*d);
    }
    let avg_by_type = by_type
        .into_iter()
        .map(|(issue_type, days)| (issue_type, round2(average(&days))))
        .collect();

    Some(DurationBreakdown { days: stats, avg_by_type })
}

fn cycle_time(issues: &[Issue], mapping: &StatusMapping) -> Option<DurationBreakdown> {
    let entries: Vec<(f64, &str)> = issues
        .iter()
        .filter_map(|issue| {
            let started = work_started_at(issue, mapping)?;
            let done = done_at(issue, mapping)?;
            if done <= started {
                return None;
            }
            Some((days_between(started, done), issue.issue_type.as_str()))
        })
        .collect();
    breakdown(&entries)
}

fn lead_time(issues: &[Issue], mapping: &StatusMapping) -> Option<DurationBreakdown> {
    let entries: Vec<(f64, &str)> = issues
        .iter()
        .filter_map(|issue| {
            let done = done_at(issue, mapping)?;
            Some((days_between(issue.created, done), issue.issue_type.as_str()))
        })
        .collect();
    breakdown(&entries)
}

fn blocked_stats(issues: &[Issue], mapping: &StatusMapping, now: DateTime<Utc>) -> BlockedStats {
    let per_issue: Vec<f64> = issues
        .iter()
        .map(|issue| blocked_days(issue, mapping, now))
        .filter(|days| *days > 0.0)
        .collect();
    BlockedStats {
        total_days: round2(sum(&per_issue)),
        days: DurationStats::from_days(&per_issue),
        issues_blocked: per_issue.len(),
        pct_issues_blocked: percentage(per_issue.len() as f64, issues.len() as f64),
    }
}

fn wip_stats(issues: &[Issue], mapping: &StatusMapping) -> WipStats {
    let mut by_assignee: BTreeMap<String, usize> = BTreeMap::new();
    let mut by_type: BTreeMap<String, usize> = BTreeMap::new();
    let mut total = 0;

    for issue in issues {
        if mapping.classify(&issue.status) != StatusClass::InProgress {
            continue;
        }
        total += 1;
        let assignee = issue.assignee.clone().unwrap_or_else(|| "unassigned".to_string());
        *by_assignee.entry(assignee).or_insert(0) += 1;
        *by_type.entry(issue.issue_type.clone()).or_insert(0) += 1;
    }

    WipStats { total, by_assignee, by_type }
}

fn throughput_stats(issues: &[Issue], mapping: &StatusMapping, period: Period) -> ThroughputStats {
    let mut by_week: BTreeMap<String, usize> = BTreeMap::new();
    let mut by_assignee: BTreeMap<String, usize> = BTreeMap::new();
    let mut by_type: BTreeMap<String, usize> = BTreeMap::new();
    let mut total = 0;

    for issue in issues {
        if mapping.classify(&issue.status) != StatusClass::Done {
            continue;
        }
        total += 1;
        // Without a discoverable completion date the issue still counts
        // toward the total, it just cannot land in a weekly bucket.
        if let Some(done) = done_at(issue, mapping) {
            *by_week.entry(week_key(done)).or_insert(0) += 1;
        }
        let assignee = issue.assignee.clone().unwrap_or_else(|| "unassigned".to_string());
        *by_assignee.entry(assignee).or_insert(0) += 1;
        *by_type.entry(issue.issue_type.clone()).or_insert(0) += 1;
    }

    let weekly_avg = match period.weeks() {
        Some(weeks) => round2(total as f64 / weeks),
        None => total as f64,
    };

    ThroughputStats { total, weekly_avg, by_week, by_assignee, by_type }
}

fn bug_ratio_stats(issues: &[Issue], mapping: &StatusMapping) -> BugRatioStats {
    let bugs: Vec<&Issue> = issues
        .iter()
        .filter(|issue| issue.issue_type.eq_ignore_ascii_case("bug"))
        .collect();

    let resolution: Vec<f64> = bugs
        .iter()
        .filter_map(|bug| done_at(bug, mapping).map(|done| days_between(bug.created, done)))
        .collect();

    let mut by_priority: BTreeMap<String, usize> = BTreeMap::new();
    for bug in &bugs {
        let priority = bug.priority.clone().unwrap_or_else(|| "none".to_string());
        *by_priority.entry(priority).or_insert(0) += 1;
    }

    BugRatioStats {
        bugs: bugs.len(),
        total: issues.len(),
        ratio: percentage(bugs.len() as f64, issues.len() as f64),
        resolution_days: DurationStats::from_days(&resolution),
        by_priority,
    }
}

/// Computes all flow metrics over `issues`.
///
/// # Examples
///
/// ```
/// use tempo_tracker::mapping::StatusMapping;
/// use tempo_tracker::metrics::{analyze, AnalyzerOptions};
///
/// let metrics = analyze(&[], &StatusMapping::default(), &AnalyzerOptions::default());
/// assert!(metrics.available);
/// assert_eq!(metrics.issues_analyzed, 0);
/// assert!(metrics.cycle_time.is_none());
/// assert_eq!(metrics.wip.unwrap().total, 0);
/// ```
#[must_use]
pub fn analyze(issues: &[Issue], mapping: &StatusMapping, options: &AnalyzerOptions) -> TrackerMetrics {
    TrackerMetrics {
        period: options.period.label(),
        available: true,
        issues_analyzed: issues.len(),
        cycle_time: cycle_time(issues, mapping),
        lead_time: lead_time(issues, mapping),
        blocked: Some(blocked_stats(issues, mapping, options.now)),
        wip: Some(wip_stats(issues, mapping)),
        throughput: Some(throughput_stats(issues, mapping, options.period)),
        bug_ratio: Some(bug_ratio_stats(issues, mapping)),
    }
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

    fn make_issue(key: &str, issue_type: &str, status: &str) -> Issue {
        Issue {
            key: key.to_string(),
            summary: String::new(),
            issue_type: issue_type.to_string(),
            status: status.to_string(),
            assignee: None,
            priority: None,
            created: day(1),
            resolved: None,
            transitions: Vec::new(),
        }
    }

    fn options_at(now: DateTime<Utc>) -> AnalyzerOptions {
        AnalyzerOptions { now, period: Period::open() }
    }

    #[test]
    fn cycle_and_lead_time_for_one_finished_issue() {
        // Created Jan 1, started Jan 3, finished Jan 10.
        let mut issue = make_issue("PROJ-1", "Story", "Done");
        issue.transitions = vec![
            transition(day(3), "To Do", "In Progress"),
            transition(day(10), "In Progress", "Done"),
        ];

        let metrics = analyze(&[issue], &StatusMapping::default(), &options_at(day(15)));

        let cycle = metrics.cycle_time.unwrap();
        assert_eq!(cycle.days.avg, 7.0);
        assert_eq!(cycle.days.median, 7.0);
        assert_eq!(cycle.days.count, 1);
        assert_eq!(cycle.avg_by_type.get("Story"), Some(&7.0));

        let lead = metrics.lead_time.unwrap();
        assert_eq!(lead.days.avg, 9.0);
        assert_eq!(lead.days.min, 9.0);
        assert_eq!(lead.days.max, 9.0);
    }

    #[test]
    fn cycle_time_skips_issues_without_start_or_finish() {
        let mut started_only = make_issue("PROJ-1", "Task", "In Progress");
        started_only.transitions = vec![transition(day(2), "To Do", "In Progress")];

        let mut finished_without_start = make_issue("PROJ-2", "Task", "Done");
        finished_without_start.transitions = vec![transition(day(4), "To Do", "Done")];

        let issues = [started_only, finished_without_start];
        let metrics = analyze(&issues, &StatusMapping::default(), &options_at(day(15)));

        assert!(metrics.cycle_time.is_none());
        // Lead time only needs a finish: PROJ-2 qualifies.
        assert_eq!(metrics.lead_time.unwrap().days.count, 1);
    }

    #[test]
    fn cycle_time_skips_finish_at_or_before_start() {
        let mut issue = make_issue("PROJ-1", "Task", "Done");
        issue.resolved = Some(day(2));
        issue.transitions = vec![transition(day(5), "To Do", "In Progress")];

        let metrics = analyze(&[issue], &StatusMapping::default(), &options_at(day(15)));
        assert!(metrics.cycle_time.is_none());
        assert_eq!(metrics.lead_time.unwrap().days.count, 1);
    }

    #[test]
    fn no_finished_issues_leaves_cycle_and_lead_unset() {
        let issues = [
            make_issue("PROJ-1", "Task", "To Do"),
            make_issue("PROJ-2", "Task", "In Progress"),
        ];
        let metrics = analyze(&issues, &StatusMapping::default(), &options_at(day(15)));
        assert!(metrics.cycle_time.is_none());
        assert!(metrics.lead_time.is_none());
        assert_eq!(metrics.issues_analyzed, 2);
    }

    #[test]
    fn blocked_stats_count_only_blocked_issues_against_all() {
        let mut blocked = make_issue("PROJ-1", "Task", "Done");
        blocked.transitions = vec![
            transition(day(1), "To Do", "Blocked"),
            transition(day(3), "Blocked", "In Progress"),
            transition(day(6), "In Progress", "Blocked"),
            transition(day(10), "Blocked", "Done"),
        ];
        let clean = make_issue("PROJ-2", "Task", "Done");

        let metrics = analyze(&[blocked, clean], &StatusMapping::default(), &options_at(day(20)));
        let stats = metrics.blocked.unwrap();

        assert_eq!(stats.total_days, 6.0);
        assert_eq!(stats.issues_blocked, 1);
        assert_eq!(stats.pct_issues_blocked, 50.0);
        let days = stats.days.unwrap();
        assert_eq!(days.count, 1);
        assert_eq!(days.avg, 6.0);
    }

    #[test]
    fn wip_counts_in_progress_statuses_only() {
        let mut alice = make_issue("PROJ-1", "Story", "In Progress");
        alice.assignee = Some("alice".to_string());
        let mut review = make_issue("PROJ-2", "Bug", "Code Review");
        review.assignee = Some("alice".to_string());
        let unassigned = make_issue("PROJ-3", "Task", "In Progress");
        let done = make_issue("PROJ-4", "Task", "Done");
        let todo = make_issue("PROJ-5", "Task", "To Do");

        let issues = [alice, review, unassigned, done, todo];
        let metrics = analyze(&issues, &StatusMapping::default(), &options_at(day(15)));
        let wip = metrics.wip.unwrap();

        assert_eq!(wip.total, 3);
        assert_eq!(wip.by_assignee.get("alice"), Some(&2));
        assert_eq!(wip.by_assignee.get("unassigned"), Some(&1));
        assert_eq!(wip.by_type.get("Story"), Some(&1));
        assert_eq!(wip.by_type.get("Bug"), Some(&1));
        assert_eq!(wip.by_type.get("Task"), Some(&1));
    }

    #[test]
    fn throughput_buckets_by_completion_week() {
        // Jan 1 2024 is a Monday: Jan 3 lands in W01, Jan 10 in W02.
        let mut first = make_issue("PROJ-1", "Task", "Done");
        first.resolved = Some(day(3));
        let mut second = make_issue("PROJ-2", "Task", "Done");
        second.resolved = Some(day(10));
        let mut third = make_issue("PROJ-3", "Bug", "Done");
        third.resolved = Some(day(10));

        let issues = [first, second, third];
        let metrics = analyze(&issues, &StatusMapping::default(), &options_at(day(15)));
        let throughput = metrics.throughput.unwrap();

        assert_eq!(throughput.total, 3);
        assert_eq!(throughput.by_week.get("2024-W01"), Some(&1));
        assert_eq!(throughput.by_week.get("2024-W02"), Some(&2));
        assert_eq!(throughput.by_type.get("Bug"), Some(&1));
        assert_eq!(throughput.by_assignee.get("unassigned"), Some(&3));
    }

    #[test]
    fn throughput_weekly_average_uses_period_bounds() {
        let mut issues = Vec::new();
        for i in 0..8 {
            let mut issue = make_issue(&format!("PROJ-{i}"), "Task", "Done");
            issue.resolved = Some(day(2 + i));
            issues.push(issue);
        }
        // Four exact weeks: Jan 1 .. Jan 29.
        let options = AnalyzerOptions {
            now: day(30),
            period: Period { from: Some(day(1)), to: Some(day(29)) },
        };
        let metrics = analyze(&issues, &StatusMapping::default(), &options);
        assert_eq!(metrics.throughput.unwrap().weekly_avg, 2.0);
    }

    #[test]
    fn throughput_open_period_reports_raw_total() {
        let mut issue = make_issue("PROJ-1", "Task", "Done");
        issue.resolved = Some(day(3));
        let metrics = analyze(&[issue], &StatusMapping::default(), &options_at(day(15)));
        assert_eq!(metrics.throughput.unwrap().weekly_avg, 1.0);
    }

    #[test]
    fn done_without_completion_date_counts_in_total_only() {
        // Current status is done-class but neither a resolution date nor a
        // done transition exists, so no weekly bucket can be assigned.
        let issue = make_issue("PROJ-1", "Task", "Done");
        let metrics = analyze(&[issue], &StatusMapping::default(), &options_at(day(15)));
        let throughput = metrics.throughput.unwrap();
        assert_eq!(throughput.total, 1);
        assert!(throughput.by_week.is_empty());
    }

    #[test]
    fn bug_ratio_matches_type_case_insensitively() {
        let mut bug = make_issue("PROJ-1", "bug", "Done");
        bug.resolved = Some(day(5));
        bug.priority = Some("High".to_string());
        let open_bug = make_issue("PROJ-2", "BUG", "To Do");
        let story = make_issue("PROJ-3", "Story", "Done");

        let issues = [bug, open_bug, story];
        let metrics = analyze(&issues, &StatusMapping::default(), &options_at(day(15)));
        let bugs = metrics.bug_ratio.unwrap();

        assert_eq!(bugs.bugs, 2);
        assert_eq!(bugs.total, 3);
        assert_eq!(bugs.ratio, 66.67);
        // Only the resolved bug contributes resolution time: 4 days.
        let resolution = bugs.resolution_days.unwrap();
        assert_eq!(resolution.count, 1);
        assert_eq!(resolution.avg, 4.0);
        assert_eq!(bugs.by_priority.get("High"), Some(&1));
        assert_eq!(bugs.by_priority.get("none"), Some(&1));
    }

    #[test]
    fn empty_input_yields_zeroed_sections() {
        let metrics = analyze(&[], &StatusMapping::default(), &options_at(day(15)));

        assert!(metrics.available);
        assert_eq!(metrics.issues_analyzed, 0);
        assert!(metrics.cycle_time.is_none());
        assert!(metrics.lead_time.is_none());

        let blocked = metrics.blocked.unwrap();
        assert_eq!(blocked.total_days, 0.0);
        assert_eq!(blocked.issues_blocked, 0);
        assert_eq!(blocked.pct_issues_blocked, 0.0);
        assert!(blocked.days.is_none());

        assert_eq!(metrics.wip.unwrap().total, 0);
        let throughput = metrics.throughput.unwrap();
        assert_eq!(throughput.total, 0);
        assert_eq!(throughput.weekly_avg, 0.0);

        let bugs = metrics.bug_ratio.unwrap();
        assert_eq!(bugs.bugs, 0);
        assert_eq!(bugs.ratio, 0.0);
        assert!(bugs.resolution_days.is_none());
    }

    #[test]
    fn unavailable_marks_metrics_and_keeps_period() {
        let period = Period { from: Some(day(1)), to: Some(day(29)) };
        let metrics = TrackerMetrics::unavailable(&period);
        assert!(!metrics.available);
        assert_eq!(metrics.period, "2024-01-01..2024-01-29");
        assert!(metrics.blocked.is_none());
        assert!(metrics.throughput.is_none());
    }

    #[test]
    fn duration_stats_summarize_distribution() {
        let stats = DurationStats::from_days(&[1.0, 2.0, 3.0, 4.0, 10.0]).unwrap();
        assert_eq!(stats.avg, 4.0);
        assert_eq!(stats.median, 3.0);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 10.0);
        assert_eq!(stats.p90, 10.0);
        assert_eq!(stats.count, 5);
        assert!(DurationStats::from_days(&[]).is_none());
    }

    #[test]
    fn metrics_serialize_with_camel_case_keys() {
        let mut issue = make_issue("PROJ-1", "Story", "Done");
        issue.resolved = Some(day(5));
        issue.transitions = vec![transition(day(2), "To Do", "In Progress")];

        let metrics = analyze(&[issue], &StatusMapping::default(), &options_at(day(15)));
        let json = serde_json::to_value(&metrics).unwrap();

        assert_eq!(json["issuesAnalyzed"], 1);
        assert!(json["cycleTime"]["days"]["p90"].is_number());
        assert!(json["leadTime"]["avgByType"]["Story"].is_number());
        assert!(json["blocked"]["pctIssuesBlocked"].is_number());
        assert!(json["bugRatio"]["byPriority"].is_object());
    }
}
