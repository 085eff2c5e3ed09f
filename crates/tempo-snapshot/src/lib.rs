//! Snapshot record combining git and tracker metrics for one collection run.
//!
//! The assembler does no computation of its own: both analyzers run
//! independently and this crate only stitches their outputs together under
//! a single timestamp, so a collector gets one document per run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tempo_gitlog::stats::{AuthorStat, PeriodStat, RepoSummary, TimeStats};
use tempo_tracker::metrics::TrackerMetrics;

/// Git-side metrics bundled into a snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitSnapshot {
    pub summary: RepoSummary,
    pub authors: Vec<AuthorStat>,
    pub time: TimeStats,
    pub periods: Vec<PeriodStat>,
}

/// One collection run's combined output.
///
/// Either side can be absent: a repo-only run carries no tracker section
/// and a tracker-only run no git section. Consumers distinguish "tracker
/// not configured" (`tracker.available == false`) from "tracker not
/// requested" (`tracker` missing) by shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    /// When this snapshot was assembled.
    pub generated_at: DateTime<Utc>,
    pub repo: Option<GitSnapshot>,
    pub tracker: Option<TrackerMetrics>,
}

/// Combines analyzer outputs into a snapshot stamped with the current time.
///
/// # Examples
///
/// ```
/// use tempo_snapshot::assemble;
///
/// let snapshot = assemble(None, None);
/// assert!(snapshot.repo.is_none());
/// assert!(snapshot.tracker.is_none());
/// ```
#[must_use]
pub fn assemble(repo: Option<GitSnapshot>, tracker: Option<TrackerMetrics>) -> MetricsSnapshot {
    assemble_at(Utc::now(), repo, tracker)
}

/// [`assemble`] with an explicit timestamp.
#[must_use]
pub fn assemble_at(
    generated_at: DateTime<Utc>,
    repo: Option<GitSnapshot>,
    tracker: Option<TrackerMetrics>,
) -> MetricsSnapshot {
    MetricsSnapshot { generated_at, repo, tracker }
}
