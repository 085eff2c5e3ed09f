//! Issue and status-transition records shared across the tracker analyzers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single status change recorded in an issue's changelog.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use tempo_tracker::model::StatusTransition;
///
/// let transition = StatusTransition {
///     at: Utc.with_ymd_and_hms(2024, 1, 3, 9, 0, 0).unwrap(),
///     from_status: "To Do".to_string(),
///     to_status: "In Progress".to_string(),
/// };
/// assert_eq!(transition.to_status, "In Progress");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusTransition {
    /// When the change happened.
    pub at: DateTime<Utc>,
    /// Status the issue left.
    pub from_status: String,
    /// Status the issue entered.
    pub to_status: String,
}

/// A tracker issue with the fields the flow analyzers need.
///
/// Statuses are carried as the raw display names the tracker reports;
/// [`StatusMapping`](crate::mapping::StatusMapping) turns them into flow
/// classes at analysis time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    /// Issue key, e.g. `PROJ-42`.
    pub key: String,
    /// One-line summary.
    pub summary: String,
    /// Issue type display name, e.g. `Bug` or `Story`.
    pub issue_type: String,
    /// Current status display name.
    pub status: String,
    /// Current assignee, if any.
    pub assignee: Option<String>,
    /// Priority display name, if any.
    pub priority: Option<String>,
    /// Creation timestamp.
    pub created: DateTime<Utc>,
    /// Resolution timestamp, if the tracker recorded one.
    pub resolved: Option<DateTime<Utc>>,
    /// Status changelog, not necessarily in chronological order.
    #[serde(default)]
    pub transitions: Vec<StatusTransition>,
}
