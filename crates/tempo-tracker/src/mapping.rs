//! Status-name classification.
//!
//! Trackers let every team invent its own status names, so the analyzers
//! never compare raw names. A [`StatusMapping`] folds each display name into
//! one of four flow classes; teams with custom workflows override the
//! built-in name lists through `[status]` in `.tempo.toml`.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tempo_core::StatusConfig;

/// Flow class a status name resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StatusClass {
    /// Work not started yet.
    Todo,
    /// Work actively underway.
    InProgress,
    /// Work stalled on something external.
    Blocked,
    /// Work finished.
    Done,
}

/// Case-insensitive status-name lookup table.
///
/// # Examples
///
/// ```
/// use tempo_tracker::mapping::{StatusClass, StatusMapping};
///
/// let mapping = StatusMapping::default();
/// assert_eq!(mapping.classify("In Progress"), StatusClass::InProgress);
/// assert_eq!(mapping.classify("BLOCKED"), StatusClass::Blocked);
/// assert_eq!(mapping.classify("Something Custom"), StatusClass::Todo);
/// ```
#[derive(Debug, Clone)]
pub struct StatusMapping {
    todo: HashSet<String>,
    in_progress: HashSet<String>,
    blocked: HashSet<String>,
    done: HashSet<String>,
}

const DEFAULT_TODO: &[&str] = &[
    "to do",
    "todo",
    "open",
    "backlog",
    "new",
    "ready",
    "selected for development",
];

const DEFAULT_IN_PROGRESS: &[&str] = &[
    "in progress",
    "in development",
    "in review",
    "code review",
    "review",
    "testing",
    "qa",
];

const DEFAULT_BLOCKED: &[&str] = &["blocked", "on hold", "waiting", "impediment", "paused"];

const DEFAULT_DONE: &[&str] = &[
    "done",
    "closed",
    "resolved",
    "complete",
    "completed",
    "released",
    "cancelled",
    "canceled",
];

fn lowered(names: &[&str]) -> HashSet<String> {
    names.iter().map(|name| name.to_lowercase()).collect()
}

fn from_list(names: &[String], fallback: &[&str]) -> HashSet<String> {
    if names.is_empty() {
        lowered(fallback)
    } else {
        names.iter().map(|name| name.trim().to_lowercase()).collect()
    }
}

impl Default for StatusMapping {
    fn default() -> Self {
        Self {
            todo: lowered(DEFAULT_TODO),
            in_progress: lowered(DEFAULT_IN_PROGRESS),
            blocked: lowered(DEFAULT_BLOCKED),
            done: lowered(DEFAULT_DONE),
        }
    }
}

impl StatusMapping {
    /// Builds a mapping from `[status]` config, falling back to the built-in
    /// name lists for any class the config leaves empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use tempo_core::StatusConfig;
    /// use tempo_tracker::mapping::{StatusClass, StatusMapping};
    ///
    /// let config = StatusConfig {
    ///     done: vec!["Shipped".to_string()],
    ///     ..StatusConfig::default()
    /// };
    /// let mapping = StatusMapping::from_config(&config);
    /// assert_eq!(mapping.classify("shipped"), StatusClass::Done);
    /// // The override replaces the built-in done list entirely.
    /// assert_eq!(mapping.classify("Done"), StatusClass::Todo);
    /// ```
    #[must_use]
    pub fn from_config(config: &StatusConfig) -> Self {
        Self {
            todo: from_list(&config.todo, DEFAULT_TODO),
            in_progress: from_list(&config.in_progress, DEFAULT_IN_PROGRESS),
            blocked: from_list(&config.blocked, DEFAULT_BLOCKED),
            done: from_list(&config.done, DEFAULT_DONE),
        }
    }

    /// Resolves a status display name to its flow class.
    ///
    /// Matching is case-insensitive and ignores surrounding whitespace.
    /// Names in no list fall back to [`StatusClass::Todo`], so an
    /// unrecognized status never inflates cycle time or throughput.
    #[must_use]
    pub fn classify(&self, status: &str) -> StatusClass {
        let name = status.trim().to_lowercase();
        if self.done.contains(&name) {
            StatusClass::Done
        } else if self.blocked.contains(&name) {
            StatusClass::Blocked
        } else if self.in_progress.contains(&name) {
            StatusClass::InProgress
        } else {
            StatusClass::Todo
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_common_names() {
        let mapping = StatusMapping::default();
        assert_eq!(mapping.classify("To Do"), StatusClass::Todo);
        assert_eq!(mapping.classify("Backlog"), StatusClass::Todo);
        assert_eq!(mapping.classify("In Progress"), StatusClass::InProgress);
        assert_eq!(mapping.classify("Code Review"), StatusClass::InProgress);
        assert_eq!(mapping.classify("Blocked"), StatusClass::Blocked);
        assert_eq!(mapping.classify("On Hold"), StatusClass::Blocked);
        assert_eq!(mapping.classify("Done"), StatusClass::Done);
        assert_eq!(mapping.classify("Resolved"), StatusClass::Done);
    }

    #[test]
    fn classification_is_case_insensitive() {
        let mapping = StatusMapping::default();
        assert_eq!(mapping.classify("DONE"), StatusClass::Done);
        assert_eq!(mapping.classify("in progress"), StatusClass::InProgress);
        assert_eq!(mapping.classify("  Blocked  "), StatusClass::Blocked);
    }

    #[test]
    fn unknown_status_falls_back_to_todo() {
        let mapping = StatusMapping::default();
        assert_eq!(mapping.classify("Waiting for Godot"), StatusClass::Todo);
        assert_eq!(mapping.classify(""), StatusClass::Todo);
    }

    #[test]
    fn config_override_replaces_only_its_class() {
        let config = StatusConfig {
            blocked: vec!["Stuck".to_string(), "Parked".to_string()],
            ..StatusConfig::default()
        };
        let mapping = StatusMapping::from_config(&config);
        assert_eq!(mapping.classify("stuck"), StatusClass::Blocked);
        assert_eq!(mapping.classify("PARKED"), StatusClass::Blocked);
        // Built-in blocked names are gone, other classes keep their defaults.
        assert_eq!(mapping.classify("On Hold"), StatusClass::Todo);
        assert_eq!(mapping.classify("Done"), StatusClass::Done);
    }

    #[test]
    fn empty_config_matches_defaults() {
        let mapping = StatusMapping::from_config(&StatusConfig::default());
        assert_eq!(mapping.classify("Done"), StatusClass::Done);
        assert_eq!(mapping.classify("In Progress"), StatusClass::InProgress);
    }

    #[test]
    fn config_names_are_normalized() {
        let config = StatusConfig {
            done: vec!["  Shipped ".to_string()],
            ..StatusConfig::default()
        };
        let mapping = StatusMapping::from_config(&config);
        assert_eq!(mapping.classify("shipped"), StatusClass::Done);
        assert_eq!(mapping.classify("SHIPPED  "), StatusClass::Done);
    }

    #[test]
    fn status_class_serializes_camel_case() {
        let json = serde_json::to_value(StatusClass::InProgress).unwrap();
        assert_eq!(json, "inProgress");
    }
}
