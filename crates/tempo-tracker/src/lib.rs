//! Issue tracker flow metrics: cycle time, lead time, blocked time, WIP,
//! throughput, and bug ratio.
//!
//! Issues are fetched from a Jira-compatible API with their status
//! changelogs, folded into per-issue timelines, and aggregated into
//! [`metrics::TrackerMetrics`]. Status names are normalized through a
//! configurable [`mapping::StatusMapping`] so custom workflows map onto the
//! same four flow classes.

pub mod client;
pub mod mapping;
pub mod metrics;
pub mod model;
pub mod timeline;
