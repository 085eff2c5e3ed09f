use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An optionally-bounded analysis window.
///
/// Both bounds are optional: an open start means "since the beginning of
/// history" and an open end means "up to now". Metrics that need a length
/// (weekly throughput averages) only get one when both bounds are present.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use tempo_core::Period;
///
/// let period = Period {
///     from: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
///     to: Some(Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap()),
/// };
/// assert_eq!(period.label(), "2024-01-01..2024-01-15");
/// assert_eq!(period.weeks(), Some(2.0));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Period {
    /// Inclusive lower bound, if any.
    pub from: Option<DateTime<Utc>>,
    /// Inclusive upper bound, if any.
    pub to: Option<DateTime<Utc>>,
}

impl Period {
    /// A fully open period covering all of history.
    ///
    /// # Examples
    ///
    /// ```
    /// use tempo_core::Period;
    ///
    /// assert_eq!(Period::open().label(), "start..now");
    /// assert_eq!(Period::open().weeks(), None);
    /// ```
    pub fn open() -> Self {
        Self::default()
    }

    /// Human-readable label, e.g. `"2024-01-01..2024-03-31"`.
    ///
    /// Open bounds render as `"start"` and `"now"`.
    pub fn label(&self) -> String {
        let from = self
            .from
            .map_or_else(|| "start".to_string(), |t| t.format("%Y-%m-%d").to_string());
        let to = self
            .to
            .map_or_else(|| "now".to_string(), |t| t.format("%Y-%m-%d").to_string());
        format!("{from}..{to}")
    }

    /// Length of the period in fractional weeks.
    ///
    /// Returns `None` unless both bounds are present and the end is after
    /// the start.
    pub fn weeks(&self) -> Option<f64> {
        match (self.from, self.to) {
            (Some(from), Some(to)) if to > from => {
                Some((to - from).num_seconds() as f64 / 604_800.0)
            }
            _ => None,
        }
    }
}

/// Output format for CLI subcommands.
///
/// Implements [`FromStr`] so it can be used directly with `clap` argument parsing.
///
/// # Examples
///
/// ```
/// use tempo_core::OutputFormat;
///
/// let fmt: OutputFormat = "json".parse().unwrap();
/// assert_eq!(fmt, OutputFormat::Json);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable tables and summaries.
    #[default]
    Text,
    /// Machine-readable JSON with camelCase keys.
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}
