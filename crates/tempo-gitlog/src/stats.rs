//! Pure statistics over parsed commit sets.
//!
//! Everything here is derived per call from a `&[ParsedCommit]` slice and
//! never cached: callers re-run the functions when they re-query. Ordering
//! is deterministic (count descending, then name ascending) so text output
//! and tests are stable.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Timelike, Utc};
use serde::{Deserialize, Serialize};
use tempo_stats::{day_key, month_key, round2, week_key, year_key};

use crate::parse::ParsedCommit;

const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Whole-set summary for one branch query.
///
/// # Examples
///
/// ```
/// use tempo_gitlog::stats::summarize;
///
/// let summary = summarize(&[], "main");
/// assert_eq!(summary.total_commits, 0);
/// assert_eq!(summary.avg_commits_per_active_day, 0.0);
/// assert!(summary.first_commit.is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoSummary {
    /// Branch (or `--all` label) the summary was computed over.
    pub branch: String,
    /// Number of commits in the set.
    pub total_commits: usize,
    /// Number of commits with more than one parent.
    pub merge_commits: usize,
    /// Distinct author emails.
    pub authors: usize,
    /// Oldest commit timestamp in the set.
    pub first_commit: Option<DateTime<Utc>>,
    /// Newest commit timestamp in the set.
    pub last_commit: Option<DateTime<Utc>>,
    /// Lines added across the set.
    pub total_added: u64,
    /// Lines deleted across the set.
    pub total_deleted: u64,
    /// Distinct calendar dates with at least one commit.
    pub active_days: usize,
    /// `total_commits / active_days`, 0 when there are no active days.
    pub avg_commits_per_active_day: f64,
}

/// Per-author contribution statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorStat {
    /// Canonical username derived from the email local part.
    pub username: String,
    /// Author display name (first seen for this email).
    pub name: String,
    /// Author email, the grouping key.
    pub email: String,
    /// Commits by this author in the set.
    pub commits: usize,
    /// Merge commits by this author in the set.
    pub merges: usize,
    /// Lines added.
    pub added: u64,
    /// Lines deleted.
    pub deleted: u64,
    /// File-change entries across the author's commits.
    pub files_changed: usize,
    /// Oldest commit by this author.
    pub first_commit: Option<DateTime<Utc>>,
    /// Newest commit by this author.
    pub last_commit: Option<DateTime<Utc>>,
    /// Distinct calendar dates with at least one commit by this author.
    pub active_days: usize,
    /// `commits / active_days`, 0 when there are no active days.
    pub avg_commits_per_active_day: f64,
}

/// Per-file change statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileStat {
    /// Path as printed by numstat.
    pub path: String,
    /// Commits touching this path.
    pub commits: usize,
    /// Lines added to this path.
    pub added: u64,
    /// Lines deleted from this path.
    pub deleted: u64,
    /// Timestamp of the newest commit touching this path.
    pub last_touched: DateTime<Utc>,
}

/// Per-extension change statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileTypeStat {
    /// Lowercased extension after the last dot, or `"no-ext"`.
    pub extension: String,
    /// Commits touching at least one file of this type.
    pub commits: usize,
    /// Distinct files of this type.
    pub files: usize,
    /// Lines added.
    pub added: u64,
    /// Lines deleted.
    pub deleted: u64,
}

/// One named weekday histogram bucket.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekdayBucket {
    /// English weekday name, Monday through Sunday.
    pub weekday: String,
    /// Commits on this weekday.
    pub commits: u64,
}

/// Commit-time distribution histograms.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeStats {
    /// 24 buckets, commits per UTC hour of day.
    pub by_hour: Vec<u64>,
    /// 7 named buckets, Monday through Sunday.
    pub by_weekday: Vec<WeekdayBucket>,
    /// Commits per `"YYYY-MM"` month.
    pub by_month: BTreeMap<String, u64>,
    /// Commits per ISO `"YYYY-Www"` week.
    pub by_week: BTreeMap<String, u64>,
}

/// Aggregates for one calendar bucket.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodStat {
    /// Bucket key (day, ISO week, month, or year).
    pub period: String,
    /// Commits in the bucket.
    pub commits: usize,
    /// Lines added in the bucket.
    pub added: u64,
    /// Lines deleted in the bucket.
    pub deleted: u64,
    /// Distinct author emails in the bucket.
    pub authors: usize,
}

/// Calendar granularity for [`period_stats`].
///
/// # Examples
///
/// ```
/// use tempo_gitlog::stats::Granularity;
///
/// let g: Granularity = "month".parse().unwrap();
/// assert_eq!(g, Granularity::Month);
/// assert_eq!(g.to_string(), "month");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// One bucket per calendar date.
    Day,
    /// One bucket per ISO 8601 week.
    #[default]
    Week,
    /// One bucket per calendar month.
    Month,
    /// One bucket per calendar year.
    Year,
}

impl Granularity {
    fn key(self, ts: DateTime<Utc>) -> String {
        match self {
            Granularity::Day => day_key(ts),
            Granularity::Week => week_key(ts),
            Granularity::Month => month_key(ts),
            Granularity::Year => year_key(ts),
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Granularity::Day => write!(f, "day"),
            Granularity::Week => write!(f, "week"),
            Granularity::Month => write!(f, "month"),
            Granularity::Year => write!(f, "year"),
        }
    }
}

impl FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "day" => Ok(Granularity::Day),
            "week" => Ok(Granularity::Week),
            "month" => Ok(Granularity::Month),
            "year" => Ok(Granularity::Year),
            other => Err(format!("unknown granularity: {other}")),
        }
    }
}

/// Summarize a commit set queried from `branch`.
///
/// Merge commits are counted directly from the parent-count flag; when the
/// query excluded merges the count is simply zero.
#[must_use]
pub fn summarize(commits: &[ParsedCommit], branch: &str) -> RepoSummary {
    let mut emails = HashSet::new();
    let mut days = HashSet::new();
    let mut merge_commits = 0;
    let mut total_added = 0;
    let mut total_deleted = 0;
    let mut first_commit: Option<DateTime<Utc>> = None;
    let mut last_commit: Option<DateTime<Utc>> = None;

    for commit in commits {
        let info = &commit.info;
        emails.insert(info.author_email.as_str());
        days.insert(day_key(info.timestamp));
        if info.is_merge {
            merge_commits += 1;
        }
        total_added += info.added;
        total_deleted += info.deleted;
        first_commit = Some(first_commit.map_or(info.timestamp, |t| t.min(info.timestamp)));
        last_commit = Some(last_commit.map_or(info.timestamp, |t| t.max(info.timestamp)));
    }

    let active_days = days.len();
    let avg = if active_days == 0 {
        0.0
    } else {
        round2(commits.len() as f64 / active_days as f64)
    };

    RepoSummary {
        branch: branch.to_string(),
        total_commits: commits.len(),
        merge_commits,
        authors: emails.len(),
        first_commit,
        last_commit,
        total_added,
        total_deleted,
        active_days,
        avg_commits_per_active_day: avg,
    }
}

/// Group a commit set by author email.
///
/// Sorted by commit count descending, then email ascending; the display
/// name is the first one seen for each email.
#[must_use]
pub fn author_stats(commits: &[ParsedCommit]) -> Vec<AuthorStat> {
    struct Acc {
        name: String,
        commits: usize,
        merges: usize,
        added: u64,
        deleted: u64,
        files_changed: usize,
        first: DateTime<Utc>,
        last: DateTime<Utc>,
        days: HashSet<String>,
    }

    let mut by_email: HashMap<String, Acc> = HashMap::new();

    for commit in commits {
        let info = &commit.info;
        let acc = by_email
            .entry(info.author_email.clone())
            .or_insert_with(|| Acc {
                name: info.author_name.clone(),
                commits: 0,
                merges: 0,
                added: 0,
                deleted: 0,
                files_changed: 0,
                first: info.timestamp,
                last: info.timestamp,
                days: HashSet::new(),
            });
        acc.commits += 1;
        if info.is_merge {
            acc.merges += 1;
        }
        acc.added += info.added;
        acc.deleted += info.deleted;
        acc.files_changed += info.files_changed;
        acc.first = acc.first.min(info.timestamp);
        acc.last = acc.last.max(info.timestamp);
        acc.days.insert(day_key(info.timestamp));
    }

    let mut stats: Vec<AuthorStat> = by_email
        .into_iter()
        .map(|(email, acc)| {
            let active_days = acc.days.len();
            let avg = if active_days == 0 {
                0.0
            } else {
                round2(acc.commits as f64 / active_days as f64)
            };
            AuthorStat {
                username: email.split('@').next().unwrap_or_default().to_string(),
                name: acc.name,
                email,
                commits: acc.commits,
                merges: acc.merges,
                added: acc.added,
                deleted: acc.deleted,
                files_changed: acc.files_changed,
                first_commit: Some(acc.first),
                last_commit: Some(acc.last),
                active_days,
                avg_commits_per_active_day: avg,
            }
        })
        .collect();

    stats.sort_by(|a, b| b.commits.cmp(&a.commits).then_with(|| a.email.cmp(&b.email)));
    stats
}

/// Accumulate changes per file path, sorted by commit count descending.
#[must_use]
pub fn file_stats(commits: &[ParsedCommit]) -> Vec<FileStat> {
    struct Acc {
        commits: usize,
        added: u64,
        deleted: u64,
        last_touched: DateTime<Utc>,
    }

    let mut by_path: HashMap<String, Acc> = HashMap::new();

    for commit in commits {
        for file in &commit.files {
            let acc = by_path.entry(file.path.clone()).or_insert_with(|| Acc {
                commits: 0,
                added: 0,
                deleted: 0,
                last_touched: commit.info.timestamp,
            });
            acc.commits += 1;
            acc.added += file.added;
            acc.deleted += file.deleted;
            acc.last_touched = acc.last_touched.max(commit.info.timestamp);
        }
    }

    let mut stats: Vec<FileStat> = by_path
        .into_iter()
        .map(|(path, acc)| FileStat {
            path,
            commits: acc.commits,
            added: acc.added,
            deleted: acc.deleted,
            last_touched: acc.last_touched,
        })
        .collect();

    stats.sort_by(|a, b| b.commits.cmp(&a.commits).then_with(|| a.path.cmp(&b.path)));
    stats
}

/// Accumulate changes per file extension, sorted by commit count descending.
#[must_use]
pub fn file_type_stats(commits: &[ParsedCommit]) -> Vec<FileTypeStat> {
    struct Acc {
        commits: usize,
        files: HashSet<String>,
        added: u64,
        deleted: u64,
    }

    let mut by_ext: HashMap<String, Acc> = HashMap::new();

    for commit in commits {
        let mut seen_in_commit = HashSet::new();
        for file in &commit.files {
            let ext = extension(&file.path);
            let acc = by_ext.entry(ext.clone()).or_insert_with(|| Acc {
                commits: 0,
                files: HashSet::new(),
                added: 0,
                deleted: 0,
            });
            if seen_in_commit.insert(ext) {
                acc.commits += 1;
            }
            acc.files.insert(file.path.clone());
            acc.added += file.added;
            acc.deleted += file.deleted;
        }
    }

    let mut stats: Vec<FileTypeStat> = by_ext
        .into_iter()
        .map(|(extension, acc)| FileTypeStat {
            extension,
            commits: acc.commits,
            files: acc.files.len(),
            added: acc.added,
            deleted: acc.deleted,
        })
        .collect();

    stats.sort_by(|a, b| {
        b.commits
            .cmp(&a.commits)
            .then_with(|| a.extension.cmp(&b.extension))
    });
    stats
}

/// Commit-time histograms: hour of day, weekday, month, ISO week.
#[must_use]
pub fn time_stats(commits: &[ParsedCommit]) -> TimeStats {
    let mut by_hour = vec![0u64; 24];
    let mut weekday_counts = [0u64; 7];
    let mut by_month = BTreeMap::new();
    let mut by_week = BTreeMap::new();

    for commit in commits {
        let ts = commit.info.timestamp;
        by_hour[ts.hour() as usize] += 1;
        weekday_counts[ts.weekday().num_days_from_monday() as usize] += 1;
        *by_month.entry(month_key(ts)).or_insert(0) += 1;
        *by_week.entry(week_key(ts)).or_insert(0) += 1;
    }

    let by_weekday = WEEKDAYS
        .iter()
        .zip(weekday_counts)
        .map(|(weekday, commits)| WeekdayBucket {
            weekday: (*weekday).to_string(),
            commits,
        })
        .collect();

    TimeStats {
        by_hour,
        by_weekday,
        by_month,
        by_week,
    }
}

/// Bucket a commit set by calendar period, sorted ascending by key.
#[must_use]
pub fn period_stats(commits: &[ParsedCommit], granularity: Granularity) -> Vec<PeriodStat> {
    struct Acc {
        commits: usize,
        added: u64,
        deleted: u64,
        emails: HashSet<String>,
    }

    let mut buckets: BTreeMap<String, Acc> = BTreeMap::new();

    for commit in commits {
        let info = &commit.info;
        let acc = buckets
            .entry(granularity.key(info.timestamp))
            .or_insert_with(|| Acc {
                commits: 0,
                added: 0,
                deleted: 0,
                emails: HashSet::new(),
            });
        acc.commits += 1;
        acc.added += info.added;
        acc.deleted += info.deleted;
        acc.emails.insert(info.author_email.clone());
    }

    buckets
        .into_iter()
        .map(|(period, acc)| PeriodStat {
            period,
            commits: acc.commits,
            added: acc.added,
            deleted: acc.deleted,
            authors: acc.emails.len(),
        })
        .collect()
}

/// Lowercased extension after the last dot of the path's final component.
fn extension(path: &str) -> String {
    let basename = path.rsplit('/').next().unwrap_or(path);
    match basename.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => ext.to_lowercase(),
        _ => "no-ext".to_string(),
    }
}
