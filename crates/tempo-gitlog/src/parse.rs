//! Line-oriented parser for `git log --numstat` output.
//!
//! The log is requested with a pipe-delimited header format followed by
//! numstat lines, and parsed with a small state machine: a header line
//! opens a commit, stat lines attach to it, the next header (or end of
//! input) closes it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tempo_core::{Result, TempoError};

/// Header format handed to `git log --format=`.
///
/// `%aN`/`%aE` are the mailmap-canonical author fields, so an author with
/// several historical emails collapses to one identity when the repository
/// carries a `.mailmap`. The subject sits last because it is the only field
/// that can itself contain pipes.
pub(crate) const LOG_FORMAT: &str = "%H|%aN|%aE|%aI|%P|%s";

/// A single commit as reported by the log header line.
///
/// Line totals are filled in from the commit's numstat lines.
///
/// # Examples
///
/// ```
/// use tempo_gitlog::parse::parse_log;
///
/// let log = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa|Alice|alice@example.com|2024-01-15T10:30:00+00:00||fix: parser\n\
///            3\t1\tsrc/parse.rs\n";
/// let commits = parse_log(log).unwrap();
/// assert_eq!(commits[0].info.author_name, "Alice");
/// assert_eq!(commits[0].info.added, 3);
/// assert!(!commits[0].info.is_merge);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitInfo {
    /// Full 40-character commit hash.
    pub hash: String,
    /// Mailmap-canonical author name.
    pub author_name: String,
    /// Mailmap-canonical author email.
    pub author_email: String,
    /// Author timestamp, normalized to UTC.
    pub timestamp: DateTime<Utc>,
    /// Whether the commit has more than one parent.
    pub is_merge: bool,
    /// First line of the commit message.
    pub subject: String,
    /// Total lines added across all files in this commit.
    pub added: u64,
    /// Total lines deleted across all files in this commit.
    pub deleted: u64,
    /// Number of files touched by this commit.
    pub files_changed: usize,
}

/// A single numstat entry within a commit.
///
/// # Examples
///
/// ```
/// use tempo_gitlog::parse::FileChange;
///
/// let change = FileChange {
///     path: "src/main.rs".into(),
///     added: 10,
///     deleted: 3,
/// };
/// assert_eq!(change.added, 10);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileChange {
    /// Path as printed by numstat; renames keep the combined `{old => new}` text.
    pub path: String,
    /// Lines added, `0` for binary placeholders.
    pub added: u64,
    /// Lines deleted, `0` for binary placeholders.
    pub deleted: u64,
}

/// A commit header together with its numstat entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedCommit {
    /// The commit header with accumulated line totals.
    pub info: CommitInfo,
    /// Per-file changes in this commit.
    pub files: Vec<FileChange>,
}

/// Parse `git log --format=<header> --numstat` output into commits.
///
/// Commits come back in the order git printed them (newest first). Binary
/// numstat placeholders (`-`) and any other non-numeric counts parse as 0;
/// stat lines appearing before the first header are dropped.
///
/// # Errors
///
/// Returns [`TempoError::Parse`] if a header line has too few fields or an
/// unparseable timestamp.
///
/// # Examples
///
/// ```
/// use tempo_gitlog::parse::parse_log;
///
/// assert!(parse_log("").unwrap().is_empty());
/// ```
pub fn parse_log(input: &str) -> Result<Vec<ParsedCommit>> {
    let mut commits = Vec::new();
    let mut current: Option<ParsedCommit> = None;

    for line in input.lines() {
        if line.trim().is_empty() {
            continue;
        }

        if let Some(info) = parse_header(line)? {
            if let Some(done) = current.take() {
                commits.push(finalize(done));
            }
            current = Some(ParsedCommit {
                info,
                files: Vec::new(),
            });
            continue;
        }

        if let Some(change) = parse_stat_line(line) {
            if let Some(commit) = current.as_mut() {
                commit.files.push(change);
            }
        }
    }

    if let Some(done) = current.take() {
        commits.push(finalize(done));
    }

    Ok(commits)
}

/// Try to read `line` as a log header; `Ok(None)` means "not a header".
fn parse_header(line: &str) -> Result<Option<CommitInfo>> {
    let first = line.split('|').next().unwrap_or("");
    if !is_full_hash(first) {
        return Ok(None);
    }

    let parts: Vec<&str> = line.split('|').collect();
    if parts.len() < 6 {
        return Err(TempoError::Parse(format!(
            "malformed log header with {} fields: {line}",
            parts.len()
        )));
    }

    let timestamp = DateTime::parse_from_rfc3339(parts[3])
        .map_err(|e| TempoError::Parse(format!("invalid commit timestamp '{}': {e}", parts[3])))?
        .with_timezone(&Utc);

    // %P lists parent hashes separated by spaces; two or more means a merge.
    let is_merge = parts[4].split_whitespace().count() > 1;

    Ok(Some(CommitInfo {
        hash: parts[0].to_string(),
        author_name: parts[1].to_string(),
        author_email: parts[2].to_string(),
        timestamp,
        is_merge,
        subject: parts[5..].join("|"),
        added: 0,
        deleted: 0,
        files_changed: 0,
    }))
}

fn parse_stat_line(line: &str) -> Option<FileChange> {
    let mut parts = line.splitn(3, '\t');
    let added = parts.next()?;
    let deleted = parts.next()?;
    let path = parts.next()?.trim();
    if path.is_empty() {
        return None;
    }
    Some(FileChange {
        path: path.to_string(),
        added: parse_count(added),
        deleted: parse_count(deleted),
    })
}

fn parse_count(field: &str) -> u64 {
    field.trim().parse().unwrap_or(0)
}

fn is_full_hash(field: &str) -> bool {
    field.len() == 40 && field.bytes().all(|b| b.is_ascii_hexdigit())
}

fn finalize(mut commit: ParsedCommit) -> ParsedCommit {
    commit.info.added = commit.files.iter().map(|f| f.added).sum();
    commit.info.deleted = commit.files.iter().map(|f| f.deleted).sum();
    commit.info.files_changed = commit.files.len();
    commit
}
