//! Cross-branch reconciliation.
//!
//! Branch queries run independently and overlap wherever branches share
//! history, so raw per-branch counts cannot be added up. Reconciliation
//! deduplicates the union by commit hash and recomputes every aggregate
//! over the surviving set: a commit reachable from N branches contributes
//! exactly once to every reconciled total.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tempo_core::Result;
use tempo_stats::{day_key, month_key, week_key};

use crate::client::GitClient;
use crate::filter::LogFilter;
use crate::parse::{parse_log, CommitInfo, ParsedCommit};
use crate::stats::{author_stats, AuthorStat};

/// One branch's raw query result, before deduplication.
#[derive(Debug, Clone)]
pub struct BranchCommits {
    /// Branch the query was scoped to.
    pub branch: String,
    /// Commits as returned by that branch's log.
    pub commits: Vec<ParsedCommit>,
}

/// Pre-dedup commit count for one branch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchActivity {
    /// Branch name.
    pub branch: String,
    /// Commits reachable from this branch (overlaps other branches).
    pub commits: usize,
}

/// Deduplicated statistics across a branch set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciledStats {
    /// Branches the reconciler attempted to query.
    pub branches_scanned: usize,
    /// Branches whose query failed and were left out of the union.
    pub branches_skipped: Vec<String>,
    /// Commits surviving hash deduplication.
    pub unique_commits: usize,
    /// Distinct file paths across the deduplicated set.
    pub unique_files: usize,
    /// Raw per-branch counts, in query order.
    pub per_branch: Vec<BranchActivity>,
    /// Author statistics grouped by email over the deduplicated set.
    pub authors: Vec<AuthorStat>,
    /// Commits per calendar date over the deduplicated set.
    pub by_day: BTreeMap<String, u64>,
    /// Commits per ISO week over the deduplicated set.
    pub by_week: BTreeMap<String, u64>,
    /// Commits per calendar month over the deduplicated set.
    pub by_month: BTreeMap<String, u64>,
    /// The deduplicated commits, newest first.
    pub commits: Vec<CommitInfo>,
}

/// Query each branch and merge the results.
///
/// The filter is re-scoped to one branch per query. A branch whose query
/// (or parse) fails is recorded in `branches_skipped` and the merge runs
/// over the rest, so one broken ref never sinks the whole report.
///
/// # Errors
///
/// Per-branch failures are absorbed into `branches_skipped`; an error here
/// would come from a later hard-failure path, of which there are currently
/// none once the client is open.
///
/// # Examples
///
/// ```no_run
/// use tempo_gitlog::client::GitClient;
/// use tempo_gitlog::filter::LogFilter;
/// use tempo_gitlog::reconcile::reconcile;
///
/// let client = GitClient::open(".").unwrap();
/// let branches = vec!["main".to_string(), "develop".to_string()];
/// let stats = reconcile(&client, &branches, &LogFilter::default()).unwrap();
/// println!("{} unique commits", stats.unique_commits);
/// ```
pub fn reconcile(
    client: &GitClient,
    branches: &[String],
    filter: &LogFilter,
) -> Result<ReconciledStats> {
    let mut results = Vec::new();
    let mut skipped = Vec::new();

    for branch in branches {
        let scoped = filter.for_branch(branch);
        match client
            .run(&scoped.to_args())
            .and_then(|output| parse_log(&output))
        {
            Ok(commits) => results.push(BranchCommits {
                branch: branch.clone(),
                commits,
            }),
            Err(_) => skipped.push(branch.clone()),
        }
    }

    let mut stats = merge_branch_results(&results);
    stats.branches_scanned = branches.len();
    stats.branches_skipped = skipped;
    Ok(stats)
}

/// Merge per-branch results into deduplicated statistics.
///
/// Pure: the reconciler's query loop feeds it, and tests construct
/// [`BranchCommits`] directly. Commits deduplicate by hash with the first
/// seen record surviving; the union is sorted newest first.
#[must_use]
pub fn merge_branch_results(results: &[BranchCommits]) -> ReconciledStats {
    let mut deduped: HashMap<&str, &ParsedCommit> = HashMap::new();
    for result in results {
        for commit in &result.commits {
            deduped.entry(commit.info.hash.as_str()).or_insert(commit);
        }
    }

    let mut unique: Vec<ParsedCommit> = deduped.into_values().cloned().collect();
    unique.sort_by(|a, b| {
        b.info
            .timestamp
            .cmp(&a.info.timestamp)
            .then_with(|| a.info.hash.cmp(&b.info.hash))
    });

    let mut files = HashSet::new();
    let mut by_day = BTreeMap::new();
    let mut by_week = BTreeMap::new();
    let mut by_month = BTreeMap::new();
    for commit in &unique {
        for file in &commit.files {
            files.insert(file.path.as_str());
        }
        let ts = commit.info.timestamp;
        *by_day.entry(day_key(ts)).or_insert(0u64) += 1;
        *by_week.entry(week_key(ts)).or_insert(0u64) += 1;
        *by_month.entry(month_key(ts)).or_insert(0u64) += 1;
    }

    ReconciledStats {
        branches_scanned: results.len(),
        branches_skipped: Vec::new(),
        unique_commits: unique.len(),
        unique_files: files.len(),
        per_branch: results
            .iter()
            .map(|r| BranchActivity {
                branch: r.branch.clone(),
                commits: r.commits.len(),
            })
            .collect(),
        authors: author_stats(&unique),
        by_day,
        by_week,
        by_month,
        commits: unique.into_iter().map(|c| c.info).collect(),
    }
}
