//! Commit history extraction and statistics from textual `git` output.
//!
//! Shells out to the `git` binary (log with numstat, blame, branch
//! listing) and parses the text: no libgit2 binding anywhere. On top of
//! the parsed commits sit pure per-set statistics and a cross-branch
//! reconciler that deduplicates by commit hash.

pub mod blame;
pub mod branches;
pub mod client;
pub mod filter;
pub mod parse;
pub mod reconcile;
pub mod stats;
