//! Branch discovery for cross-branch reconciliation.

use tempo_core::Result;

use crate::client::GitClient;

/// The main branch plus every branch not yet merged into it.
///
/// Lists local and remote branches (`-a`) so bare mirrors still reconcile,
/// then drops symbolic HEAD pointers, remote aliases of the main branch,
/// and duplicates. The main branch itself is always first.
///
/// # Errors
///
/// Returns [`tempo_core::TempoError::Git`] if the branch listing fails,
/// typically because `main_branch` does not exist.
///
/// # Examples
///
/// ```no_run
/// use tempo_gitlog::branches::unmerged_branches;
/// use tempo_gitlog::client::GitClient;
///
/// let client = GitClient::open(".").unwrap();
/// let branches = unmerged_branches(&client, "main").unwrap();
/// assert_eq!(branches[0], "main");
/// ```
pub fn unmerged_branches(client: &GitClient, main_branch: &str) -> Result<Vec<String>> {
    let output = client.run([
        "branch",
        "-a",
        "--no-merged",
        main_branch,
        "--format=%(refname:short)",
    ])?;

    let main_alias = format!("/{main_branch}");
    let mut branches = vec![main_branch.to_string()];

    for line in output.lines() {
        let name = line.trim();
        if name.is_empty() || name == "HEAD" || name.ends_with("/HEAD") {
            continue;
        }
        if name == main_branch || name.ends_with(&main_alias) {
            continue;
        }
        if !branches.iter().any(|b| b == name) {
            branches.push(name.to_string());
        }
    }

    Ok(branches)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Filtering logic is exercised end-to-end in the crate's integration
    // tests; the error path needs no repository at all.

    #[test]
    fn missing_main_branch_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::process::Command::new("git")
            .arg("-C")
            .arg(dir.path())
            .arg("init")
            .output()
            .unwrap();
        let client = GitClient::open(dir.path()).unwrap();
        let result = unmerged_branches(&client, "no-such-branch");
        assert!(result.is_err());
    }
}
