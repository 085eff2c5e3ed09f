//! Subprocess wrapper around the `git` binary.
//!
//! Every git interaction in this crate goes through [`GitClient::run`]:
//! spawn `git -C <repo> <args>`, capture stdout, and hand the text to a
//! parser. No libgit2 binding is involved anywhere.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempo_core::{Result, TempoError};

/// Handle to a verified git repository.
///
/// # Examples
///
/// ```no_run
/// use tempo_gitlog::client::GitClient;
///
/// let client = GitClient::open(".").unwrap();
/// let head = client.run(["rev-parse", "--abbrev-ref", "HEAD"]).unwrap();
/// println!("on branch {}", head.trim());
/// ```
#[derive(Debug, Clone)]
pub struct GitClient {
    repo_path: PathBuf,
}

impl GitClient {
    /// Open a repository at `repo_path`, verifying it with `git rev-parse`.
    ///
    /// # Errors
    ///
    /// Returns [`TempoError::Git`] if the `git` binary cannot be spawned or
    /// the path is not inside a git repository.
    pub fn open(repo_path: impl Into<PathBuf>) -> Result<Self> {
        let repo_path = repo_path.into();
        let output = Command::new("git")
            .arg("-C")
            .arg(&repo_path)
            .args(["rev-parse", "--git-dir"])
            .output()
            .map_err(|e| TempoError::Git(format!("failed to run git: {e}")))?;
        if !output.status.success() {
            return Err(TempoError::Git(format!(
                "not a git repository: {}",
                repo_path.display()
            )));
        }
        Ok(Self { repo_path })
    }

    /// The repository path this client operates on.
    pub fn path(&self) -> &Path {
        &self.repo_path
    }

    /// Run `git <args>` in the repository and return captured stdout.
    ///
    /// # Errors
    ///
    /// Returns [`TempoError::Git`] if git cannot be spawned, exits non-zero
    /// (the trimmed stderr is included in the message), or prints non-UTF8
    /// output.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use tempo_gitlog::client::GitClient;
    ///
    /// let client = GitClient::open(".").unwrap();
    /// let files = client.run(["ls-files"]).unwrap();
    /// assert!(files.lines().count() > 0);
    /// ```
    pub fn run<I, S>(&self, args: I) -> Result<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let args: Vec<_> = args.into_iter().collect();
        let command_name = args
            .first()
            .map(|a| a.as_ref().to_string_lossy().into_owned())
            .unwrap_or_default();

        let output = Command::new("git")
            .arg("-C")
            .arg(&self.repo_path)
            .args(&args)
            .output()
            .map_err(|e| TempoError::Git(format!("failed to run git: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TempoError::Git(format!(
                "git {command_name} failed: {}",
                stderr.trim()
            )));
        }

        String::from_utf8(output.stdout)
            .map_err(|_| TempoError::Git(format!("git {command_name} produced non-UTF8 output")))
    }

    /// Short name of the currently checked-out branch.
    ///
    /// # Errors
    ///
    /// Returns [`TempoError::Git`] if `git rev-parse` fails.
    pub fn current_branch(&self) -> Result<String> {
        let output = self.run(["rev-parse", "--abbrev-ref", "HEAD"])?;
        Ok(output.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_rejects_non_repository() {
        let dir = tempfile::tempdir().unwrap();
        let err = GitClient::open(dir.path()).unwrap_err();
        assert!(err.to_string().contains("not a git repository"));
    }

    #[test]
    fn open_rejects_missing_path() {
        let result = GitClient::open("/definitely/not/a/repo/path");
        assert!(result.is_err());
    }
}
