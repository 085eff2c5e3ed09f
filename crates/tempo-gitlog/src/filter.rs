use chrono::NaiveDate;

use crate::parse::LOG_FORMAT;

/// Query options translated into `git log` arguments.
///
/// Branch selection drives the query mode: no branch means HEAD, one branch
/// scopes to that branch, and more than one switches to `--all` (per-branch
/// scoping is the reconciler's job, which re-issues single-branch queries).
///
/// # Examples
///
/// ```
/// use tempo_gitlog::filter::LogFilter;
///
/// let filter = LogFilter {
///     branches: vec!["main".into()],
///     max_count: Some(500),
///     ..LogFilter::default()
/// };
/// let args = filter.to_args();
/// assert_eq!(args[0], "log");
/// assert!(args.contains(&"main".to_string()));
/// assert!(args.contains(&"--no-merges".to_string()));
/// ```
#[derive(Debug, Clone, Default)]
pub struct LogFilter {
    /// Branches to query; empty means the current HEAD.
    pub branches: Vec<String>,
    /// Author name filter, used only when no email is given.
    pub author_name: Option<String>,
    /// Author email filter; preferred over the name when both are set.
    pub author_email: Option<String>,
    /// Only commits on or after this date.
    pub since: Option<NaiveDate>,
    /// Only commits on or before this date.
    pub until: Option<NaiveDate>,
    /// Upper bound on commits returned.
    pub max_count: Option<usize>,
    /// Keep merge commits in the result (default: false).
    pub include_merges: bool,
    /// Restrict the log to these paths.
    pub paths: Vec<String>,
}

impl LogFilter {
    /// Build the full `git log` argument vector for this filter.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec!["log".to_string()];

        match self.branches.len() {
            0 => {}
            1 => args.push(self.branches[0].clone()),
            _ => args.push("--all".to_string()),
        }

        args.push(format!("--format={LOG_FORMAT}"));
        args.push("--numstat".to_string());

        if !self.include_merges {
            args.push("--no-merges".to_string());
        }
        if let Some(author) = self.author_email.as_ref().or(self.author_name.as_ref()) {
            args.push(format!("--author={author}"));
        }
        if let Some(since) = self.since {
            args.push(format!("--since={}", since.format("%Y-%m-%d")));
        }
        if let Some(until) = self.until {
            args.push(format!("--until={}", until.format("%Y-%m-%d")));
        }
        if let Some(max) = self.max_count {
            args.push(format!("--max-count={max}"));
        }
        if !self.paths.is_empty() {
            args.push("--".to_string());
            args.extend(self.paths.iter().cloned());
        }

        args
    }

    /// The same filter scoped to exactly one branch.
    ///
    /// # Examples
    ///
    /// ```
    /// use tempo_gitlog::filter::LogFilter;
    ///
    /// let filter = LogFilter {
    ///     branches: vec!["main".into(), "develop".into()],
    ///     ..LogFilter::default()
    /// };
    /// let scoped = filter.for_branch("develop");
    /// assert_eq!(scoped.branches, vec!["develop".to_string()]);
    /// ```
    pub fn for_branch(&self, branch: &str) -> Self {
        let mut scoped = self.clone();
        scoped.branches = vec![branch.to_string()];
        scoped
    }
}
