use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::TempoError;

/// Top-level configuration loaded from `.tempo.toml`.
///
/// Every field has a default, so an empty file (or no file at all) yields a
/// working configuration for local git analysis. Tracker metrics need the
/// `[tracker]` section filled in.
///
/// # Examples
///
/// ```
/// use tempo_core::TempoConfig;
///
/// let config = TempoConfig::default();
/// assert_eq!(config.git.main_branch, "main");
/// assert_eq!(config.tracker.page_size, 50);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TempoConfig {
    /// Git repository settings.
    #[serde(default)]
    pub git: GitConfig,
    /// Issue tracker connection settings.
    #[serde(default)]
    pub tracker: TrackerConfig,
    /// Status-name class lists for the tracker analyzer.
    #[serde(default)]
    pub status: StatusConfig,
}

impl TempoConfig {
    /// Load configuration from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`TempoError::FileNotFound`] if the file does not exist,
    /// [`TempoError::Io`] if it cannot be read, or [`TempoError::Toml`] if
    /// the content is not valid TOML.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use tempo_core::TempoConfig;
    /// use std::path::Path;
    ///
    /// let config = TempoConfig::from_file(Path::new(".tempo.toml")).unwrap();
    /// ```
    pub fn from_file(path: &Path) -> Result<Self, TempoError> {
        if !path.exists() {
            return Err(TempoError::FileNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`TempoError::Toml`] if parsing fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use tempo_core::TempoConfig;
    ///
    /// let toml = r#"
    /// [git]
    /// main_branch = "trunk"
    /// "#;
    /// let config = TempoConfig::from_toml(toml).unwrap();
    /// assert_eq!(config.git.main_branch, "trunk");
    /// ```
    pub fn from_toml(content: &str) -> Result<Self, TempoError> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }
}

/// Git repository configuration.
///
/// # Examples
///
/// ```
/// use tempo_core::GitConfig;
///
/// let config = GitConfig::default();
/// assert_eq!(config.repo_path, ".");
/// assert_eq!(config.blame_file_limit, 100);
/// assert!(!config.include_merges);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitConfig {
    /// Path to the repository to analyze.
    #[serde(default = "default_repo_path")]
    pub repo_path: String,
    /// Name of the integration branch unmerged branches are measured against.
    #[serde(default = "default_main_branch")]
    pub main_branch: String,
    /// Count merge commits in per-author and summary totals (default: false).
    #[serde(default)]
    pub include_merges: bool,
    /// Maximum tracked files to blame when no file is specified (default: 100).
    #[serde(default = "default_blame_file_limit")]
    pub blame_file_limit: usize,
}

fn default_repo_path() -> String {
    ".".into()
}

fn default_main_branch() -> String {
    "main".into()
}

fn default_blame_file_limit() -> usize {
    100
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            repo_path: default_repo_path(),
            main_branch: default_main_branch(),
            include_merges: false,
            blame_file_limit: default_blame_file_limit(),
        }
    }
}

/// Issue tracker connection configuration.
///
/// All connection fields are optional; the tracker subcommands refuse to run
/// without `base_url`, and the snapshot assembler marks tracker metrics
/// unavailable instead.
///
/// # Examples
///
/// ```
/// use tempo_core::TrackerConfig;
///
/// let config = TrackerConfig::default();
/// assert_eq!(config.page_size, 50);
/// assert_eq!(config.page_delay_ms, 200);
/// assert_eq!(config.max_pages, 20);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Tracker base URL, e.g. `"https://example.atlassian.net"`.
    pub base_url: Option<String>,
    /// Account email for basic auth.
    pub email: Option<String>,
    /// API token for basic auth.
    pub api_token: Option<String>,
    /// Project key to scope issue queries to.
    pub project: Option<String>,
    /// Issues requested per page (default: 50).
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Delay between page fetches in milliseconds (default: 200).
    #[serde(default = "default_page_delay_ms")]
    pub page_delay_ms: u64,
    /// Upper bound on pages fetched per query (default: 20).
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,
}

fn default_page_size() -> usize {
    50
}

fn default_page_delay_ms() -> u64 {
    200
}

fn default_max_pages() -> usize {
    20
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            email: None,
            api_token: None,
            project: None,
            page_size: default_page_size(),
            page_delay_ms: default_page_delay_ms(),
            max_pages: default_max_pages(),
        }
    }
}

/// Status-name lists grouping tracker statuses into workflow classes.
///
/// Names are matched case-insensitively. An empty list means "use the
/// built-in defaults for this class"; a non-empty list replaces the
/// built-ins for that class entirely.
///
/// # Examples
///
/// ```
/// use tempo_core::StatusConfig;
///
/// let config = StatusConfig::default();
/// assert!(config.blocked.is_empty());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusConfig {
    /// Statuses meaning "not started".
    #[serde(default)]
    pub todo: Vec<String>,
    /// Statuses meaning "actively worked on".
    #[serde(default)]
    pub in_progress: Vec<String>,
    /// Statuses meaning "waiting on something".
    #[serde(default)]
    pub blocked: Vec<String>,
    /// Statuses meaning "finished".
    #[serde(default)]
    pub done: Vec<String>,
}
