use std::path::PathBuf;

/// Errors that can occur across the Tempo engine.
///
/// Each variant wraps a specific error domain. Library crates use this type
/// directly; implementing `miette::Diagnostic` lets the binary crate
/// propagate it with `?` straight into its diagnostic reports.
///
/// # Examples
///
/// ```
/// use tempo_core::TempoError;
///
/// let err = TempoError::Config("missing tracker base_url".into());
/// assert!(err.to_string().contains("missing tracker base_url"));
/// ```
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum TempoError {
    /// Filesystem I/O failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or missing configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Git subprocess failure (spawn error, non-zero exit, non-UTF8 output).
    #[error("git error: {0}")]
    Git(String),

    /// Malformed log, numstat, blame, or branch output.
    #[error("parse error: {0}")]
    Parse(String),

    /// Issue tracker fetch or decode failure.
    #[error("tracker error: {0}")]
    Tracker(String),

    /// JSON serialization / deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML deserialization failure.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A required file was not found.
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),
}
