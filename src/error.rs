use thiserror::Error;

/// Unified error type for release-train operations
#[derive(Error, Debug)]
pub enum ReleaseTrainError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Version parsing error: {0}")]
    Version(String),

    #[error("Changelog error: {0}")]
    Changelog(String),

    #[error("Label error: {0}")]
    Label(String),

    /// The run was started in a context it cannot act on.
    #[error("{0}")]
    Precondition(String),

    /// Remote state breaks the one-release-line-at-a-time rule.
    #[error("{0}")]
    Invariant(String),

    #[error("Forge request failed: {0}")]
    Forge(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Command failed: {0}")]
    Exec(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Convenience type alias for Results in release-train
pub type Result<T> = std::result::Result<T, ReleaseTrainError>;

impl ReleaseTrainError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ReleaseTrainError::Config(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        ReleaseTrainError::Version(msg.into())
    }

    /// Create a changelog error with context
    pub fn changelog(msg: impl Into<String>) -> Self {
        ReleaseTrainError::Changelog(msg.into())
    }

    pub fn label(msg: impl Into<String>) -> Self {
        ReleaseTrainError::Label(msg.into())
    }

    pub fn precondition(msg: impl Into<String>) -> Self {
        ReleaseTrainError::Precondition(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        ReleaseTrainError::Invariant(msg.into())
    }

    /// Create a forge error with context
    pub fn forge(msg: impl Into<String>) -> Self {
        ReleaseTrainError::Forge(msg.into())
    }

    pub fn exec(msg: impl Into<String>) -> Self {
        ReleaseTrainError::Exec(msg.into())
    }
}
