use badgekit_core::error::CoreError;

/// Errors raised by the host-side collaborators.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// A domain-level error from `badgekit_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A legacy build file could not be parsed.
    #[error("XML error: {0}")]
    Xml(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid build id: {0:?}")]
    InvalidBuildId(String),
}

/// Convenience alias for host results.
pub type HostResult<T> = Result<T, HostError>;
