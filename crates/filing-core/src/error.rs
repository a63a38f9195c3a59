//! Error types for filing-core

/// Result type for filing-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in filing-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Required construction fields missing or malformed
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Publish called without a commit message
    #[error("A commit message is required to publish")]
    EmptyMessage,

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from filing-fs
    #[error(transparent)]
    Fs(#[from] filing_fs::Error),

    /// Git error from filing-git
    #[error(transparent)]
    Git(#[from] filing_git::Error),

    /// A blocking task was cancelled or panicked
    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
