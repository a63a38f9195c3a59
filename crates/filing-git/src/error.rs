//! Error types for filing-git

/// Result type for filing-git operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in filing-git operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("Clone failed: {message}")]
    CloneFailed { message: String },

    #[error("Pull failed: {message}")]
    PullFailed { message: String },

    #[error("Publish failed: {message}")]
    PublishFailed { message: String },

    #[error("Discard failed: {message}")]
    DiscardFailed { message: String },

    #[error("Fetch failed: {message}")]
    FetchFailed { message: String },

    #[error("Remote '{name}' not found")]
    RemoteNotFound { name: String },

    #[error("Branch '{name}' not found")]
    BranchNotFound { name: String },
}
