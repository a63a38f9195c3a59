//! Git plumbing for the docs-filing workspace
//!
//! Wraps git2 operations on a single tracked-branch working copy: bootstrap
//! (clone or pull), stage-all publish, hard-reset discard, and refs-only
//! fetch. Higher layers own draft bookkeeping and scheduling.

pub mod bootstrap;
pub mod credentials;
pub mod error;
pub mod fetch;
pub mod publish;
pub mod reset;

pub use bootstrap::ensure_working_copy;
pub use credentials::Credentials;
pub use error::{Error, Result};
pub use fetch::fetch_branch;
pub use publish::{head_commit, publish_changes};
pub use reset::reset_to_remote;
