//! Filing backend abstraction
//!
//! [`FilingProvider`] is the contract every filing backend implements; the
//! git-backed [`GitFilingProvider`] is the one built here. Sibling backends
//! (local disk, object storage) plug in behind the same trait.

mod git;

pub use git::GitFilingProvider;

use async_trait::async_trait;

use crate::Result;

/// Contract for a filing backend over a content root.
///
/// All path arguments are relative to the backend's content root and are
/// validated against it before any I/O; an escaping path fails the
/// operation without side effects.
#[async_trait]
pub trait FilingProvider: Send + Sync {
    /// Write a new file.
    async fn create(&self, path: &str, content: &str) -> Result<()>;

    /// Read a file as UTF-8 text.
    async fn read(&self, path: &str) -> Result<String>;

    /// Read a file as raw bytes.
    async fn read_bytes(&self, path: &str) -> Result<Vec<u8>>;

    /// Overwrite an existing file.
    async fn update(&self, path: &str, content: &str) -> Result<()>;

    /// Remove a file.
    async fn delete(&self, path: &str) -> Result<()>;

    /// List entry names in a directory, sorted.
    async fn list(&self, dir_path: &str) -> Result<Vec<String>>;

    /// Whether a path exists.
    async fn exists(&self, path: &str) -> Result<bool>;

    /// Copy `source` to `dest`, leaving `source` untouched.
    async fn copy(&self, source: &str, dest: &str) -> Result<()>;

    /// Move `source` to `dest` (the source disappears, the destination
    /// appears).
    async fn rename(&self, source: &str, dest: &str) -> Result<()>;

    /// Commit all pending changes with `message` and propagate them to the
    /// backing store. Returns the resulting revision identifier.
    async fn publish(&self, message: &str) -> Result<String>;

    /// Abandon all pending changes, restoring the backing store's state.
    async fn discard_drafts(&self) -> Result<()>;

    /// Paths mutated since the last publish or discard, sorted.
    fn draft_files(&self) -> Vec<String>;

    /// Stop background work. Safe to call more than once.
    fn shutdown(&self);
}
