//! Workspace-root-scoped path resolution

use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Resolves caller-supplied relative paths against a fixed workspace root.
///
/// Every externally supplied path must pass through [`WorkspaceScope::resolve`]
/// before any filesystem or git call. Resolution is purely lexical: `.`
/// segments are dropped and `..` segments pop a previously retained segment,
/// so paths for files that do not exist yet can still be validated.
///
/// Absolute inputs and any traversal that would climb above the root are
/// rejected with [`Error::PathEscape`].
#[derive(Debug, Clone)]
pub struct WorkspaceScope {
    root: PathBuf,
}

impl WorkspaceScope {
    /// Create a scope rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The workspace root this scope confines paths to.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve `relative` against the root, rejecting escapes.
    pub fn resolve(&self, relative: &str) -> Result<PathBuf> {
        let segments = normalize_segments(relative).ok_or_else(|| Error::PathEscape {
            path: relative.to_string(),
        })?;

        let mut resolved = self.root.clone();
        for segment in segments {
            resolved.push(segment);
        }
        Ok(resolved)
    }
}

/// Normalize a relative path into its retained segments.
///
/// Returns `None` when the path is absolute or a `..` segment would climb
/// above the first retained segment.
fn normalize_segments(path: &str) -> Option<Vec<&str>> {
    if path.starts_with('/') || path.starts_with('\\') || has_drive_prefix(path) {
        return None;
    }

    let mut segments = Vec::new();
    for segment in path.split(['/', '\\']) {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop()?;
            }
            other => segments.push(other),
        }
    }
    Some(segments)
}

/// Detect Windows-style `C:` drive prefixes, which would override the root.
fn has_drive_prefix(path: &str) -> bool {
    let mut chars = path.chars();
    matches!(
        (chars.next(), chars.next()),
        (Some(c), Some(':')) if c.is_ascii_alphabetic()
    )
}
