//! Filesystem layer for the docs-filing workspace
//!
//! Provides workspace-root-scoped path resolution and safe write primitives.

pub mod error;
pub mod io;
pub mod scope;

pub use error::{Error, Result};
pub use scope::WorkspaceScope;
