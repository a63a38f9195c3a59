//! Shared test fixtures for the docs-filing workspace.
//!
//! Provides seeded remote/working-copy pairs so crate test suites do not
//! each reinvent git setup. Dev-dependency only, never published.

pub mod git;

pub use git::{RemoteFixture, clone_from, commit_file};
