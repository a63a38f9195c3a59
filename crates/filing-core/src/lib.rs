//! Provider layer for the docs-filing workspace
//!
//! This crate exposes the [`FilingProvider`] contract and its git-backed
//! implementation: a cloned working copy treated as a mutable draft
//! workspace over a remote repository, with explicit publish (commit+push)
//! and discard (hard reset) semantics, background fetch, and
//! filesystem-escape protection.
//!
//! # Architecture
//!
//! `filing-core` sits above the plumbing crates and below the HTTP layer:
//!
//! ```text
//!        route layer (external)
//!               |
//!          filing-core
//!               |
//!        +------+------+
//!        |             |
//!    filing-fs    filing-git
//! ```

pub mod config;
pub mod drafts;
pub mod error;
pub mod events;
mod fetcher;
pub mod provider;

pub use config::RepositoryConfig;
pub use drafts::DraftTracker;
pub use error::{Error, Result};
pub use events::{Event, EventSink};
pub use provider::{FilingProvider, GitFilingProvider};
