//! Refs-only fetch of the tracked branch

use std::path::Path;

use git2::{FetchOptions, Repository};

use crate::{
    Error, Result,
    credentials::{Credentials, remote_callbacks},
};

/// Fetch `branch` from origin, updating `refs/remotes/origin/<branch>` only.
///
/// The working tree is never touched; this keeps local refs current for a
/// later publish or discard.
pub fn fetch_branch(
    workdir: &Path,
    branch: &str,
    credentials: Option<&Credentials>,
) -> Result<()> {
    let repo = Repository::open(workdir).map_err(|e| Error::FetchFailed {
        message: e.message().to_string(),
    })?;

    let mut remote = repo.find_remote("origin").map_err(|_| Error::RemoteNotFound {
        name: "origin".into(),
    })?;

    let refspec = format!("refs/heads/{branch}:refs/remotes/origin/{branch}");
    let mut fetch_options = FetchOptions::new();
    fetch_options.remote_callbacks(remote_callbacks(credentials));

    remote
        .fetch(&[&refspec], Some(&mut fetch_options), None)
        .map_err(|e| Error::FetchFailed {
            message: e.message().to_string(),
        })?;

    Ok(())
}
