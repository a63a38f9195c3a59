//! Working-copy bootstrap: clone if absent, pull if present

use std::fs;
use std::path::Path;

use git2::{FetchOptions, Repository, build::RepoBuilder};

use crate::{
    Error, Result,
    credentials::{Credentials, remote_callbacks},
};

/// Ensure a usable working copy exists at `workdir`.
///
/// If `workdir` does not exist, clones `remote_url` into it checked out on
/// `branch` (creating parent directories first). If it exists and is a valid
/// repository, fetches and fast-forwards `branch`. A working copy that has
/// diverged from the remote fails the pull; conflict resolution is not this
/// layer's job.
pub fn ensure_working_copy(
    workdir: &Path,
    remote_url: &str,
    branch: &str,
    credentials: Option<&Credentials>,
) -> Result<()> {
    if !workdir.exists() {
        tracing::debug!(workdir = %workdir.display(), branch, "Cloning working copy");
        return clone_working_copy(workdir, remote_url, branch, credentials);
    }

    let repo = Repository::open(workdir).map_err(|e| Error::PullFailed {
        message: format!("Existing path is not a valid repository: {}", e.message()),
    })?;
    tracing::debug!(workdir = %workdir.display(), branch, "Adopting existing working copy");
    pull_fast_forward(&repo, branch, credentials)
}

fn clone_working_copy(
    workdir: &Path,
    remote_url: &str,
    branch: &str,
    credentials: Option<&Credentials>,
) -> Result<()> {
    if let Some(parent) = workdir.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::CloneFailed {
            message: format!("Could not create parent directory: {e}"),
        })?;
    }

    let mut fetch_options = FetchOptions::new();
    fetch_options.remote_callbacks(remote_callbacks(credentials));

    RepoBuilder::new()
        .branch(branch)
        .fetch_options(fetch_options)
        .clone(remote_url, workdir)
        .map_err(|e| Error::CloneFailed {
            message: e.message().to_string(),
        })?;

    Ok(())
}

/// Fetch `branch` and fast-forward the local ref to the fetched tip.
pub fn pull_fast_forward(
    repo: &Repository,
    branch: &str,
    credentials: Option<&Credentials>,
) -> Result<()> {
    let mut remote = repo.find_remote("origin").map_err(|_| Error::RemoteNotFound {
        name: "origin".into(),
    })?;

    let mut fetch_options = FetchOptions::new();
    fetch_options.remote_callbacks(remote_callbacks(credentials));
    remote
        .fetch(&[branch], Some(&mut fetch_options), None)
        .map_err(|e| Error::PullFailed {
            message: format!("Fetch failed: {}", e.message()),
        })?;

    let fetch_head = repo
        .find_reference("FETCH_HEAD")
        .map_err(|e| Error::PullFailed {
            message: format!("Could not find FETCH_HEAD: {}", e.message()),
        })?;
    let fetch_commit = fetch_head.peel_to_commit().map_err(|e| Error::PullFailed {
        message: format!("Could not resolve FETCH_HEAD: {}", e.message()),
    })?;

    let (analysis, _) =
        repo.merge_analysis(&[&repo.find_annotated_commit(fetch_commit.id())?])?;

    if analysis.is_up_to_date() {
        return Ok(());
    }

    if analysis.is_fast_forward() {
        let refname = format!("refs/heads/{branch}");
        let mut reference = repo.find_reference(&refname)?;
        reference.set_target(
            fetch_commit.id(),
            &format!("pull: fast-forward to {}", fetch_commit.id()),
        )?;
        repo.checkout_head(Some(git2::build::CheckoutBuilder::default().force()))?;
        return Ok(());
    }

    Err(Error::PullFailed {
        message: format!(
            "Cannot fast-forward '{branch}' to {}; local history has diverged",
            fetch_commit.id()
        ),
    })
}
