//! Hard reset of the working copy to the remote branch tip

use std::path::Path;

use git2::{Repository, ResetType, build::CheckoutBuilder};

use crate::{
    Error, Result,
    credentials::Credentials,
    fetch::fetch_branch,
};

/// Abandon all local changes: fetch the remote branch and hard-reset the
/// working copy to `refs/remotes/origin/<branch>`.
///
/// Destructive and irreversible for anything not yet pushed, local commits
/// and uncommitted edits alike. Confirmation is a caller concern.
pub fn reset_to_remote(
    workdir: &Path,
    branch: &str,
    credentials: Option<&Credentials>,
) -> Result<()> {
    fetch_branch(workdir, branch, credentials).map_err(|e| Error::DiscardFailed {
        message: e.to_string(),
    })?;

    let discard_err = |e: git2::Error| Error::DiscardFailed {
        message: e.message().to_string(),
    };

    let repo = Repository::open(workdir).map_err(discard_err)?;
    let remote_ref = format!("refs/remotes/origin/{branch}");
    let target = repo
        .find_reference(&remote_ref)
        .map_err(discard_err)?
        .peel_to_commit()
        .map_err(discard_err)?;

    let mut checkout = CheckoutBuilder::default();
    checkout.force().remove_untracked(true);
    repo.reset(target.as_object(), ResetType::Hard, Some(&mut checkout))
        .map_err(discard_err)?;

    tracing::debug!(branch, target = %target.id(), "Reset working copy to remote tip");
    Ok(())
}
