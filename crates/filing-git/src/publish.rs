//! Stage-all commit and push of the tracked branch

use std::path::Path;

use git2::{IndexAddOption, PushOptions, Repository, Signature};

use crate::{
    Error, Result,
    credentials::{Credentials, remote_callbacks},
};

/// Committer identity used when the working copy has none configured.
const FALLBACK_NAME: &str = "docs-filing";
const FALLBACK_EMAIL: &str = "filing@localhost";

/// Commit everything in the working tree and push the tracked branch.
///
/// Stages the entire tree (additions, modifications, and deletions alike),
/// so out-of-band filesystem changes publish along with tracked drafts. When
/// the staged tree equals the HEAD tree the commit step is skipped and the
/// existing tip is pushed, so retrying after a failed push does not create
/// an empty commit.
///
/// Returns the id of the commit now at the branch tip.
pub fn publish_changes(
    workdir: &Path,
    branch: &str,
    message: &str,
    credentials: Option<&Credentials>,
) -> Result<String> {
    let publish_err = |e: git2::Error| Error::PublishFailed {
        message: e.message().to_string(),
    };

    let repo = Repository::open(workdir).map_err(publish_err)?;

    let mut index = repo.index().map_err(publish_err)?;
    index
        .add_all(["*"], IndexAddOption::DEFAULT, None)
        .map_err(publish_err)?;
    index.update_all(["*"], None).map_err(publish_err)?;
    index.write().map_err(publish_err)?;
    let tree_id = index.write_tree().map_err(publish_err)?;
    let tree = repo.find_tree(tree_id).map_err(publish_err)?;

    let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());

    let commit_id = match &parent {
        Some(head) if head.tree_id() == tree_id => {
            tracing::debug!(branch, "Nothing to commit; pushing existing tip");
            head.id()
        }
        _ => {
            let signature = repo
                .signature()
                .or_else(|_| Signature::now(FALLBACK_NAME, FALLBACK_EMAIL))
                .map_err(publish_err)?;
            let parents: Vec<&git2::Commit> = parent.iter().collect();
            repo.commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)
                .map_err(publish_err)?
        }
    };

    let mut remote = repo.find_remote("origin").map_err(|_| Error::RemoteNotFound {
        name: "origin".into(),
    })?;
    let refspec = format!("refs/heads/{branch}:refs/heads/{branch}");
    let mut push_options = PushOptions::new();
    push_options.remote_callbacks(remote_callbacks(credentials));
    remote
        .push(&[&refspec], Some(&mut push_options))
        .map_err(publish_err)?;

    tracing::debug!(branch, commit = %commit_id, "Published working tree");
    Ok(commit_id.to_string())
}

/// The commit id the working copy's HEAD points at.
pub fn head_commit(workdir: &Path) -> Result<String> {
    let repo = Repository::open(workdir)?;
    let head = repo.head()?.peel_to_commit()?;
    Ok(head.id().to_string())
}
