//! End-to-end tests for the git-backed filing provider
//!
//! Each test builds a real bare remote plus working copy on disk and drives
//! the provider through the full draft → publish/discard lifecycle.

use std::fs;

use pretty_assertions::assert_eq;
use tokio::sync::mpsc;

use filing_core::{Event, FilingProvider, GitFilingProvider, RepositoryConfig};
use filing_test_utils::RemoteFixture;

fn config(fixture: &RemoteFixture, workdir: &str) -> RepositoryConfig {
    RepositoryConfig::new(fixture.url(), fixture.workdir_path(workdir), "main")
}

async fn open(fixture: &RemoteFixture) -> GitFilingProvider {
    GitFilingProvider::open(config(fixture, "docs"), None)
        .await
        .unwrap()
}

#[tokio::test(flavor = "multi_thread")]
async fn fresh_path_clones_existing_path_pulls() {
    let fixture = RemoteFixture::new();
    let workdir = fixture.workdir_path("docs");
    assert!(!workdir.exists());

    // First construction: the path does not exist, so the remote is cloned.
    let provider = open(&fixture).await;
    assert!(workdir.join(".git").exists());
    assert_eq!(provider.read("README.md").await.unwrap(), "# Docs\n");
    provider.shutdown();
    drop(provider);

    // Second construction adopts the existing copy and pulls the remote
    // change instead of re-cloning.
    fixture.push_file("news.md", "fresh", "Add news");
    let provider = open(&fixture).await;
    assert_eq!(provider.read("news.md").await.unwrap(), "fresh");
    provider.shutdown();
}

#[tokio::test(flavor = "multi_thread")]
async fn create_read_and_draft_membership() {
    let fixture = RemoteFixture::new();
    let provider = open(&fixture).await;

    provider.create("a/b.txt", "x").await.unwrap();

    assert_eq!(provider.read("a/b.txt").await.unwrap(), "x");
    assert_eq!(provider.draft_files(), vec!["a/b.txt".to_string()]);
    provider.shutdown();
}

#[tokio::test(flavor = "multi_thread")]
async fn update_keeps_draft_membership() {
    let fixture = RemoteFixture::new();
    let provider = open(&fixture).await;

    provider.create("note.md", "v1").await.unwrap();
    provider.update("note.md", "v2").await.unwrap();

    assert_eq!(provider.read("note.md").await.unwrap(), "v2");
    assert_eq!(provider.draft_files(), vec!["note.md".to_string()]);
    provider.shutdown();
}

#[tokio::test(flavor = "multi_thread")]
async fn delete_is_a_draft_producing_mutation() {
    let fixture = RemoteFixture::new();
    let provider = open(&fixture).await;

    provider.delete("README.md").await.unwrap();

    assert!(!provider.exists("README.md").await.unwrap());
    assert_eq!(provider.draft_files(), vec!["README.md".to_string()]);
    provider.shutdown();
}

#[tokio::test(flavor = "multi_thread")]
async fn copy_marks_only_the_destination() {
    let fixture = RemoteFixture::new();
    let provider = open(&fixture).await;

    provider.copy("README.md", "docs/copy.md").await.unwrap();

    assert_eq!(provider.read("README.md").await.unwrap(), "# Docs\n");
    assert_eq!(provider.read("docs/copy.md").await.unwrap(), "# Docs\n");
    assert_eq!(provider.draft_files(), vec!["docs/copy.md".to_string()]);
    provider.shutdown();
}

#[tokio::test(flavor = "multi_thread")]
async fn rename_marks_source_and_destination() {
    let fixture = RemoteFixture::new();
    let provider = open(&fixture).await;

    provider.rename("README.md", "intro.md").await.unwrap();

    assert!(!provider.exists("README.md").await.unwrap());
    assert_eq!(provider.read("intro.md").await.unwrap(), "# Docs\n");
    assert_eq!(
        provider.draft_files(),
        vec!["README.md".to_string(), "intro.md".to_string()]
    );
    provider.shutdown();
}

#[tokio::test(flavor = "multi_thread")]
async fn list_returns_sorted_entries() {
    let fixture = RemoteFixture::new();
    let provider = open(&fixture).await;

    provider.create("guides/z.md", "z").await.unwrap();
    provider.create("guides/a.md", "a").await.unwrap();
    provider.create("guides/m.md", "m").await.unwrap();

    assert_eq!(
        provider.list("guides").await.unwrap(),
        vec!["a.md".to_string(), "m.md".to_string(), "z.md".to_string()]
    );
    provider.shutdown();
}

#[tokio::test(flavor = "multi_thread")]
async fn publish_pushes_and_clears_drafts() {
    let fixture = RemoteFixture::new();
    let provider = open(&fixture).await;

    provider.create("a/b.txt", "x").await.unwrap();
    let commit_id = provider.publish("Add a/b.txt").await.unwrap();

    assert_eq!(provider.read("a/b.txt").await.unwrap(), "x");
    assert!(provider.draft_files().is_empty());
    assert_eq!(commit_id, fixture.tip_id());
    assert_eq!(fixture.tip_file("a/b.txt").unwrap(), "x");
    assert_eq!(provider.head_commit().await.unwrap(), commit_id);
    provider.shutdown();
}

#[tokio::test(flavor = "multi_thread")]
async fn publish_stages_out_of_band_changes_too() {
    let fixture = RemoteFixture::new();
    let provider = open(&fixture).await;

    // Written directly to the working copy, bypassing the provider: the
    // draft set never learns about it, but publish stages the whole tree.
    fs::write(fixture.workdir_path("docs").join("stray.md"), "side door").unwrap();
    assert!(provider.draft_files().is_empty());

    provider.publish("Pick up stray file").await.unwrap();

    assert_eq!(fixture.tip_file("stray.md").unwrap(), "side door");
    provider.shutdown();
}

#[tokio::test(flavor = "multi_thread")]
async fn failed_publish_leaves_drafts_intact() {
    let fixture = RemoteFixture::new();
    let provider = open(&fixture).await;
    provider.create("pending.md", "x").await.unwrap();

    // Break the remote out from under the provider.
    let repo = git2::Repository::open(fixture.workdir_path("docs")).unwrap();
    repo.remote_set_url("origin", "/nonexistent/remote.git")
        .unwrap();

    let err = provider.publish("Will not land").await.unwrap_err();
    assert!(matches!(
        err,
        filing_core::Error::Git(filing_git::Error::PublishFailed { .. })
    ));
    // Still dirty: the caller can retry or discard.
    assert_eq!(provider.draft_files(), vec!["pending.md".to_string()]);
    provider.shutdown();
}

#[tokio::test(flavor = "multi_thread")]
async fn discard_restores_remote_state_and_clears_drafts() {
    let fixture = RemoteFixture::new();
    let provider = open(&fixture).await;

    provider.update("README.md", "scribbles").await.unwrap();
    provider.create("junk.md", "junk").await.unwrap();
    fixture.push_file("remote-only.md", "upstream", "Remote update");

    provider.discard_drafts().await.unwrap();

    assert!(provider.draft_files().is_empty());
    assert_eq!(provider.read("README.md").await.unwrap(), "# Docs\n");
    assert!(!provider.exists("junk.md").await.unwrap());
    assert_eq!(provider.read("remote-only.md").await.unwrap(), "upstream");
    provider.shutdown();
}

#[tokio::test(flavor = "multi_thread")]
async fn operations_emit_events_with_draft_flags() {
    let fixture = RemoteFixture::new();
    let (sink, mut events) = mpsc::unbounded_channel();
    let provider = GitFilingProvider::open(config(&fixture, "docs"), Some(sink))
        .await
        .unwrap();

    provider.create("a.md", "one").await.unwrap();
    provider.read("README.md").await.unwrap();
    let commit_id = provider.publish("Add a.md").await.unwrap();

    assert_eq!(
        events.recv().await.unwrap(),
        Event::Created {
            path: "a.md".into(),
            content: "one".into(),
            is_draft: true,
        }
    );
    assert_eq!(
        events.recv().await.unwrap(),
        Event::Read {
            path: "README.md".into(),
            content: "# Docs\n".into(),
            is_draft: false,
        }
    );
    assert_eq!(events.recv().await.unwrap(), Event::Published { commit_id });
    provider.shutdown();
}

#[tokio::test(flavor = "multi_thread")]
async fn dropped_event_receiver_does_not_break_operations() {
    let fixture = RemoteFixture::new();
    let (sink, events) = mpsc::unbounded_channel();
    let provider = GitFilingProvider::open(config(&fixture, "docs"), Some(sink))
        .await
        .unwrap();
    drop(events);

    provider.create("a.md", "one").await.unwrap();
    assert_eq!(provider.read("a.md").await.unwrap(), "one");
    provider.shutdown();
}

#[tokio::test(flavor = "multi_thread")]
async fn traversal_is_rejected_before_any_io() {
    let fixture = RemoteFixture::new();
    let provider = open(&fixture).await;

    for path in ["../escape.md", "a/../../escape.md", "/etc/hosts"] {
        assert!(provider.create(path, "x").await.is_err());
        assert!(provider.read(path).await.is_err());
        assert!(provider.delete(path).await.is_err());
    }
    assert!(provider.draft_files().is_empty());
    provider.shutdown();
}
