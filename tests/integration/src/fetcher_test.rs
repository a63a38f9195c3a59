//! Behavior of the background fetch task
//!
//! Timing windows are generous multiples of the configured interval to keep
//! these stable on slow machines.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::sleep;

use filing_core::{Event, FilingProvider, GitFilingProvider, RepositoryConfig};
use filing_test_utils::RemoteFixture;

fn fast_config(fixture: &RemoteFixture) -> RepositoryConfig {
    RepositoryConfig::new(fixture.url(), fixture.workdir_path("docs"), "main")
        .with_fetch_interval(Duration::from_millis(100))
}

fn tracking_tip(fixture: &RemoteFixture) -> String {
    let repo = git2::Repository::open(fixture.workdir_path("docs")).unwrap();
    repo.find_reference("refs/remotes/origin/main")
        .unwrap()
        .peel_to_commit()
        .unwrap()
        .id()
        .to_string()
}

#[tokio::test(flavor = "multi_thread")]
async fn failed_ticks_are_reported_and_do_not_stop_the_timer() {
    let fixture = RemoteFixture::new();
    let (sink, mut events) = mpsc::unbounded_channel();
    let provider = GitFilingProvider::open(fast_config(&fixture), Some(sink))
        .await
        .unwrap();

    // Break the remote: every tick now fails.
    let repo = git2::Repository::open(fixture.workdir_path("docs")).unwrap();
    let real_url = fixture.url();
    repo.remote_set_url("origin", "/nonexistent/remote.git")
        .unwrap();

    sleep(Duration::from_millis(350)).await;

    let mut failures = 0;
    while let Ok(event) = events.try_recv() {
        assert!(matches!(event, Event::FetchFailed { .. }));
        failures += 1;
    }
    assert!(failures >= 2, "expected at least 2 failed ticks, saw {failures}");

    // Self-healing: restore the remote and the same timer starts
    // succeeding again.
    repo.remote_set_url("origin", &real_url).unwrap();
    fixture.push_file("late.md", "arrived", "Remote update");
    sleep(Duration::from_millis(400)).await;

    assert_eq!(tracking_tip(&fixture), fixture.tip_id());
    provider.shutdown();
}

#[tokio::test(flavor = "multi_thread")]
async fn ticks_update_refs_without_touching_the_worktree() {
    let fixture = RemoteFixture::new();
    let provider = GitFilingProvider::open(fast_config(&fixture), None)
        .await
        .unwrap();

    provider.create("draft.md", "wip").await.unwrap();
    fixture.push_file("upstream.md", "new", "Remote update");
    sleep(Duration::from_millis(400)).await;

    // Remote-tracking ref advanced...
    assert_eq!(tracking_tip(&fixture), fixture.tip_id());
    // ...but neither the worktree nor the draft set changed.
    assert!(!provider.exists("upstream.md").await.unwrap());
    assert_eq!(provider.draft_files(), vec!["draft.md".to_string()]);
    provider.shutdown();
}

#[tokio::test(flavor = "multi_thread")]
async fn shutdown_stops_future_ticks() {
    let fixture = RemoteFixture::new();
    let provider = GitFilingProvider::open(fast_config(&fixture), None)
        .await
        .unwrap();

    provider.shutdown();
    provider.shutdown();

    let before = tracking_tip(&fixture);
    fixture.push_file("after.md", "late", "Remote update");
    sleep(Duration::from_millis(400)).await;

    assert_eq!(tracking_tip(&fixture), before);
}
