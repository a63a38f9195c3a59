//! Background refs-only fetch loop

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use filing_git::Credentials;

use crate::events::{Event, EventSink};

/// Spawn the recurring fetch task for one provider instance.
///
/// The first fetch fires one full interval after spawn. A failed tick is
/// logged and reported through the sink, and the loop keeps going, so the
/// timer survives transient outages. Ticks take the provider's operation
/// lock so a fetch never runs during an active publish or hard reset.
pub(crate) fn spawn_fetcher(
    workdir: PathBuf,
    branch: String,
    credentials: Option<Credentials>,
    interval: Duration,
    op_lock: Arc<Mutex<()>>,
    events: Option<EventSink>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first interval tick resolves immediately; consume it so the
        // loop matches a fixed-delay timer.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let _guard = op_lock.lock().await;

            let workdir = workdir.clone();
            let branch_name = branch.clone();
            let credentials = credentials.clone();
            let outcome = tokio::task::spawn_blocking(move || {
                filing_git::fetch_branch(&workdir, &branch_name, credentials.as_ref())
            })
            .await;

            let error = match outcome {
                Ok(Ok(())) => {
                    tracing::trace!(branch = %branch, "Background fetch completed");
                    continue;
                }
                Ok(Err(e)) => e.to_string(),
                Err(join_error) => join_error.to_string(),
            };

            tracing::warn!(branch = %branch, error = %error, "Background fetch failed");
            if let Some(sink) = &events {
                let _ = sink.send(Event::FetchFailed { error });
            }
        }
    })
}
