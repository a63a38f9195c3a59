//! Git-backed filing provider

use std::path::PathBuf;
use std::sync::{Arc, Mutex as StdMutex};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use filing_fs::WorkspaceScope;

use crate::config::RepositoryConfig;
use crate::drafts::DraftTracker;
use crate::error::{Error, Result};
use crate::events::{Event, EventSink};
use crate::fetcher;
use crate::provider::FilingProvider;

/// Filing backend over a cloned git working copy.
///
/// The working copy is the mutable draft workspace; the remote tracked
/// branch is the published state. File operations edit the working copy and
/// record the touched paths as drafts, `publish` commits and pushes the
/// entire tree, `discard_drafts` hard-resets to the remote tip. A
/// background task keeps remote refs current.
///
/// One instance owns one working copy; nothing is shared between instances.
#[derive(Debug)]
pub struct GitFilingProvider {
    config: RepositoryConfig,
    scope: WorkspaceScope,
    drafts: DraftTracker,
    events: Option<EventSink>,
    /// Serializes publish, discard, and background fetch against each other.
    op_lock: Arc<Mutex<()>>,
    fetch_task: StdMutex<Option<JoinHandle<()>>>,
}

impl GitFilingProvider {
    /// Construct the provider and bring up its working copy.
    ///
    /// Validates the configuration, then clones the remote (or adopts and
    /// pulls an existing working copy) and starts the background fetch
    /// task. A bootstrap failure is logged but leaves the provider
    /// constructed; file operations against a missing working copy fail at
    /// the filesystem layer.
    pub async fn open(config: RepositoryConfig, events: Option<EventSink>) -> Result<Self> {
        config.validate()?;

        let workdir = config.local_path.clone();
        let remote = config.remote.clone();
        let branch = config.branch.clone();
        let credentials = config.credentials();
        let bootstrap = tokio::task::spawn_blocking(move || {
            filing_git::ensure_working_copy(&workdir, &remote, &branch, credentials.as_ref())
        })
        .await?;
        if let Err(e) = bootstrap {
            tracing::warn!(error = %e, workdir = %config.local_path.display(), "Working copy bootstrap failed");
        }

        let op_lock = Arc::new(Mutex::new(()));
        let fetch_task = fetcher::spawn_fetcher(
            config.local_path.clone(),
            config.branch.clone(),
            config.credentials(),
            config.fetch_interval(),
            Arc::clone(&op_lock),
            events.clone(),
        );

        Ok(Self {
            scope: WorkspaceScope::new(&config.local_path),
            config,
            drafts: DraftTracker::new(),
            events,
            op_lock,
            fetch_task: StdMutex::new(Some(fetch_task)),
        })
    }

    /// The commit id currently checked out in the working copy.
    pub async fn head_commit(&self) -> Result<String> {
        let workdir = self.config.local_path.clone();
        let id =
            tokio::task::spawn_blocking(move || filing_git::head_commit(&workdir)).await??;
        Ok(id)
    }

    fn emit(&self, event: Event) {
        if let Some(sink) = &self.events {
            let _ = sink.send(event);
        }
    }

    fn stop_fetcher(&self) {
        if let Some(handle) = self.fetch_task.lock().unwrap().take() {
            handle.abort();
            tracing::debug!(branch = %self.config.branch, "Stopped background fetch");
        }
    }

    async fn write_draft(&self, abs: PathBuf, content: &str) -> Result<()> {
        let bytes = content.as_bytes().to_vec();
        tokio::task::spawn_blocking(move || filing_fs::io::write_atomic(&abs, &bytes))
            .await??;
        Ok(())
    }
}

#[async_trait]
impl FilingProvider for GitFilingProvider {
    async fn create(&self, path: &str, content: &str) -> Result<()> {
        let abs = self.scope.resolve(path)?;
        self.write_draft(abs, content).await?;
        self.drafts.mark(path);
        self.emit(Event::Created {
            path: path.to_string(),
            content: content.to_string(),
            is_draft: self.drafts.contains(path),
        });
        Ok(())
    }

    async fn read(&self, path: &str) -> Result<String> {
        let abs = self.scope.resolve(path)?;
        let content = tokio::fs::read_to_string(&abs)
            .await
            .map_err(|e| filing_fs::Error::io(&abs, e))?;
        self.emit(Event::Read {
            path: path.to_string(),
            content: content.clone(),
            is_draft: self.drafts.contains(path),
        });
        Ok(content)
    }

    async fn read_bytes(&self, path: &str) -> Result<Vec<u8>> {
        let abs = self.scope.resolve(path)?;
        let bytes = tokio::fs::read(&abs)
            .await
            .map_err(|e| filing_fs::Error::io(&abs, e))?;
        Ok(bytes)
    }

    async fn update(&self, path: &str, content: &str) -> Result<()> {
        let abs = self.scope.resolve(path)?;
        self.write_draft(abs, content).await?;
        self.drafts.mark(path);
        self.emit(Event::Updated {
            path: path.to_string(),
            content: content.to_string(),
            is_draft: self.drafts.contains(path),
        });
        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<()> {
        let abs = self.scope.resolve(path)?;
        tokio::fs::remove_file(&abs)
            .await
            .map_err(|e| filing_fs::Error::io(&abs, e))?;
        self.drafts.mark(path);
        self.emit(Event::Deleted {
            path: path.to_string(),
            is_draft: self.drafts.contains(path),
        });
        Ok(())
    }

    async fn list(&self, dir_path: &str) -> Result<Vec<String>> {
        let abs = self.scope.resolve(dir_path)?;
        let mut entries = tokio::fs::read_dir(&abs)
            .await
            .map_err(|e| filing_fs::Error::io(&abs, e))?;

        let mut names = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| filing_fs::Error::io(&abs, e))?
        {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        names.sort();

        self.emit(Event::Listed {
            path: dir_path.to_string(),
            entries: names.len(),
        });
        Ok(names)
    }

    async fn exists(&self, path: &str) -> Result<bool> {
        let abs = self.scope.resolve(path)?;
        Ok(tokio::fs::try_exists(&abs).await.unwrap_or(false))
    }

    async fn copy(&self, source: &str, dest: &str) -> Result<()> {
        let abs_source = self.scope.resolve(source)?;
        let abs_dest = self.scope.resolve(dest)?;
        if let Some(parent) = abs_dest.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| filing_fs::Error::io(parent, e))?;
        }
        tokio::fs::copy(&abs_source, &abs_dest)
            .await
            .map_err(|e| filing_fs::Error::io(&abs_source, e))?;

        // The source is unchanged; only the destination becomes a draft.
        self.drafts.mark(dest);
        self.emit(Event::Copied {
            source: source.to_string(),
            dest: dest.to_string(),
            is_draft: self.drafts.contains(dest),
        });
        Ok(())
    }

    async fn rename(&self, source: &str, dest: &str) -> Result<()> {
        let abs_source = self.scope.resolve(source)?;
        let abs_dest = self.scope.resolve(dest)?;
        if let Some(parent) = abs_dest.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| filing_fs::Error::io(parent, e))?;
        }
        tokio::fs::rename(&abs_source, &abs_dest)
            .await
            .map_err(|e| filing_fs::Error::io(&abs_source, e))?;

        // The source disappeared and the destination appeared; both are
        // drafts.
        self.drafts.mark(source);
        self.drafts.mark(dest);
        self.emit(Event::Renamed {
            source: source.to_string(),
            dest: dest.to_string(),
        });
        Ok(())
    }

    async fn publish(&self, message: &str) -> Result<String> {
        if message.trim().is_empty() {
            return Err(Error::EmptyMessage);
        }

        let _guard = self.op_lock.lock().await;
        let workdir = self.config.local_path.clone();
        let branch = self.config.branch.clone();
        let credentials = self.config.credentials();
        let message = message.to_string();
        let commit_id = tokio::task::spawn_blocking(move || {
            filing_git::publish_changes(&workdir, &branch, &message, credentials.as_ref())
        })
        .await??;

        // Cleared only on full success; a failed publish returns above and
        // leaves the set intact for a retry or discard.
        self.drafts.clear();
        self.emit(Event::Published {
            commit_id: commit_id.clone(),
        });
        Ok(commit_id)
    }

    async fn discard_drafts(&self) -> Result<()> {
        let _guard = self.op_lock.lock().await;
        let workdir = self.config.local_path.clone();
        let branch = self.config.branch.clone();
        let credentials = self.config.credentials();
        tokio::task::spawn_blocking(move || {
            filing_git::reset_to_remote(&workdir, &branch, credentials.as_ref())
        })
        .await??;

        self.drafts.clear();
        self.emit(Event::Discarded);
        Ok(())
    }

    fn draft_files(&self) -> Vec<String> {
        self.drafts.list()
    }

    fn shutdown(&self) {
        self.stop_fetcher();
    }
}

impl Drop for GitFilingProvider {
    fn drop(&mut self) {
        self.stop_fetcher();
    }
}
