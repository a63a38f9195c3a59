//! Seeded remote and working-copy fixtures.
//!
//! The fixtures use plain local paths as remote URLs, so no network or
//! credentials are involved. All helpers panic on setup failure; they run
//! only inside tests.

use std::fs;
use std::path::{Path, PathBuf};

use git2::{Repository, Signature};
use tempfile::TempDir;

/// A bare "origin" repository seeded with one commit on `main`, plus a
/// private seed working copy used to advance the remote out of band.
pub struct RemoteFixture {
    dir: TempDir,
    remote_path: PathBuf,
    seed_path: PathBuf,
}

impl RemoteFixture {
    /// Create a bare remote containing `README.md` on branch `main`.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("RemoteFixture: failed to create temp dir");
        let remote_path = dir.path().join("remote.git");
        let seed_path = dir.path().join("seed");

        Repository::init_bare(&remote_path)
            .unwrap_or_else(|e| panic!("RemoteFixture: failed to init bare remote: {e}"));

        let seed = Repository::init(&seed_path)
            .unwrap_or_else(|e| panic!("RemoteFixture: failed to init seed repo: {e}"));
        configure_identity(&seed);
        seed.set_head("refs/heads/main")
            .expect("RemoteFixture: failed to set seed HEAD");

        fs::write(seed_path.join("README.md"), "# Docs\n")
            .expect("RemoteFixture: failed to write README.md");
        commit_all(&seed, "Initial commit");

        let fixture = Self {
            dir,
            remote_path,
            seed_path,
        };
        fixture.push_seed();

        // Point the bare HEAD at main so default checkouts behave.
        let remote = Repository::open_bare(&fixture.remote_path).unwrap();
        remote.set_head("refs/heads/main").unwrap();

        fixture
    }

    /// Remote URL accepted by clone/fetch (a local path).
    pub fn url(&self) -> String {
        self.remote_path.to_string_lossy().into_owned()
    }

    /// A fresh location under the fixture's temp dir for a working copy.
    pub fn workdir_path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Advance the remote out of band: commit `content` at `rel_path` on
    /// `main` and push, without touching any working copy under test.
    pub fn push_file(&self, rel_path: &str, content: &str, message: &str) {
        let seed = Repository::open(&self.seed_path).unwrap();
        let target = self.seed_path.join(rel_path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&target, content)
            .unwrap_or_else(|e| panic!("push_file: failed to write {rel_path}: {e}"));
        commit_all(&seed, message);
        self.push_seed();
    }

    /// The commit id at the remote's `main` tip.
    pub fn tip_id(&self) -> String {
        let remote = Repository::open_bare(&self.remote_path).unwrap();
        remote
            .find_reference("refs/heads/main")
            .unwrap()
            .peel_to_commit()
            .unwrap()
            .id()
            .to_string()
    }

    /// The content of `rel_path` in the remote's `main` tip, if present.
    pub fn tip_file(&self, rel_path: &str) -> Option<String> {
        let remote = Repository::open_bare(&self.remote_path).unwrap();
        let tree = remote
            .find_reference("refs/heads/main")
            .unwrap()
            .peel_to_commit()
            .unwrap()
            .tree()
            .unwrap();
        let entry = tree.get_path(Path::new(rel_path)).ok()?;
        let blob = remote.find_blob(entry.id()).ok()?;
        Some(String::from_utf8_lossy(blob.content()).into_owned())
    }

    fn push_seed(&self) {
        let seed = Repository::open(&self.seed_path).unwrap();
        let mut remote = match seed.find_remote("origin") {
            Ok(r) => r,
            Err(_) => seed
                .remote("origin", &self.url())
                .expect("RemoteFixture: failed to add origin"),
        };
        remote
            .push(
                &["+refs/heads/main:refs/heads/main"],
                None,
            )
            .expect("RemoteFixture: failed to push seed to remote");
    }
}

impl Default for RemoteFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Clone `url` into `path`, checked out on `branch`.
///
/// Use for tests that need a pre-existing valid working copy (the
/// "adopt, don't clone" bootstrap scenario).
pub fn clone_from(url: &str, path: &Path, branch: &str) -> Repository {
    let mut builder = git2::build::RepoBuilder::new();
    builder.branch(branch);
    let repo = builder
        .clone(url, path)
        .unwrap_or_else(|e| panic!("clone_from: failed to clone {url}: {e}"));
    configure_identity(&repo);
    repo
}

/// Commit `content` at `rel_path` directly in a working copy (no push).
///
/// Use for diverged-history scenarios: the commit exists locally only.
pub fn commit_file(repo: &Repository, rel_path: &str, content: &str, message: &str) {
    let workdir = repo.workdir().expect("commit_file: bare repo");
    let target = workdir.join(rel_path);
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&target, content).unwrap();
    commit_all(repo, message);
}

/// Set a deterministic committer identity so `repo.signature()` resolves.
pub fn configure_identity(repo: &Repository) {
    let mut config = repo.config().expect("configure_identity: no config");
    config.set_str("user.name", "Test Editor").unwrap();
    config.set_str("user.email", "editor@test.local").unwrap();
}

fn commit_all(repo: &Repository, message: &str) {
    let mut index = repo.index().unwrap();
    index
        .add_all(["*"], git2::IndexAddOption::DEFAULT, None)
        .unwrap();
    index.update_all(["*"], None).unwrap();
    index.write().unwrap();
    let tree_id = index.write_tree().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();
    let signature = repo
        .signature()
        .unwrap_or_else(|_| Signature::now("Test Editor", "editor@test.local").unwrap());
    let parent = repo
        .head()
        .ok()
        .and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<&git2::Commit> = parent.iter().collect();
    repo.commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)
        .unwrap();
}
