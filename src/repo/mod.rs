//! Repository Orchestration
//!
//! The [`Repository`] value ties the pieces together: scanning the working
//! directory into trees, wrapping trees in commits, persisting them, and
//! restoring any prior snapshot. History is strictly linear and
//! append-only: `commit()` is the only operation that advances head, and
//! `checkout()` takes `&self` so the compiler itself enforces that
//! restoring a snapshot never moves it.

use crate::commit::{self, Commit};
use crate::config::RepoConfig;
use crate::error::{StorageError, VcsError};
use crate::store::{BlobStore, CommitRecord, CommitStore, StorageLayout};
use crate::tree::scan::Scanner;
use crate::tree::walker::{Entry, Walker};
use crate::tree::{FileNode, Node};
use crate::types::CommitId;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

/// Read-only snapshot of repository state.
#[derive(Debug, Clone)]
pub struct Status {
    pub head: Option<CommitId>,
    pub working_dir: PathBuf,
    /// Number of files tracked by the head commit, 0 when no commit exists.
    pub tracked_files: usize,
}

/// One file that could not be restored during checkout.
#[derive(Debug, Clone)]
pub struct RestoreFailure {
    pub path: PathBuf,
    pub error: String,
}

/// Aggregated outcome of a checkout. Restoration is best-effort: per-file
/// failures are collected here instead of aborting the remaining files.
#[derive(Debug)]
pub struct CheckoutReport {
    pub restored: usize,
    pub failures: Vec<RestoreFailure>,
}

impl CheckoutReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// A local, single-user repository over one working directory.
pub struct Repository {
    working_dir: PathBuf,
    layout: StorageLayout,
    blobs: BlobStore,
    commit_store: CommitStore,
    config: RepoConfig,
    /// Commit ids in chronological (oldest-first) order.
    order: Vec<CommitId>,
    commits: HashMap<CommitId, Commit>,
    head: Option<CommitId>,
}

impl Repository {
    /// Initialize a new repository in `working_dir`.
    ///
    /// Creates the reserved storage subtree and a default config; no
    /// commit is created, so head starts out absent.
    pub fn init<P: AsRef<Path>>(working_dir: P) -> Result<Repository, VcsError> {
        let working_dir = canonicalize_working_dir(working_dir.as_ref())?;
        let layout = StorageLayout::for_working_dir(&working_dir);

        if layout.exists() {
            return Err(VcsError::AlreadyInitialized(layout.root().to_path_buf()));
        }

        layout.create()?;
        let config = RepoConfig::default();
        config.save(&layout.config_path())?;

        info!(working_dir = %working_dir.display(), "repository initialized");

        let blobs = BlobStore::open(layout.blobs_dir());
        let commit_store = CommitStore::open(layout.commits_dir());

        Ok(Repository {
            working_dir,
            layout,
            blobs,
            commit_store,
            config,
            order: Vec::new(),
            commits: HashMap::new(),
            head: None,
        })
    }

    /// Open an existing repository, loading its full commit chain.
    pub fn open<P: AsRef<Path>>(working_dir: P) -> Result<Repository, VcsError> {
        let working_dir = canonicalize_working_dir(working_dir.as_ref())?;
        let layout = StorageLayout::for_working_dir(&working_dir);

        if !layout.exists() {
            return Err(VcsError::NotARepository(working_dir));
        }

        let config = RepoConfig::load(&layout.config_path())?;
        let blobs = BlobStore::open(layout.blobs_dir());
        let commit_store = CommitStore::open(layout.commits_dir());

        let head = layout.read_head()?;

        // Walk parent links from head; reversing yields chronological order.
        let mut chain = Vec::new();
        let mut cursor = head;
        while let Some(id) = cursor {
            let record = commit_store
                .get(&id)?
                .ok_or(StorageError::CommitMissing(id))?;
            let commit = record.into_commit()?;
            cursor = commit.parent();
            chain.push(commit);
        }
        chain.reverse();

        let mut order = Vec::with_capacity(chain.len());
        let mut commits = HashMap::with_capacity(chain.len());
        for commit in chain {
            order.push(commit.id());
            commits.insert(commit.id(), commit);
        }

        info!(
            working_dir = %working_dir.display(),
            commits = order.len(),
            "repository opened"
        );

        Ok(Repository {
            working_dir,
            layout,
            blobs,
            commit_store,
            config,
            order,
            commits,
            head,
        })
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    pub fn config(&self) -> &RepoConfig {
        &self.config
    }

    pub fn head(&self) -> Option<CommitId> {
        self.head
    }

    pub fn get_commit(&self, id: &CommitId) -> Option<&Commit> {
        self.commits.get(id)
    }

    /// Snapshot the working directory as a new commit and advance head.
    ///
    /// All-or-nothing: a failure anywhere in scan, build, or persistence
    /// leaves both the in-memory maps and the on-disk head untouched.
    #[instrument(skip_all, fields(working_dir = %self.working_dir.display()))]
    pub fn commit(&mut self, message: &str, author: &str) -> Result<CommitId, VcsError> {
        // Reject bad input before any scanning or staging happens.
        let (message, author) = commit::validate_signature(message, author)?;

        let outcome = Scanner::new(&self.working_dir, &self.blobs, &self.config.ignore).scan()?;
        let commit = Commit::new(&message, &author, self.head, outcome.tree)?;
        let id = commit.id();

        self.commit_store.put(&CommitRecord::from_commit(&commit))?;
        self.layout.write_head(&id)?;

        // Observable state changes only after persistence succeeded.
        self.order.push(id);
        self.commits.insert(id, commit);
        self.head = Some(id);

        info!(
            id = %hex::encode(id),
            files = outcome.files,
            bytes = outcome.bytes,
            "commit created"
        );

        Ok(id)
    }

    /// All commits in chronological (oldest-first) order.
    pub fn get_history(&self) -> Vec<(CommitId, &Commit)> {
        self.order
            .iter()
            .map(|id| {
                let commit = self
                    .commits
                    .get(id)
                    .expect("commit order and commit map agree");
                (*id, commit)
            })
            .collect()
    }

    /// Every commit containing `path`, chronologically ordered. Commits
    /// where the path is absent are skipped; absence is not an error.
    pub fn get_file_history(&self, path: &str) -> Vec<(CommitId, &Commit, &FileNode)> {
        self.get_history()
            .into_iter()
            .filter_map(|(id, commit)| match commit.tree().find(path) {
                Some(Node::File(file)) => Some((id, commit, file)),
                _ => None,
            })
            .collect()
    }

    /// Restore the working directory to the snapshot of `commit_id`.
    ///
    /// Head is not moved: checkout is pure time-travel. Tracked files not
    /// present in the target snapshot are removed first (the storage
    /// subtree is never a removal candidate), then every target file is
    /// written back from the blob store. Per-file failures are collected
    /// into the report rather than aborting the rest.
    #[instrument(skip(self), fields(commit = %hex::encode(commit_id)))]
    pub fn checkout(&self, commit_id: &CommitId) -> Result<CheckoutReport, VcsError> {
        let commit = self
            .commits
            .get(commit_id)
            .ok_or(VcsError::UnknownCommit(*commit_id))?;

        let target_files = commit.tree().all_files();
        let target_paths: HashSet<PathBuf> = target_files
            .iter()
            .map(|(path, _)| tree_path_to_fs(&self.working_dir, path))
            .collect();

        let current = Walker::new(self.working_dir.clone())
            .with_ignored(&self.config.ignore)
            .walk()?;

        let mut report = CheckoutReport {
            restored: 0,
            failures: Vec::new(),
        };

        // Stale paths: tracked now, absent from the target snapshot.
        let mut current_dirs = Vec::new();
        for entry in &current {
            match entry {
                Entry::File { path, .. } => {
                    if !target_paths.contains(path) {
                        debug!(path = %path.display(), "removing stale file");
                        if let Err(e) = fs::remove_file(path) {
                            warn!(path = %path.display(), error = %e, "failed to remove stale file");
                            report.failures.push(RestoreFailure {
                                path: path.clone(),
                                error: e.to_string(),
                            });
                        }
                    }
                }
                Entry::Directory { path } => current_dirs.push(path.clone()),
            }
        }

        // Prune emptied directories, deepest first. Failure just means the
        // directory still has content.
        for dir in current_dirs.iter().rev() {
            let _ = fs::remove_dir(dir);
        }

        for (tree_path, node) in &target_files {
            let fs_path = tree_path_to_fs(&self.working_dir, tree_path);
            match self.restore_file(&fs_path, node) {
                Ok(()) => report.restored += 1,
                Err(e) => {
                    warn!(path = %fs_path.display(), error = %e, "failed to restore file");
                    report.failures.push(RestoreFailure {
                        path: fs_path,
                        error: e.to_string(),
                    });
                }
            }
        }

        info!(
            restored = report.restored,
            failed = report.failures.len(),
            "checkout finished"
        );

        Ok(report)
    }

    /// Read-only summary of the repository.
    pub fn status(&self) -> Status {
        let tracked_files = self
            .head
            .and_then(|id| self.commits.get(&id))
            .map(Commit::file_count)
            .unwrap_or(0);

        Status {
            head: self.head,
            working_dir: self.working_dir.clone(),
            tracked_files,
        }
    }

    fn restore_file(&self, fs_path: &Path, node: &FileNode) -> Result<(), StorageError> {
        let content = self.blobs.get(&node.content_hash)?;

        if let Some(parent) = fs_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(fs_path, content)?;

        Ok(())
    }
}

fn canonicalize_working_dir(path: &Path) -> Result<PathBuf, VcsError> {
    dunce::canonicalize(path).map_err(|e| {
        VcsError::Storage(StorageError::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            format!("cannot resolve working directory {:?}: {}", path, e),
        )))
    })
}

fn tree_path_to_fs(root: &Path, tree_path: &str) -> PathBuf {
    let mut path = root.to_path_buf();
    for segment in tree_path.split('/') {
        path.push(segment);
    }
    path
}
