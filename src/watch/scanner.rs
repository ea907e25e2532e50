// src/watch/scanner.rs

//! Periodic directory crawl producing [`Snapshot`]s.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use crate::errors::PollenError;
use crate::fs::FileSystem;
use crate::watch::ignore::IgnorePredicate;
use crate::watch::snapshot::Snapshot;

/// Publishing half of the scanner -> tracker mailbox.
pub type SnapshotSender = watch::Sender<Option<Arc<Snapshot>>>;

/// Reading half of the scanner -> tracker mailbox.
pub type SnapshotReceiver = watch::Receiver<Option<Arc<Snapshot>>>;

/// Mailbox that only ever holds the latest snapshot, `None` until the first
/// scan lands. Publishing never waits for the reader.
pub fn snapshot_channel() -> (SnapshotSender, SnapshotReceiver) {
    watch::channel(None)
}

enum EntryKind {
    File,
    Dir(Vec<PathBuf>),
}

/// Decide whether `path` is a file or a directory by listing it.
///
/// A "not a directory" failure, or a listing with no children, both count as
/// a file, so genuinely empty directories are reported as files.
fn classify(fs: &dyn FileSystem, path: &Path) -> io::Result<EntryKind> {
    match fs.list_dir(path) {
        Ok(children) if children.is_empty() => Ok(EntryKind::File),
        Ok(children) => Ok(EntryKind::Dir(children)),
        Err(err) if err.kind() == io::ErrorKind::NotADirectory => Ok(EntryKind::File),
        Err(err) => Err(err),
    }
}

fn report_entry_error(path: &Path, source: io::Error) {
    let err = PollenError::ScanEntry {
        path: path.to_path_buf(),
        source,
    };
    warn!("{err}");
}

/// Recursively enumerate `root`, skipping ignored entries without descending
/// into them.
///
/// This never fails: entries that cannot be listed are reported and left out,
/// and the best-effort snapshot is returned. The root itself is not part of
/// the result.
pub fn scan(fs: &dyn FileSystem, root: &Path, ignore: &dyn IgnorePredicate) -> Snapshot {
    let mut files = Vec::new();
    let mut dirs = Vec::new();

    let top = match fs.list_dir(root) {
        Ok(children) => children,
        Err(err) => {
            report_entry_error(root, err);
            return Snapshot::root_unreadable();
        }
    };

    // Manual stack avoids recursion depth issues on deep trees.
    let mut stack: Vec<PathBuf> = top.into_iter().rev().collect();

    while let Some(path) = stack.pop() {
        if ignore.is_ignored(&path) {
            continue;
        }

        match classify(fs, &path) {
            Ok(EntryKind::File) => files.push(path),
            Ok(EntryKind::Dir(children)) => {
                stack.extend(children.into_iter().rev());
                dirs.push(path);
            }
            Err(err) => report_entry_error(&path, err),
        }
    }

    Snapshot::new(files, dirs)
}

/// Everything needed to crawl one watched tree.
#[derive(Clone)]
pub struct Scanner {
    fs: Arc<dyn FileSystem>,
    root: PathBuf,
    ignore: Arc<dyn IgnorePredicate>,
}

impl std::fmt::Debug for Scanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scanner")
            .field("fs", &self.fs)
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

impl Scanner {
    pub fn new(
        fs: Arc<dyn FileSystem>,
        root: impl Into<PathBuf>,
        ignore: Arc<dyn IgnorePredicate>,
    ) -> Self {
        Self {
            fs,
            root: root.into(),
            ignore,
        }
    }

    /// Run one synchronous scan.
    pub fn scan(&self) -> Snapshot {
        scan(self.fs.as_ref(), &self.root, self.ignore.as_ref())
    }

    /// Scan on a fixed interval (first scan immediately) and publish every
    /// result to `tx`, replacing whatever the reader has not picked up yet.
    ///
    /// Scans run on the blocking pool. The loop ends once every receiver is
    /// dropped.
    pub fn spawn(self, interval: Duration, tx: SnapshotSender) -> JoinHandle<()> {
        tokio::spawn(async move {
            info!(root = ?self.root, ?interval, "scanner started");

            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;

                let scanner = self.clone();
                let snapshot = match tokio::task::spawn_blocking(move || scanner.scan()).await {
                    Ok(snapshot) => snapshot,
                    Err(err) => {
                        error!(error = %err, "scan task failed");
                        continue;
                    }
                };

                debug!(
                    files = snapshot.files().len(),
                    dirs = snapshot.dirs().len(),
                    "crawl finished"
                );

                if tx.send(Some(Arc::new(snapshot))).is_err() {
                    debug!("snapshot receiver dropped; scanner stopping");
                    break;
                }
            }
        })
    }
}
