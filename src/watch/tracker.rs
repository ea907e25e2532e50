// src/watch/tracker.rs

//! Change decision: compares snapshots and fresh modification times.
//!
//! The tracker exclusively owns the previous/current snapshot pair and the
//! [`ModTimeCache`]. Other activities only reach it through messages: new
//! snapshots arrive over a channel and triggers leave through the
//! [`Dispatcher`].

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use chrono::{DateTime, Local};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::engine::Dispatcher;
use crate::fs::FileSystem;
use crate::watch::scanner::SnapshotReceiver;
use crate::watch::snapshot::Snapshot;

/// Last observed modification time per file.
///
/// Only fed from direct stat calls. A missing entry means "never seen", which
/// always counts as changed.
#[derive(Debug, Clone, Default)]
pub struct ModTimeCache {
    mtimes: HashMap<PathBuf, SystemTime>,
}

impl ModTimeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `at` for every path in `files`.
    pub fn seed<'a, I>(&mut self, files: I, at: SystemTime)
    where
        I: IntoIterator<Item = &'a PathBuf>,
    {
        for path in files {
            self.mtimes.insert(path.clone(), at);
        }
    }

    pub fn get(&self, path: &Path) -> Option<SystemTime> {
        self.mtimes.get(path).copied()
    }

    pub fn record(&mut self, path: &Path, modified: SystemTime) {
        self.mtimes.insert(path.to_path_buf(), modified);
    }

    /// Drop entries for files that are no longer present. Returns how many
    /// entries were removed.
    pub fn prune(&mut self, keep: &BTreeSet<PathBuf>) -> usize {
        let before = self.mtimes.len();
        self.mtimes.retain(|path, _| keep.contains(path));
        before - self.mtimes.len()
    }

    pub fn len(&self) -> usize {
        self.mtimes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mtimes.is_empty()
    }
}

/// What one recheck cycle found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeReport {
    /// A directory was added or removed.
    pub dirs_changed: bool,
    /// A file was added or removed.
    pub files_changed: bool,
    /// Files whose fresh mtime is newer than the cached one.
    pub modified: Vec<PathBuf>,
    /// Files skipped this cycle because their mtime lies in the future.
    pub future_dated: Vec<PathBuf>,
}

impl ChangeReport {
    pub fn needs_action(&self) -> bool {
        self.dirs_changed || self.files_changed || !self.modified.is_empty()
    }
}

fn format_time(t: SystemTime) -> String {
    DateTime::<Local>::from(t).format("%H:%M:%S%.3f").to_string()
}

/// Compare `previous` and `current`, stat every file in `current` and update
/// `cache` accordingly.
///
/// Every file is checked even once a change has been found, so the cache is
/// fully refreshed before the decision is returned. `now` is the wall-clock
/// time of the comparison; files modified after it are skipped (with a
/// warning) and their cache entry is left alone so they are picked up once
/// the clocks agree again.
pub fn check(
    fs: &dyn FileSystem,
    previous: &Snapshot,
    current: &Snapshot,
    cache: &mut ModTimeCache,
    now: SystemTime,
) -> ChangeReport {
    let mut report = ChangeReport {
        dirs_changed: previous.dirs_differ(current),
        files_changed: previous.files_differ(current),
        ..ChangeReport::default()
    };

    if report.dirs_changed {
        info!(
            before = previous.dirs().len(),
            after = current.dirs().len(),
            "directory set changed"
        );
    }
    for removed in previous.removed_files(current) {
        info!(path = ?removed, "removed");
    }

    for path in current.files() {
        let modified = match fs.modified(path) {
            Ok(modified) => modified,
            Err(err) => {
                // Vanished between the crawl and this recheck; the next
                // snapshot will reflect it.
                debug!(?path, error = %err, "stat failed; skipping");
                continue;
            }
        };

        if modified > now {
            warn!(
                "Skipping {:?} as it was modified in the future: file '{}', system '{}'",
                path,
                format_time(modified),
                format_time(now)
            );
            report.future_dated.push(path.clone());
            continue;
        }

        let newer = cache.get(path).is_none_or(|seen| modified > seen);
        if newer {
            info!(?path, "changed");
            cache.record(path, modified);
            report.modified.push(path.clone());
        }
    }

    let pruned = cache.prune(current.files());
    if pruned > 0 {
        debug!(pruned, "dropped cache entries for removed files");
    }

    report
}

/// Convenience wrapper returning only the decision.
pub fn needs_action(
    fs: &dyn FileSystem,
    previous: &Snapshot,
    current: &Snapshot,
    cache: &mut ModTimeCache,
    now: SystemTime,
) -> bool {
    check(fs, previous, current, cache, now).needs_action()
}

/// Owner of the change-detection state.
#[derive(Debug)]
pub struct Tracker {
    fs: Arc<dyn FileSystem>,
    previous: Arc<Snapshot>,
    current: Arc<Snapshot>,
    cache: ModTimeCache,
}

impl Tracker {
    /// Start tracking from the first snapshot.
    ///
    /// Every file in `initial` is assumed unchanged as of `started_at`, so
    /// only modifications made after startup lead to an action.
    pub fn new(fs: Arc<dyn FileSystem>, initial: Arc<Snapshot>, started_at: SystemTime) -> Self {
        let mut cache = ModTimeCache::new();
        cache.seed(initial.files(), started_at);
        Self::with_cache(fs, initial, cache)
    }

    pub fn with_cache(fs: Arc<dyn FileSystem>, initial: Arc<Snapshot>, cache: ModTimeCache) -> Self {
        Self {
            fs,
            previous: Arc::clone(&initial),
            current: initial,
            cache,
        }
    }

    /// Replace the current snapshot. No comparison happens here.
    ///
    /// A snapshot whose root could not be listed is dropped and the last good
    /// one stays current, so a transient failure neither triggers an action
    /// nor empties the cache.
    pub fn accept(&mut self, snapshot: Arc<Snapshot>) {
        if snapshot.is_root_unreadable() {
            warn!("crawl could not list the watched directory; keeping the previous snapshot");
            return;
        }
        self.current = snapshot;
    }

    /// Run one decision cycle and advance `previous` to `current`.
    pub fn recheck(&mut self, now: SystemTime) -> ChangeReport {
        let report = check(
            self.fs.as_ref(),
            &self.previous,
            &self.current,
            &mut self.cache,
            now,
        );
        self.previous = Arc::clone(&self.current);
        report
    }

    pub fn cache(&self) -> &ModTimeCache {
        &self.cache
    }

    pub fn current(&self) -> &Snapshot {
        &self.current
    }

    /// Drive the tracker from a snapshot mailbox and a recheck timer.
    ///
    /// Waits for the first snapshot with a readable root, then on every tick
    /// rechecks (on the blocking pool, moving the tracker in and back out)
    /// and signals the dispatcher when an action is needed. Only the latest
    /// published snapshot is ever looked at. Ends when the scanner side of
    /// the mailbox is dropped.
    pub fn spawn(
        fs: Arc<dyn FileSystem>,
        mut snapshots: SnapshotReceiver,
        interval: Duration,
        dispatcher: Dispatcher,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let initial = loop {
                if snapshots.changed().await.is_err() {
                    debug!("snapshot channel closed before the first crawl");
                    return;
                }
                let latest = snapshots.borrow_and_update().clone();
                match latest {
                    Some(snapshot) if !snapshot.is_root_unreadable() => break snapshot,
                    Some(_) => warn!("initial crawl could not list the watched directory; waiting"),
                    None => {}
                }
            };

            info!(
                files = initial.files().len(),
                dirs = initial.dirs().len(),
                "initial crawl complete; watching for changes"
            );
            let mut tracker = Tracker::new(fs, initial, SystemTime::now());

            let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        debug!("scanning for modifications");
                        let joined = tokio::task::spawn_blocking(move || {
                            let report = tracker.recheck(SystemTime::now());
                            (tracker, report)
                        })
                        .await;

                        let report = match joined {
                            Ok((t, report)) => {
                                tracker = t;
                                report
                            }
                            Err(err) => {
                                error!(error = %err, "recheck task failed; tracker stopping");
                                return;
                            }
                        };

                        if report.needs_action() {
                            dispatcher.signal();
                        }
                    }
                    changed = snapshots.changed() => {
                        if changed.is_err() {
                            info!("snapshot channel closed; tracker stopping");
                            return;
                        }
                        let latest = snapshots.borrow_and_update().clone();
                        if let Some(snapshot) = latest {
                            debug!(
                                files = snapshot.files().len(),
                                dirs = snapshot.dirs().len(),
                                "crawl result received"
                            );
                            tracker.accept(snapshot);
                        }
                    }
                }
            }
        })
    }
}
