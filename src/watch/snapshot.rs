// src/watch/snapshot.rs

use std::collections::BTreeSet;
use std::path::PathBuf;

/// Paths found by one scan pass, already filtered by the ignore policy.
///
/// Snapshots are never mutated once built; the tracker swaps whole
/// snapshots (shared as `Arc<Snapshot>`) instead.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    files: BTreeSet<PathBuf>,
    dirs: BTreeSet<PathBuf>,
    root_unreadable: bool,
}

impl Snapshot {
    pub fn new<F, D>(files: F, dirs: D) -> Self
    where
        F: IntoIterator<Item = PathBuf>,
        D: IntoIterator<Item = PathBuf>,
    {
        Self {
            files: files.into_iter().collect(),
            dirs: dirs.into_iter().collect(),
            root_unreadable: false,
        }
    }

    /// Result of a scan whose root could not be listed at all.
    ///
    /// It carries no paths and says nothing about the tree, so the tracker
    /// must not compare against it.
    pub fn root_unreadable() -> Self {
        Self {
            root_unreadable: true,
            ..Self::default()
        }
    }

    pub fn is_root_unreadable(&self) -> bool {
        self.root_unreadable
    }

    pub fn files(&self) -> &BTreeSet<PathBuf> {
        &self.files
    }

    pub fn dirs(&self) -> &BTreeSet<PathBuf> {
        &self.dirs
    }

    /// True if any directory was added or removed between `self` and `other`.
    pub fn dirs_differ(&self, other: &Snapshot) -> bool {
        self.dirs != other.dirs
    }

    /// True if any file was added or removed between `self` and `other`.
    pub fn files_differ(&self, other: &Snapshot) -> bool {
        self.files != other.files
    }

    /// Files present in `self` but gone from `newer`.
    pub fn removed_files<'a>(&'a self, newer: &'a Snapshot) -> impl Iterator<Item = &'a PathBuf> {
        self.files.difference(&newer.files)
    }
}
