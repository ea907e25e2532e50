// src/fs/mod.rs

//! Filesystem capability used by the scanner and the tracker.
//!
//! Only the two primitives the change-detection pipeline needs are exposed:
//! listing a directory and reading a modification time. Both return
//! `std::io::Result` so callers can tell "not a directory" apart from other
//! failures.

use std::fmt::Debug;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::warn;

pub mod mock;

/// Abstract filesystem interface.
pub trait FileSystem: Send + Sync + Debug {
    /// Return the entries of a directory as full paths.
    ///
    /// Listing something that is not a directory must fail with
    /// [`io::ErrorKind::NotADirectory`].
    fn list_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>>;

    /// Fresh modification time of `path`. An error means the path does not
    /// exist (any more) or cannot be stat-ed.
    fn modified(&self, path: &Path) -> io::Result<SystemTime>;
}

/// Implementation that uses `std::fs`.
#[derive(Debug, Clone, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn list_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path)? {
            match entry {
                Ok(entry) => entries.push(entry.path()),
                // A single unreadable entry shouldn't hide its siblings.
                Err(err) => warn!(dir = ?path, error = %err, "skipping unreadable dir entry"),
            }
        }
        Ok(entries)
    }

    fn modified(&self, path: &Path) -> io::Result<SystemTime> {
        fs::metadata(path)?.modified()
    }
}
