// src/watch/ignore.rs

//! Ignore policy handed to the scanner.
//!
//! Two kinds of entries are understood:
//!
//! - plain locations such as `build` or `target/debug`, resolved relative to
//!   the watched root; the location and everything below it is ignored;
//! - glob patterns (anything containing `*`, `?`, `[` or `{`) such as
//!   `**/*.swp`, matched against the root-relative path.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::watch::path_utils::relative_str;

/// Membership test deciding whether a path (and, for a directory, its whole
/// subtree) is left out of every snapshot.
pub trait IgnorePredicate: Send + Sync {
    fn is_ignored(&self, path: &Path) -> bool;
}

impl<F> IgnorePredicate for F
where
    F: Fn(&Path) -> bool + Send + Sync,
{
    fn is_ignored(&self, path: &Path) -> bool {
        self(path)
    }
}

/// Compiled ignore list for one watched root.
#[derive(Clone)]
pub struct IgnorePolicy {
    root: PathBuf,
    locations: Vec<PathBuf>,
    patterns: Option<GlobSet>,
    sources: Vec<String>,
}

impl fmt::Debug for IgnorePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IgnorePolicy")
            .field("root", &self.root)
            .field("entries", &self.sources)
            .finish()
    }
}

fn is_pattern(entry: &str) -> bool {
    entry.contains(['*', '?', '[', '{'])
}

impl IgnorePolicy {
    /// Build a policy from raw ignore entries (as given on the CLI or in the
    /// config file).
    pub fn new(root: impl Into<PathBuf>, entries: &[String]) -> Result<Self> {
        let root = root.into();
        let mut locations = Vec::new();
        let mut builder = GlobSetBuilder::new();
        let mut have_patterns = false;
        let mut sources = Vec::new();

        for raw in entries {
            let entry = raw.trim();
            if entry.is_empty() {
                continue;
            }
            sources.push(entry.to_string());

            if is_pattern(entry) {
                let glob = Glob::new(entry)
                    .with_context(|| format!("invalid ignore pattern: {entry}"))?;
                builder.add(glob);
                have_patterns = true;
            } else {
                locations.push(root.join(entry.trim_end_matches(['/', '\\'])));
            }
        }

        let patterns = if have_patterns {
            Some(builder.build().context("building ignore globset")?)
        } else {
            None
        };

        Ok(Self {
            root,
            locations,
            patterns,
            sources,
        })
    }

    /// Policy that ignores nothing.
    pub fn none(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            locations: Vec::new(),
            patterns: None,
            sources: Vec::new(),
        }
    }

    /// The entries this policy was built from.
    pub fn entries(&self) -> &[String] {
        &self.sources
    }
}

impl IgnorePredicate for IgnorePolicy {
    fn is_ignored(&self, path: &Path) -> bool {
        if self.locations.iter().any(|loc| path.starts_with(loc)) {
            return true;
        }
        match (&self.patterns, relative_str(&self.root, path)) {
            (Some(set), Some(rel)) => set.is_match(rel),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(entries: &[&str]) -> IgnorePolicy {
        let entries: Vec<String> = entries.iter().map(|s| s.to_string()).collect();
        IgnorePolicy::new(".", &entries).unwrap()
    }

    #[test]
    fn location_covers_itself_and_subtree() {
        let p = policy(&["build/"]);
        assert!(p.is_ignored(Path::new("./build")));
        assert!(p.is_ignored(Path::new("./build/out/app.o")));
        assert!(!p.is_ignored(Path::new("./builder.rs")));
        assert!(!p.is_ignored(Path::new("./src/build")));
    }

    #[test]
    fn nested_location_is_resolved_against_root() {
        let p = policy(&["target/debug"]);
        assert!(p.is_ignored(Path::new("./target/debug/deps")));
        assert!(!p.is_ignored(Path::new("./target/release")));
    }

    #[test]
    fn glob_entries_match_relative_paths() {
        let p = policy(&["**/*.swp", "*.log"]);
        assert!(p.is_ignored(Path::new("./src/.main.rs.swp")));
        assert!(p.is_ignored(Path::new("./server.log")));
        assert!(!p.is_ignored(Path::new("./src/main.rs")));
    }

    #[test]
    fn blank_entries_are_dropped_and_bad_globs_rejected() {
        let p = policy(&["", "  "]);
        assert!(p.entries().is_empty());
        assert!(!p.is_ignored(Path::new("./anything")));

        let bad = vec!["src/[".to_string()];
        assert!(IgnorePolicy::new(".", &bad).is_err());
    }

    #[test]
    fn closures_act_as_predicates() {
        let pred = |p: &Path| p.ends_with("skip");
        assert!(pred.is_ignored(Path::new("a/skip")));
        assert!(!pred.is_ignored(Path::new("a/keep")));
    }
}
