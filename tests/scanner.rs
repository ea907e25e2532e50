// tests/scanner.rs

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use tempfile::tempdir;

use pollen::fs::mock::MockFileSystem;
use pollen::fs::{FileSystem, RealFileSystem};
use pollen::watch::{
    scan, snapshot_channel, IgnorePolicy, ModTimeCache, Scanner, Snapshot, Tracker,
};
use pollen_test_utils::{init_tracing, wait_until};

type TestResult = Result<(), Box<dyn Error>>;

fn policy(root: &Path, entries: &[&str]) -> IgnorePolicy {
    let entries: Vec<String> = entries.iter().map(|s| s.to_string()).collect();
    IgnorePolicy::new(root, &entries).unwrap()
}

#[test]
fn real_tree_is_split_into_files_and_dirs() -> TestResult {
    let dir = tempdir()?;
    let root = dir.path();
    fs::create_dir_all(root.join("src/nested"))?;
    fs::write(root.join("src/main.rs"), "fn main() {}")?;
    fs::write(root.join("src/nested/mod.rs"), "")?;
    fs::write(root.join("README.md"), "# hi")?;

    let snap = scan(&RealFileSystem, root, &IgnorePolicy::none(root));

    let files: Vec<PathBuf> = snap.files().iter().cloned().collect();
    let mut expected = vec![
        root.join("README.md"),
        root.join("src/main.rs"),
        root.join("src/nested/mod.rs"),
    ];
    expected.sort();
    assert_eq!(files, expected);
    assert!(snap.dirs().contains(&root.join("src")));
    assert!(snap.dirs().contains(&root.join("src/nested")));
    assert!(!snap.dirs().contains(&root.to_path_buf()));

    Ok(())
}

#[test]
fn empty_directory_is_classified_as_file() -> TestResult {
    let dir = tempdir()?;
    let root = dir.path();
    fs::create_dir(root.join("empty"))?;

    let snap = scan(&RealFileSystem, root, &IgnorePolicy::none(root));
    assert!(snap.files().contains(&root.join("empty")));
    assert!(snap.dirs().is_empty());

    Ok(())
}

#[test]
fn ignored_location_and_its_subtree_never_appear() -> TestResult {
    let dir = tempdir()?;
    let root = dir.path();
    fs::create_dir_all(root.join("build/obj"))?;
    fs::write(root.join("build/obj/app.o"), "bin")?;
    fs::write(root.join("build.rs"), "")?;
    fs::write(root.join("notes.swp"), "")?;

    let snap = scan(&RealFileSystem, root, &policy(root, &["build/", "*.swp"]));

    assert!(snap.files().contains(&root.join("build.rs")));
    assert!(!snap.files().contains(&root.join("notes.swp")));
    assert!(snap.files().iter().all(|p| !p.starts_with(root.join("build"))));
    assert!(snap.dirs().iter().all(|p| !p.starts_with(root.join("build"))));

    Ok(())
}

#[test]
fn ignored_directory_is_not_even_listed() {
    let fs = MockFileSystem::new();
    let t = SystemTime::now();
    fs.add_file("./src/lib.rs", t);
    fs.add_file("./target/debug/app", t);
    // Listing it would fail loudly; ignoring must short-circuit before that.
    fs.break_path("./target");

    let snap = scan(&fs, Path::new("."), &|p: &Path| p.starts_with("./target"));
    assert_eq!(
        snap.files().iter().cloned().collect::<Vec<_>>(),
        vec![PathBuf::from("./src/lib.rs")]
    );
}

#[test]
fn unreadable_entry_is_omitted_and_scan_continues() {
    init_tracing();
    let fs = MockFileSystem::new();
    let t = SystemTime::now();
    fs.add_file("./a/one.txt", t);
    fs.add_file("./secret/key.pem", t);
    fs.add_file("./z/two.txt", t);
    fs.break_path("./secret");

    let snap = scan(&fs, Path::new("."), &IgnorePolicy::none("."));

    assert!(snap.files().contains(Path::new("./a/one.txt")));
    assert!(snap.files().contains(Path::new("./z/two.txt")));
    assert!(!snap.dirs().contains(Path::new("./secret")));
    assert!(!snap.files().contains(Path::new("./secret")));
    assert!(!snap.files().contains(Path::new("./secret/key.pem")));
}

#[test]
fn unreadable_root_yields_empty_snapshot_marked_as_such() {
    let fs = MockFileSystem::new();
    let snap = scan(&fs, Path::new("./missing"), &IgnorePolicy::none("./missing"));
    assert!(snap.files().is_empty());
    assert!(snap.dirs().is_empty());
    assert!(snap.is_root_unreadable());
    assert_eq!(snap, Snapshot::root_unreadable());
}

#[test]
fn changes_under_ignored_dir_never_trigger() -> TestResult {
    let dir = tempdir()?;
    let root = dir.path();
    fs::create_dir_all(root.join("build"))?;
    fs::create_dir_all(root.join("src"))?;
    fs::write(root.join("src/main.rs"), "")?;
    fs::write(root.join("build/out.txt"), "1")?;

    let real: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let ignore = policy(root, &["build/"]);
    let crawl = || scan(real.as_ref(), root, &ignore);

    let mut tracker = Tracker::new(Arc::clone(&real), Arc::new(crawl()), SystemTime::now());

    fs::create_dir_all(root.join("build/deep/er"))?;
    fs::write(root.join("build/out.txt"), "2")?;
    fs::write(root.join("build/deep/er/new.txt"), "x")?;
    tracker.accept(Arc::new(crawl()));

    let report = tracker.recheck(SystemTime::now() + Duration::from_secs(1));
    assert!(!report.needs_action(), "unexpected trigger: {report:?}");

    Ok(())
}

#[tokio::test]
async fn spawned_scanner_publishes_initial_and_periodic_snapshots() -> TestResult {
    init_tracing();
    let fs = MockFileSystem::new();
    fs.add_file("./a.txt", SystemTime::now());

    let (tx, mut rx) = snapshot_channel();
    let scanner = Scanner::new(Arc::new(fs.clone()), ".", Arc::new(IgnorePolicy::none(".")));
    let handle = scanner.spawn(Duration::from_millis(20), tx);

    tokio::time::timeout(Duration::from_secs(2), rx.changed()).await??;
    let first = rx.borrow_and_update().clone().expect("first scan published");
    assert_eq!(first.files().len(), 1);

    fs.add_file("./b.txt", SystemTime::now());
    let saw_both = wait_until(Duration::from_secs(2), || {
        rx.borrow().as_ref().is_some_and(|s| s.files().len() == 2)
    })
    .await;
    assert!(saw_both);

    drop(rx);
    tokio::time::timeout(Duration::from_secs(2), handle).await??;

    Ok(())
}

#[tokio::test]
async fn scanner_keeps_publishing_while_nobody_reads() -> TestResult {
    init_tracing();
    let fs = MockFileSystem::new();
    fs.add_file("./a.txt", SystemTime::now());

    let (tx, rx) = snapshot_channel();
    let scanner = Scanner::new(Arc::new(fs.clone()), ".", Arc::new(IgnorePolicy::none(".")));
    let handle = scanner.spawn(Duration::from_millis(10), tx);

    // Let several scans land unread, then change the tree. A reader that
    // finally looks must see the newest crawl, not the first one.
    tokio::time::sleep(Duration::from_millis(100)).await;
    fs.add_file("./b.txt", SystemTime::now());
    fs.add_file("./c.txt", SystemTime::now());
    tokio::time::sleep(Duration::from_millis(200)).await;

    let latest = rx.borrow().clone().expect("scanner published");
    assert_eq!(latest.files().len(), 3);
    assert!(!handle.is_finished());

    handle.abort();
    Ok(())
}

#[test]
fn seeded_cache_covers_every_initial_file() {
    let fs = MockFileSystem::new();
    let t = SystemTime::now();
    fs.add_file("./x/1", t);
    fs.add_file("./x/2", t);
    let snap = scan(&fs, Path::new("."), &IgnorePolicy::none("."));

    let mut cache = ModTimeCache::new();
    cache.seed(snap.files(), t);
    assert_eq!(cache.len(), 2);
    assert!(snap.files().iter().all(|p| cache.get(p) == Some(t)));
}
