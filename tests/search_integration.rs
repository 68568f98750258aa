use fastfind::{search, ConfigError, FastfindError, FileType, SearchEngine, SearchOptions};
use std::fs;
use std::os::unix::fs::{symlink, PermissionsExt};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn layout(root: &Path) {
    fs::create_dir_all(root.join("a")).unwrap();
    fs::create_dir(root.join("c")).unwrap();
    fs::write(root.join("a/b.txt"), "b").unwrap();
}

#[test]
fn test_scenario_files_within_two_levels() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("t");
    fs::create_dir(&root).unwrap();
    layout(&root);

    let outcome = search(
        &SearchOptions::new([&root])
            .with_file_type(FileType::File)
            .with_maxdepth(2),
    )
    .unwrap();

    assert_eq!(outcome.result.files(), &[root.join("a/b.txt")]);
    assert_eq!(outcome.result.matched(), 1);
}

#[test]
fn test_zero_depth_is_roots_only() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    layout(first.path());
    layout(second.path());

    let outcome = search(
        &SearchOptions::new([first.path(), second.path()])
            .with_file_type(FileType::Directory)
            .with_mindepth(0)
            .with_maxdepth(0),
    )
    .unwrap();

    assert_eq!(
        outcome.result.files(),
        &[first.path().to_path_buf(), second.path().to_path_buf()]
    );
}

#[test]
fn test_same_result_twice() {
    let temp_dir = TempDir::new().unwrap();
    layout(temp_dir.path());
    for i in 0..20 {
        fs::write(temp_dir.path().join(format!("c/file_{i}.log")), "").unwrap();
    }
    let options = SearchOptions::new([temp_dir.path()]).with_name("*.log");

    let first = search(&options).unwrap();
    let second = search(&options).unwrap();
    assert_eq!(first.result, second.result);
    assert_eq!(first.result.matched(), 20);
}

#[test]
fn test_setuid_any_of_mask() {
    let temp_dir = TempDir::new().unwrap();
    let su = temp_dir.path().join("su");
    let plain = temp_dir.path().join("plain");
    fs::write(&su, "").unwrap();
    fs::write(&plain, "").unwrap();
    fs::set_permissions(&su, fs::Permissions::from_mode(0o4755)).unwrap();
    fs::set_permissions(&plain, fs::Permissions::from_mode(0o644)).unwrap();

    let outcome = search(&SearchOptions::new([temp_dir.path()]).with_perms("/6000")).unwrap();
    assert_eq!(outcome.result.files(), &[su.clone()]);

    let outcome = search(&SearchOptions::new([temp_dir.path()]).with_perms("644")).unwrap();
    assert_eq!(outcome.result.files(), &[plain]);
}

#[test]
fn test_owner_filter() {
    let temp_dir = TempDir::new().unwrap();
    layout(temp_dir.path());
    let uid = nix::unistd::getuid().as_raw();

    let mine = search(&SearchOptions::new([temp_dir.path()]).with_user(uid.to_string())).unwrap();
    assert_eq!(mine.result.matched(), 1);

    let other = uid.wrapping_add(4242).to_string();
    let theirs = search(&SearchOptions::new([temp_dir.path()]).with_user(other)).unwrap();
    assert!(theirs.result.is_empty());
}

#[test]
fn test_symlink_type_without_follow() {
    let temp_dir = TempDir::new().unwrap();
    layout(temp_dir.path());
    symlink(temp_dir.path().join("a/b.txt"), temp_dir.path().join("to_b")).unwrap();
    symlink(temp_dir.path().join("a"), temp_dir.path().join("to_a")).unwrap();

    let links = search(&SearchOptions::new([temp_dir.path()]).with_file_type(FileType::Symlink))
        .unwrap();
    assert_eq!(
        links.result.files(),
        &[temp_dir.path().join("to_a"), temp_dir.path().join("to_b")]
    );

    let files = search(&SearchOptions::new([temp_dir.path()])).unwrap();
    assert_eq!(files.result.files(), &[temp_dir.path().join("a/b.txt")]);
}

#[test]
fn test_follow_resolves_links() {
    let temp_dir = TempDir::new().unwrap();
    layout(temp_dir.path());
    let outside = TempDir::new().unwrap();
    fs::write(outside.path().join("far.txt"), "").unwrap();
    symlink(outside.path(), temp_dir.path().join("c/outside")).unwrap();

    let outcome = search(&SearchOptions::new([temp_dir.path()]).with_links(true)).unwrap();
    let expected: Vec<PathBuf> = vec![
        temp_dir.path().join("a/b.txt"),
        temp_dir.path().join("c/outside/far.txt"),
    ];
    assert_eq!(outcome.result.files(), expected.as_slice());
}

#[test]
fn test_cycle_with_follow_terminates() {
    let temp_dir = TempDir::new().unwrap();
    layout(temp_dir.path());
    symlink(temp_dir.path(), temp_dir.path().join("a/loop")).unwrap();
    symlink(temp_dir.path().join("c"), temp_dir.path().join("c/self")).unwrap();

    let outcome = search(
        &SearchOptions::new([temp_dir.path()])
            .with_links(true)
            .with_file_type(FileType::Directory),
    )
    .unwrap();

    assert_eq!(
        outcome.result.files(),
        &[
            temp_dir.path().to_path_buf(),
            temp_dir.path().join("a"),
            temp_dir.path().join("c"),
        ]
    );
    assert_eq!(outcome.stats.cycles, 2);
    assert!(outcome.diagnostics.is_empty());
}

#[test]
fn test_follow_reports_each_object_once() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::create_dir(root.join("a")).unwrap();
    fs::create_dir(root.join("b")).unwrap();
    fs::write(root.join("b/f.txt"), "").unwrap();
    fs::write(root.join("b/real.txt"), "").unwrap();
    symlink(root.join("b"), root.join("a/link")).unwrap();
    symlink(root.join("b/real.txt"), root.join("b/alias.txt")).unwrap();

    let outcome = search(
        &SearchOptions::new([root])
            .with_links(true)
            .with_maxdepth(2),
    )
    .unwrap();

    assert_eq!(
        outcome.result.files(),
        &[root.join("b/alias.txt"), root.join("b/f.txt")]
    );
    assert_eq!(outcome.stats.duplicates, 2);
}

#[test]
fn test_config_errors_fail_before_walking() {
    let temp_dir = TempDir::new().unwrap();

    let err = search(
        &SearchOptions::new([temp_dir.path()])
            .with_mindepth(4)
            .with_maxdepth(2),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        FastfindError::Config(ConfigError::InvertedDepth { min: 4, max: 2 })
    ));

    let err = search(&SearchOptions::new([temp_dir.path()]).with_perms("u?x")).unwrap_err();
    assert!(matches!(
        err,
        FastfindError::Config(ConfigError::InvalidPermission { .. })
    ));
}

#[test]
fn test_parallel_roots_keep_order() {
    let roots: Vec<TempDir> = (0..4).map(|_| TempDir::new().unwrap()).collect();
    for root in &roots {
        layout(root.path());
    }
    let options = SearchOptions::new(roots.iter().rev().map(|r| r.path()));
    let engine = SearchEngine::from_options(&options).unwrap();

    let outcome = engine.run_parallel();
    let expected: Vec<PathBuf> = roots.iter().rev().map(|r| r.path().join("a/b.txt")).collect();
    assert_eq!(outcome.result.files(), expected.as_slice());
    assert_eq!(outcome.result, engine.run().result);
}
