use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn fixture() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::create_dir_all(root.join("etc/app")).unwrap();
    fs::write(root.join("etc/app/app.conf"), "").unwrap();
    fs::write(root.join("etc/app/app.conf.bak"), "").unwrap();
    fs::write(root.join("etc/hosts"), "").unwrap();
    temp_dir
}

fn fastfind(config_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("fastfind").unwrap();
    // Keep user config files out of the test run.
    cmd.env("HOME", config_dir.path())
        .env("XDG_CONFIG_HOME", config_dir.path())
        .env_remove("RUST_LOG")
        .current_dir(config_dir.path());
    cmd
}

#[test]
fn test_lists_matches_one_per_line() {
    let tree = fixture();
    let home = TempDir::new().unwrap();
    let expected = format!("{}\n", tree.path().join("etc/app/app.conf").display());

    fastfind(&home)
        .arg(tree.path())
        .args(["--name", "*.conf"])
        .assert()
        .success()
        .stdout(predicate::eq(expected));
}

#[test]
fn test_json_output() {
    let tree = fixture();
    let home = TempDir::new().unwrap();

    let output = fastfind(&home)
        .arg(tree.path())
        .args(["--type", "directory", "--format", "json", "--mindepth", "1"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["matched"], 2);
    assert_eq!(
        value["files"][1],
        tree.path().join("etc/app").display().to_string()
    );
}

#[test]
fn test_parallel_flag() {
    let tree = fixture();
    let home = TempDir::new().unwrap();

    fastfind(&home)
        .arg(tree.path().join("etc"))
        .arg(tree.path().join("etc/app"))
        .args(["--parallel", "--threads", "2", "--maxdepth", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hosts"))
        .stdout(predicate::str::contains("app.conf.bak"));
}

#[test]
fn test_config_error_exit_code() {
    let tree = fixture();
    let home = TempDir::new().unwrap();

    fastfind(&home)
        .arg(tree.path())
        .args(["--mindepth", "3", "--maxdepth", "1"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("mindepth (3) is greater than maxdepth (1)"));

    fastfind(&home)
        .arg("relative/path")
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be absolute"));

    fastfind(&home)
        .arg(tree.path())
        .args(["--user", "no-such-user-fastfind"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown user"));
}

#[test]
fn test_config_file_defaults() {
    let tree = fixture();
    let home = TempDir::new().unwrap();
    let config = home.path().join("custom.toml");
    fs::write(&config, "[defaults]\nfile_type = \"directory\"\n\n[output]\nformat = \"json\"\n")
        .unwrap();

    let output = fastfind(&home)
        .arg(tree.path())
        .arg("--config")
        .arg(&config)
        .args(["--name", "app"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["matched"], 1);
}

#[test]
fn test_log_file() {
    let tree = fixture();
    let home = TempDir::new().unwrap();
    let log = home.path().join("logs/fastfind.log");

    fastfind(&home)
        .arg(tree.path())
        .arg("--log")
        .arg(&log)
        .arg("-v")
        .assert()
        .success();

    let content = fs::read_to_string(&log).unwrap();
    assert!(content.contains("[INFO]"));
    assert!(content.contains("matched 3 of"));
}

#[test]
fn test_completions() {
    let home = TempDir::new().unwrap();
    fastfind(&home)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("fastfind"));
}
