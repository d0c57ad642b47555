//! Integration tests for the gitshell CLI.
//!
//! These tests verify the CLI commands work correctly end-to-end.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::process::Command as StdCommand;
use tempfile::TempDir;

/// Helper to run git in a directory.
fn git(dir: &TempDir, args: &[&str]) {
    let output = StdCommand::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("Failed to run git");
    assert!(output.status.success(), "git {args:?} failed: {output:?}");
}

/// Helper to create a git repository in a temp directory.
fn setup_git_repo() -> TempDir {
    let temp = TempDir::new().expect("Failed to create temp dir");

    git(&temp, &["init"]);
    git(&temp, &["config", "user.email", "test@example.com"]);
    git(&temp, &["config", "user.name", "Test User"]);

    // Create initial commit so we have a valid HEAD
    fs::write(temp.path().join("README.md"), "# Test Repo\n").expect("Failed to write README");
    git(&temp, &["add", "."]);
    git(&temp, &["commit", "-m", "Initial commit"]);

    // Rename branch to main (in case default is master)
    git(&temp, &["branch", "-M", "main"]);

    temp
}

/// Helper to create a git commit
fn git_commit(msg: &str, dir: &TempDir) {
    let file = dir.path().join("feature.txt");
    let mut current = fs::read_to_string(&file).unwrap_or_default();
    current.push_str("\nnew line");
    fs::write(&file, &current).expect("Failed to write file");

    git(dir, &["add", "."]);
    git(dir, &["commit", "-m", msg]);
}

/// Helper to get gitshell command, resolving git from PATH.
fn gitshell() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_gitshell"));
    cmd.args(["--git", "git"]);
    cmd
}

// ============================================================================
// Basic CLI tests
// ============================================================================

#[test]
fn test_version_flag() {
    gitshell()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("gitshell"));
}

#[test]
fn test_help_flag() {
    gitshell()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("git"))
        .stdout(predicate::str::contains("completions"));
}

#[test]
fn test_no_subcommand_fails() {
    gitshell().assert().failure();
}

#[test]
fn test_completions_bash() {
    gitshell()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("gitshell"));
}

// ============================================================================
// run
// ============================================================================

#[test]
fn test_run_echo_buffered() {
    gitshell()
        .args(["run", "--", "echo", "hello"])
        .assert()
        .success()
        .stdout("hello\n");
}

#[test]
fn test_run_echo_streaming() {
    gitshell()
        .args(["--stream", "run", "--", "echo", "hello"])
        .assert()
        .success()
        .stdout("hello\n");
}

#[test]
fn test_run_streaming_separates_streams() {
    gitshell()
        .args(["--stream", "run", "--sh", "--", "echo out; echo err >&2"])
        .assert()
        .success()
        .stdout("out\n")
        .stderr(predicate::str::contains("err"));
}

#[test]
fn test_run_shell_exit_code() {
    gitshell()
        .args(["run", "--sh", "--", "echo partial; exit 3"])
        .assert()
        .code(3)
        .stdout("partial\n")
        .stderr(predicate::str::contains("exit 3"));
}

#[test]
fn test_run_quiet_hides_exit_note() {
    gitshell()
        .args(["-q", "run", "--sh", "--", "exit 4"])
        .assert()
        .code(4)
        .stderr(predicate::str::is_empty());
}

#[test]
fn test_run_missing_program() {
    gitshell()
        .args(["run", "--", "gitshell-definitely-not-a-program"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("gitshell-definitely-not-a-program"));
}

#[test]
fn test_run_json() {
    gitshell()
        .args(["run", "--json", "--", "echo", "hi"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"code\": 0"))
        .stdout(predicate::str::contains("\"stdout\": \"hi\\n\""));
}

#[test]
fn test_run_requires_arguments() {
    gitshell().args(["run"]).assert().failure();
}

#[test]
fn test_run_dry_run_does_nothing() {
    let temp = TempDir::new().unwrap();

    gitshell()
        .current_dir(&temp)
        .args(["--dry-run", "run", "--", "touch", "created"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry run: touch created"));

    assert!(!temp.path().join("created").exists());
}

#[test]
fn test_run_in_working_dir() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("marker.txt"), "").unwrap();

    gitshell()
        .args(["-C", temp.path().to_str().unwrap(), "run", "--", "ls"])
        .assert()
        .success()
        .stdout(predicate::str::contains("marker.txt"));
}

#[test]
fn test_run_bad_working_dir() {
    gitshell()
        .args(["-C", "/nonexistent/gitshell", "run", "--", "ls"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("/nonexistent/gitshell"));
}

#[test]
fn test_config_file_enables_dry_run() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("gitshell.toml"), "dry_run = true\n").unwrap();

    gitshell()
        .current_dir(&temp)
        .args(["run", "--", "touch", "created"])
        .assert()
        .success();

    assert!(!temp.path().join("created").exists());
}

#[test]
fn test_invalid_config_file() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("gitshell.toml"), "dry_run = \"maybe\"\n").unwrap();

    gitshell()
        .current_dir(&temp)
        .args(["run", "--", "true"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load config"));
}

// ============================================================================
// git
// ============================================================================

#[test]
fn test_git_valid() {
    let repo = setup_git_repo();
    gitshell()
        .current_dir(&repo)
        .args(["git", "valid"])
        .assert()
        .success()
        .stdout(predicate::str::contains("is a git repository"));

    let plain = TempDir::new().unwrap();
    gitshell()
        .current_dir(&plain)
        .args(["git", "valid"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("is not a git repository"));
}

#[test]
fn test_git_init_once() {
    let temp = TempDir::new().unwrap();

    gitshell()
        .current_dir(&temp)
        .args(["git", "init"])
        .assert()
        .success();
    assert!(temp.path().join(".git").is_dir());

    gitshell()
        .current_dir(&temp)
        .args(["git", "init"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_git_current_branch() {
    let repo = setup_git_repo();
    gitshell()
        .current_dir(&repo)
        .args(["git", "current-branch"])
        .assert()
        .success()
        .stdout("main\n");
}

#[test]
fn test_git_branch_exists() {
    let repo = setup_git_repo();

    gitshell()
        .current_dir(&repo)
        .args(["git", "branch-exists", "main"])
        .assert()
        .success();

    gitshell()
        .current_dir(&repo)
        .args(["git", "branch-exists", "ghost"])
        .assert()
        .code(1);
}

#[test]
fn test_git_sha() {
    let repo = setup_git_repo();
    gitshell()
        .current_dir(&repo)
        .args(["git", "sha"])
        .assert()
        .success()
        .stdout(predicate::str::is_match("^[0-9a-f]{12}\n$").unwrap());
}

#[test]
fn test_git_add_remote_and_read_back() {
    let repo = setup_git_repo();

    for _ in 0..2 {
        gitshell()
            .current_dir(&repo)
            .args(["git", "add-remote", "origin", "https://example.com/repo.git"])
            .assert()
            .success();
    }

    gitshell()
        .current_dir(&repo)
        .args(["git", "raw", "--", "remote", "-v"])
        .assert()
        .success()
        .stdout(predicate::str::contains("origin\thttps://example.com/repo.git (fetch)"));
}

#[test]
fn test_git_checkout_and_delete_current_branch() {
    let repo = setup_git_repo();
    git(&repo, &["checkout", "-b", "feature"]);
    git_commit("Feature work", &repo);

    gitshell()
        .current_dir(&repo)
        .args(["git", "delete", "--force", "feature"])
        .assert()
        .success();

    gitshell()
        .current_dir(&repo)
        .args(["git", "branch-exists", "feature"])
        .assert()
        .code(1);

    gitshell()
        .current_dir(&repo)
        .args(["git", "checkout", "main"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Checked out main"));
}

#[test]
fn test_git_push_rejects_bad_branch_name() {
    let repo = setup_git_repo();
    gitshell()
        .current_dir(&repo)
        .args(["git", "push", "main;touch pwned", "origin"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid branch name"));

    assert!(!repo.path().join("pwned").exists());
}

#[test]
fn test_git_delete_nothing() {
    let repo = setup_git_repo();
    gitshell()
        .current_dir(&repo)
        .args(["git", "delete", "ghost"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid arguments"));
}

#[test]
fn test_git_in_progress_clean() {
    let repo = setup_git_repo();
    gitshell()
        .current_dir(&repo)
        .args(["git", "in-progress"])
        .assert()
        .code(1);
}
