//! On-disk repository markers: validity and in-progress operations.

use std::fs;
use std::path::{Path, PathBuf};

/// Files under `.git` that exist while a merge, rebase or cherry-pick is
/// stopped part-way.
pub const OPERATION_MARKERS: &[&str] = &[
    "MERGE_HEAD",
    "REBASE_HEAD",
    "rebase-apply",
    "rebase-merge",
    "CHERRY_PICK_HEAD",
    "sequencer",
];

/// Whether `dir` is a repository: a `.git` directory or file (worktrees,
/// submodules), or a bare repository layout.
#[must_use]
pub fn is_repository(dir: &Path) -> bool {
    dir.join(".git").exists() || is_bare(dir)
}

fn is_bare(dir: &Path) -> bool {
    dir.join("HEAD").is_file() && dir.join("objects").is_dir() && dir.join("refs").is_dir()
}

/// The first in-progress operation marker found in the repository's git
/// directory.
#[must_use]
pub fn operation_marker(dir: &Path) -> Option<&'static str> {
    let git_dir = git_dir(dir);
    OPERATION_MARKERS
        .iter()
        .copied()
        .find(|marker| git_dir.join(marker).exists())
}

/// The git directory for `dir`, following a `gitdir:` file as written for
/// worktrees and submodules. Relative targets resolve against `dir`.
fn git_dir(dir: &Path) -> PathBuf {
    let dot_git = dir.join(".git");
    if !dot_git.is_file() {
        return dot_git;
    }
    fs::read_to_string(&dot_git)
        .ok()
        .and_then(|contents| {
            contents
                .lines()
                .find_map(|line| line.strip_prefix("gitdir:"))
                .map(|target| dir.join(target.trim()))
        })
        .unwrap_or(dot_git)
}
