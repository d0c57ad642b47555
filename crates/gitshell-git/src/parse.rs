//! Parsing of git's human-readable output.

use crate::ref_name::trim_marker;

/// Which end of `git log` a SHA lookup reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogPosition {
    /// Newest commit.
    #[default]
    Head,
    /// Oldest reachable commit.
    Tail,
}

/// The single branch name printed by `git branch [-r] --list <name>`.
#[must_use]
pub fn listed_branch(output: &str) -> &str {
    trim_marker(output)
}

/// The checked-out branch from plain `git branch` output.
///
/// Takes the last word of the `*` line with parentheses removed, so a
/// detached HEAD (`* (HEAD detached at 1a2b3c4)`) yields the short SHA.
#[must_use]
pub fn current_branch(output: &str) -> Option<String> {
    let line = output.lines().find(|line| line.trim_start().starts_with('*'))?;
    let name: String = line
        .split_whitespace()
        .last()?
        .chars()
        .filter(|c| !matches!(c, '(' | ')'))
        .collect();
    (!name.is_empty() && name != "*").then_some(name)
}

/// The abbreviated SHA at one end of `git log --oneline` output.
#[must_use]
pub fn log_sha(output: &str, position: LogPosition) -> Option<&str> {
    let mut lines = output.lines().filter(|line| !line.trim().is_empty());
    let line = match position {
        LogPosition::Head => lines.next(),
        LogPosition::Tail => lines.next_back(),
    }?;
    line.split_whitespace().next()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listed_branch() {
        assert_eq!(listed_branch("* main\n"), "main");
        assert_eq!(listed_branch("  feature/x\n"), "feature/x");
        assert_eq!(listed_branch("  origin/main\n"), "origin/main");
        assert_eq!(listed_branch(""), "");
    }

    #[test]
    fn test_current_branch() {
        let output = "  develop\n* feature/auth\n  main\n";
        assert_eq!(current_branch(output).as_deref(), Some("feature/auth"));
    }

    #[test]
    fn test_current_branch_detached() {
        let output = "* (HEAD detached at 1a2b3c4)\n  main\n";
        assert_eq!(current_branch(output).as_deref(), Some("1a2b3c4"));
    }

    #[test]
    fn test_current_branch_none() {
        assert_eq!(current_branch(""), None);
        assert_eq!(current_branch("  main\n  develop\n"), None);
    }

    #[test]
    fn test_log_sha_positions() {
        let output = "a1b2c3d4e5f6 third\n0a0b0c0d0e0f second\n9f8e7d6c5b4a first\n";
        assert_eq!(log_sha(output, LogPosition::Head), Some("a1b2c3d4e5f6"));
        assert_eq!(log_sha(output, LogPosition::Tail), Some("9f8e7d6c5b4a"));
    }

    #[test]
    fn test_log_sha_empty() {
        assert_eq!(log_sha("", LogPosition::Head), None);
        assert_eq!(log_sha("\n\n", LogPosition::Tail), None);
    }
}
