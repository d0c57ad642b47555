//! Option structs for facade operations.

use crate::parse::LogPosition;

/// Options for [`GitShell::merge`](crate::GitShell::merge).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOptions {
    /// Always create a merge commit (`--no-ff`).
    pub no_ff: bool,
    /// Add one-line commit descriptions to the message (`--log`).
    pub add_log: bool,
    /// Abort the merge in progress instead of starting one.
    pub abort: bool,
}

impl MergeOptions {
    pub(crate) fn flags(self) -> Vec<&'static str> {
        let mut flags = Vec::new();
        if self.no_ff {
            flags.push("--no-ff");
        }
        if self.add_log {
            flags.push("--log");
        }
        flags
    }
}

/// Options for [`GitShell::push`](crate::GitShell::push).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PushOptions {
    /// Force the push (`-f`). Applied automatically when the destination
    /// branch does not exist on the remote yet.
    pub force: bool,
    /// Push to `refs/for/<branch>` for review servers.
    pub use_refs: bool,
}

/// Options for [`GitShell::delete`](crate::GitShell::delete).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteOptions {
    /// Also delete the branch on this remote.
    pub remote: Option<String>,
    /// Delete even when unmerged (`-D`).
    pub force: bool,
}

/// A SHA lookup for [`GitShell::sha`](crate::GitShell::sha).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaQuery {
    /// Commit expression to start the log from.
    pub commit: String,
    /// Abbreviated hash length.
    pub abbrev: usize,
    /// Which end of the log to read.
    pub position: LogPosition,
}

impl ShaQuery {
    /// Default hash abbreviation length.
    pub const DEFAULT_ABBREV: usize = 12;

    /// The oldest commit reachable from `HEAD`.
    #[must_use]
    pub fn base() -> Self {
        Self {
            position: LogPosition::Tail,
            ..Self::default()
        }
    }
}

impl Default for ShaQuery {
    fn default() -> Self {
        Self {
            commit: "HEAD".into(),
            abbrev: Self::DEFAULT_ABBREV,
            position: LogPosition::Head,
        }
    }
}

/// A remote to register during [`GitShell::setup`](crate::GitShell::setup).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteSpec {
    /// Remote name.
    pub name: String,
    /// Fetch/push URL.
    pub url: String,
}

impl RemoteSpec {
    /// Create a remote spec.
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// Repository preparation performed by [`GitShell::setup`](crate::GitShell::setup).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetupOptions {
    /// Run `git init` when the working directory is not a repository.
    pub init: bool,
    /// Remotes to add or update.
    pub remotes: Vec<RemoteSpec>,
    /// Fetch every listed remote after adding it.
    pub fetch_all: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_flags() {
        assert!(MergeOptions::default().flags().is_empty());

        let options = MergeOptions {
            no_ff: true,
            add_log: true,
            abort: false,
        };
        assert_eq!(options.flags(), vec!["--no-ff", "--log"]);
    }

    #[test]
    fn test_sha_query_defaults() {
        let query = ShaQuery::default();
        assert_eq!(query.commit, "HEAD");
        assert_eq!(query.abbrev, 12);
        assert_eq!(query.position, LogPosition::Head);
        assert_eq!(ShaQuery::base().position, LogPosition::Tail);
    }
}
