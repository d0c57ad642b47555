//! # gitshell-git
//!
//! Git command facade for gitshell. Wraps a
//! [`CommandRunner`](gitshell_core::CommandRunner) and turns common repository
//! chores (remotes, branch checks, checkout, delete, merge, push and SHA
//! lookups) into single calls returning [`ExecResult`](gitshell_core::ExecResult).
//!
//! Branch and remote names are validated as [`RefName`]s before they reach a
//! command line; failed preconditions come back as results carrying the
//! invalid-arguments sentinel rather than running git at all.

mod error;
mod markers;
mod options;
mod parse;
mod ref_name;
mod shell;

#[cfg(test)]
mod test_mocks;

pub use error::{Error, Result};
pub use markers::{OPERATION_MARKERS, is_repository};
pub use options::{DeleteOptions, MergeOptions, PushOptions, RemoteSpec, SetupOptions, ShaQuery};
pub use parse::LogPosition;
pub use ref_name::{RefKind, RefName};
pub use shell::GitShell;
