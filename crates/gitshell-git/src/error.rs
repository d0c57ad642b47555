//! Error types for gitshell-git.

use gitshell_core::ExecResult;

use crate::ref_name::RefKind;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Precondition failures detected before git is invoked.
///
/// These never escape the facade as errors: they are turned into a
/// synthesized [`ExecResult`] with the invalid-arguments sentinel code.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A branch or remote name failed validation.
    #[error("invalid {kind} name '{name}': {reason}")]
    InvalidRefName {
        /// What the name was meant to be.
        kind: RefKind,
        /// The rejected name.
        name: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A required argument was empty after trimming.
    #[error("invalid arguments: {0} is empty")]
    EmptyArgument(&'static str),

    /// The branch does not exist where it was expected.
    #[error("invalid branch {0}")]
    BranchNotFound(String),

    /// Neither a local nor a remote branch existed to delete.
    #[error("invalid arguments: no local or remote branch '{0}' to delete")]
    NothingToDelete(String),
}

impl From<&Error> for ExecResult {
    fn from(err: &Error) -> Self {
        Self::invalid(err.to_string())
    }
}

impl From<Error> for ExecResult {
    fn from(err: Error) -> Self {
        Self::from(&err)
    }
}
