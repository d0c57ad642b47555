//! The uniform `(code, stdout, stderr)` result returned by every run.

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Outcome of a single command invocation.
///
/// Every path through the executor produces one of these, including dry runs,
/// rejected arguments and spawn failures, so callers only ever branch on
/// [`code`](Self::code).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecResult {
    /// Exit code; `0` means success.
    pub code: i32,
    /// Aggregated standard output.
    pub stdout: String,
    /// Aggregated standard error.
    pub stderr: String,
}

impl ExecResult {
    /// Sentinel code for rejected argument vectors.
    pub const INVALID_ARGUMENTS: i32 = -1;

    /// Sentinel code for processes that could not be spawned or captured.
    pub const SPAWN_FAILED: i32 = -2;

    /// Sentinel code for a child that exited without a code or known signal.
    pub const TERMINATED: i32 = -3;

    /// Build a result from its three parts.
    #[must_use]
    pub fn new(code: i32, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            code,
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    /// The `(0, "", "")` result of a skipped or no-op call.
    #[must_use]
    pub fn noop() -> Self {
        Self::default()
    }

    /// A synthesized failure with empty stdout.
    #[must_use]
    pub fn failure(code: i32, message: impl Into<String>) -> Self {
        Self::new(code, String::new(), message)
    }

    /// A synthesized `-1` result for a precondition failure.
    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::failure(Self::INVALID_ARGUMENTS, message)
    }

    /// Whether the command exited with code `0`.
    #[must_use]
    pub const fn success(&self) -> bool {
        self.code == 0
    }

    /// Stdout with trailing line terminators removed.
    #[must_use]
    pub fn stdout_trimmed(&self) -> &str {
        trim_newlines(&self.stdout)
    }

    /// Stderr with trailing line terminators removed.
    #[must_use]
    pub fn stderr_trimmed(&self) -> &str {
        trim_newlines(&self.stderr)
    }

    /// Convert into a `Result`, treating a non-zero code as an error.
    ///
    /// # Errors
    /// Returns [`Error::CommandFailed`] when `code != 0`.
    pub fn into_result(self) -> Result<Self, Error> {
        if self.success() {
            Ok(self)
        } else {
            Err(Error::CommandFailed {
                code: self.code,
                stderr: self.stderr_trimmed().to_string(),
            })
        }
    }
}

impl From<&Error> for ExecResult {
    fn from(err: &Error) -> Self {
        let code = match err {
            Error::CommandFailed { code, .. } => *code,
            _ if err.is_invalid_arguments() => Self::INVALID_ARGUMENTS,
            _ => Self::SPAWN_FAILED,
        };
        Self::failure(code, err.to_string())
    }
}

impl From<Error> for ExecResult {
    fn from(err: Error) -> Self {
        Self::from(&err)
    }
}

fn trim_newlines(text: &str) -> &str {
    text.trim_end_matches(['\n', '\r'])
}
