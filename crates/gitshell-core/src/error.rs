//! Error types for gitshell-core.

use std::path::PathBuf;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while preparing or running a command.
///
/// The executor never returns these directly from `execute`; they are folded
/// into an [`ExecResult`](crate::ExecResult) with a sentinel exit code.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The argument vector was empty or contained only blank entries.
    #[error("invalid arguments: empty command")]
    EmptyCommand,

    /// An argument contained an interior NUL byte.
    #[error("invalid arguments: NUL byte in argument {0:?}")]
    NulInArgument(String),

    /// The working directory does not exist or is not a directory.
    #[error("invalid working directory: {}", .0.display())]
    InvalidWorkingDir(PathBuf),

    /// The process could not be spawned.
    #[error("failed to spawn '{program}': {source}")]
    Spawn {
        /// Program or interpreter that failed to launch.
        program: String,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// Reading from or waiting on the child failed after spawn.
    #[error("failed to capture output of '{command}': {source}")]
    Capture {
        /// Command line being run.
        command: String,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// A stream worker thread panicked.
    #[error("output worker '{0}' panicked")]
    WorkerPanicked(&'static str),

    /// The command ran but exited unsuccessfully.
    #[error("command exited with code {code}: {stderr}")]
    CommandFailed {
        /// Exit code reported by the executor.
        code: i32,
        /// Captured stderr, trailing newlines removed.
        stderr: String,
    },

    /// Configuration is unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error.
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl Error {
    /// Whether this error is a precondition failure on the request itself.
    #[must_use]
    pub const fn is_invalid_arguments(&self) -> bool {
        matches!(self, Self::EmptyCommand | Self::NulInArgument(_))
    }
}
