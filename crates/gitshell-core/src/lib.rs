//! # gitshell-core
//!
//! Process execution core for gitshell. Runs argv or shell-interpreted
//! commands in buffered or streaming mode and always returns a uniform
//! [`ExecResult`] of exit code, stdout and stderr.
//!
//! Commands run to completion: there is no timeout or cancellation, so a
//! caller that needs bounded latency must supervise the child externally.

pub mod config;
mod error;
mod executor;
mod launch;
mod request;
mod result;
pub mod sink;
mod stream;
mod traits;

pub use config::ExecutorConfig;
pub use error::{Error, Result};
pub use executor::Executor;
pub use launch::{ExecMode, Launcher, SystemLauncher};
pub use request::{CallOptions, ExecRequest, Invocation, shell_quote};
pub use result::ExecResult;
pub use sink::{ConsoleSink, MemorySink, NullSink, OutputSink, Stream};
pub use stream::POLL_INTERVAL;
pub use traits::CommandRunner;
