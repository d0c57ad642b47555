//! Process launching: spawn, buffered capture, and exit-status mapping.

use std::fmt;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::Arc;

use tracing::{debug, error};

use crate::error::{Error, Result};
use crate::request::Invocation;
use crate::result::ExecResult;
use crate::sink::{ConsoleSink, OutputSink};
use crate::stream;

/// How output is captured for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecMode {
    /// Block until exit, then take both streams whole.
    #[default]
    Buffered,
    /// Drain both streams line by line, echoing each line as it arrives.
    Streaming,
}

impl ExecMode {
    /// Mode for a streaming toggle.
    #[must_use]
    pub const fn from_streaming(streaming: bool) -> Self {
        if streaming {
            Self::Streaming
        } else {
            Self::Buffered
        }
    }
}

impl fmt::Display for ExecMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buffered => f.write_str("buffered"),
            Self::Streaming => f.write_str("streaming"),
        }
    }
}

/// Runs a resolved [`Invocation`] to completion.
///
/// The executor only calls this once dry-run and argument checks have
/// passed, so an implementation is the single place a process is created.
pub trait Launcher {
    /// Run the invocation in the given mode.
    ///
    /// # Errors
    /// Returns an error when the process can't be spawned or its output
    /// can't be collected. A non-zero exit is not an error.
    fn launch(&self, invocation: &Invocation, mode: ExecMode) -> Result<ExecResult>;
}

/// Launches real OS processes.
#[derive(Clone)]
pub struct SystemLauncher {
    sink: Arc<dyn OutputSink>,
}

impl SystemLauncher {
    /// Launcher echoing streamed lines to the given sink.
    #[must_use]
    pub fn new(sink: Arc<dyn OutputSink>) -> Self {
        Self { sink }
    }

    /// The sink streamed lines are echoed to.
    #[must_use]
    pub fn sink(&self) -> &Arc<dyn OutputSink> {
        &self.sink
    }
}

impl Default for SystemLauncher {
    fn default() -> Self {
        Self::new(Arc::new(ConsoleSink))
    }
}

impl fmt::Debug for SystemLauncher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SystemLauncher").finish_non_exhaustive()
    }
}

impl Launcher for SystemLauncher {
    fn launch(&self, invocation: &Invocation, mode: ExecMode) -> Result<ExecResult> {
        match mode {
            ExecMode::Buffered => run_buffered(invocation),
            ExecMode::Streaming => stream::run_streaming(invocation, self.sink.as_ref()),
        }
    }
}

/// Spawn the child with both output streams piped.
pub(crate) fn spawn(invocation: &Invocation) -> Result<Child> {
    if !invocation.working_dir.is_dir() {
        return Err(Error::InvalidWorkingDir(invocation.working_dir.clone()));
    }

    Command::new(&invocation.program)
        .args(&invocation.args)
        .current_dir(&invocation.working_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| Error::Spawn {
            program: invocation.program.clone(),
            source,
        })
}

fn run_buffered(invocation: &Invocation) -> Result<ExecResult> {
    let child = spawn(invocation)?;
    let output = child
        .wait_with_output()
        .map_err(|source| Error::Capture {
            command: invocation.display.clone(),
            source,
        })?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    if invocation.log_output {
        if !stdout.is_empty() {
            debug!("STDOUT: {stdout}");
        }
        if !stderr.is_empty() {
            error!("STDERR: {stderr}");
        }
    }

    Ok(ExecResult::new(exit_code(output.status), stdout, stderr))
}

/// Map an exit status to the result code, using `128 + signal` for signals.
pub(crate) fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    ExecResult::TERMINATED
}
