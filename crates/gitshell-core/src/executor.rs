//! The command executor: dry-run and working-directory policy, mode
//! selection, and the last-command bookkeeping.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, error, info};

use crate::config::ExecutorConfig;
use crate::error::Result;
use crate::launch::{ExecMode, Launcher, SystemLauncher};
use crate::request::ExecRequest;
use crate::result::ExecResult;
use crate::sink::OutputSink;
use crate::traits::CommandRunner;

/// Runs commands for one working context, such as a repository checkout.
///
/// An executor is reused across many calls. Each executed call records its
/// command line and result, and moves the executor's working directory to the
/// directory that call ran in.
///
/// # Examples
///
/// ```no_run
/// use gitshell_core::{ExecRequest, Executor, ExecutorConfig};
///
/// let mut sh = Executor::new(ExecutorConfig::at("/tmp"))?;
/// let result = sh.execute(&ExecRequest::new(["ls", "-la"]));
/// if result.success() {
///     println!("{}", result.stdout_trimmed());
/// }
/// # Ok::<(), gitshell_core::Error>(())
/// ```
#[derive(Debug)]
pub struct Executor<L = SystemLauncher> {
    launcher: L,
    working_dir: PathBuf,
    shell: PathBuf,
    git_binary: PathBuf,
    dry_run: bool,
    streaming: bool,
    last_command: Option<String>,
    last_result: ExecResult,
}

impl Executor<SystemLauncher> {
    /// Create an executor that echoes streamed output to the console.
    ///
    /// # Errors
    /// Returns error if the config fails validation.
    pub fn new(config: ExecutorConfig) -> Result<Self> {
        Self::with_launcher(config, SystemLauncher::default())
    }

    /// Create an executor that echoes streamed output to `sink`.
    ///
    /// # Errors
    /// Returns error if the config fails validation.
    pub fn with_sink(config: ExecutorConfig, sink: Arc<dyn OutputSink>) -> Result<Self> {
        Self::with_launcher(config, SystemLauncher::new(sink))
    }
}

impl<L: Launcher> Executor<L> {
    /// Create an executor that hands processes to a custom launcher.
    ///
    /// # Errors
    /// Returns error if the config fails validation.
    pub fn with_launcher(config: ExecutorConfig, launcher: L) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            launcher,
            working_dir: config.working_dir,
            shell: config.shell,
            git_binary: config.git_binary,
            dry_run: config.dry_run,
            streaming: config.stream_output,
            last_command: None,
            last_result: ExecResult::noop(),
        })
    }

    /// Run a request and return its result.
    ///
    /// Never panics and never returns an error: rejected arguments, dry
    /// runs and spawn failures are all reported through the result.
    ///
    /// There is no timeout. A child that never exits blocks the caller.
    pub fn execute(&mut self, request: &ExecRequest) -> ExecResult {
        let working_dir = request
            .options
            .working_dir
            .clone()
            .unwrap_or_else(|| self.working_dir.clone());
        let dry_run = request.options.dry_run || self.dry_run;
        let mode = self.mode();

        debug!(args = ?request.args, "command arguments");
        debug!(
            "wd={}, log_output={}, dry_run={dry_run}, shell={}, mode={mode}",
            working_dir.display(),
            request.options.log_output,
            request.use_shell,
        );

        let invocation = match request.to_invocation(&self.shell, working_dir) {
            Ok(invocation) => invocation,
            Err(err) => {
                error!("{err}");
                return ExecResult::from(err);
            }
        };

        info!("Executing {}", invocation.display);

        if dry_run {
            return ExecResult::noop();
        }

        self.last_command = Some(invocation.display.clone());
        self.working_dir.clone_from(&invocation.working_dir);

        let result = self
            .launcher
            .launch(&invocation, mode)
            .unwrap_or_else(|err| {
                error!("{err}");
                ExecResult::from(err)
            });

        self.last_result = result.clone();
        result
    }

    /// Run `args` as an argv command with default options.
    pub fn cmd<I, S>(&mut self, args: I) -> ExecResult
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.execute(&ExecRequest::new(args))
    }

    /// Run `args` through the shell with default options.
    pub fn sh<I, S>(&mut self, args: I) -> ExecResult
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.execute(&ExecRequest::shell(args))
    }

    /// The mode the next call will run in.
    #[must_use]
    pub const fn mode(&self) -> ExecMode {
        ExecMode::from_streaming(self.streaming)
    }

    /// Enable or disable dry-run for every call.
    pub const fn set_dry_run(&mut self, dry_run: bool) {
        self.dry_run = dry_run;
    }

    /// Whether the instance-wide dry-run toggle is set.
    #[must_use]
    pub const fn dry_run(&self) -> bool {
        self.dry_run
    }

    /// Enable or disable streaming mode.
    pub const fn set_streaming(&mut self, streaming: bool) {
        self.streaming = streaming;
    }

    /// Replace the interpreter used for shell-interpreted commands.
    pub fn set_shell(&mut self, shell: impl Into<PathBuf>) {
        self.shell = shell.into();
    }

    /// The interpreter used for shell-interpreted commands.
    #[must_use]
    pub fn shell(&self) -> &Path {
        &self.shell
    }

    /// The git binary configured for this context.
    #[must_use]
    pub fn git_binary(&self) -> &Path {
        &self.git_binary
    }

    /// Move the default working directory.
    pub fn set_working_dir(&mut self, dir: impl Into<PathBuf>) {
        self.working_dir = dir.into();
    }

    /// Command line of the most recent executed call.
    #[must_use]
    pub fn last_command(&self) -> Option<&str> {
        self.last_command.as_deref()
    }

    /// Result of the most recent executed call.
    #[must_use]
    pub const fn last_result(&self) -> &ExecResult {
        &self.last_result
    }

    /// The launcher processes are handed to.
    #[must_use]
    pub const fn launcher(&self) -> &L {
        &self.launcher
    }
}

impl<L: Launcher> CommandRunner for Executor<L> {
    fn execute(&mut self, request: &ExecRequest) -> ExecResult {
        Self::execute(self, request)
    }

    fn working_dir(&self) -> &Path {
        &self.working_dir
    }
}
