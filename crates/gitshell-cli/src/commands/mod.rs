//! CLI definition and shared command plumbing.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use gitshell_core::{ExecMode, ExecResult, ExecutorConfig};
use tracing::debug;

use crate::output;

pub mod completions;
pub mod git;
pub mod run;

/// Default config file, looked up in the current directory.
pub const DEFAULT_CONFIG: &str = "gitshell.toml";

/// Run commands and common git chores, always reporting exit code, stdout
/// and stderr.
#[derive(Debug, Parser)]
#[command(name = "gitshell", version, about, propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Flags shared by every subcommand. Command-line values override the
/// config file.
#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Working directory for executed commands.
    #[arg(short = 'C', long = "cwd", global = true, value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Config file to load.
    #[arg(long, global = true, value_name = "PATH", default_value = DEFAULT_CONFIG)]
    pub config: PathBuf,

    /// Echo output line by line while the command runs.
    #[arg(long, global = true)]
    pub stream: bool,

    /// Log commands without running them.
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Shell used for shell-interpreted commands.
    #[arg(long = "shell", id = "shell_path", global = true, value_name = "PATH")]
    pub shell_path: Option<PathBuf>,

    /// Git binary to invoke.
    #[arg(long, global = true, value_name = "PATH")]
    pub git: Option<PathBuf>,

    /// Only print essential output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl GlobalArgs {
    /// Load the config file and overlay command-line flags.
    pub fn executor_config(&self) -> Result<ExecutorConfig> {
        let mut config = ExecutorConfig::load(&self.config)
            .with_context(|| format!("Failed to load config from {}", self.config.display()))?;

        if let Some(cwd) = &self.cwd {
            config.working_dir.clone_from(cwd);
        }
        if let Some(shell) = &self.shell_path {
            config.shell.clone_from(shell);
        }
        if let Some(git) = &self.git {
            config.git_binary.clone_from(git);
        }
        config.stream_output |= self.stream;
        config.dry_run |= self.dry_run;

        debug!(?config, "effective configuration");
        Ok(config)
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run a command and report its result.
    Run(RunArgs),

    /// Git helpers.
    Git {
        #[command(subcommand)]
        command: GitCommand,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Join the arguments and run them through the shell.
    #[arg(long = "sh")]
    pub use_shell: bool,

    /// Log captured output through the logger as well.
    #[arg(long)]
    pub log_output: bool,

    /// Print the result as JSON.
    #[arg(long)]
    pub json: bool,

    /// Command and arguments.
    #[arg(last = true, required = true, value_name = "ARGS")]
    pub args: Vec<String>,
}

#[derive(Debug, Subcommand)]
pub enum GitCommand {
    /// Initialize the working directory unless it already is a repository.
    Init,

    /// Check whether the working directory is a repository.
    Valid,

    /// Print the checked-out branch.
    CurrentBranch,

    /// Check whether a branch exists.
    BranchExists {
        branch: String,
        /// Look for the branch on this remote instead.
        #[arg(long)]
        remote: Option<String>,
    },

    /// Check out a branch.
    Checkout {
        branch: String,
        /// Check out `<remote>/<branch>`.
        #[arg(long)]
        remote: Option<String>,
    },

    /// Delete a branch locally and optionally on a remote.
    Delete {
        branch: String,
        /// Also delete the branch on this remote.
        #[arg(long)]
        remote: Option<String>,
        /// Delete even if unmerged.
        #[arg(short, long)]
        force: bool,
    },

    /// Merge a branch into a local branch.
    Merge {
        /// Branch to merge into.
        #[arg(required_unless_present = "abort")]
        local: Option<String>,
        /// Branch to merge.
        #[arg(required_unless_present = "abort")]
        incoming: Option<String>,
        /// Pull the incoming branch from this remote.
        #[arg(long)]
        remote: Option<String>,
        /// Always create a merge commit.
        #[arg(long)]
        no_ff: bool,
        /// Add commit descriptions to the merge message.
        #[arg(long)]
        log: bool,
        /// Abort the merge in progress.
        #[arg(long)]
        abort: bool,
    },

    /// Push a local branch to a remote branch.
    Push {
        local: String,
        remote: String,
        /// Destination branch (defaults to the local branch name).
        remote_branch: Option<String>,
        #[arg(short, long)]
        force: bool,
        /// Push to `refs/for/<branch>` for review.
        #[arg(long)]
        refs: bool,
    },

    /// Add a remote, replacing it when the URL changed.
    AddRemote {
        name: String,
        url: String,
        /// Replace the remote even when the URL is unchanged.
        #[arg(long = "override")]
        override_existing: bool,
    },

    /// Check whether a merge, rebase or cherry-pick is in progress.
    InProgress,

    /// Print an abbreviated commit SHA.
    Sha {
        #[arg(default_value = "HEAD")]
        commit: String,
        #[arg(long, default_value_t = gitshell_git::ShaQuery::DEFAULT_ABBREV)]
        abbrev: usize,
        /// Print the oldest reachable commit instead of the newest.
        #[arg(long)]
        base: bool,
    },

    /// Run git with arbitrary arguments.
    Raw {
        #[arg(last = true, required = true, value_name = "ARGS")]
        args: Vec<String>,
    },
}

/// Process exit status for a command result.
///
/// Sentinel codes and anything outside 0..=255 become 1.
pub fn exit_code(result: &ExecResult) -> i32 {
    if (0..=255).contains(&result.code) {
        result.code
    } else {
        1
    }
}

/// Print a result the way the user expects to see command output.
///
/// Streamed output has already been echoed line by line, so only buffered
/// output is printed here. Synthesized failures are reported as errors.
pub fn report(result: &ExecResult, mode: ExecMode) -> i32 {
    if result.code < 0 {
        output::error(result.stderr_trimmed());
        return exit_code(result);
    }
    if mode == ExecMode::Buffered {
        output::passthrough(&result.stdout, &result.stderr);
    }
    if result.code > 0 {
        output::note(&format!("Command finished with {}", output::exit_status(result.code)));
    }
    exit_code(result)
}
