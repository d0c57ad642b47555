//! Per-call execution requests.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Options that override executor defaults for exactly one call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallOptions {
    /// Working directory for this call; the executor's current one if `None`.
    pub working_dir: Option<PathBuf>,
    /// Log captured output (buffered) or every live line (streaming).
    pub log_output: bool,
    /// Skip execution for this call.
    pub dry_run: bool,
}

/// A single command to run.
///
/// # Examples
///
/// ```
/// use gitshell_core::ExecRequest;
///
/// let request = ExecRequest::new(["ls", "-la"]).cwd("/tmp").dry_run(true);
/// assert_eq!(request.command_line(), "ls -la");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecRequest {
    /// Argument sequence forming one logical command line.
    pub args: Vec<String>,
    /// Run through the configured shell as a single joined string.
    pub use_shell: bool,
    /// Per-call overrides.
    pub options: CallOptions,
}

impl ExecRequest {
    /// Create a request for the given argument sequence.
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Create a shell-interpreted request.
    pub fn shell<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(args).use_shell(true)
    }

    /// Set whether the command is interpreted by the shell.
    #[must_use]
    pub const fn use_shell(mut self, use_shell: bool) -> Self {
        self.use_shell = use_shell;
        self
    }

    /// Override the working directory for this call.
    #[must_use]
    pub fn cwd(mut self, dir: impl Into<PathBuf>) -> Self {
        self.options.working_dir = Some(dir.into());
        self
    }

    /// Log output for this call.
    #[must_use]
    pub const fn log_output(mut self, log_output: bool) -> Self {
        self.options.log_output = log_output;
        self
    }

    /// Skip execution for this call.
    #[must_use]
    pub const fn dry_run(mut self, dry_run: bool) -> Self {
        self.options.dry_run = dry_run;
        self
    }

    /// Replace all per-call options at once.
    #[must_use]
    pub fn with_options(mut self, options: CallOptions) -> Self {
        self.options = options;
        self
    }

    /// The arguments joined by single spaces.
    #[must_use]
    pub fn command_line(&self) -> String {
        self.args.join(" ")
    }

    /// Check the argument invariants.
    ///
    /// # Errors
    /// Returns [`Error::EmptyCommand`] for an empty or all-blank sequence and
    /// [`Error::NulInArgument`] when an argument can't be passed to the OS.
    pub fn validate(&self) -> Result<()> {
        if self.args.iter().all(|arg| arg.trim().is_empty()) {
            return Err(Error::EmptyCommand);
        }
        if let Some(arg) = self.args.iter().find(|arg| arg.contains('\0')) {
            return Err(Error::NulInArgument(arg.clone()));
        }
        Ok(())
    }

    /// Resolve the program and argv to spawn.
    ///
    /// Shell requests become `<shell> -c "<joined>"`; argv requests run the
    /// first argument with the rest passed through untouched.
    ///
    /// # Errors
    /// Returns the same errors as [`validate`](Self::validate).
    pub(crate) fn to_invocation(&self, shell: &Path, working_dir: PathBuf) -> Result<Invocation> {
        self.validate()?;

        let (program, args) = if self.use_shell {
            (
                shell.as_os_str().to_string_lossy().into_owned(),
                vec!["-c".to_string(), self.command_line()],
            )
        } else {
            let mut args = self.args.iter().skip_while(|arg| arg.trim().is_empty());
            // validate() guarantees a non-blank argument exists
            let program = args.next().cloned().unwrap_or_default();
            (program, args.cloned().collect())
        };

        Ok(Invocation {
            program,
            args,
            working_dir,
            display: self.command_line(),
            log_output: self.options.log_output,
        })
    }
}

/// A fully resolved command, ready to hand to a [`Launcher`](crate::Launcher).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Program to execute (the shell in shell mode).
    pub program: String,
    /// Arguments after the program.
    pub args: Vec<String>,
    /// Directory the child runs in.
    pub working_dir: PathBuf,
    /// Human-readable command line for logs and errors.
    pub display: String,
    /// Whether output should also go to the log.
    pub log_output: bool,
}

/// Quote a single argument for inclusion in a `sh -c` command line.
///
/// Arguments made only of safe characters are returned unchanged.
///
/// ```
/// use gitshell_core::shell_quote;
///
/// assert_eq!(shell_quote("origin"), "origin");
/// assert_eq!(shell_quote("it's here"), r"'it'\''s here'");
/// ```
#[must_use]
pub fn shell_quote(arg: &str) -> String {
    let safe = !arg.is_empty()
        && arg.chars().all(|c| {
            c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '/' | ':' | '@' | '=' | '+' | ',' | '^')
        });
    if safe {
        return arg.to_string();
    }
    format!("'{}'", arg.replace('\'', r"'\''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_args_rejected() {
        let request = ExecRequest::new(Vec::<String>::new());
        assert!(matches!(request.validate(), Err(Error::EmptyCommand)));

        let blank = ExecRequest::new(["", "   "]);
        assert!(matches!(blank.validate(), Err(Error::EmptyCommand)));
    }

    #[test]
    fn test_nul_rejected() {
        let request = ExecRequest::new(["echo", "a\0b"]);
        assert!(matches!(request.validate(), Err(Error::NulInArgument(_))));
    }

    #[test]
    fn test_shell_invocation_joins_args() {
        let request = ExecRequest::shell(["git", "log --oneline", "| head -1"]);
        let invocation = request
            .to_invocation(Path::new("/bin/bash"), PathBuf::from("/tmp"))
            .unwrap();

        assert_eq!(invocation.program, "/bin/bash");
        assert_eq!(invocation.args, vec!["-c", "git log --oneline | head -1"]);
        assert_eq!(invocation.working_dir, PathBuf::from("/tmp"));
    }

    #[test]
    fn test_argv_invocation_keeps_args_verbatim() {
        let request = ExecRequest::new(["printf", "%s %s", "a b"]).log_output(true);
        let invocation = request
            .to_invocation(Path::new("/bin/sh"), PathBuf::from("."))
            .unwrap();

        assert_eq!(invocation.program, "printf");
        assert_eq!(invocation.args, vec!["%s %s", "a b"]);
        assert!(invocation.log_output);
    }

    #[test]
    fn test_builder_sets_options() {
        let request = ExecRequest::new(["ls"]).cwd("/var").dry_run(true);
        assert_eq!(request.options.working_dir, Some(PathBuf::from("/var")));
        assert!(request.options.dry_run);
        assert!(!request.options.log_output);
        assert!(!request.use_shell);
    }

    #[test]
    fn test_shell_quote() {
        assert_eq!(shell_quote("feature/x-1"), "feature/x-1");
        assert_eq!(shell_quote("git@github.com:o/r.git"), "git@github.com:o/r.git");
        assert_eq!(shell_quote("a b"), "'a b'");
        assert_eq!(shell_quote("$(rm -rf /)"), "'$(rm -rf /)'");
        assert_eq!(shell_quote(""), "''");
        // Tilde expansion would rewrite the word
        assert_eq!(shell_quote("~/repos/project.git"), "'~/repos/project.git'");
        assert_eq!(shell_quote("HEAD~1"), "'HEAD~1'");
    }
}
