//! The git facade: git invocations built on any [`CommandRunner`].

use std::path::{Path, PathBuf};

use gitshell_core::{
    CallOptions, CommandRunner, ExecRequest, ExecResult, Executor, ExecutorConfig, shell_quote,
};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::markers;
use crate::options::{DeleteOptions, MergeOptions, PushOptions, SetupOptions, ShaQuery};
use crate::parse;
use crate::ref_name::RefName;

/// Git helpers layered over a command runner.
///
/// Every command runs as `<git> <args...>` through the runner's shell.
/// Operations return the runner's [`ExecResult`] unchanged, or a synthesized
/// invalid-arguments result when a precondition fails before git is run.
///
/// # Examples
///
/// ```no_run
/// use gitshell_core::ExecutorConfig;
/// use gitshell_git::{GitShell, PushOptions};
///
/// let mut git = GitShell::open(ExecutorConfig::at("/srv/checkout"))?;
/// git.init();
/// git.add_remote("origin", "https://example.com/repo.git", false);
/// let pushed = git.push("main", "origin", "main", PushOptions::default());
/// assert!(pushed.success());
/// # Ok::<(), gitshell_core::Error>(())
/// ```
#[derive(Debug)]
pub struct GitShell<R = Executor> {
    runner: R,
    git_binary: PathBuf,
}

impl GitShell<Executor> {
    /// Create a facade over a new executor, using its configured git binary.
    ///
    /// # Errors
    /// Returns error if the config fails validation.
    pub fn open(config: ExecutorConfig) -> gitshell_core::Result<Self> {
        Ok(Self::from_executor(Executor::new(config)?))
    }

    /// Wrap an existing executor.
    #[must_use]
    pub fn from_executor(executor: Executor) -> Self {
        let git_binary = executor.git_binary().to_path_buf();
        Self::new(executor, git_binary)
    }
}

impl<R: CommandRunner> GitShell<R> {
    /// Wrap a runner, invoking git through `git_binary`.
    pub fn new(runner: R, git_binary: impl Into<PathBuf>) -> Self {
        Self {
            runner,
            git_binary: git_binary.into(),
        }
    }

    /// Wrap a runner and prepare the repository.
    ///
    /// Failures are logged and do not stop the remaining steps.
    pub fn setup(runner: R, git_binary: impl Into<PathBuf>, options: &SetupOptions) -> Self {
        let mut git = Self::new(runner, git_binary);

        if options.init {
            let result = git.init();
            if !result.success() {
                warn!("git init failed: {}", result.stderr_trimmed());
            }
        }

        for remote in &options.remotes {
            let result = git.add_remote(&remote.name, &remote.url, false);
            if !result.success() {
                warn!("failed to add remote {}: {}", remote.name, result.stderr_trimmed());
                continue;
            }
            if options.fetch_all {
                let result = git.fetch(&remote.name);
                if !result.success() {
                    warn!("failed to fetch {}: {}", remote.name, result.stderr_trimmed());
                }
            }
        }

        git
    }

    /// The wrapped runner.
    #[must_use]
    pub const fn runner(&self) -> &R {
        &self.runner
    }

    /// Mutable access to the wrapped runner.
    pub const fn runner_mut(&mut self) -> &mut R {
        &mut self.runner
    }

    /// Unwrap the runner.
    pub fn into_runner(self) -> R {
        self.runner
    }

    /// The git binary commands are run with.
    #[must_use]
    pub fn git_binary(&self) -> &Path {
        &self.git_binary
    }

    /// The runner's current working directory.
    #[must_use]
    pub fn working_dir(&self) -> &Path {
        self.runner.working_dir()
    }

    // === Raw commands ===

    /// Run `git <args...>` with default call options.
    pub fn git(&mut self, args: &[&str]) -> ExecResult {
        self.git_with(args, &CallOptions::default())
    }

    /// Run `git <args...>` with explicit call options.
    ///
    /// Arguments are joined into one shell command line as given; quote
    /// anything that must reach git as a single word.
    pub fn git_with(&mut self, args: &[&str], options: &CallOptions) -> ExecResult {
        let binary = shell_quote(&self.git_binary.to_string_lossy());
        let request = ExecRequest::shell(
            std::iter::once(binary).chain(args.iter().map(|arg| (*arg).to_string())),
        )
        .with_options(options.clone());
        self.runner.execute(&request)
    }

    // === Repository ===

    /// Whether the working directory is a git repository.
    #[must_use]
    pub fn valid(&self) -> bool {
        markers::is_repository(self.working_dir())
    }

    /// Initialize the working directory unless it already is a repository.
    pub fn init(&mut self) -> ExecResult {
        if self.valid() {
            debug!("{} is already a repository", self.working_dir().display());
            return ExecResult::noop();
        }
        self.git(&["init", "."])
    }

    /// Whether a merge, rebase or cherry-pick is stopped part-way, or
    /// `git rerere` still has recorded conflict resolutions pending.
    pub fn in_progress(&mut self) -> bool {
        if let Some(marker) = markers::operation_marker(self.working_dir()) {
            debug!("operation in progress: {marker} present");
            return true;
        }
        !self.git(&["rerere", "diff"]).stdout.trim().is_empty()
    }

    // === Remotes ===

    /// The URL configured for a remote.
    pub fn remote_url(&mut self, name: &str) -> Option<String> {
        let name = RefName::remote(name).ok()?;
        let result = self.git(&["remote", "get-url", name.as_str()]);
        let url = result.stdout.trim();
        (result.success() && !url.is_empty()).then(|| url.to_string())
    }

    /// Add a remote, replacing it when the URL differs.
    ///
    /// Nothing is run beyond the URL lookup when the remote already points at
    /// `url`, unless `override_existing` is set.
    pub fn add_remote(&mut self, name: &str, url: &str, override_existing: bool) -> ExecResult {
        self.try_add_remote(name, url, override_existing)
            .unwrap_or_else(ExecResult::from)
    }

    fn try_add_remote(&mut self, name: &str, url: &str, override_existing: bool) -> Result<ExecResult> {
        let name = RefName::remote(name)?;
        let url = url.trim();
        if url.is_empty() {
            return Err(Error::EmptyArgument("remote url"));
        }

        let current = self.remote_url(&name);
        if !override_existing && current.as_deref() == Some(url) {
            debug!("remote {name} already points at {url}");
            return Ok(ExecResult::noop());
        }

        if current.is_some() {
            self.git(&["remote", "remove", name.as_str()]);
        }
        Ok(self.git(&["remote", "add", name.as_str(), &shell_quote(url)]))
    }

    /// Fetch a remote.
    pub fn fetch(&mut self, remote: &str) -> ExecResult {
        match RefName::remote(remote) {
            Ok(remote) => self.git(&["fetch", remote.as_str()]),
            Err(err) => err.into(),
        }
    }

    // === Branches ===

    /// Whether a branch exists locally, or as `<remote>/<branch>` when a
    /// remote is given.
    pub fn valid_branch(&mut self, remote: Option<&str>, branch: &str) -> bool {
        let Ok(branch) = RefName::branch(branch) else {
            return false;
        };
        match optional_remote(remote) {
            Ok(Some(remote)) => {
                let qualified = branch.qualified(&remote);
                self.branch_listed(&["branch", "-r", "--list", &qualified], &qualified)
            }
            Ok(None) => self.branch_listed(&["branch", "--list", branch.as_str()], &branch),
            Err(_) => false,
        }
    }

    fn branch_listed(&mut self, args: &[&str], expected: &str) -> bool {
        let result = self.git(args);
        result.success() && parse::listed_branch(&result.stdout) == expected
    }

    /// The checked-out branch, or the short SHA of a detached HEAD.
    pub fn current_branch(&mut self) -> Option<String> {
        let result = self.git(&["branch"]);
        if !result.success() {
            return None;
        }
        parse::current_branch(&result.stdout)
    }

    /// Check out a local branch, or `<remote>/<branch>` when a remote is given.
    pub fn checkout(&mut self, remote: Option<&str>, branch: &str) -> bool {
        let target = match checkout_target(remote, branch) {
            Ok(target) => target,
            Err(err) => {
                debug!("checkout skipped: {err}");
                return false;
            }
        };
        self.git(&["checkout", &target]).success()
    }

    /// Delete a branch locally and, when `options.remote` is set, on the
    /// remote.
    ///
    /// A checked-out branch is left first by checking out the parent of
    /// `HEAD`. Returns the first failing git result, the remote delete result,
    /// or the local delete result when no remote branch was removed.
    pub fn delete(&mut self, branch: &str, options: &DeleteOptions) -> ExecResult {
        self.try_delete(branch, options).unwrap_or_else(ExecResult::from)
    }

    fn try_delete(&mut self, branch: &str, options: &DeleteOptions) -> Result<ExecResult> {
        let branch = RefName::branch(branch)?;
        let remote = optional_remote(options.remote.as_deref())?;
        let mut local = None;

        if self.valid_branch(None, &branch) {
            if self.current_branch().as_deref() == Some(branch.as_str()) {
                if let Some(head) = self.head_sha() {
                    debug!("{branch} is checked out, moving to {head}~1");
                    let moved = self.git(&["checkout", &format!("{head}~1")]);
                    if !moved.success() {
                        return Ok(moved);
                    }
                }
            }

            let flag = if options.force { "-D" } else { "-d" };
            let result = self.git(&["branch", flag, branch.as_str()]);
            if !result.success() {
                return Ok(result);
            }
            local = Some(result);
        }

        if let Some(remote) = remote {
            if self.valid_branch(Some(remote.as_str()), &branch) {
                return Ok(self.git(&["push", remote.as_str(), "--delete", branch.as_str()]));
            }
        }

        local.ok_or_else(|| Error::NothingToDelete(branch.to_string()))
    }

    // === Merge and push ===

    /// Merge `rbranch` into `lbranch`, pulling from `remote` when given.
    ///
    /// With `options.abort` the merge in progress is aborted instead and the
    /// branch arguments are ignored.
    pub fn merge(
        &mut self,
        lbranch: &str,
        remote: Option<&str>,
        rbranch: &str,
        options: MergeOptions,
    ) -> ExecResult {
        if options.abort {
            return self.git(&["merge", "--abort"]);
        }
        self.try_merge(lbranch, remote, rbranch, options)
            .unwrap_or_else(ExecResult::from)
    }

    fn try_merge(
        &mut self,
        lbranch: &str,
        remote: Option<&str>,
        rbranch: &str,
        options: MergeOptions,
    ) -> Result<ExecResult> {
        let local = RefName::branch(lbranch)?;
        if !self.valid_branch(None, &local) {
            return Err(Error::BranchNotFound(local.to_string()));
        }

        let checkout = self.git(&["checkout", local.as_str()]);
        if !checkout.success() {
            return Ok(checkout);
        }

        let incoming = RefName::branch(rbranch)?;
        let remote = optional_remote(remote)?;
        if !self.valid_branch(remote.as_deref(), &incoming) {
            let missing = remote
                .as_ref()
                .map_or_else(|| incoming.to_string(), |remote| incoming.qualified(remote));
            return Err(Error::BranchNotFound(missing));
        }

        let mut args = Vec::new();
        match &remote {
            Some(remote) => {
                args.push("pull");
                args.extend(options.flags());
                args.push(remote.as_str());
            }
            None => {
                args.push("merge");
                args.extend(options.flags());
            }
        }
        args.push(incoming.as_str());

        Ok(self.git(&args))
    }

    /// Push `lbranch` to `rbranch` on `remote`.
    ///
    /// The push is forced when requested, and also whenever the destination
    /// branch does not exist on the remote yet.
    pub fn push(
        &mut self,
        lbranch: &str,
        remote: &str,
        rbranch: &str,
        options: PushOptions,
    ) -> ExecResult {
        self.try_push(lbranch, remote, rbranch, options)
            .unwrap_or_else(ExecResult::from)
    }

    fn try_push(
        &mut self,
        lbranch: &str,
        remote: &str,
        rbranch: &str,
        options: PushOptions,
    ) -> Result<ExecResult> {
        for (value, what) in [
            (lbranch, "local branch"),
            (remote, "remote"),
            (rbranch, "remote branch"),
        ] {
            if value.trim().is_empty() {
                return Err(Error::EmptyArgument(what));
            }
        }

        let local = RefName::branch(lbranch)?;
        let remote = RefName::remote(remote)?;
        let mut target = RefName::branch(rbranch)?;
        if options.use_refs {
            target = RefName::branch(&format!("refs/for/{target}"))?;
        }

        let mut force = options.force;
        if !force && !self.valid_branch(Some(remote.as_str()), &target) {
            debug!("{} does not exist yet, forcing push", target.qualified(&remote));
            force = true;
        }

        let refspec = format!("{local}:{target}");
        let mut args = vec!["push"];
        if force {
            args.push("-f");
        }
        args.push(remote.as_str());
        args.push(&refspec);

        Ok(self.git(&args))
    }

    // === Commits ===

    /// The abbreviated SHA at one end of `git log <commit>`.
    pub fn sha(&mut self, query: &ShaQuery) -> Option<String> {
        let commit = shell_quote(query.commit.trim());
        let abbrev = format!("--abbrev={}", query.abbrev);
        let result = self.git(&["log", &commit, "--oneline", &abbrev]);
        if !result.success() {
            return None;
        }
        parse::log_sha(&result.stdout, query.position).map(ToString::to_string)
    }

    /// Abbreviated SHA of `HEAD`.
    pub fn head_sha(&mut self) -> Option<String> {
        self.sha(&ShaQuery::default())
    }

    /// Abbreviated SHA of the oldest commit reachable from `HEAD`.
    pub fn base_sha(&mut self) -> Option<String> {
        self.sha(&ShaQuery::base())
    }
}

/// A blank remote means "no remote".
fn optional_remote(remote: Option<&str>) -> Result<Option<RefName>> {
    remote
        .filter(|remote| !remote.trim().is_empty())
        .map(RefName::remote)
        .transpose()
}

fn checkout_target(remote: Option<&str>, branch: &str) -> Result<String> {
    let branch = RefName::branch(branch)?;
    Ok(match optional_remote(remote)? {
        Some(remote) => branch.qualified(&remote),
        None => branch.to_string(),
    })
}
