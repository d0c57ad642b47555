//! `gitshell git` commands - Git chores through the facade.

use anyhow::{Context, Result};
use gitshell_core::{ExecResult, ExecutorConfig, shell_quote};
use gitshell_git::{DeleteOptions, GitShell, LogPosition, MergeOptions, PushOptions, ShaQuery};

use super::{GitCommand, report};
use crate::output;

/// Run a git subcommand, returning the process exit status to use.
pub fn run(command: GitCommand, config: ExecutorConfig) -> Result<i32> {
    let mut git = GitShell::open(config).context("Invalid executor configuration")?;

    let code = match command {
        GitCommand::Init => {
            let result = git.init();
            finish(&git, &result)
        }
        GitCommand::Valid => {
            let dir = git.working_dir().display().to_string();
            check(
                git.valid(),
                &format!("{dir} is a git repository"),
                &format!("{dir} is not a git repository"),
            )
        }
        GitCommand::CurrentBranch => match git.current_branch() {
            Some(branch) => {
                output::essential(&branch);
                0
            }
            None => {
                output::warn("No branch is checked out");
                1
            }
        },
        GitCommand::BranchExists { branch, remote } => {
            let name = qualified(remote.as_deref(), &branch);
            check(
                git.valid_branch(remote.as_deref(), &branch),
                &format!("Branch {name} exists"),
                &format!("Branch {name} not found"),
            )
        }
        GitCommand::Checkout { branch, remote } => {
            let name = qualified(remote.as_deref(), &branch);
            check(
                git.checkout(remote.as_deref(), &branch),
                &format!("Checked out {name}"),
                &format!("Failed to check out {name}"),
            )
        }
        GitCommand::Delete {
            branch,
            remote,
            force,
        } => {
            let result = git.delete(&branch, &DeleteOptions { remote, force });
            finish(&git, &result)
        }
        GitCommand::Merge {
            local,
            incoming,
            remote,
            no_ff,
            log,
            abort,
        } => {
            let options = MergeOptions {
                no_ff,
                add_log: log,
                abort,
            };
            let result = git.merge(
                local.as_deref().unwrap_or_default(),
                remote.as_deref(),
                incoming.as_deref().unwrap_or_default(),
                options,
            );
            finish(&git, &result)
        }
        GitCommand::Push {
            local,
            remote,
            remote_branch,
            force,
            refs,
        } => {
            let target = remote_branch.unwrap_or_else(|| local.clone());
            let options = PushOptions {
                force,
                use_refs: refs,
            };
            let result = git.push(&local, &remote, &target, options);
            finish(&git, &result)
        }
        GitCommand::AddRemote {
            name,
            url,
            override_existing,
        } => {
            let result = git.add_remote(&name, &url, override_existing);
            finish(&git, &result)
        }
        GitCommand::InProgress => check(
            git.in_progress(),
            "An operation is in progress",
            "No operation in progress",
        ),
        GitCommand::Sha {
            commit,
            abbrev,
            base,
        } => {
            let query = ShaQuery {
                commit,
                abbrev,
                position: if base { LogPosition::Tail } else { LogPosition::Head },
            };
            match git.sha(&query) {
                Some(sha) => {
                    output::essential(&sha);
                    0
                }
                None => {
                    output::warn(&format!("No commits found for {}", query.commit));
                    1
                }
            }
        }
        GitCommand::Raw { args } => {
            let quoted: Vec<String> = args.iter().map(|arg| shell_quote(arg)).collect();
            let args: Vec<&str> = quoted.iter().map(String::as_str).collect();
            let result = git.git(&args);
            finish(&git, &result)
        }
    };

    Ok(code)
}

fn finish(git: &GitShell, result: &ExecResult) -> i32 {
    report(result, git.runner().mode())
}

/// Map a yes/no answer to an exit status, telling the user which it was.
fn check(answer: bool, yes: &str, no: &str) -> i32 {
    if answer {
        output::success(yes);
        0
    } else {
        output::warn(no);
        1
    }
}

fn qualified(remote: Option<&str>, branch: &str) -> String {
    match remote {
        Some(remote) if !remote.trim().is_empty() => format!("{remote}/{branch}"),
        _ => branch.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualified_names() {
        assert_eq!(qualified(None, "main"), "main");
        assert_eq!(qualified(Some("origin"), "main"), "origin/main");
        assert_eq!(qualified(Some(" "), "main"), "main");
    }
}
