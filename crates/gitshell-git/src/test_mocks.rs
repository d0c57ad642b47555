//! Mock runner for testing the facade.
//!
//! Implements `CommandRunner` from gitshell-core so facade logic can be
//! exercised without spawning git.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use gitshell_core::{CommandRunner, ExecRequest, ExecResult};

pub const MOCK_GIT: &str = "/usr/bin/git";

/// Records every request and answers from a table of canned results.
///
/// Commands are keyed by the git subcommand line, without the binary, e.g.
/// `"branch --list main"`. Unknown commands get `(0, "", "")`.
pub struct MockRunner {
    workdir: PathBuf,
    responses: HashMap<String, ExecResult>,
    pub requests: Vec<ExecRequest>,
}

impl MockRunner {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
            responses: HashMap::new(),
            requests: Vec::new(),
        }
    }

    pub fn with_stdout(mut self, command: &str, stdout: &str) -> Self {
        self.set_response(command, ExecResult::new(0, stdout, ""));
        self
    }

    pub fn with_failure(mut self, command: &str, code: i32, stderr: &str) -> Self {
        self.set_response(command, ExecResult::new(code, "", stderr));
        self
    }

    pub fn set_response(&mut self, command: &str, result: ExecResult) {
        self.responses.insert(command.to_string(), result);
    }

    /// Every git subcommand line run so far, in order.
    pub fn commands(&self) -> Vec<String> {
        self.requests
            .iter()
            .map(|request| subcommand(&request.command_line()))
            .collect()
    }

    pub fn count(&self, command: &str) -> usize {
        self.commands().iter().filter(|c| *c == command).count()
    }

    pub fn position(&self, command: &str) -> Option<usize> {
        self.commands().iter().position(|c| c == command)
    }
}

impl CommandRunner for MockRunner {
    fn execute(&mut self, request: &ExecRequest) -> ExecResult {
        self.requests.push(request.clone());
        let command = subcommand(&request.command_line());
        self.responses.get(&command).cloned().unwrap_or_default()
    }

    fn working_dir(&self) -> &Path {
        &self.workdir
    }
}

fn subcommand(command_line: &str) -> String {
    command_line
        .strip_prefix(MOCK_GIT)
        .unwrap_or(command_line)
        .trim()
        .to_string()
}
