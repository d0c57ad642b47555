//! `gitshell run` command - Execute one command and report its result.

use anyhow::{Context, Result};
use gitshell_core::{ExecRequest, Executor, ExecutorConfig};

use super::{RunArgs, exit_code, report};
use crate::output;

/// Run the command, returning the process exit status to use.
pub fn run(args: RunArgs, config: ExecutorConfig) -> Result<i32> {
    let mut executor = Executor::new(config).context("Invalid executor configuration")?;

    let request = ExecRequest::new(args.args)
        .use_shell(args.use_shell)
        .log_output(args.log_output);

    if executor.dry_run() {
        output::info(&format!("Dry run: {}", request.command_line()));
    }

    let result = executor.execute(&request);

    if args.json {
        output::essential(&serde_json::to_string_pretty(&result)?);
        return Ok(exit_code(&result));
    }

    Ok(report(&result, executor.mode()))
}
