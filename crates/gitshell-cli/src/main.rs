//! gitshell CLI - run commands and git chores with uniform results.

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    output::set_quiet(cli.global.quiet);
    init_tracing(cli.global.verbose);

    let result = match cli.command {
        Commands::Run(args) => cli
            .global
            .executor_config()
            .and_then(|config| commands::run::run(args, config)),
        Commands::Git { command } => cli
            .global
            .executor_config()
            .and_then(|config| commands::git::run(command, config)),
        Commands::Completions { shell } => commands::completions::run(shell).map(|()| 0),
    };

    match result {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            output::error(&format!("{e:#}"));
            std::process::exit(1);
        }
    }
}

/// Log to stderr. `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
