//! Terminal output formatting utilities.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};

use colored::Colorize;

static QUIET_MODE: AtomicBool = AtomicBool::new(false);

/// Set quiet mode globally. Call once at startup.
pub fn set_quiet(quiet: bool) {
    QUIET_MODE.store(quiet, Ordering::Relaxed);
}

fn is_quiet() -> bool {
    QUIET_MODE.load(Ordering::Relaxed)
}

/// Print a success message (suppressed in quiet mode).
pub fn success(msg: &str) {
    if !is_quiet() {
        println!("{} {}", "✓".green(), msg);
    }
}

/// Print an error message (always prints to stderr).
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print a warning message (always prints to stderr).
pub fn warn(msg: &str) {
    eprintln!("{} {}", "!".yellow(), msg);
}

/// Print a note about a finished command to stderr (suppressed in quiet mode).
pub fn note(msg: &str) {
    if !is_quiet() {
        eprintln!("{} {}", "·".dimmed(), msg);
    }
}

/// Print an info message (suppressed in quiet mode).
pub fn info(msg: &str) {
    if !is_quiet() {
        println!("{} {}", "→".blue(), msg);
    }
}

/// Print essential machine-readable output (always prints).
///
/// Use for results that should be available for piping, like SHAs.
pub fn essential(msg: &str) {
    println!("{msg}");
}

/// Forward captured child output unchanged (always prints).
pub fn passthrough(stdout: &str, stderr: &str) {
    // Broken pipes are not worth failing the command over.
    if !stdout.is_empty() {
        let mut out = std::io::stdout().lock();
        let _ = out.write_all(stdout.as_bytes()).and_then(|()| out.flush());
    }
    if !stderr.is_empty() {
        let mut err = std::io::stderr().lock();
        let _ = err.write_all(stderr.as_bytes()).and_then(|()| err.flush());
    }
}

/// Format an exit code for display.
#[must_use]
pub fn exit_status(code: i32) -> String {
    let text = format!("exit {code}");
    match code {
        0 => text.green().to_string(),
        c if c < 0 => text.red().bold().to_string(),
        _ => text.red().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn exit_status_colors_match_code() {
        colored::control::set_override(true);

        assert_eq!(exit_status(0), "exit 0".green().to_string());
        assert_eq!(exit_status(2), "exit 2".red().to_string());
        assert_eq!(exit_status(-2), "exit -2".red().bold().to_string());

        colored::control::set_override(false);
    }

    #[test]
    #[serial]
    fn exit_status_plain_without_colors() {
        colored::control::set_override(false);
        assert_eq!(exit_status(1), "exit 1");
        colored::control::unset_override();
    }

    #[test]
    #[serial]
    fn test_quiet_mode_default() {
        set_quiet(false);
        assert!(!is_quiet());
    }

    #[test]
    #[serial]
    fn test_quiet_mode_enabled() {
        set_quiet(true);
        assert!(is_quiet());
        set_quiet(false);
    }
}
