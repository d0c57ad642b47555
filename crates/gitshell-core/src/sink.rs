//! Live output sinks for streaming mode.

use std::fmt;
use std::io::Write;
use std::sync::{Mutex, PoisonError};

/// Which child stream a line came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stream {
    /// Standard output.
    Out,
    /// Standard error.
    Err,
}

impl Stream {
    /// Short tag used in logs.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Out => "OUT",
            Self::Err => "ERR",
        }
    }
}

impl fmt::Display for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Receives each line as it arrives in streaming mode.
///
/// Lines are passed without their trailing newline. Sinks are observational:
/// nothing they do affects the returned result.
pub trait OutputSink: Send + Sync {
    /// Handle one line from the child.
    fn line(&self, stream: Stream, line: &str);
}

/// Echoes `Out` lines to stdout and `Err` lines to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink;

impl OutputSink for ConsoleSink {
    fn line(&self, stream: Stream, line: &str) {
        // Echo failures (closed terminal, broken pipe) are not the command's failure
        let _ = match stream {
            Stream::Out => writeln!(std::io::stdout().lock(), "{line}"),
            Stream::Err => writeln!(std::io::stderr().lock(), "{line}"),
        };
    }
}

/// Discards every line.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl OutputSink for NullSink {
    fn line(&self, _stream: Stream, _line: &str) {}
}

/// Keeps every line in memory, in arrival order.
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<(Stream, String)>>,
}

impl MemorySink {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every line received so far.
    #[must_use]
    pub fn lines(&self) -> Vec<(Stream, String)> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Lines received from one stream, in order.
    #[must_use]
    pub fn lines_of(&self, stream: Stream) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|(s, _)| *s == stream)
            .map(|(_, line)| line)
            .collect()
    }
}

impl OutputSink for MemorySink {
    fn line(&self, stream: Stream, line: &str) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((stream, line.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_filters_by_stream() {
        let sink = MemorySink::new();
        sink.line(Stream::Out, "one");
        sink.line(Stream::Err, "oops");
        sink.line(Stream::Out, "two");

        assert_eq!(sink.lines().len(), 3);
        assert_eq!(sink.lines_of(Stream::Out), vec!["one", "two"]);
        assert_eq!(sink.lines_of(Stream::Err), vec!["oops"]);
    }

    #[test]
    fn test_stream_tags() {
        assert_eq!(Stream::Out.to_string(), "OUT");
        assert_eq!(Stream::Err.tag(), "ERR");
    }
}
