//! Streaming capture: concurrent line readers feeding an echo worker and an
//! aggregator over two independent channels.
//!
//! ```text
//!   stdout ──► reader ──┬──► echo channel ──────► echo worker ──► sink / log
//!                       └──► aggregate channel ─► aggregator ──► buffers
//!   stderr ──► reader ──┘ (same fan-out)
//! ```
//!
//! Every worker is scoped to the call, so none of them outlives
//! [`run_streaming`], including on error paths.

use std::io::{self, BufRead, BufReader, Read};
use std::process::Child;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, Scope, ScopedJoinHandle};
use std::time::Duration;

use tracing::{info, trace};

use crate::error::{Error, Result};
use crate::launch::{exit_code, spawn};
use crate::request::Invocation;
use crate::result::ExecResult;
use crate::sink::{OutputSink, Stream};

/// Bounded wait a consumer blocks for before re-checking process liveness.
pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// One line read from a child stream, newline included.
#[derive(Debug, Clone)]
struct Line {
    stream: Stream,
    bytes: Vec<u8>,
}

type Buffers = (Vec<u8>, Vec<u8>);

/// Run the invocation, echoing lines live and aggregating them for the result.
pub(crate) fn run_streaming(invocation: &Invocation, sink: &dyn OutputSink) -> Result<ExecResult> {
    let mut child = spawn(invocation)?;
    let command = invocation.display.as_str();

    let (Some(stdout), Some(stderr)) = (child.stdout.take(), child.stderr.take()) else {
        reap(&mut child);
        return Err(capture_error(command, io::Error::other("child pipes unavailable")));
    };

    let exited = AtomicBool::new(false);

    thread::scope(|scope| {
        let workers = match Workers::start(
            scope,
            stdout,
            stderr,
            sink,
            &exited,
            invocation.log_output,
        ) {
            Ok(workers) => workers,
            Err(err) => {
                // Closing the child's pipes lets any reader already started finish
                reap(&mut child);
                return Err(capture_error(command, err));
            }
        };

        let status = child.wait();
        if status.is_err() {
            // The readers only return once the child's pipes close
            reap(&mut child);
        }
        exited.store(true, Ordering::Release);
        let status = status.map_err(|source| capture_error(command, source))?;

        let (stdout, stderr) = workers.finish(command)?;
        Ok(ExecResult::new(
            exit_code(status),
            String::from_utf8_lossy(&stdout).into_owned(),
            String::from_utf8_lossy(&stderr).into_owned(),
        ))
    })
}

/// Handles for the four per-call workers.
struct Workers<'scope> {
    stdout_reader: ScopedJoinHandle<'scope, io::Result<()>>,
    stderr_reader: ScopedJoinHandle<'scope, io::Result<()>>,
    echo: ScopedJoinHandle<'scope, ()>,
    aggregator: ScopedJoinHandle<'scope, Buffers>,
}

impl<'scope> Workers<'scope> {
    fn start<'env, O, E>(
        scope: &'scope Scope<'scope, 'env>,
        stdout: O,
        stderr: E,
        sink: &'env dyn OutputSink,
        exited: &'env AtomicBool,
        log_output: bool,
    ) -> io::Result<Self>
    where
        O: Read + Send + 'scope,
        E: Read + Send + 'scope,
    {
        let (echo_tx, echo_rx) = mpsc::channel();
        let (aggregate_tx, aggregate_rx) = mpsc::channel();

        // Consumers first: if a reader fails to start, the ones already
        // running still have somewhere to send until the pipes close.
        let echo = thread::Builder::new()
            .name("gitshell-echo".into())
            .spawn_scoped(scope, move || echo_lines(&echo_rx, sink, exited, log_output))?;
        let aggregator = thread::Builder::new()
            .name("gitshell-aggregate".into())
            .spawn_scoped(scope, move || aggregate_lines(&aggregate_rx, exited))?;

        let stdout_reader = {
            let (echo_tx, aggregate_tx) = (echo_tx.clone(), aggregate_tx.clone());
            thread::Builder::new()
                .name("gitshell-stdout".into())
                .spawn_scoped(scope, move || {
                    read_lines(Stream::Out, stdout, &echo_tx, &aggregate_tx)
                })?
        };
        let stderr_reader = thread::Builder::new()
            .name("gitshell-stderr".into())
            .spawn_scoped(scope, move || {
                read_lines(Stream::Err, stderr, &echo_tx, &aggregate_tx)
            })?;

        Ok(Self {
            stdout_reader,
            stderr_reader,
            echo,
            aggregator,
        })
    }

    /// Join every worker and hand back the aggregated buffers.
    fn finish(self, command: &str) -> Result<Buffers> {
        let stdout_read = self
            .stdout_reader
            .join()
            .map_err(|_| Error::WorkerPanicked("stdout reader"))?;
        let stderr_read = self
            .stderr_reader
            .join()
            .map_err(|_| Error::WorkerPanicked("stderr reader"))?;
        let buffers = self
            .aggregator
            .join()
            .map_err(|_| Error::WorkerPanicked("aggregator"))?;
        self.echo
            .join()
            .map_err(|_| Error::WorkerPanicked("echo"))?;

        stdout_read.map_err(|source| capture_error(command, source))?;
        stderr_read.map_err(|source| capture_error(command, source))?;
        Ok(buffers)
    }
}

/// Read one stream to end-of-file, fanning each line out to both channels.
///
/// Dropping the senders on return is the end-of-stream signal.
fn read_lines<R: Read>(
    stream: Stream,
    pipe: R,
    echo: &Sender<Line>,
    aggregate: &Sender<Line>,
) -> io::Result<()> {
    let mut reader = BufReader::new(pipe);
    loop {
        let mut bytes = Vec::new();
        if reader.read_until(b'\n', &mut bytes)? == 0 {
            return Ok(());
        }
        // A gone consumer must not stop the drain, or the child could block on a full pipe
        let _ = echo.send(Line {
            stream,
            bytes: bytes.clone(),
        });
        let _ = aggregate.send(Line { stream, bytes });
    }
}

fn echo_lines(rx: &Receiver<Line>, sink: &dyn OutputSink, exited: &AtomicBool, log_output: bool) {
    loop {
        match rx.recv_timeout(POLL_INTERVAL) {
            Ok(line) => {
                let text = String::from_utf8_lossy(&line.bytes);
                let text = text.trim_end_matches(['\n', '\r']);
                sink.line(line.stream, text);
                if log_output {
                    info!(stream = %line.stream, "{text}");
                }
            }
            Err(RecvTimeoutError::Timeout) => idle("echo", exited),
            Err(RecvTimeoutError::Disconnected) => return,
        }
    }
}

fn aggregate_lines(rx: &Receiver<Line>, exited: &AtomicBool) -> Buffers {
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    loop {
        match rx.recv_timeout(POLL_INTERVAL) {
            Ok(Line { stream, bytes }) => match stream {
                Stream::Out => stdout.extend_from_slice(&bytes),
                Stream::Err => stderr.extend_from_slice(&bytes),
            },
            Err(RecvTimeoutError::Timeout) => idle("aggregate", exited),
            Err(RecvTimeoutError::Disconnected) => return (stdout, stderr),
        }
    }
}

fn idle(worker: &str, exited: &AtomicBool) {
    if exited.load(Ordering::Acquire) {
        trace!(worker, "process exited, waiting for its pipes to close");
    } else {
        trace!(worker, "no output for {POLL_INTERVAL:?}, process still running");
    }
}

fn reap(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

fn capture_error(command: &str, source: io::Error) -> Error {
    Error::Capture {
        command: command.to_string(),
        source,
    }
}
