//! External command execution
//!
//! Runs an argv directly (no shell) with captured output and an optional
//! timeout. A process that outlives its timeout is killed and reaped. The
//! timeout also covers reading its output, which a leftover background
//! process could otherwise hold open.

use std::io::Read;
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::debug;
use wait_timeout::ChildExt;

/// Default timeout for command recipes (60 seconds)
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Captured result of a finished process
#[derive(Debug)]
pub struct CommandOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

#[derive(Error, Debug)]
pub enum RunError {
    #[error("no command given")]
    Empty,

    #[error("failed to start '{program}': {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("timed out after {0:?}")]
    TimedOut(Duration),

    #[error("failed to wait for process: {0}")]
    Wait(#[from] std::io::Error),
}

/// Run `argv` in `cwd` and capture stdout/stderr as text.
///
/// `timeout: None` waits forever. A non-zero exit is not an error here;
/// callers inspect [`CommandOutput::status`].
pub fn run(
    argv: &[String],
    cwd: &Path,
    timeout: Option<Duration>,
) -> Result<CommandOutput, RunError> {
    let (program, args) = argv.split_first().ok_or(RunError::Empty)?;
    debug!(program, ?args, cwd = %cwd.display(), "spawning command");

    let mut child = Command::new(program)
        .args(args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| RunError::Spawn {
            program: program.clone(),
            source,
        })?;

    // Drain pipes on their own threads so a chatty process can't fill them
    // and stall before we get to read.
    let deadline = timeout.map(|limit| (Instant::now() + limit, limit));
    let (tx, rx) = mpsc::channel();
    drain(child.stdout.take(), Stream::Stdout, tx.clone());
    drain(child.stderr.take(), Stream::Stderr, tx);

    let status = match deadline {
        Some((at, limit)) => match child.wait_timeout(remaining(at))? {
            Some(status) => status,
            None => {
                kill(&mut child);
                return Err(RunError::TimedOut(limit));
            }
        },
        None => child.wait()?,
    };

    // A background process that inherited the pipes keeps them open after
    // the child exits, so the reads are bounded by the same deadline.
    let mut output = CommandOutput {
        status,
        stdout: String::new(),
        stderr: String::new(),
    };
    loop {
        let received = match deadline {
            Some((at, limit)) => match rx.recv_timeout(remaining(at)) {
                Ok(message) => Some(message),
                Err(RecvTimeoutError::Timeout) => return Err(RunError::TimedOut(limit)),
                Err(RecvTimeoutError::Disconnected) => None,
            },
            None => rx.recv().ok(),
        };
        match received {
            Some((Stream::Stdout, text)) => output.stdout = text,
            Some((Stream::Stderr, text)) => output.stderr = text,
            None => break,
        }
    }

    Ok(output)
}

enum Stream {
    Stdout,
    Stderr,
}

fn drain<R: Read + Send + 'static>(
    pipe: Option<R>,
    stream: Stream,
    tx: Sender<(Stream, String)>,
) {
    if let Some(mut reader) = pipe {
        thread::spawn(move || {
            let mut bytes = Vec::new();
            reader.read_to_end(&mut bytes).ok();
            let _ = tx.send((stream, String::from_utf8_lossy(&bytes).into_owned()));
        });
    }
}

fn remaining(deadline: Instant) -> Duration {
    deadline.saturating_duration_since(Instant::now())
}

fn kill(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait(); // Reap the zombie
}
