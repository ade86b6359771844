//! Running external commands.
//!
//! The controller talks to the mixer and the notification tool only through
//! [`CommandRunner`], so tests can substitute [`MockRunner`] for real processes.

use std::{
    cell::RefCell,
    collections::{HashMap, VecDeque},
    io,
    process::Command,
};

use tracing::trace;

/// Captured result of a finished command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Captured {
    /// Exit code, or `None` when the process was killed by a signal.
    pub code: Option<i32>,
    /// Captured standard output, lossily decoded.
    pub stdout: String,
    /// Captured standard error, lossily decoded.
    pub stderr: String,
}

impl Captured {
    /// A successful result with the given stdout.
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// A failed result with the given exit code and stderr.
    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// Whether the command exited with status zero.
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Stdout followed by stderr, as one text blob.
    pub fn combined(&self) -> String {
        let mut out = self.stdout.clone();
        out.push_str(&self.stderr);
        out
    }
}

/// Something that can run a program to completion and capture its output.
pub trait CommandRunner {
    /// Run `program` with `args`, blocking until it exits.
    ///
    /// An `Err` means the process could not be launched at all; a non-zero exit
    /// is reported through [`Captured::code`].
    fn run(&self, program: &str, args: &[String]) -> io::Result<Captured>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, program: &str, args: &[String]) -> io::Result<Captured> {
        (**self).run(program, args)
    }
}

/// Runs real processes via [`std::process::Command`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[String]) -> io::Result<Captured> {
        trace!(program, ?args, "exec");
        let output = Command::new(program).args(args).output()?;
        Ok(Captured {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// One recorded invocation on a [`MockRunner`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    /// Program name as passed to [`CommandRunner::run`].
    pub program: String,
    /// Arguments as passed to [`CommandRunner::run`].
    pub args: Vec<String>,
}

/// Scripted runner for tests: queued responses per program, every call recorded.
///
/// A program with no queued response fails to launch with `NotFound`, the same
/// way a missing binary does.
#[derive(Debug, Default)]
pub struct MockRunner {
    /// Queued responses keyed by program name.
    responses: RefCell<HashMap<String, VecDeque<io::Result<Captured>>>>,
    /// Calls in the order they were made.
    calls: RefCell<Vec<Call>>,
}

impl MockRunner {
    /// Create an empty runner.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for the next call to `program`.
    pub fn push(&self, program: &str, response: Captured) -> &Self {
        self.queue(program, Ok(response))
    }

    /// Queue a launch failure for the next call to `program`.
    pub fn push_launch_error(&self, program: &str, kind: io::ErrorKind) -> &Self {
        self.queue(program, Err(io::Error::from(kind)))
    }

    /// Append a response to the queue for `program`.
    fn queue(&self, program: &str, response: io::Result<Captured>) -> &Self {
        self.responses
            .borrow_mut()
            .entry(program.to_string())
            .or_default()
            .push_back(response);
        self
    }

    /// All calls made so far.
    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    /// Calls made to `program`.
    pub fn calls_to(&self, program: &str) -> Vec<Call> {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.program == program)
            .cloned()
            .collect()
    }
}

impl CommandRunner for MockRunner {
    fn run(&self, program: &str, args: &[String]) -> io::Result<Captured> {
        self.calls.borrow_mut().push(Call {
            program: program.to_string(),
            args: args.to_vec(),
        });
        self.responses
            .borrow_mut()
            .get_mut(program)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Err(io::Error::from(io::ErrorKind::NotFound)))
    }
}
