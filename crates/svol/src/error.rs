//! Errors that abort an svol invocation.
//!
//! Only failures that change the exit code live here. Degraded paths have their
//! own narrow types: [`crate::mixer::ParseError`], [`crate::cache::CacheError`]
//! and [`crate::notify::NotifyError`].

use std::{io, path::PathBuf, result::Result as StdResult};

use thiserror::Error;

/// Convenient result type for svol operations.
pub type Result<T> = StdResult<T, Error>;

/// Fatal errors for a single invocation.
#[derive(Debug, Error)]
pub enum Error {
    /// The mixer command could not be started.
    #[error("failed to start mixer command {program}: {source}")]
    MixerStart {
        /// The command being executed.
        program: String,
        /// The underlying error.
        source: io::Error,
    },

    /// The mixer command exited unsuccessfully.
    #[error("mixer command {program} failed ({}): {}", describe_exit(.code.as_ref().copied()), .output.trim())]
    MixerFailed {
        /// The command being executed.
        program: String,
        /// Exit code, or `None` when the process was killed by a signal.
        code: Option<i32>,
        /// Captured stdout and stderr.
        output: String,
    },

    /// A configuration file exists but could not be read or parsed.
    #[error("configuration error at {}: {message}", .path.display())]
    Config {
        /// The configuration file.
        path: PathBuf,
        /// Human-readable error message.
        message: String,
    },
}

/// Render an exit code for error messages.
pub fn describe_exit(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("exit status {code}"),
        None => "terminated by signal".to_string(),
    }
}
