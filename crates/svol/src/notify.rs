//! Invoking the notification tool.

use std::io;

use thiserror::Error;
use tracing::debug;

use crate::{error::describe_exit, exec::CommandRunner};

/// The notification tool could not show the popup.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// The notifier could not be started.
    #[error("failed to start notifier {program}: {source}")]
    Start {
        /// The command being executed.
        program: String,
        /// The underlying error.
        source: io::Error,
    },
    /// The notifier exited unsuccessfully.
    #[error("notifier {program} failed ({}): {}", describe_exit(.code.as_ref().copied()), .output.trim())]
    Failed {
        /// The command being executed.
        program: String,
        /// Exit code, or `None` when killed by a signal.
        code: Option<i32>,
        /// Captured stdout and stderr.
        output: String,
    },
    /// The notifier succeeded but printed no id.
    #[error("notifier {program} printed no notification id")]
    MissingId {
        /// The command being executed.
        program: String,
    },
}

/// A popup to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification<'a> {
    /// Summary line.
    pub title: &'a str,
    /// Body text.
    pub body: &'a str,
    /// How long to show it, in milliseconds.
    pub duration_ms: u64,
    /// Id of an earlier popup to replace in place.
    pub replace_id: Option<&'a str>,
}

impl Notification<'_> {
    /// Notifier arguments: `-p -t <ms> <title> <body> [-r <id>]`.
    ///
    /// `-p` makes the notifier print the id of the popup it shows.
    pub fn args(&self) -> Vec<String> {
        let mut args = vec![
            "-p".to_string(),
            "-t".to_string(),
            self.duration_ms.to_string(),
            self.title.to_string(),
            self.body.to_string(),
        ];
        if let Some(id) = self.replace_id {
            args.push("-r".to_string());
            args.push(id.to_string());
        }
        args
    }
}

/// Show `notification` with `program` and return the id it printed.
pub fn send<R: CommandRunner>(
    runner: &R,
    program: &str,
    notification: &Notification<'_>,
) -> Result<String, NotifyError> {
    let captured = runner
        .run(program, &notification.args())
        .map_err(|source| NotifyError::Start {
            program: program.to_string(),
            source,
        })?;
    if !captured.success() {
        return Err(NotifyError::Failed {
            program: program.to_string(),
            code: captured.code,
            output: captured.combined(),
        });
    }
    let id = captured.stdout.trim();
    if id.is_empty() {
        return Err(NotifyError::MissingId {
            program: program.to_string(),
        });
    }
    debug!(id, replaced = notification.replace_id.is_some(), "notification shown");
    Ok(id.to_string())
}
