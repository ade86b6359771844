//! Persisted id of the last notification shown.
//!
//! Each invocation is a fresh process, so the id needed to replace the previous
//! popup is kept in a small file: a RON record with exactly two fields,
//! `issued_at` (RFC 3339) and `id`. The cache is best effort. Anything wrong
//! with the file reads as "no reusable id", and a failed write is reported to
//! the caller but never aborts the volume change.

use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use tracing::{debug, trace};

/// The most recently shown notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationHandle {
    /// When the notification was shown.
    pub issued_at: OffsetDateTime,
    /// Identifier printed by the notification tool.
    pub id: String,
}

/// On-disk form of a [`NotificationHandle`].
#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct Record {
    /// RFC 3339 timestamp.
    issued_at: String,
    /// Notification id.
    id: String,
}

/// Why no handle could be read, or the handle could not be stored.
#[derive(Debug, Error)]
pub enum CacheError {
    /// No cache file yet.
    #[error("no cache file at {}", .0.display())]
    NotFound(PathBuf),
    /// The cache file or its directory is not accessible.
    #[error("permission denied for {}", .path.display())]
    PermissionDenied {
        /// The path that was denied.
        path: PathBuf,
        /// The underlying error.
        source: io::Error,
    },
    /// Any other filesystem error.
    #[error("io error at {}: {source}", .path.display())]
    Io {
        /// The relevant path.
        path: PathBuf,
        /// The underlying error.
        source: io::Error,
    },
    /// The file exists but does not hold a valid record.
    #[error("malformed cache record at {}: {reason}", .path.display())]
    Malformed {
        /// The cache file.
        path: PathBuf,
        /// What was wrong with it.
        reason: String,
    },
    /// The record is older than the freshness window.
    #[error("cached notification is {age_ms} ms old, window is {window_ms} ms")]
    Stale {
        /// Age of the record.
        age_ms: i128,
        /// The freshness window.
        window_ms: i128,
    },
    /// The record could not be serialized.
    #[error("could not encode cache record: {0}")]
    Encode(String),
}

impl CacheError {
    /// Classify an I/O error at `path`.
    fn io(path: &Path, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied {
                path: path.to_path_buf(),
                source,
            },
            _ => Self::Io {
                path: path.to_path_buf(),
                source,
            },
        }
    }
}

/// File-backed store for the last [`NotificationHandle`].
#[derive(Debug, Clone)]
pub struct NotifyCache {
    /// Cache file location.
    path: PathBuf,
    /// Maximum age of a reusable handle.
    window: Duration,
}

impl NotifyCache {
    /// A cache at `path` whose handles stay reusable for `window`.
    pub fn new(path: impl Into<PathBuf>, window: Duration) -> Self {
        Self {
            path: path.into(),
            window,
        }
    }

    /// The cache file location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The freshness window.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// The stored handle, if present, valid, and still fresh.
    pub fn read(&self) -> Option<NotificationHandle> {
        self.read_at(OffsetDateTime::now_utc())
    }

    /// Like [`read`](Self::read), judged against `now`.
    pub fn read_at(&self, now: OffsetDateTime) -> Option<NotificationHandle> {
        match self.load_at(now) {
            Ok(handle) => Some(handle),
            Err(err) => {
                debug!(error = %err, "no reusable notification id");
                None
            }
        }
    }

    /// Load the stored handle, reporting why it cannot be reused.
    pub fn load_at(&self, now: OffsetDateTime) -> Result<NotificationHandle, CacheError> {
        let text = fs::read_to_string(&self.path).map_err(|e| CacheError::io(&self.path, e))?;
        let handle = self.decode(&text)?;
        let age_ms = (now - handle.issued_at).whole_milliseconds();
        let window_ms = self.window.as_millis() as i128;
        if age_ms > window_ms {
            return Err(CacheError::Stale { age_ms, window_ms });
        }
        trace!(id = %handle.id, age_ms, "cached notification id is fresh");
        Ok(handle)
    }

    /// Store `id` as issued now.
    pub fn write(&self, id: &str) -> Result<(), CacheError> {
        self.write_at(id, OffsetDateTime::now_utc())
    }

    /// Store `id` as issued at `issued_at`.
    ///
    /// A missing parent directory is created and the write retried once.
    pub fn write_at(&self, id: &str, issued_at: OffsetDateTime) -> Result<(), CacheError> {
        let text = encode(id, issued_at)?;
        match fs::write(&self.path, &text) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                if let Some(parent) = self.path.parent() {
                    debug!(dir = %parent.display(), "creating cache directory");
                    fs::create_dir_all(parent).map_err(|e| CacheError::io(parent, e))?;
                }
                fs::write(&self.path, &text).map_err(|e| CacheError::io(&self.path, e))
            }
            Err(e) => Err(CacheError::io(&self.path, e)),
        }
    }

    /// Parse a record strictly; any defect rejects the whole record.
    fn decode(&self, text: &str) -> Result<NotificationHandle, CacheError> {
        let malformed = |reason: String| CacheError::Malformed {
            path: self.path.clone(),
            reason,
        };
        let record: Record = ron::from_str(text).map_err(|e| malformed(e.to_string()))?;
        let issued_at = OffsetDateTime::parse(&record.issued_at, &Rfc3339)
            .map_err(|e| malformed(format!("bad timestamp: {e}")))?;
        if record.id.trim().is_empty() {
            return Err(malformed("empty id".to_string()));
        }
        Ok(NotificationHandle {
            issued_at,
            id: record.id,
        })
    }
}

/// Serialize a record for `id` issued at `issued_at`.
fn encode(id: &str, issued_at: OffsetDateTime) -> Result<String, CacheError> {
    let issued_at = issued_at
        .format(&Rfc3339)
        .map_err(|e| CacheError::Encode(e.to_string()))?;
    ron::to_string(&Record {
        issued_at,
        id: id.to_string(),
    })
    .map_err(|e| CacheError::Encode(e.to_string()))
}
