//! Error types for fixture encoding, reference hashing and regression runs.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Broad classification of a [`HarnessError`].
///
/// Callers use this to tell a failed test (`Mismatch`) apart from a broken
/// harness (everything else).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Missing or malformed argument or configuration.
    Config,
    /// Unreadable source, unwritable destination or missing output file.
    Io,
    /// The program under test could not run or reported failure.
    Child,
    /// The produced output does not match the golden reference.
    Mismatch,
}

impl ErrorKind {
    /// Returns a short stable name for reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Config => "config",
            ErrorKind::Io => "io",
            ErrorKind::Child => "child",
            ErrorKind::Mismatch => "mismatch",
        }
    }
}

/// Top-level error type for harness operations.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// Missing or malformed argument or configuration value.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Reading or writing a file failed.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The program under test did not produce the expected output file.
    #[error("output file not found: {}", .0.display())]
    OutputMissing(PathBuf),

    /// The program under test could not be started.
    #[error("failed to spawn '{}': {source}", .executable.display())]
    Spawn {
        executable: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The program under test exited with a non-zero status.
    #[error("program under test exited with code {code}")]
    ChildFailed { code: i32, stderr: Option<String> },

    /// The program under test was terminated without an exit code.
    #[error("program under test was terminated by a signal")]
    ChildTerminated,

    /// The program under test exceeded its time limit and was killed.
    #[error("program under test timed out after {timeout:?}")]
    Timeout { timeout: Duration },

    /// A committed hex listing no longer matches its module.
    #[error("listing is out of date: {}", .0.display())]
    StaleListing(PathBuf),

    /// The produced output's fingerprint differs from the reference.
    #[error("fingerprint of the produced output ({actual}) doesn't match the reference value {expected}")]
    Mismatch { expected: String, actual: String },
}

impl HarnessError {
    /// Wraps an I/O error with the path it occurred on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        HarnessError::Io {
            path: path.into(),
            source,
        }
    }

    /// Classifies this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            HarnessError::Config(_) => ErrorKind::Config,
            HarnessError::Io { .. } | HarnessError::OutputMissing(_) => ErrorKind::Io,
            HarnessError::Spawn { .. }
            | HarnessError::ChildFailed { .. }
            | HarnessError::ChildTerminated
            | HarnessError::Timeout { .. } => ErrorKind::Child,
            HarnessError::Mismatch { .. } | HarnessError::StaleListing(_) => ErrorKind::Mismatch,
        }
    }
}
