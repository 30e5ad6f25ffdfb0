//! Per-file results for batch operations.
//!
//! Batch commands never stop at the first failure: each file gets a
//! [`FileResult`] and the caller inspects [`BatchReport::failures`] at the end.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::HarnessError;

/// Outcome of processing one file in a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileResult {
    /// The input file
    pub file: PathBuf,
    /// Whether processing succeeded
    pub success: bool,
    /// Artifact written or checked (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
    /// Error class (`config`, `io`, `child`, `mismatch`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Error message (if processing failed)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileResult {
    /// A successful entry.
    pub fn ok(file: impl Into<PathBuf>, output: Option<PathBuf>) -> Self {
        Self {
            file: file.into(),
            success: true,
            output,
            kind: None,
            error: None,
        }
    }

    /// A failed entry.
    pub fn failed(file: impl Into<PathBuf>, output: Option<PathBuf>, err: &HarnessError) -> Self {
        Self {
            file: file.into(),
            success: false,
            output,
            kind: Some(err.kind().as_str().to_string()),
            error: Some(err.to_string()),
        }
    }
}

/// Summary of a batch operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub results: Vec<FileResult>,
}

impl BatchReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one file's outcome.
    pub fn push(&mut self, result: FileResult) {
        self.total += 1;
        if result.success {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
        self.results.push(result);
    }

    /// True when no file failed. An empty batch is a success.
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    /// Entries that failed, in processing order.
    pub fn failures(&self) -> impl Iterator<Item = &FileResult> {
        self.results.iter().filter(|r| !r.success)
    }
}
