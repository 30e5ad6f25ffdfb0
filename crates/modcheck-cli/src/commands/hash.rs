//! Reference hasher: rebuilds the golden fingerprint set.

use anyhow::Result;
use modcheck_core::fingerprint::{fingerprint_file, write_reference};
use modcheck_core::{BatchReport, FileResult, HarnessConfig, HarnessError};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info};

use super::reporting;
use crate::discover;

/// Run the hash command.
///
/// # Arguments
/// * `config` - Path conventions and hash algorithm
/// * `dir` - Directory holding expected-output files
/// * `hash_dir` - Destination for fingerprints (default: `config.hash_directory`)
/// * `create_hash_dir` - Create the destination if it does not exist
/// * `report_path` - Optional JSON report destination
/// * `json` - Print the report as JSON instead of text
pub fn run(
    config: &HarnessConfig,
    dir: &str,
    hash_dir: Option<&str>,
    create_hash_dir: bool,
    report_path: Option<&str>,
    json: bool,
) -> Result<ExitCode> {
    let hash_dir = hash_dir
        .map(PathBuf::from)
        .unwrap_or_else(|| config.hash_directory.clone());

    let report = hash_directory(
        config,
        Path::new(dir),
        &hash_dir,
        create_hash_dir,
        |i, total, result| {
            if !json {
                reporting::print_entry(i, total, result);
            }
        },
    )?;

    reporting::finish_batch("Reference Hashing Summary", &report, report_path, json)
}

/// Fingerprint every expected output in `dir` into `hash_dir`.
///
/// Existing sidecars are overwritten. Per-file failures land in the report;
/// a missing `hash_dir` (without `create_hash_dir`) fails the whole batch
/// before any file is read.
pub fn hash_directory<F>(
    config: &HarnessConfig,
    dir: &Path,
    hash_dir: &Path,
    create_hash_dir: bool,
    mut on_result: F,
) -> Result<BatchReport, HarnessError>
where
    F: FnMut(usize, usize, &FileResult),
{
    ensure_hash_dir(hash_dir, create_hash_dir)?;

    let outputs = discover::files_in(dir, |p| config.is_output(p))?;
    let total = outputs.len();
    info!(
        count = total,
        algorithm = %config.hash_algorithm,
        dir = %dir.display(),
        "hashing expected outputs"
    );

    let mut report = BatchReport::new();
    for (i, entry) in outputs.into_iter().enumerate() {
        let output = entry.path;
        let outcome = match entry.error {
            Some(e) => Err(e),
            None => hash_file(config, &output, hash_dir),
        };
        let result = match outcome {
            Ok(reference) => FileResult::ok(&output, Some(reference)),
            Err(e) => FileResult::failed(&output, None, &e),
        };
        on_result(i, total, &result);
        report.push(result);
    }

    Ok(report)
}

/// Fingerprint one output file and write its sidecar. Returns the sidecar path.
pub fn hash_file(
    config: &HarnessConfig,
    output: &Path,
    hash_dir: &Path,
) -> Result<PathBuf, HarnessError> {
    let fingerprint = fingerprint_file(config.hash_algorithm, output)?;
    let reference = config.reference_path(hash_dir, output)?;
    debug!(
        output = %output.display(),
        fingerprint = %fingerprint,
        "writing reference"
    );
    write_reference(&reference, &fingerprint)?;
    Ok(reference)
}

fn ensure_hash_dir(hash_dir: &Path, create: bool) -> Result<(), HarnessError> {
    if hash_dir.is_dir() {
        return Ok(());
    }
    if create {
        return fs::create_dir_all(hash_dir).map_err(|e| HarnessError::io(hash_dir, e));
    }
    Err(HarnessError::io(
        hash_dir,
        io::Error::new(
            io::ErrorKind::NotFound,
            "hash directory does not exist (pass --create-hash-dir to create it)",
        ),
    ))
}
