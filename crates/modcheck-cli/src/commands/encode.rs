//! Fixture encoder: module files to hex array listings.

use anyhow::Result;
use modcheck_core::listing::{encode_listing, row_count};
use modcheck_core::{BatchReport, FileResult, HarnessConfig, HarnessError};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::process::ExitCode;
use tracing::{debug, info};

use super::reporting;
use crate::discover;

/// Whether listings are written or only compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeMode {
    /// Write every listing, replacing existing files.
    Write,
    /// Fail for listings that are missing or differ; write nothing.
    Check,
}

/// Run the encode command.
///
/// # Arguments
/// * `config` - Path conventions
/// * `dir` - Directory holding module fixtures
/// * `check` - Compare instead of writing
/// * `report_path` - Optional JSON report destination
/// * `json` - Print the report as JSON instead of text
pub fn run(
    config: &HarnessConfig,
    dir: &str,
    check: bool,
    report_path: Option<&str>,
    json: bool,
) -> Result<ExitCode> {
    let mode = if check {
        EncodeMode::Check
    } else {
        EncodeMode::Write
    };

    let report = encode_directory(config, Path::new(dir), mode, |i, total, result| {
        if !json {
            reporting::print_entry(i, total, result);
        }
    })?;

    let title = match mode {
        EncodeMode::Write => "Fixture Encoding Summary",
        EncodeMode::Check => "Listing Freshness Summary",
    };
    reporting::finish_batch(title, &report, report_path, json)
}

/// Encode every module in `dir`, continuing past per-file failures.
///
/// `on_result` is called after each file. Only an unusable `dir` is an
/// error; per-file problems land in the report.
pub fn encode_directory<F>(
    config: &HarnessConfig,
    dir: &Path,
    mode: EncodeMode,
    mut on_result: F,
) -> Result<BatchReport, HarnessError>
where
    F: FnMut(usize, usize, &FileResult),
{
    let modules = discover::files_in(dir, |p| config.is_module(p))?;
    let total = modules.len();
    info!(count = total, dir = %dir.display(), "encoding module fixtures");

    let mut report = BatchReport::new();
    for (i, entry) in modules.into_iter().enumerate() {
        let module = entry.path;
        let include = config.include_path(&module);
        let outcome = match (entry.error, mode) {
            (Some(e), _) => Err(e),
            (None, EncodeMode::Write) => encode_file(&module, &include),
            (None, EncodeMode::Check) => check_file(&module, &include),
        };
        let result = match outcome {
            Ok(()) => FileResult::ok(&module, Some(include)),
            Err(e) => FileResult::failed(&module, Some(include), &e),
        };
        on_result(i, total, &result);
        report.push(result);
    }

    Ok(report)
}

/// Write the listing for one module.
pub fn encode_file(module: &Path, include: &Path) -> Result<(), HarnessError> {
    let data = fs::read(module).map_err(|e| HarnessError::io(module, e))?;
    let listing = encode_listing(&data);
    debug!(
        module = %module.display(),
        bytes = data.len(),
        rows = row_count(data.len()),
        "writing listing"
    );
    fs::write(include, listing).map_err(|e| HarnessError::io(include, e))
}

/// Verify that the listing on disk is what [`encode_file`] would write.
pub fn check_file(module: &Path, include: &Path) -> Result<(), HarnessError> {
    let data = fs::read(module).map_err(|e| HarnessError::io(module, e))?;
    let expected = encode_listing(&data);
    let current = match fs::read_to_string(include) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(HarnessError::StaleListing(include.to_path_buf()))
        }
        Err(e) => return Err(HarnessError::io(include, e)),
    };
    if current == expected {
        Ok(())
    } else {
        Err(HarnessError::StaleListing(include.to_path_buf()))
    }
}
