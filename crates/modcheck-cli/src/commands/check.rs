//! Batch regression: every module in a directory against its golden fingerprint.

use anyhow::Result;
use modcheck_core::fingerprint::read_reference;
use modcheck_core::{BatchReport, FileResult, HarnessConfig, HarnessError};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;
use tracing::info;

use super::reporting;
use super::run::{execute, TestCase};
use crate::discover;
use crate::process::{ProgramRunner, RunnerConfig, SystemRunner};

/// Run the check command.
///
/// # Arguments
/// * `config` - Path conventions and hash algorithm
/// * `executable` - Program under test
/// * `dir` - Directory holding module fixtures
/// * `hash_dir` - Directory holding references (default: `config.hash_directory`)
/// * `timeout_secs` - Optional per-case time limit
/// * `report_path` - Optional JSON report destination
/// * `json` - Print the report as JSON instead of text
pub fn run(
    config: &HarnessConfig,
    executable: &str,
    dir: &str,
    hash_dir: Option<&str>,
    timeout_secs: Option<u64>,
    report_path: Option<&str>,
    json: bool,
) -> Result<ExitCode> {
    let hash_dir = hash_dir
        .map(PathBuf::from)
        .unwrap_or_else(|| config.hash_directory.clone());
    // Child output would interleave with the JSON document.
    let runner = SystemRunner::with_config(RunnerConfig {
        timeout: timeout_secs.map(Duration::from_secs),
        capture_output: json,
    });

    let report = check_directory(
        &runner,
        config,
        Path::new(executable),
        Path::new(dir),
        &hash_dir,
        |i, total, result| {
            if !json {
                reporting::print_entry(i, total, result);
            }
        },
    )?;

    reporting::finish_batch("Regression Summary", &report, report_path, json)
}

/// Run every module in `dir` as a test case.
///
/// A module without a reference fingerprint fails its own case; the batch
/// carries on with the rest.
pub fn check_directory<F>(
    runner: &dyn ProgramRunner,
    config: &HarnessConfig,
    executable: &Path,
    dir: &Path,
    hash_dir: &Path,
    mut on_result: F,
) -> Result<BatchReport, HarnessError>
where
    F: FnMut(usize, usize, &FileResult),
{
    let modules = discover::files_in(dir, |p| config.is_module(p))?;
    let total = modules.len();
    info!(count = total, dir = %dir.display(), "running regression cases");

    let mut report = BatchReport::new();
    for (i, entry) in modules.into_iter().enumerate() {
        let module = entry.path;
        let output = config.output_path(&module);
        let outcome = match entry.error {
            Some(e) => Err(e),
            None => check_module(runner, config, executable, &module, hash_dir),
        };
        let result = match outcome {
            Ok(()) => FileResult::ok(&module, Some(output)),
            Err(e) => FileResult::failed(&module, Some(output), &e),
        };
        on_result(i, total, &result);
        report.push(result);
    }

    Ok(report)
}

fn check_module(
    runner: &dyn ProgramRunner,
    config: &HarnessConfig,
    executable: &Path,
    module: &Path,
    hash_dir: &Path,
) -> Result<(), HarnessError> {
    let reference = config.reference_path(hash_dir, &config.output_path(module))?;
    let expected = read_reference(&reference)?;
    let case = TestCase {
        executable: executable.to_path_buf(),
        input: module.to_path_buf(),
        expected,
    };
    execute(runner, config, &case).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::ProcessOutcome;
    use modcheck_core::fingerprint::write_reference;
    use modcheck_core::HashAlgorithm;
    use std::fs;

    /// Renders a module by copying its bytes; modules starting with `!` fail.
    struct CopyRunner;

    impl ProgramRunner for CopyRunner {
        fn run(&self, _executable: &Path, input: &Path) -> Result<ProcessOutcome, HarnessError> {
            let data = fs::read(input).map_err(|e| HarnessError::io(input, e))?;
            if data.first() == Some(&b'!') {
                return Ok(ProcessOutcome::exited(4));
            }
            let output = HarnessConfig::default().output_path(input);
            fs::write(&output, &data).map_err(|e| HarnessError::io(&output, e))?;
            Ok(ProcessOutcome::exited(0))
        }
    }

    #[test]
    fn test_checks_every_module() {
        let tmp = tempfile::tempdir().unwrap();
        let mods = tmp.path().join("mods");
        let hash_dir = tmp.path().join("hash");
        fs::create_dir(&mods).unwrap();
        fs::create_dir(&hash_dir).unwrap();

        fs::write(mods.join("good.mod"), b"good").unwrap();
        write_reference(
            &hash_dir.join("good.mod.wav.md5"),
            &HashAlgorithm::Md5.digest(b"good"),
        )
        .unwrap();

        fs::write(mods.join("changed.mod"), b"changed").unwrap();
        write_reference(
            &hash_dir.join("changed.mod.wav.md5"),
            &HashAlgorithm::Md5.digest(b"original"),
        )
        .unwrap();

        fs::write(mods.join("broken.mod"), b"!broken").unwrap();
        write_reference(
            &hash_dir.join("broken.mod.wav.md5"),
            &HashAlgorithm::Md5.digest(b"!broken"),
        )
        .unwrap();

        fs::write(mods.join("new.mod"), b"new").unwrap();

        let report = check_directory(
            &CopyRunner,
            &HarnessConfig::default(),
            Path::new("render"),
            &mods,
            &hash_dir,
            |_, _, _| {},
        )
        .unwrap();

        assert_eq!(report.total, 4);
        assert_eq!(report.succeeded, 1);
        assert_eq!(report.failed, 3);

        let kind = |name: &str| {
            let file = mods.join(name);
            report
                .results
                .iter()
                .find(|r| r.file == file)
                .and_then(|r| r.kind.clone())
        };
        assert_eq!(kind("good.mod"), None);
        assert_eq!(kind("changed.mod").as_deref(), Some("mismatch"));
        assert_eq!(kind("broken.mod").as_deref(), Some("child"));
        assert_eq!(kind("new.mod").as_deref(), Some("io"));
    }

    #[test]
    fn test_missing_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let err = check_directory(
            &CopyRunner,
            &HarnessConfig::default(),
            Path::new("render"),
            &tmp.path().join("absent"),
            tmp.path(),
            |_, _, _| {},
        )
        .unwrap_err();
        assert!(matches!(err, HarnessError::Config(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_module_fails_its_case() {
        let tmp = tempfile::tempdir().unwrap();
        std::os::unix::fs::symlink(tmp.path().join("missing"), tmp.path().join("broken.mod"))
            .unwrap();

        let report = check_directory(
            &CopyRunner,
            &HarnessConfig::default(),
            Path::new("render"),
            tmp.path(),
            tmp.path(),
            |_, _, _| {},
        )
        .unwrap();

        assert_eq!(report.total, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(report.results[0].kind.as_deref(), Some("io"));
    }
}
