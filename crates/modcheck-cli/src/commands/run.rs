//! Regression runner: one test case, one verdict.
//!
//! The program under test is invoked with the input path as its only
//! argument. A failing child short-circuits the case before any output is
//! read; otherwise the produced output is fingerprinted and compared
//! against the golden value.

use anyhow::Result;
use colored::Colorize;
use modcheck_core::fingerprint::{fingerprint_file, verify};
use modcheck_core::{ErrorKind, Fingerprint, HarnessConfig, HarnessError};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::{EXIT_HARNESS_ERROR, EXIT_TEST_FAILED};
use crate::process::{ProgramRunner, RunnerConfig, SystemRunner};

/// One (executable, input, expected fingerprint) triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    pub executable: PathBuf,
    pub input: PathBuf,
    pub expected: Fingerprint,
}

impl TestCase {
    /// Build a case from raw arguments, rejecting anything missing or malformed.
    pub fn new(
        executable: impl Into<PathBuf>,
        input: impl Into<PathBuf>,
        expected: &str,
    ) -> Result<Self, HarnessError> {
        let executable = executable.into();
        let input = input.into();

        if executable.as_os_str().is_empty() {
            return Err(HarnessError::Config(
                "executable path must not be empty".to_string(),
            ));
        }
        if !input.is_file() {
            return Err(HarnessError::Config(format!(
                "input file does not exist: {}",
                input.display()
            )));
        }
        let expected = Fingerprint::parse(expected)?;

        Ok(Self {
            executable,
            input,
            expected,
        })
    }
}

/// A passed test case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    /// The child's own (successful) exit code.
    pub exit_code: i32,
    /// The output file that was compared.
    pub output: PathBuf,
    /// Its fingerprint, equal to the expected one.
    pub fingerprint: Fingerprint,
}

/// Run one test case.
///
/// The produced output is never deleted so it can be inspected after a
/// failure.
pub fn execute(
    runner: &dyn ProgramRunner,
    config: &HarnessConfig,
    case: &TestCase,
) -> Result<Verdict, HarnessError> {
    if !config.hash_algorithm.fits(&case.expected) {
        warn!(
            expected = %case.expected,
            algorithm = %config.hash_algorithm,
            hex_len = config.hash_algorithm.hex_len(),
            "expected fingerprint has the wrong length for the algorithm and cannot match"
        );
    }

    let outcome = runner.run(&case.executable, &case.input)?;

    let exit_code = match outcome.exit_code {
        Some(0) => 0,
        Some(code) => {
            return Err(HarnessError::ChildFailed {
                code,
                stderr: outcome.stderr_text(),
            })
        }
        None => return Err(HarnessError::ChildTerminated),
    };

    let output = config.output_path(&case.input);
    if !output.is_file() {
        return Err(HarnessError::OutputMissing(output));
    }

    let fingerprint = fingerprint_file(config.hash_algorithm, &output)?;
    debug!(
        output = %output.display(),
        actual = %fingerprint,
        expected = %case.expected,
        "comparing fingerprints"
    );
    verify(&case.expected, &fingerprint)?;

    Ok(Verdict {
        exit_code,
        output,
        fingerprint,
    })
}

/// Process exit status for a finished case.
///
/// A mismatch is always non-zero even though the child itself succeeded;
/// a failing child's code is propagated.
pub fn exit_status(result: &Result<Verdict, HarnessError>) -> u8 {
    match result {
        Ok(verdict) => (verdict.exit_code & 0xff) as u8,
        Err(HarnessError::ChildFailed { code, .. }) => nonzero(*code),
        Err(HarnessError::ChildTerminated) | Err(HarnessError::Timeout { .. }) => EXIT_TEST_FAILED,
        Err(e) if e.kind() == ErrorKind::Mismatch => EXIT_TEST_FAILED,
        Err(_) => EXIT_HARNESS_ERROR,
    }
}

/// Truncate to a process status, never letting a failure read as success.
fn nonzero(code: i32) -> u8 {
    match (code & 0xff) as u8 {
        0 => EXIT_TEST_FAILED,
        low => low,
    }
}

/// Run the run command.
///
/// # Arguments
/// * `config` - Path conventions and hash algorithm
/// * `executable` - Program under test
/// * `input` - Module file handed to the program
/// * `checksum` - Expected fingerprint of the produced output
/// * `timeout_secs` - Optional limit on the program's run time
/// * `capture` - Capture the program's stdout/stderr instead of inheriting them
pub fn run(
    config: &HarnessConfig,
    executable: &str,
    input: &str,
    checksum: &str,
    timeout_secs: Option<u64>,
    capture: bool,
) -> Result<ExitCode> {
    let case = TestCase::new(executable, input, checksum)?;
    let runner = SystemRunner::with_config(RunnerConfig {
        timeout: timeout_secs.map(Duration::from_secs),
        capture_output: capture,
    });

    info!(
        executable = %case.executable.display(),
        input = %case.input.display(),
        "running test case"
    );
    let result = execute(&runner, config, &case);
    let status = exit_status(&result);

    match result {
        Ok(verdict) => {
            println!(
                "{} {} {}",
                "PASS".green().bold(),
                case.input.display(),
                verdict.fingerprint.to_string().dimmed()
            );
        }
        Err(e) => match e.kind() {
            ErrorKind::Mismatch => print_mismatch(config, &case, &e),
            ErrorKind::Child => print_child_failure(&e),
            ErrorKind::Config | ErrorKind::Io => return Err(e.into()),
        },
    }

    Ok(ExitCode::from(status))
}

fn print_mismatch(config: &HarnessConfig, case: &TestCase, err: &HarnessError) {
    for line in mismatch_report(config, case, err) {
        eprintln!("{}", line);
    }
}

/// The stderr lines for a failed comparison: both digests and the output file.
pub fn mismatch_report(
    config: &HarnessConfig,
    case: &TestCase,
    err: &HarnessError,
) -> Vec<String> {
    let mut lines = vec![format!("{} {}", "FAIL".red().bold(), err)];
    if let HarnessError::Mismatch { expected, actual } = err {
        lines.push(format!("  expected: {}", expected));
        lines.push(format!("  actual:   {}", actual.red()));
    }
    let output = config.output_path(&case.input);
    lines.push(match describe_wav(&output) {
        Some(summary) => format!("  output:   {} ({})", output.display(), summary.dimmed()),
        None => format!("  output:   {}", output.display()),
    });
    lines
}

fn print_child_failure(err: &HarnessError) {
    eprintln!("{} {}", "FAIL".red().bold(), err);
    if let HarnessError::ChildFailed {
        stderr: Some(stderr),
        ..
    } = err
    {
        for line in stderr.lines() {
            eprintln!("  {}", line.dimmed());
        }
    }
}

/// Short description of a produced WAV file, if it parses as one.
pub fn describe_wav(path: &Path) -> Option<String> {
    let reader = hound::WavReader::open(path).ok()?;
    let spec = reader.spec();
    Some(format!(
        "{} Hz, {} ch, {}-bit, {} frames",
        spec.sample_rate,
        spec.channels,
        spec.bits_per_sample,
        reader.duration()
    ))
}
