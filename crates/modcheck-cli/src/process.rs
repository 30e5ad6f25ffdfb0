//! Invocation of the program under test.
//!
//! The regression runner only sees a [`ProcessOutcome`]; whether the child
//! succeeded is an explicit branch on that value.

use std::io::Read;
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use modcheck_core::HarnessError;
use tracing::{debug, warn};

/// What the program under test reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutcome {
    /// Exit code, or `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    /// Captured stdout (only when capturing).
    pub stdout: Option<Vec<u8>>,
    /// Captured stderr (only when capturing).
    pub stderr: Option<Vec<u8>>,
}

impl ProcessOutcome {
    /// An outcome with only an exit code.
    pub fn exited(code: i32) -> Self {
        Self {
            exit_code: Some(code),
            stdout: None,
            stderr: None,
        }
    }

    /// Whether the program reported success.
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Captured stderr as text, if any was captured.
    pub fn stderr_text(&self) -> Option<String> {
        self.stderr
            .as_ref()
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }
}

/// Capability to run an executable with a single path argument.
pub trait ProgramRunner {
    /// Run `executable input` to completion.
    fn run(&self, executable: &Path, input: &Path) -> Result<ProcessOutcome, HarnessError>;
}

/// Configuration for [`SystemRunner`].
#[derive(Debug, Clone, Default)]
pub struct RunnerConfig {
    /// Kill the child after this long. `None` waits indefinitely.
    pub timeout: Option<Duration>,
    /// Capture stdout/stderr instead of inheriting them.
    pub capture_output: bool,
}

/// Runs programs as real child processes.
#[derive(Debug, Clone, Default)]
pub struct SystemRunner {
    config: RunnerConfig,
}

impl SystemRunner {
    /// Creates a runner that inherits stdio and never times out.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a runner with custom configuration.
    pub fn with_config(config: RunnerConfig) -> Self {
        Self { config }
    }

    /// Returns a reference to the configuration.
    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }
}

impl ProgramRunner for SystemRunner {
    fn run(&self, executable: &Path, input: &Path) -> Result<ProcessOutcome, HarnessError> {
        let mut cmd = Command::new(executable);
        cmd.arg(input);
        cmd.stdin(Stdio::null());
        if self.config.capture_output {
            cmd.stdout(Stdio::piped());
            cmd.stderr(Stdio::piped());
        } else {
            cmd.stdout(Stdio::inherit());
            cmd.stderr(Stdio::inherit());
        }

        debug!(
            executable = %executable.display(),
            input = %input.display(),
            "spawning program under test"
        );

        let start = Instant::now();
        let mut child = cmd.spawn().map_err(|source| HarnessError::Spawn {
            executable: executable.to_path_buf(),
            source,
        })?;

        // Drain pipes on their own threads so a chatty child never blocks
        // on a full pipe while we wait for it.
        let stdout = child.stdout.take().map(drain);
        let stderr = child.stderr.take().map(drain);

        let status = match self.config.timeout {
            Some(timeout) => wait_with_timeout(&mut child, timeout)?,
            None => child
                .wait()
                .map_err(|e| HarnessError::io(executable, e))?,
        };

        debug!(
            status = %status,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "program under test finished"
        );

        Ok(ProcessOutcome {
            exit_code: status.code(),
            stdout: stdout.map(collect),
            stderr: stderr.map(collect),
        })
    }
}

fn drain<R: Read + Send + 'static>(mut pipe: R) -> JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Err(e) = pipe.read_to_end(&mut buf) {
            warn!(error = %e, captured = buf.len(), "failed to capture child output");
        }
        buf
    })
}

fn collect(handle: JoinHandle<Vec<u8>>) -> Vec<u8> {
    handle.join().unwrap_or_else(|_| {
        warn!("output capture thread panicked; captured output is lost");
        Vec::new()
    })
}

/// Waits for a child process, killing it once `timeout` has elapsed.
fn wait_with_timeout(child: &mut Child, timeout: Duration) -> Result<ExitStatus, HarnessError> {
    let start = Instant::now();

    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok(status),
            Ok(None) => {
                if start.elapsed() > timeout {
                    warn!(
                        timeout_ms = timeout.as_millis() as u64,
                        "program under test timed out, killing it"
                    );
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(HarnessError::Timeout { timeout });
                }
                thread::sleep(Duration::from_millis(20));
            }
            Err(e) => {
                return Err(HarnessError::io(
                    format!("child process {}", child.id()),
                    e,
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_success() {
        assert!(ProcessOutcome::exited(0).success());
        assert!(!ProcessOutcome::exited(3).success());
        let terminated = ProcessOutcome {
            exit_code: None,
            stdout: None,
            stderr: Some(b"boom".to_vec()),
        };
        assert!(!terminated.success());
        assert_eq!(terminated.stderr_text().as_deref(), Some("boom"));
    }

    #[test]
    fn test_spawn_failure_is_reported() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("no-such-renderer");
        let err = SystemRunner::new()
            .run(&missing, Path::new("song.mod"))
            .unwrap_err();
        assert!(matches!(err, HarnessError::Spawn { .. }));
    }

    /// Yields some bytes, then fails.
    struct BrokenPipe {
        sent: bool,
    }

    impl Read for BrokenPipe {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.sent {
                return Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "gone"));
            }
            self.sent = true;
            buf[..2].copy_from_slice(b"ok");
            Ok(2)
        }
    }

    #[test]
    fn test_drain_keeps_output_read_before_error() {
        let captured = collect(drain(BrokenPipe { sent: false }));
        assert_eq!(captured, b"ok".to_vec());
    }

    #[test]
    fn test_collect_survives_panicked_drain() {
        let handle = thread::spawn(|| -> Vec<u8> { panic!("capture thread failed") });
        assert!(collect(handle).is_empty());
    }

    #[test]
    fn test_default_config() {
        let runner = SystemRunner::new();
        assert!(runner.config().timeout.is_none());
        assert!(!runner.config().capture_output);
    }

    #[cfg(unix)]
    mod unix {
        use super::*;
        use std::fs;
        use std::os::unix::fs::PermissionsExt;

        fn script(dir: &Path, name: &str, body: &str) -> std::path::PathBuf {
            let path = dir.join(name);
            fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
            path
        }

        #[test]
        fn test_passes_input_as_sole_argument() {
            let tmp = tempfile::tempdir().unwrap();
            let exe = script(tmp.path(), "echo-args", r#"printf '%s|' "$#" "$1""#);
            let runner = SystemRunner::with_config(RunnerConfig {
                timeout: None,
                capture_output: true,
            });
            let outcome = runner.run(&exe, Path::new("song.mod")).unwrap();
            assert!(outcome.success());
            assert_eq!(outcome.stdout.unwrap(), b"1|song.mod|".to_vec());
        }

        #[test]
        fn test_exit_code_is_reported() {
            let tmp = tempfile::tempdir().unwrap();
            let exe = script(tmp.path(), "fail", "echo oops >&2; exit 7");
            let runner = SystemRunner::with_config(RunnerConfig {
                timeout: Some(Duration::from_secs(30)),
                capture_output: true,
            });
            let outcome = runner.run(&exe, Path::new("x")).unwrap();
            assert_eq!(outcome.exit_code, Some(7));
            assert_eq!(outcome.stderr_text().as_deref(), Some("oops\n"));
        }

        #[test]
        fn test_timeout_kills_child() {
            let tmp = tempfile::tempdir().unwrap();
            let exe = script(tmp.path(), "hang", "exec sleep 30");
            let runner = SystemRunner::with_config(RunnerConfig {
                timeout: Some(Duration::from_millis(200)),
                capture_output: false,
            });
            let err = runner.run(&exe, Path::new("x")).unwrap_err();
            match err {
                HarnessError::Timeout { timeout } => {
                    assert_eq!(timeout, Duration::from_millis(200))
                }
                other => panic!("expected timeout, got {:?}", other),
            }
        }
    }
}
