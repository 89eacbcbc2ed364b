//! Interactions with the external muxing tool.
//!
//! This module owns everything that touches `mkvmerge`: building the
//! argument list for one merge job, checking that the tool is present
//! before any job is dispatched, and actually running it with captured
//! output. The `MergeExecutor` trait is the seam that lets the dispatcher
//! be tested without spawning real processes.

use std::ffi::OsString;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use thiserror::Error;

use crate::error::{CoreError, CoreResult};
use crate::pairing::PairedJob;

/// Name of the external muxing executable.
pub const MERGE_TOOL: &str = "mkvmerge";

/// How often a running job is polled when a timeout is configured.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Failure of a single merge job. One job's error never affects siblings.
#[derive(Error, Debug)]
pub enum JobError {
    #[error("failed to spawn '{tool}': {source}")]
    Spawn {
        tool: String,
        source: std::io::Error,
    },

    #[error("'{tool}' exited with {code}: {stderr}")]
    NonZeroExit {
        tool: String,
        code: i32,
        stderr: String,
    },

    #[error("'{tool}' was terminated by a signal")]
    Killed { tool: String },

    #[error("'{tool}' timed out after {timeout_secs}s")]
    Timeout { tool: String, timeout_secs: u64 },

    #[error("error while waiting for '{tool}': {source}")]
    Wait {
        tool: String,
        source: std::io::Error,
    },
}

/// Raw outcome of one tool invocation: whatever the process wrote to
/// stdout, plus the error if it failed. Stdout is kept even for failed
/// jobs, since `mkvmerge` reports its diagnostics there.
#[derive(Debug)]
pub struct JobOutput {
    pub stdout: Vec<u8>,
    pub error: Option<JobError>,
}

/// One fully-constructed merge invocation.
///
/// The argument shape is fixed:
/// `-o <output_dir>/<video> <video> --language 0:<code> --track-name
/// 0:<display_name> <subtitle>`. Input names stay bare; the child process
/// runs with the scanned directory as its working directory so they
/// resolve regardless of where submux itself was started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeInvocation {
    pub working_dir: PathBuf,
    pub output_path: PathBuf,
    pub video: String,
    pub subtitle: String,
    pub language_arg: String,
    pub track_name_arg: String,
}

impl MergeInvocation {
    pub fn new(
        dir: &Path,
        output_dir: &Path,
        pair: &PairedJob,
        language_code: &str,
        display_name: &str,
    ) -> Self {
        Self {
            working_dir: dir.to_path_buf(),
            output_path: output_dir.join(&pair.video),
            video: pair.video.clone(),
            subtitle: pair.subtitle.clone(),
            language_arg: format!("0:{}", language_code),
            track_name_arg: format!("0:{}", display_name),
        }
    }

    /// The argument vector handed to the tool, in contract order.
    pub fn args(&self) -> Vec<OsString> {
        vec![
            OsString::from("-o"),
            self.output_path.clone().into_os_string(),
            OsString::from(&self.video),
            OsString::from("--language"),
            OsString::from(&self.language_arg),
            OsString::from("--track-name"),
            OsString::from(&self.track_name_arg),
            OsString::from(&self.subtitle),
        ]
    }
}

/// Executes one merge invocation. Implementations must be shareable across
/// the dispatcher's worker threads.
pub trait MergeExecutor: Send + Sync {
    fn execute(&self, invocation: &MergeInvocation) -> JobOutput;
}

/// Real executor that spawns `mkvmerge` with captured output.
pub struct MkvmergeExecutor {
    program: String,
    timeout: Option<Duration>,
}

impl MkvmergeExecutor {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self {
            program: MERGE_TOOL.to_string(),
            timeout,
        }
    }

    /// Overrides the executable name. Used by tests to stand in a fake
    /// tool without touching PATH.
    pub fn with_program(program: impl Into<String>, timeout: Option<Duration>) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }
}

impl Default for MkvmergeExecutor {
    fn default() -> Self {
        Self::new(None)
    }
}

impl MergeExecutor for MkvmergeExecutor {
    fn execute(&self, invocation: &MergeInvocation) -> JobOutput {
        log::debug!(
            "running {} {:?} in {}",
            self.program,
            invocation.args(),
            invocation.working_dir.display()
        );

        let mut child = match Command::new(&self.program)
            .args(invocation.args())
            .current_dir(&invocation.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
        {
            Ok(child) => child,
            Err(source) => {
                return JobOutput {
                    stdout: Vec::new(),
                    error: Some(JobError::Spawn {
                        tool: self.program.clone(),
                        source,
                    }),
                };
            }
        };

        // Drain both pipes off-thread so a chatty tool cannot deadlock
        // against a full pipe buffer while we wait on it.
        let stdout_handle = spawn_reader(child.stdout.take());
        let stderr_handle = spawn_reader(child.stderr.take());

        let status = match self.timeout {
            Some(timeout) => {
                let deadline = Instant::now() + timeout;
                loop {
                    match child.try_wait() {
                        Ok(Some(status)) => break Ok(status),
                        Ok(None) if Instant::now() >= deadline => {
                            let _ = child.kill();
                            let _ = child.wait();
                            let stdout = drain(stdout_handle);
                            let _ = drain(stderr_handle);
                            return JobOutput {
                                stdout,
                                error: Some(JobError::Timeout {
                                    tool: self.program.clone(),
                                    timeout_secs: timeout.as_secs(),
                                }),
                            };
                        }
                        Ok(None) => std::thread::sleep(POLL_INTERVAL),
                        Err(source) => break Err(source),
                    }
                }
            }
            None => child.wait(),
        };

        let stdout = drain(stdout_handle);
        let stderr = drain(stderr_handle);

        match status {
            Ok(status) if status.success() => JobOutput {
                stdout,
                error: None,
            },
            Ok(status) => {
                let error = match status.code() {
                    Some(code) => JobError::NonZeroExit {
                        tool: self.program.clone(),
                        code,
                        stderr: String::from_utf8_lossy(&stderr).trim_end().to_string(),
                    },
                    None => JobError::Killed {
                        tool: self.program.clone(),
                    },
                };
                JobOutput {
                    stdout,
                    error: Some(error),
                }
            }
            Err(source) => JobOutput {
                stdout,
                error: Some(JobError::Wait {
                    tool: self.program.clone(),
                    source,
                }),
            },
        }
    }
}

fn spawn_reader<R: Read + Send + 'static>(
    pipe: Option<R>,
) -> Option<std::thread::JoinHandle<Vec<u8>>> {
    pipe.map(|mut pipe| {
        std::thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = pipe.read_to_end(&mut buf);
            buf
        })
    })
}

fn drain(handle: Option<std::thread::JoinHandle<Vec<u8>>>) -> Vec<u8> {
    handle
        .and_then(|handle| handle.join().ok())
        .unwrap_or_default()
}

/// Checks that a required external command is available and executable.
///
/// Runs `<tool> --version` and discards the output; only existence
/// matters here, per-job failures are still captured individually at
/// dispatch time.
pub fn check_dependency(tool: &str) -> CoreResult<()> {
    let result = Command::new(tool)
        .arg("--version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match result {
        Ok(_) => {
            log::debug!("found dependency: {}", tool);
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log::warn!("dependency '{}' not found", tool);
            Err(CoreError::DependencyNotFound(tool.to_string()))
        }
        Err(source) => Err(CoreError::DependencyCheck {
            tool: tool.to_string(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn pair(video: &str, subtitle: &str) -> PairedJob {
        PairedJob {
            index: 0,
            video: video.to_string(),
            subtitle: subtitle.to_string(),
        }
    }

    #[test]
    fn invocation_args_follow_the_contract() {
        let invocation = MergeInvocation::new(
            Path::new("/videos"),
            Path::new("/videos/output"),
            &pair("a.mkv", "a.srt"),
            "eng",
            "English",
        );

        let expected: Vec<OsString> = [
            "-o",
            "/videos/output/a.mkv",
            "a.mkv",
            "--language",
            "0:eng",
            "--track-name",
            "0:English",
            "a.srt",
        ]
        .iter()
        .map(OsString::from)
        .collect();

        assert_eq!(invocation.args(), expected);
        assert_eq!(invocation.working_dir, Path::new("/videos"));
    }

    #[cfg(unix)]
    mod process {
        use super::*;
        use std::os::unix::fs::PermissionsExt;

        fn fake_tool(dir: &Path, body: &str) -> String {
            let path = dir.join("fake-tool");
            std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
            let mut perms = std::fs::metadata(&path).unwrap().permissions();
            perms.set_mode(0o755);
            std::fs::set_permissions(&path, perms).unwrap();
            path.to_string_lossy().into_owned()
        }

        fn invocation(dir: &Path) -> MergeInvocation {
            MergeInvocation::new(
                dir,
                &dir.join("output"),
                &pair("a.mkv", "a.srt"),
                "eng",
                "English",
            )
        }

        #[test]
        fn captures_stdout_on_success() {
            let dir = tempdir().unwrap();
            let tool = fake_tool(dir.path(), "echo merged \"$@\"");
            let executor = MkvmergeExecutor::with_program(tool, None);

            let output = executor.execute(&invocation(dir.path()));
            assert!(output.error.is_none());
            let stdout = String::from_utf8_lossy(&output.stdout);
            assert!(stdout.contains("merged"));
            assert!(stdout.contains("0:eng"));
        }

        #[test]
        fn nonzero_exit_carries_code_and_stderr() {
            let dir = tempdir().unwrap();
            let tool = fake_tool(dir.path(), "echo boom >&2; exit 2");
            let executor = MkvmergeExecutor::with_program(tool, None);

            let output = executor.execute(&invocation(dir.path()));
            match output.error {
                Some(JobError::NonZeroExit { code, stderr, .. }) => {
                    assert_eq!(code, 2);
                    assert_eq!(stderr, "boom");
                }
                other => panic!("expected NonZeroExit, got {:?}", other),
            }
        }

        #[test]
        fn missing_program_is_a_spawn_error() {
            let dir = tempdir().unwrap();
            let executor =
                MkvmergeExecutor::with_program("/surely/does/not/exist/mkvmerge", None);

            let output = executor.execute(&invocation(dir.path()));
            assert!(matches!(output.error, Some(JobError::Spawn { .. })));
        }

        #[test]
        fn hung_tool_times_out() {
            let dir = tempdir().unwrap();
            // exec so the kill hits the sleeping process itself, not a
            // shell wrapper that would leave it holding the pipes open.
            let tool = fake_tool(dir.path(), "exec sleep 30");
            let executor =
                MkvmergeExecutor::with_program(tool, Some(Duration::from_millis(300)));

            let output = executor.execute(&invocation(dir.path()));
            assert!(matches!(output.error, Some(JobError::Timeout { .. })));
        }
    }

    #[test]
    fn missing_dependency_is_reported() {
        let err = check_dependency("surely-does-not-exist-anywhere").unwrap_err();
        assert!(matches!(err, CoreError::DependencyNotFound(_)));
    }
}
