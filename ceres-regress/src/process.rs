//! Blocking subprocess invocation with an optional deadline.
//!
//! Both output streams of the child are redirected into the same anonymous
//! temporary file, so the captured text is interleaved exactly the way it
//! would appear on a terminal.

use crate::error::{Error, Result};
use std::{
    ffi::{OsStr, OsString},
    io::{Read as _, Seek as _, SeekFrom},
    path::{Path, PathBuf},
    process::{Child, Command, ExitStatus, Stdio},
    thread,
    time::{Duration, Instant},
};
use tracing::debug;

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// A fully described external command, ready to be run any number of times.
#[derive(Clone, Debug)]
pub struct Invocation {
    program: PathBuf,
    args: Vec<OsString>,
    timeout: Option<Duration>,
}

/// A child process that ran to completion.
#[derive(Debug)]
pub struct Finished {
    pub status: ExitStatus,
    /// Combined stdout and stderr, lossily decoded.
    pub output: String,
}

impl Finished {
    #[must_use]
    #[inline]
    pub fn success(&self) -> bool {
        self.status.success()
    }
}

impl Invocation {
    #[must_use]
    #[inline]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout: None,
        }
    }

    #[must_use]
    #[inline]
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    /// Kill the child if it is still running after `timeout`. `None` waits forever.
    #[must_use]
    #[inline]
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    #[inline]
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Human readable rendering of the command line, for logs.
    #[must_use]
    pub fn command_line(&self) -> String {
        let mut line = self.program.display().to_string();
        for arg in &self.args {
            line.push(' ');
            line.push_str(&arg.to_string_lossy());
        }
        line
    }

    /// Run the command and block until it exits.
    ///
    /// A nonzero exit status is not an error here, callers decide what it
    /// means. Errors are reserved for launch failures, timeouts and I/O on
    /// the output sink.
    pub fn run(&self) -> Result<Finished> {
        let mut sink = tempfile::tempfile()?;
        let stdout = sink.try_clone()?;
        let stderr = sink.try_clone()?;

        debug!(command = %self.command_line(), "spawning");

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::from(stdout))
            .stderr(Stdio::from(stderr))
            .spawn()
            .map_err(|source| Error::Launch {
                program: self.program.clone(),
                source,
            })?;

        let status = match self.timeout {
            Some(limit) => self.wait_with_deadline(&mut child, limit)?,
            None => child.wait()?,
        };

        sink.seek(SeekFrom::Start(0))?;
        let mut raw = Vec::new();
        sink.read_to_end(&mut raw)?;
        let output = String::from_utf8_lossy(&raw).into_owned();

        debug!(command = %self.command_line(), %status, "exited");

        Ok(Finished { status, output })
    }

    fn wait_with_deadline(&self, child: &mut Child, limit: Duration) -> Result<ExitStatus> {
        let deadline = Instant::now() + limit;

        loop {
            if let Some(status) = child.try_wait()? {
                return Ok(status);
            }

            if Instant::now() >= deadline {
                // The child may exit between try_wait and kill; reaping below
                // covers both cases.
                if let Err(err) = child.kill() {
                    debug!(command = %self.command_line(), %err, "kill after timeout failed");
                }
                child.wait()?;

                return Err(Error::TimedOut {
                    program: self.program.clone(),
                    after: limit,
                });
            }

            thread::sleep(POLL_INTERVAL);
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> Invocation {
        Invocation::new("sh").arg("-c").arg(script)
    }

    #[test]
    fn captures_both_streams_and_status() {
        let finished = sh("echo out; echo err 1>&2; exit 3").run().unwrap();

        assert!(!finished.success());
        assert_eq!(finished.status.code(), Some(3));
        assert!(finished.output.contains("out"));
        assert!(finished.output.contains("err"));
    }

    #[test]
    fn zero_exit_is_success() {
        let finished = sh("printf '0 (0)'").run().unwrap();

        assert!(finished.success());
        assert_eq!(finished.output, "0 (0)");
    }

    #[test]
    fn slow_child_is_killed() {
        let result = sh("sleep 5")
            .timeout(Some(Duration::from_millis(100)))
            .run();

        assert!(matches!(result, Err(Error::TimedOut { .. })));
    }

    #[test]
    fn missing_program_is_a_launch_error() {
        let result = Invocation::new("/nonexistent/ceres-regress-tool").run();

        assert!(matches!(result, Err(Error::Launch { .. })));
    }

    #[test]
    fn command_line_joins_arguments() {
        let invocation = Invocation::new("compare")
            .arg("-metric")
            .arg("rmse")
            .arg("null:");

        assert_eq!(invocation.command_line(), "compare -metric rmse null:");
    }
}
