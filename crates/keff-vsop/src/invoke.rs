//! Child-process invocation with a wall-clock timeout.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use wait_timeout::ChildExt;

use keff_core::{format_sci, ErrorInfo, KeffError};

/// Default wall-clock budget for one simulator run.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(600);

/// Deterministic report filename for a parameter value: the value in
/// 6-significant-digit scientific notation plus the `.out` extension.
pub fn report_filename(value: f64) -> String {
    format!("{}.out", format_sci(value))
}

/// Handle on the external simulator executable.
///
/// The program takes no command-line arguments; it reads the deck filename
/// and the desired report filename from standard input, emulating its
/// interactive prompts. Exit code 0 signals success.
#[derive(Debug, Clone)]
pub struct Simulator {
    program: PathBuf,
    workdir: PathBuf,
    timeout: Duration,
}

impl Simulator {
    /// Creates a handle for the given executable with the default timeout
    /// and the current directory as working directory.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            workdir: PathBuf::from("."),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Sets the wall-clock timeout for one run.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the working directory the child runs in. The deck and the
    /// produced report are both resolved relative to it.
    pub fn with_workdir(mut self, workdir: impl Into<PathBuf>) -> Self {
        self.workdir = workdir.into();
        self
    }

    /// Path of the simulator executable.
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Checks that the executable exists before any deck is touched.
    pub fn preflight(&self) -> Result<(), KeffError> {
        if self.program.exists() {
            Ok(())
        } else {
            Err(KeffError::Config(
                ErrorInfo::new("program-missing", "simulator executable not found")
                    .with_context("program", self.program.display().to_string()),
            ))
        }
    }

    /// Runs the simulator once, feeding it the deck and report filenames.
    ///
    /// On timeout the child is killed and reaped before the error is
    /// returned; it is never left running.
    pub fn run_case(&self, deck_name: &str, report_name: &str) -> Result<(), KeffError> {
        let mut child = Command::new(&self.program)
            .current_dir(&self.workdir)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|err| {
                KeffError::Invoke(
                    ErrorInfo::new("invoke-spawn", "failed to launch the simulator")
                        .with_context("program", self.program.display().to_string())
                        .with_hint(err.to_string()),
                )
            })?;

        self.send_transcript(&mut child, deck_name, report_name);
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let status = child.wait_timeout(self.timeout).map_err(|err| {
            KeffError::Invoke(
                ErrorInfo::new("invoke-wait", "failed waiting for the simulator")
                    .with_hint(err.to_string()),
            )
        })?;

        let Some(status) = status else {
            // Timed out: kill, reap, then report.
            let _ = child.kill();
            let _ = child.wait();
            join_drain(stdout);
            join_drain(stderr);
            return Err(KeffError::Invoke(
                ErrorInfo::new("invoke-timeout", "simulator run exceeded the timeout")
                    .with_context("timeout_secs", self.timeout.as_secs().to_string())
                    .with_context("report", report_name.to_string()),
            ));
        };

        let stdout = join_drain(stdout);
        let stderr = join_drain(stderr);
        tracing::debug!(
            exit = ?status.code(),
            stdout_bytes = stdout.len(),
            "simulator exited"
        );

        if !status.success() {
            return Err(KeffError::Invoke(
                ErrorInfo::new("invoke-exit", "simulator exited with a failure status")
                    .with_context(
                        "exit_code",
                        status
                            .code()
                            .map_or_else(|| "signal".to_string(), |c| c.to_string()),
                    )
                    .with_context("stderr", stderr.trim().to_string()),
            ));
        }
        Ok(())
    }

    fn send_transcript(&self, child: &mut Child, deck_name: &str, report_name: &str) {
        if let Some(mut stdin) = child.stdin.take() {
            let transcript = format!("{deck_name}\n{report_name}\n");
            // A child that exits before reading the transcript surfaces
            // through its exit status, not through this write.
            if let Err(err) = stdin.write_all(transcript.as_bytes()) {
                tracing::debug!(error = %err, "simulator closed stdin early");
            }
        }
    }
}

fn drain<R: Read + Send + 'static>(source: Option<R>) -> Option<JoinHandle<String>> {
    source.map(|mut reader| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = reader.read_to_end(&mut buf);
            String::from_utf8_lossy(&buf).into_owned()
        })
    })
}

fn join_drain(handle: Option<JoinHandle<String>>) -> String {
    handle
        .and_then(|h| h.join().ok())
        .unwrap_or_default()
}
