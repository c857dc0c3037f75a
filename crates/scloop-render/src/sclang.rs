//! Subprocess execution of sclang with timeout and output capture.

use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::error::{RenderError, Result};
use crate::paths;

/// Poll interval while waiting for sclang to exit
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Captured result of an sclang run.
#[derive(Debug, Clone)]
pub struct SclangOutcome {
    /// Whether sclang exited on its own with a zero status
    pub success: bool,
    /// Captured standard output (partial when timed out)
    pub stdout: String,
    /// Captured standard error (partial when timed out)
    pub stderr: String,
    /// Exit code, when the process exited normally
    pub exit_code: Option<i32>,
    /// Whether the process was killed after exceeding the timeout
    pub timed_out: bool,
}

impl SclangOutcome {
    /// Stdout and stderr joined, for error scanning.
    pub fn combined_output(&self) -> String {
        if self.stderr.is_empty() {
            self.stdout.clone()
        } else {
            format!("{}\n{}", self.stdout, self.stderr)
        }
    }
}

fn drain(mut reader: impl Read + Send + 'static) -> thread::JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = String::new();
        if reader.read_to_string(&mut buf).is_err() {
            warn!("failed to drain sclang output stream");
        }
        buf
    })
}

/// Run an .scd script through sclang, killing it after `timeout`.
///
/// Output streams are drained on dedicated threads so sclang never blocks
/// on a full pipe. On timeout the process is killed and whatever output was
/// captured so far is returned with `timed_out` set.
pub fn run_sclang(script: &Path, timeout: Duration) -> Result<SclangOutcome> {
    if !script.exists() {
        return Err(RenderError::NotFound(script.to_path_buf()));
    }
    paths::validate_installation()?;

    let sclang = paths::sclang_path();
    debug!(sclang = %sclang.display(), script = %script.display(), "spawning sclang");

    let mut command = Command::new(&sclang);
    command
        .arg(script)
        // sclang resolves its resources relative to its own directory
        .current_dir(paths::sclang_dir())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    if cfg!(target_os = "linux") {
        command.env("QT_QPA_PLATFORM", "offscreen");
    }

    let mut child = command.spawn()?;

    let stdout_handle = child.stdout.take().map(drain);
    let stderr_handle = child.stderr.take().map(drain);

    let deadline = Instant::now() + timeout;
    let mut timed_out = false;
    let status = loop {
        if let Some(status) = child.try_wait()? {
            break Some(status);
        }
        if Instant::now() >= deadline {
            warn!(timeout_sec = timeout.as_secs_f64(), "sclang timed out, killing");
            timed_out = true;
            child.kill()?;
            child.wait()?;
            break None;
        }
        thread::sleep(POLL_INTERVAL);
    };

    let stdout = stdout_handle
        .and_then(|h| h.join().ok())
        .unwrap_or_default();
    let stderr = stderr_handle
        .and_then(|h| h.join().ok())
        .unwrap_or_default();

    Ok(SclangOutcome {
        success: status.map(|s| s.success()).unwrap_or(false),
        stdout,
        stderr,
        exit_code: status.and_then(|s| s.code()),
        timed_out,
    })
}
