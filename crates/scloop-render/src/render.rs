//! Non-real-time rendering of SuperCollider scripts to WAV files.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::error::{RenderError, Result};
use crate::scerror::{self, ScError};
use crate::sclang;
use crate::wrapper;

/// Default sclang timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// How the input script was rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// The script already contained a `recordNRT` call
    FullNrt,
    /// A simple function expression was wrapped in NRT boilerplate
    Wrapped,
}

/// Options controlling a render.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Render duration in seconds; required for simple function syntax
    pub duration: Option<f64>,
    /// Time to let sclang run before killing it
    pub timeout: Duration,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            duration: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Result of a render attempt.
///
/// Failures reported by sclang (syntax errors, server failures, timeouts)
/// are carried here rather than as `Err`, together with the captured
/// output, so callers can show both.
#[derive(Debug, Clone)]
pub struct RenderOutcome {
    /// Whether a non-empty output file was produced without errors
    pub success: bool,
    /// The (absolutized) output path
    pub output_path: PathBuf,
    /// Duration of the rendered file, probed from the WAV header
    pub duration_sec: Option<f64>,
    /// Wall-clock time spent in sclang
    pub render_time_sec: f64,
    /// The extracted error when the render failed
    pub error: Option<ScError>,
    /// Combined sclang stdout and stderr
    pub sclang_output: String,
    /// How the script was rendered
    pub mode: RenderMode,
}

fn absolutize(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

fn get_wav_duration(path: &Path) -> Option<f64> {
    let reader = hound::WavReader::open(path).ok()?;
    let spec = reader.spec();
    if spec.sample_rate == 0 {
        return None;
    }
    let frames = reader.duration() as f64;
    Some(frames / spec.sample_rate as f64)
}

fn failed(
    outcome: RenderOutcome,
    message: impl Into<String>,
) -> RenderOutcome {
    RenderOutcome {
        success: false,
        error: Some(ScError {
            message: message.into(),
            file: None,
            line: None,
            char_pos: None,
        }),
        ..outcome
    }
}

/// Render an .scd script to a WAV file.
///
/// Scripts containing `recordNRT` run as-is after placeholder substitution;
/// simple function expressions are wrapped, which requires
/// `options.duration`. The prepared script is written to a temp file so the
/// input is never modified.
pub fn render(input: &Path, output: &Path, options: &RenderOptions) -> Result<RenderOutcome> {
    if !input.exists() {
        return Err(RenderError::NotFound(input.to_path_buf()));
    }
    let output = absolutize(output)?;
    let code = std::fs::read_to_string(input)?;

    let mode = if wrapper::needs_wrapping(&code) {
        RenderMode::Wrapped
    } else {
        RenderMode::FullNrt
    };
    debug!(?mode, input = %input.display(), "preparing render script");

    let prepared = match mode {
        RenderMode::Wrapped => {
            let duration = options.duration.ok_or(RenderError::DurationRequired)?;
            wrapper::wrap_function(&code, duration, &output)
        }
        RenderMode::FullNrt => wrapper::replace_placeholders(&code, &output, options.duration),
    };

    let script = tempfile::Builder::new()
        .prefix("scloop-render-")
        .suffix(".scd")
        .tempfile()?;
    std::fs::write(script.path(), &prepared)?;

    let start = Instant::now();
    let run = sclang::run_sclang(script.path(), options.timeout)?;
    let render_time_sec = start.elapsed().as_secs_f64();

    let sclang_output = run.combined_output();
    let outcome = RenderOutcome {
        success: false,
        output_path: output.clone(),
        duration_sec: None,
        render_time_sec,
        error: None,
        sclang_output: sclang_output.clone(),
        mode,
    };

    if run.timed_out {
        warn!(elapsed_sec = render_time_sec, "render timed out");
        // An error in the partial output explains the hang better than
        // the timeout itself
        let error = scerror::extract_error(&sclang_output).unwrap_or_else(|| ScError {
            message: format!(
                "render timed out after {:.0} seconds",
                options.timeout.as_secs_f64()
            ),
            file: None,
            line: None,
            char_pos: None,
        });
        return Ok(RenderOutcome {
            error: Some(error),
            ..outcome
        });
    }

    if scerror::has_error(&sclang_output) {
        let error = scerror::extract_error(&sclang_output).unwrap_or_else(|| ScError {
            message: "sclang reported an error".to_owned(),
            file: None,
            line: None,
            char_pos: None,
        });
        return Ok(RenderOutcome {
            error: Some(error),
            ..outcome
        });
    }

    if !output.exists() {
        return Ok(failed(
            outcome,
            format!("no output file was produced at {}", output.display()),
        ));
    }
    let size = std::fs::metadata(&output)?.len();
    if size == 0 {
        return Ok(failed(
            outcome,
            format!("output file is empty: {}", output.display()),
        ));
    }

    let duration_sec = get_wav_duration(&output);
    info!(
        output = %output.display(),
        duration_sec,
        render_time_sec,
        "render complete"
    );
    Ok(RenderOutcome {
        success: true,
        duration_sec,
        ..outcome
    })
}
