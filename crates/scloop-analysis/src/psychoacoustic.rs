//! Psychoacoustic metrics via the MoSQITo reference implementation.
//!
//! MoSQITo only accepts 48 kHz mono float32 input, so the adapter downmixes
//! and resamples before invoking it, and it is an optional capability: when
//! the model is not installed the analyzer degrades to "no data" instead of
//! failing the analysis.
//!
//! Loudness (~900 ms) and roughness (~200 ms) are independent and run in two
//! concurrently spawned worker processes. Sharpness depends on the loudness
//! computation's per-band intermediates and is derived inside the loudness
//! worker, after loudness completes. If spawning workers fails for any
//! infrastructure reason, the same computations are retried sequentially.

use std::io::{self, Write};
use std::process::{Child, Command, Stdio};

use rubato::{FftFixedIn, Resampler};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;

/// Sample rate required by the psychoacoustic model
pub const MODEL_SAMPLE_RATE: u32 = 48000;

/// Minimum prepared length (0.1 s at 48 kHz); shorter input is numerically
/// unstable for the model
const MIN_SAMPLES: usize = 4800;

/// Peak amplitude below which the prepared signal counts as silent
const SILENCE_PEAK: f32 = 1e-10;

const PYTHON: &str = "python3";

/// Worker computing time-varying Zwicker loudness (free field) and, from its
/// per-band intermediates, DIN 45692 sharpness. Reads raw f32le samples on
/// stdin, writes one JSON object on stdout.
const LOUDNESS_WORKER: &str = r#"
import json, sys
import numpy as np
from mosqito.sq_metrics import loudness_zwtv, sharpness_din_from_loudness
y = np.frombuffer(sys.stdin.buffer.read(), dtype=np.float32)
N, N_spec, _, _ = loudness_zwtv(y, fs=48000, field_type="free")
S = sharpness_din_from_loudness(N, N_spec, weighting="din")
json.dump({
    "loudness_sone": float(np.mean(N)),
    "loudness_sone_max": float(np.max(N)),
    "sharpness_acum": float(np.mean(S)),
}, sys.stdout)
"#;

/// Worker computing Daniel-Weber roughness. Same I/O contract as the
/// loudness worker.
const ROUGHNESS_WORKER: &str = r#"
import json, sys
import numpy as np
from mosqito.sq_metrics import roughness_dw
y = np.frombuffer(sys.stdin.buffer.read(), dtype=np.float32)
R, _, _, _ = roughness_dw(y, fs=48000)
json.dump({"roughness_asper": float(np.mean(R))}, sys.stdout)
"#;

/// Psychoacoustic features in Zwicker-model units.
///
/// Values are relative (calibration factor 1.0, no SPL reference), so they
/// are comparable between renders but not absolute.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PsychoacousticFeatures {
    /// Mean time-varying loudness in sone
    pub loudness_sone: f64,
    /// Maximum time-varying loudness in sone
    pub loudness_sone_max: f64,
    /// DIN 45692 sharpness in acum
    pub sharpness_acum: f64,
    /// Daniel-Weber roughness in asper
    pub roughness_asper: f64,
}

#[derive(Debug, Deserialize)]
struct LoudnessOutput {
    loudness_sone: f64,
    loudness_sone_max: f64,
    sharpness_acum: f64,
}

#[derive(Debug, Deserialize)]
struct RoughnessOutput {
    roughness_asper: f64,
}

/// Capability-probed bridge to the psychoacoustic model.
///
/// Callers never branch on whether the model is installed; they only see
/// whether [`analyze`](Self::analyze) produced a result.
#[derive(Debug, Clone)]
pub struct PsychoacousticAnalyzer {
    available: bool,
}

impl PsychoacousticAnalyzer {
    /// Probe for the model and return an analyzer that is either active or
    /// a null object yielding no data.
    pub fn probe() -> Self {
        let available = Command::new(PYTHON)
            .args(["-c", "import mosqito"])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false);
        if !available {
            debug!("MoSQITo not available - psychoacoustic metrics disabled");
        }
        PsychoacousticAnalyzer { available }
    }

    /// An analyzer that always yields no data (used to skip the model).
    pub fn disabled() -> Self {
        PsychoacousticAnalyzer { available: false }
    }

    /// Whether the model probe succeeded.
    pub fn available(&self) -> bool {
        self.available
    }

    /// Compute psychoacoustic metrics, or `None` when the model is
    /// unavailable, the input is unsuitable (too short, silent), or any
    /// computation fails. Failures never propagate to the caller.
    pub fn analyze(
        &self,
        channels: &[Vec<f32>],
        sample_rate: u32,
    ) -> Option<PsychoacousticFeatures> {
        if !self.available {
            return None;
        }

        let prepared = match prepare(channels, sample_rate) {
            Ok(prepared) => prepared,
            Err(e) => {
                warn!("failed to prepare audio for psychoacoustic analysis: {e}");
                return None;
            }
        };

        if prepared.len() < MIN_SAMPLES {
            warn!("audio too short for psychoacoustic analysis");
            return None;
        }
        if prepared.iter().all(|s| s.abs() < SILENCE_PEAK) {
            warn!("audio is silent - skipping psychoacoustic analysis");
            return None;
        }

        let mut bytes = Vec::with_capacity(prepared.len() * 4);
        for sample in &prepared {
            bytes.extend_from_slice(&sample.to_le_bytes());
        }

        let (loudness, roughness) = match run_parallel(&bytes) {
            Ok(outputs) => outputs,
            Err(e) => {
                warn!("parallel psychoacoustic computation failed, falling back to serial: {e}");
                match run_sequential(&bytes) {
                    Ok(outputs) => outputs,
                    Err(e) => {
                        warn!("psychoacoustic analysis failed: {e}");
                        return None;
                    }
                }
            }
        };

        Some(PsychoacousticFeatures {
            loudness_sone: loudness.loudness_sone,
            loudness_sone_max: loudness.loudness_sone_max,
            sharpness_acum: loudness.sharpness_acum,
            roughness_asper: roughness.roughness_asper,
        })
    }
}

/// Convert audio to the model's required format: 48 kHz mono float32.
///
/// Multichannel input is downmixed by channel averaging; any other sample
/// rate is resampled to 48 kHz.
pub fn prepare(channels: &[Vec<f32>], sample_rate: u32) -> Result<Vec<f32>> {
    let mono: Vec<f32> = match channels {
        [] => Vec::new(),
        [only] => only.clone(),
        many => {
            let frames = many.iter().map(Vec::len).min().unwrap_or(0);
            let scale = 1.0 / many.len() as f32;
            (0..frames)
                .map(|i| many.iter().map(|ch| ch[i]).sum::<f32>() * scale)
                .collect()
        }
    };

    resample_mono(&mono, sample_rate, MODEL_SAMPLE_RATE)
}

fn resample_mono(samples: &[f32], source_rate: u32, target_rate: u32) -> Result<Vec<f32>> {
    if source_rate == target_rate || samples.is_empty() {
        return Ok(samples.to_vec());
    }

    const CHUNK_SIZE: usize = 1024;
    const SUB_CHUNKS: usize = 2;

    let mut resampler = FftFixedIn::<f32>::new(
        source_rate as usize,
        target_rate as usize,
        CHUNK_SIZE,
        SUB_CHUNKS,
        1,
    )?;

    let input_frames = samples.len();
    let expected_output_frames =
        (input_frames as f64 * target_rate as f64 / source_rate as f64).ceil() as usize;
    let mut output = Vec::with_capacity(expected_output_frames + CHUNK_SIZE);

    let mut pos = 0;
    while pos < input_frames {
        let needed = resampler.input_frames_next();
        let mut chunk = vec![0.0f32; needed];
        let copy = needed.min(input_frames - pos);
        chunk[..copy].copy_from_slice(&samples[pos..pos + copy]);

        let processed = resampler.process(&[chunk], None)?;
        output.extend_from_slice(&processed[0]);
        pos += needed;
    }

    output.truncate(expected_output_frames.min(output.len()));
    Ok(output)
}

fn spawn_worker(script: &str) -> io::Result<Child> {
    Command::new(PYTHON)
        .args(["-c", script])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
}

fn feed(child: &mut Child, bytes: &[u8]) -> io::Result<()> {
    let mut stdin = child
        .stdin
        .take()
        .ok_or_else(|| io::Error::other("worker stdin not piped"))?;
    stdin.write_all(bytes)?;
    // Dropping stdin closes the pipe so the worker sees EOF
    Ok(())
}

fn collect<T: DeserializeOwned>(child: Child) -> io::Result<T> {
    let output = child.wait_with_output()?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(io::Error::other(format!(
            "worker exited with {}: {}",
            output.status,
            stderr.trim()
        )));
    }
    serde_json::from_slice(&output.stdout).map_err(io::Error::other)
}

fn reap(mut child: Child) {
    let _ = child.kill();
    let _ = child.wait();
}

/// Dispatch both independent workers concurrently and join them.
fn run_parallel(bytes: &[u8]) -> io::Result<(LoudnessOutput, RoughnessOutput)> {
    let mut loudness = spawn_worker(LOUDNESS_WORKER)?;
    let mut roughness = match spawn_worker(ROUGHNESS_WORKER) {
        Ok(child) => child,
        Err(e) => {
            reap(loudness);
            return Err(e);
        }
    };

    if let Err(e) = feed(&mut loudness, bytes).and_then(|_| feed(&mut roughness, bytes)) {
        reap(loudness);
        reap(roughness);
        return Err(e);
    }

    let loudness_output = match collect::<LoudnessOutput>(loudness) {
        Ok(output) => output,
        Err(e) => {
            reap(roughness);
            return Err(e);
        }
    };
    let roughness_output = collect::<RoughnessOutput>(roughness)?;
    Ok((loudness_output, roughness_output))
}

/// Run the identical workers strictly one after another.
fn run_sequential(bytes: &[u8]) -> io::Result<(LoudnessOutput, RoughnessOutput)> {
    let loudness = run_worker::<LoudnessOutput>(LOUDNESS_WORKER, bytes)?;
    let roughness = run_worker::<RoughnessOutput>(ROUGHNESS_WORKER, bytes)?;
    Ok((loudness, roughness))
}

fn run_worker<T: DeserializeOwned>(script: &str, bytes: &[u8]) -> io::Result<T> {
    let mut child = spawn_worker(script)?;
    if let Err(e) = feed(&mut child, bytes) {
        reap(child);
        return Err(e);
    }
    collect(child)
}
