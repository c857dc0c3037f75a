//! WAV decoding into an in-memory planar signal.
//!
//! Decoding happens once per analysis at the file's native sample rate;
//! every extractor reads the same immutable buffers afterwards.

use std::path::Path;

use crate::error::{AnalysisError, Result};

/// Decoded multi-channel PCM audio at its native sample rate.
///
/// Channels are stored planar (one `Vec<f32>` per channel) with samples
/// normalized to [-1.0, 1.0].
#[derive(Debug, Clone)]
pub struct Signal {
    /// Per-channel sample buffers, all the same length.
    pub channels: Vec<Vec<f32>>,
    /// Native sample rate in Hz.
    pub sample_rate: u32,
}

impl Signal {
    /// Decode a WAV file at its native sample rate, preserving channel layout.
    pub fn load(path: &Path) -> Result<Signal> {
        let mut reader = hound::WavReader::open(path).map_err(|e| AnalysisError::Decode {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let spec = reader.spec();
        let channel_count = spec.channels.max(1) as usize;

        let interleaved: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Float => reader
                .samples::<f32>()
                .collect::<std::result::Result<_, _>>(),
            hound::SampleFormat::Int => {
                let scale = 1.0 / (1i64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| v as f32 * scale))
                    .collect::<std::result::Result<_, _>>()
            }
        }
        .map_err(|e| AnalysisError::Decode {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let frames = interleaved.len() / channel_count;
        let mut channels = vec![Vec::with_capacity(frames); channel_count];
        for frame in interleaved.chunks_exact(channel_count) {
            for (ch, &sample) in channels.iter_mut().zip(frame) {
                ch.push(sample);
            }
        }

        Ok(Signal {
            channels,
            sample_rate: spec.sample_rate,
        })
    }

    /// Number of channels.
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Number of frames (samples per channel).
    pub fn frames(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    /// Duration in seconds (frames / rate).
    pub fn duration_sec(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames() as f64 / self.sample_rate as f64
    }

    /// Downmix by averaging all channels into one buffer.
    pub fn channel_average(&self) -> Vec<f32> {
        let frames = self.frames();
        if self.channels.len() == 1 {
            return self.channels[0].clone();
        }
        let scale = 1.0 / self.channels.len() as f32;
        (0..frames)
            .map(|i| self.channels.iter().map(|ch| ch[i]).sum::<f32>() * scale)
            .collect()
    }
}
