//! Shared STFT frame walker for the spectral and band-energy extractors.
//!
//! All frequency-domain metrics use the same window/hop configuration so
//! their values stay comparable between runs.

use rustfft::{num_complex::Complex, FftPlanner};

/// FFT size for analysis frames
pub(crate) const FFT_SIZE: usize = 2048;

/// Hop size (samples between analysis frames)
pub(crate) const HOP_SIZE: usize = 512;

/// Offset added to every input sample so exact silence does not degenerate
/// the frequency-domain metrics.
pub(crate) const SILENCE_OFFSET: f32 = 1e-10;

/// Center frequency of FFT bin `k` in Hz.
pub(crate) fn bin_frequency(k: usize, sample_rate: u32) -> f64 {
    k as f64 * sample_rate as f64 / FFT_SIZE as f64
}

fn hann_window(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| {
            let angle = 2.0 * std::f32::consts::PI * i as f32 / (size - 1) as f32;
            0.5 * (1.0 - angle.cos())
        })
        .collect()
}

/// Run a Hann-windowed STFT over the signal, invoking `on_frame` with the
/// magnitude spectrum (FFT_SIZE/2 + 1 bins) of each frame.
///
/// Signals shorter than one frame are zero-padded into a single frame, so
/// extremely short inputs degrade to near-zero values instead of erroring.
pub(crate) fn magnitude_frames(samples: &[f32], mut on_frame: impl FnMut(&[f32])) {
    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(FFT_SIZE);
    let window = hann_window(FFT_SIZE);

    let num_frames = if samples.len() >= FFT_SIZE {
        (samples.len() - FFT_SIZE) / HOP_SIZE + 1
    } else {
        1
    };

    let mut buffer = vec![Complex::new(0.0f32, 0.0); FFT_SIZE];
    let mut magnitudes = vec![0.0f32; FFT_SIZE / 2 + 1];

    for frame in 0..num_frames {
        let start = frame * HOP_SIZE;
        for (i, slot) in buffer.iter_mut().enumerate() {
            let sample = samples
                .get(start + i)
                .map(|&s| s + SILENCE_OFFSET)
                .unwrap_or(0.0);
            *slot = Complex::new(sample * window[i], 0.0);
        }
        fft.process(&mut buffer);
        for (k, mag) in magnitudes.iter_mut().enumerate() {
            *mag = buffer[k].norm();
        }
        on_frame(&magnitudes);
    }
}
