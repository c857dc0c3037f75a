//! Spectral feature extraction (centroid, rolloff, flatness, bandwidth).
//!
//! All four metrics are means over frames of the shared STFT configuration,
//! so two runs over the same file always produce comparable values.

use serde::{Deserialize, Serialize};

use crate::stft::{bin_frequency, magnitude_frames};

/// Fraction of spectral energy below the rolloff frequency
const ROLLOFF_PERCENT: f64 = 0.85;

/// Floor applied to power values before the geometric mean (flatness)
const POWER_FLOOR: f64 = 1e-10;

/// Spectral features for a single channel.
///
/// Each value is the mean of the per-frame measurement across the whole
/// signal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpectralFeatures {
    /// Spectral centroid in Hz (brightness)
    pub centroid_hz: f64,
    /// Frequency below which 85% of spectral energy lies
    pub rolloff_hz: f64,
    /// Spectral flatness, 0-1 (higher = more noise-like)
    pub flatness: f64,
    /// Spectral bandwidth in Hz (spread around the centroid)
    pub bandwidth_hz: f64,
}

/// Compute spectral features for a single channel.
pub fn analyze_spectral(samples: &[f32], sample_rate: u32) -> SpectralFeatures {
    let mut centroid_sum = 0.0f64;
    let mut rolloff_sum = 0.0f64;
    let mut flatness_sum = 0.0f64;
    let mut bandwidth_sum = 0.0f64;
    let mut frames = 0usize;

    magnitude_frames(samples, |mags| {
        frames += 1;

        let mut total_mag = 0.0f64;
        let mut weighted_freq = 0.0f64;
        for (k, &m) in mags.iter().enumerate() {
            let m = m as f64;
            total_mag += m;
            weighted_freq += bin_frequency(k, sample_rate) * m;
        }

        let centroid = if total_mag > 0.0 {
            weighted_freq / total_mag
        } else {
            0.0
        };
        centroid_sum += centroid;

        // Rolloff: first bin where cumulative magnitude crosses the threshold
        let threshold = ROLLOFF_PERCENT * total_mag;
        let mut cumulative = 0.0f64;
        let mut rolloff = 0.0f64;
        for (k, &m) in mags.iter().enumerate() {
            cumulative += m as f64;
            if cumulative >= threshold {
                rolloff = bin_frequency(k, sample_rate);
                break;
            }
        }
        rolloff_sum += rolloff;

        // Flatness: geometric mean / arithmetic mean of the power spectrum
        let bins = mags.len() as f64;
        let mut log_sum = 0.0f64;
        let mut power_sum = 0.0f64;
        for &m in mags {
            let p = (m as f64) * (m as f64);
            log_sum += (p + POWER_FLOOR).ln();
            power_sum += p;
        }
        let geometric = (log_sum / bins).exp();
        let arithmetic = power_sum / bins + POWER_FLOOR;
        flatness_sum += geometric / arithmetic;

        // Bandwidth: magnitude-weighted spread around this frame's centroid
        let mut spread = 0.0f64;
        for (k, &m) in mags.iter().enumerate() {
            let d = bin_frequency(k, sample_rate) - centroid;
            spread += (m as f64) * d * d;
        }
        let bandwidth = if total_mag > 0.0 {
            (spread / total_mag).sqrt()
        } else {
            0.0
        };
        bandwidth_sum += bandwidth;
    });

    let n = frames.max(1) as f64;
    SpectralFeatures {
        centroid_hz: centroid_sum / n,
        rolloff_hz: rolloff_sum / n,
        flatness: flatness_sum / n,
        bandwidth_hz: bandwidth_sum / n,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f64, sample_rate: u32, seconds: f64) -> Vec<f32> {
        let n = (sample_rate as f64 * seconds) as usize;
        (0..n)
            .map(|i| {
                (2.0 * std::f64::consts::PI * freq * i as f64 / sample_rate as f64).sin() as f32
            })
            .collect()
    }

    #[test]
    fn test_sine_centroid_near_tone() {
        let samples = sine(440.0, 44100, 1.0);
        let features = analyze_spectral(&samples, 44100);

        assert!(
            (features.centroid_hz - 440.0).abs() < 50.0,
            "centroid {} not near 440 Hz",
            features.centroid_hz
        );
    }

    #[test]
    fn test_sine_flatter_than_noise() {
        let tone = analyze_spectral(&sine(440.0, 44100, 0.5), 44100);

        // Deterministic pseudo-noise (LCG) so the test has no rand dependency
        let mut state = 0x12345678u32;
        let noise: Vec<f32> = (0..22050)
            .map(|_| {
                state = state.wrapping_mul(1664525).wrapping_add(1013904223);
                (state >> 8) as f32 / (1 << 24) as f32 * 2.0 - 1.0
            })
            .collect();
        let noisy = analyze_spectral(&noise, 44100);

        assert!(
            noisy.flatness > tone.flatness * 10.0,
            "noise flatness {} should dwarf tone flatness {}",
            noisy.flatness,
            tone.flatness
        );
        assert!(noisy.bandwidth_hz > tone.bandwidth_hz);
    }

    #[test]
    fn test_rolloff_above_centroid_for_tone() {
        let samples = sine(1000.0, 44100, 0.5);
        let features = analyze_spectral(&samples, 44100);
        assert!(
            (features.rolloff_hz - 1000.0).abs() < 100.0,
            "rolloff {} not near 1000 Hz",
            features.rolloff_hz
        );
    }

    #[test]
    fn test_silence_degrades_to_near_zero() {
        let samples = vec![0.0f32; 22050];
        let features = analyze_spectral(&samples, 44100);

        assert!(features.centroid_hz.is_finite());
        assert!(features.rolloff_hz.is_finite());
        assert!(features.flatness.is_finite());
        assert!(features.bandwidth_hz.is_finite());
        // DC-only content from the anti-silence offset sits at the bottom
        assert!(features.centroid_hz < 100.0);
    }

    #[test]
    fn test_empty_input_does_not_panic() {
        let features = analyze_spectral(&[], 44100);
        assert!(features.centroid_hz.is_finite());
    }
}
