//! Temporal/dynamics feature extraction (attack, RMS, crest factor).

use serde::{Deserialize, Serialize};

/// Guard against division by zero on silent signals
const EPSILON: f64 = 1e-10;

/// Fraction of peak the envelope must reach to mark the attack point
const ATTACK_THRESHOLD: f64 = 0.9;

/// Temporal/dynamics features.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemporalFeatures {
    /// Time from start to the first sample reaching 90% of peak, in ms
    pub attack_ms: f64,
    /// Whole-signal root-mean-square amplitude
    pub rms: f64,
    /// Peak / RMS ratio (dynamics indicator)
    pub crest_factor: f64,
}

/// Compute temporal features from a mono signal (channel-mean when stereo).
pub fn analyze_temporal(samples: &[f32], sample_rate: u32) -> TemporalFeatures {
    let n = samples.len();
    if n == 0 || sample_rate == 0 {
        return TemporalFeatures {
            attack_ms: 0.0,
            rms: 0.0,
            crest_factor: 0.0,
        };
    }

    let mut sum_sq = 0.0f64;
    let mut peak = 0.0f64;
    for &s in samples {
        let s = s as f64;
        sum_sq += s * s;
        peak = peak.max(s.abs());
    }
    let rms = (sum_sq / n as f64).sqrt();
    let crest_factor = peak / (rms + EPSILON);

    // Attack: first index whose absolute envelope reaches the threshold.
    // A nonzero peak always has such an index; for exact silence the
    // threshold is 0 and index 0 qualifies, giving 0.0 ms.
    let threshold = ATTACK_THRESHOLD * peak;
    let attack_ms = samples
        .iter()
        .position(|&s| (s as f64).abs() >= threshold)
        .map(|i| i as f64 / sample_rate as f64 * 1000.0)
        .unwrap_or(0.0);

    TemporalFeatures {
        attack_ms,
        rms,
        crest_factor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sine_crest_factor() {
        let sample_rate = 44100;
        let samples: Vec<f32> = (0..44100)
            .map(|i| {
                (2.0 * std::f32::consts::PI * 440.0 * i as f32 / sample_rate as f32).sin() * 0.5
            })
            .collect();

        let features = analyze_temporal(&samples, sample_rate as u32);

        assert!(
            (features.crest_factor - std::f64::consts::SQRT_2).abs() < 0.15,
            "crest factor {} not near sqrt(2)",
            features.crest_factor
        );
        assert_relative_eq!(features.rms, 0.5 / std::f64::consts::SQRT_2, epsilon = 0.01);
    }

    #[test]
    fn test_attack_of_delayed_burst() {
        let sample_rate = 44100u32;
        // 100 ms of silence followed by a full-scale burst
        let mut samples = vec![0.0f32; 4410];
        samples.extend(std::iter::repeat(1.0f32).take(441));

        let features = analyze_temporal(&samples, sample_rate);
        assert_relative_eq!(features.attack_ms, 100.0, epsilon = 0.1);
    }

    #[test]
    fn test_silence() {
        let features = analyze_temporal(&vec![0.0f32; 1000], 44100);
        assert_eq!(features.attack_ms, 0.0);
        assert_eq!(features.rms, 0.0);
        assert_eq!(features.crest_factor, 0.0);
    }

    #[test]
    fn test_empty_signal() {
        let features = analyze_temporal(&[], 44100);
        assert_eq!(features.attack_ms, 0.0);
        assert_eq!(features.rms, 0.0);
        assert_eq!(features.crest_factor, 0.0);
    }
}
