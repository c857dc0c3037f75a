//! Band-energy distribution across six fixed frequency bands.
//!
//! Energies are fractions of the total in-range (20 Hz - 20 kHz) energy and
//! sum to 1.0 for any signal with audible content; silence yields all zeros.

use serde::{Deserialize, Serialize};

use crate::stft::{bin_frequency, magnitude_frames};

/// Band edges in Hz: (low, high), half-open [low, high)
const BAND_EDGES: [(f64, f64); 6] = [
    (20.0, 60.0),      // sub
    (60.0, 250.0),     // bass
    (250.0, 500.0),    // low mid
    (500.0, 2000.0),   // mid
    (2000.0, 4000.0),  // high mid
    (4000.0, 20000.0), // high
];

/// Normalized energy fractions across six fixed bands.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandEnergies {
    /// 20-60 Hz
    pub sub: f64,
    /// 60-250 Hz
    pub bass: f64,
    /// 250-500 Hz
    pub low_mid: f64,
    /// 500-2000 Hz
    pub mid: f64,
    /// 2000-4000 Hz
    pub high_mid: f64,
    /// 4000-20000 Hz
    pub high: f64,
}

impl BandEnergies {
    fn zero() -> Self {
        BandEnergies {
            sub: 0.0,
            bass: 0.0,
            low_mid: 0.0,
            mid: 0.0,
            high_mid: 0.0,
            high: 0.0,
        }
    }

    /// Sum across the six bands (1.0 for any non-silent signal, 0.0 for silence).
    pub fn total(&self) -> f64 {
        self.sub + self.bass + self.low_mid + self.mid + self.high_mid + self.high
    }
}

/// Peak amplitude below which the signal counts as silent
const SILENCE_PEAK: f32 = 1e-10;

/// Compute the band-energy distribution of a mono signal.
pub fn analyze_bands(samples: &[f32], sample_rate: u32) -> BandEnergies {
    // Silence has no distribution to normalize; report all zeros rather
    // than amplifying the anti-silence STFT offset into a fake one.
    if samples.iter().all(|s| s.abs() < SILENCE_PEAK) {
        return BandEnergies::zero();
    }

    let mut energies = [0.0f64; 6];

    magnitude_frames(samples, |mags| {
        for (k, &m) in mags.iter().enumerate() {
            let freq = bin_frequency(k, sample_rate);
            let power = (m as f64) * (m as f64);
            for (band, &(low, high)) in BAND_EDGES.iter().enumerate() {
                if freq >= low && freq < high {
                    energies[band] += power;
                    break;
                }
            }
        }
    });

    let total: f64 = energies.iter().sum();
    if total <= 0.0 {
        return BandEnergies::zero();
    }

    BandEnergies {
        sub: energies[0] / total,
        bass: energies[1] / total,
        low_mid: energies[2] / total,
        mid: energies[3] / total,
        high_mid: energies[4] / total,
        high: energies[5] / total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sine(freq: f64, sample_rate: u32, seconds: f64) -> Vec<f32> {
        let n = (sample_rate as f64 * seconds) as usize;
        (0..n)
            .map(|i| {
                (2.0 * std::f64::consts::PI * freq * i as f64 / sample_rate as f64).sin() as f32
            })
            .collect()
    }

    #[test]
    fn test_bass_tone_lands_in_bass_band() {
        let energies = analyze_bands(&sine(100.0, 44100, 1.0), 44100);
        assert!(
            energies.bass > 0.9,
            "100 Hz tone should dominate the bass band, got {energies:?}"
        );
    }

    #[test]
    fn test_mid_tone_lands_in_mid_band() {
        let energies = analyze_bands(&sine(1000.0, 44100, 1.0), 44100);
        assert!(energies.mid > 0.9, "1 kHz tone misplaced: {energies:?}");
    }

    #[test]
    fn test_high_tone_lands_in_high_band() {
        let energies = analyze_bands(&sine(8000.0, 44100, 1.0), 44100);
        assert!(energies.high > 0.9, "8 kHz tone misplaced: {energies:?}");
    }

    #[test]
    fn test_normalization_invariant() {
        let energies = analyze_bands(&sine(440.0, 44100, 0.5), 44100);
        assert_relative_eq!(energies.total(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_silence_is_all_zero() {
        let energies = analyze_bands(&vec![0.0f32; 44100], 44100);
        assert_eq!(energies, BandEnergies::zero());
        assert_eq!(energies.total(), 0.0);
    }
}
