//! Integrated loudness measurement (EBU R128 / ITU-R BS.1770).

use ebur128::{EbuR128, Mode};
use tracing::warn;

/// Loudness reported for signals the gating algorithm rejects entirely
/// (digital silence). Keeps every serialized value finite.
const SILENCE_LUFS: f64 = -70.0;

/// One-shot integrated loudness over the full signal, in LUFS.
///
/// Accepts any channel count; channels are passed planar to the meter,
/// which normalizes the axis orientation to (samples, channels) internally.
pub fn analyze_loudness(channels: &[Vec<f32>], sample_rate: u32) -> f64 {
    if channels.is_empty() {
        return SILENCE_LUFS;
    }

    let mut meter = match EbuR128::new(channels.len() as u32, sample_rate, Mode::I) {
        Ok(meter) => meter,
        Err(e) => {
            warn!("failed to create EBU R128 meter: {e}");
            return SILENCE_LUFS;
        }
    };

    let len = channels.iter().map(Vec::len).min().unwrap_or(0);
    if len > 0 {
        let planar: Vec<&[f32]> = channels.iter().map(|ch| &ch[..len]).collect();
        if let Err(e) = meter.add_frames_planar_f32(&planar) {
            warn!("loudness measurement failed: {e}");
            return SILENCE_LUFS;
        }
    }

    let lufs = meter.loudness_global().unwrap_or(SILENCE_LUFS);
    if lufs.is_finite() {
        lufs
    } else {
        SILENCE_LUFS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f32, sample_rate: u32, seconds: f32, amplitude: f32) -> Vec<f32> {
        let n = (sample_rate as f32 * seconds) as usize;
        (0..n)
            .map(|i| {
                amplitude
                    * (2.0 * std::f32::consts::PI * freq * i as f32 / sample_rate as f32).sin()
            })
            .collect()
    }

    #[test]
    fn test_silence_clamps_to_floor() {
        let channels = vec![vec![0.0f32; 44100], vec![0.0f32; 44100]];
        let lufs = analyze_loudness(&channels, 44100);
        assert_eq!(lufs, SILENCE_LUFS);
    }

    #[test]
    fn test_full_scale_sine_near_zero_lufs() {
        let tone = sine(1000.0, 44100, 4.0, 1.0);
        let channels = vec![tone.clone(), tone];
        let lufs = analyze_loudness(&channels, 44100);

        assert!(
            lufs > -2.0 && lufs < 2.0,
            "expected ~0 LUFS for full-scale 1 kHz stereo sine, got {lufs}"
        );
    }

    #[test]
    fn test_quieter_signal_is_quieter() {
        let loud = sine(1000.0, 44100, 3.0, 0.5);
        let quiet = sine(1000.0, 44100, 3.0, 0.05);

        let loud_lufs = analyze_loudness(&[loud.clone(), loud], 44100);
        let quiet_lufs = analyze_loudness(&[quiet.clone(), quiet], 44100);

        assert!(
            loud_lufs - quiet_lufs > 15.0,
            "20 dB gain difference should show up: {loud_lufs} vs {quiet_lufs}"
        );
    }

    #[test]
    fn test_mono_signal() {
        let tone = sine(1000.0, 48000, 3.0, 0.25);
        let lufs = analyze_loudness(&[tone], 48000);
        assert!(lufs.is_finite());
        assert!(lufs < 0.0 && lufs > -40.0, "unexpected mono LUFS {lufs}");
    }
}
