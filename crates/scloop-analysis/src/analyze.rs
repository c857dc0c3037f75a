//! Analysis orchestrator: decode a file and run every feature extractor.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::bands::{analyze_bands, BandEnergies};
use crate::error::{AnalysisError, Result};
use crate::loudness::analyze_loudness;
use crate::psychoacoustic::{PsychoacousticAnalyzer, PsychoacousticFeatures};
use crate::signal::Signal;
use crate::spectral::{analyze_spectral, SpectralFeatures};
use crate::stereo::{analyze_stereo, StereoFeatures};
use crate::temporal::{analyze_temporal, TemporalFeatures};

/// Per-channel spectral features (mono files duplicate the single channel).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChannelSpectral {
    pub left: SpectralFeatures,
    pub right: SpectralFeatures,
}

/// Complete analysis result for one audio file.
///
/// Immutable once constructed; one result per [`analyze`] call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub file: String,
    pub duration_sec: f64,
    pub sample_rate: u32,
    pub channels: usize,
    pub spectral: ChannelSpectral,
    pub temporal: TemporalFeatures,
    pub stereo: StereoFeatures,
    pub loudness_lufs: f64,
    /// Absent when the psychoacoustic model is unavailable, skipped, or
    /// failed on this input.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub psychoacoustic: Option<PsychoacousticFeatures>,
    pub band_energies: BandEnergies,
}

/// Options for [`analyze_with`].
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalysisOptions {
    /// Skip the psychoacoustic sub-step entirely (faster; the result's
    /// psychoacoustic field stays absent).
    pub skip_psychoacoustic: bool,
}

/// Analyze an audio file with default options (psychoacoustic included
/// when the model is available).
pub fn analyze(path: impl AsRef<Path>) -> Result<AnalysisResult> {
    analyze_with(path, AnalysisOptions::default())
}

/// Analyze an audio file and extract all features.
///
/// Fails with [`AnalysisError::NotFound`] when the file does not exist and
/// [`AnalysisError::Decode`] when it cannot be decoded; the optional
/// psychoacoustic sub-step degrades to an absent field instead of failing.
pub fn analyze_with(path: impl AsRef<Path>, options: AnalysisOptions) -> Result<AnalysisResult> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(AnalysisError::NotFound(path.to_path_buf()));
    }

    let signal = Signal::load(path)?;
    let sample_rate = signal.sample_rate;
    let channels = signal.channel_count();

    // Mono duplicates ch0 as both sides so downstream stays symmetric
    let (left, right) = match signal.channels.as_slice() {
        [] => {
            return Err(AnalysisError::Decode {
                path: path.to_path_buf(),
                reason: "no audio channels".into(),
            })
        }
        [only] => (only, only),
        [first, second, ..] => (first, second),
    };

    let spectral = ChannelSpectral {
        left: analyze_spectral(left, sample_rate),
        right: analyze_spectral(right, sample_rate),
    };

    let combined = signal.channel_average();
    let temporal = analyze_temporal(&combined, sample_rate);
    let stereo = analyze_stereo(left, right);
    let loudness_lufs = analyze_loudness(&signal.channels, sample_rate);
    let band_energies = analyze_bands(&combined, sample_rate);

    let psychoacoustic = if options.skip_psychoacoustic {
        None
    } else {
        PsychoacousticAnalyzer::probe().analyze(&signal.channels, sample_rate)
    };

    Ok(AnalysisResult {
        file: path.display().to_string(),
        duration_sec: signal.duration_sec(),
        sample_rate,
        channels,
        spectral,
        temporal,
        stereo,
        loudness_lufs,
        psychoacoustic,
        band_energies,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_not_found() {
        let err = analyze("/nonexistent/missing.wav").unwrap_err();
        assert!(matches!(err, AnalysisError::NotFound(_)));
        assert!(err.to_string().to_lowercase().contains("not found"));
    }

    #[test]
    fn test_invalid_audio_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bogus.wav");
        std::fs::write(&path, b"definitely not audio").unwrap();

        let err = analyze(&path).unwrap_err();
        assert!(matches!(err, AnalysisError::Decode { .. }));
    }
}
