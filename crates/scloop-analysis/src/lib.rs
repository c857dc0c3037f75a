//! # scloop-analysis
//!
//! Acoustic feature extraction and comparison for rendered audio.
//!
//! This crate is the analysis half of the render -> analyze -> compare
//! feedback loop:
//! - **Spectral features**: centroid, rolloff, flatness, bandwidth per channel
//! - **Temporal features**: attack time, RMS, crest factor
//! - **Stereo features**: mid/side width, L/R correlation
//! - **Loudness**: integrated LUFS (EBU R128 / ITU-R BS.1770)
//! - **Band energies**: normalized six-band spectral distribution
//! - **Psychoacoustic metrics**: Zwicker loudness, sharpness, roughness via
//!   the optional MoSQITo reference model
//! - **Comparison**: per-metric deltas with direction, significance, and
//!   human interpretations
//!
//! ## Example
//!
//! ```no_run
//! use scloop_analysis::{analyze, compare};
//!
//! let before = analyze("before.wav")?;
//! let after = analyze("after.wav")?;
//!
//! let diff = compare(&before, &after);
//! for key in &diff.summary.significant_changes {
//!     println!("{key}: {:?}", diff.deltas[key].interpretation);
//! }
//! # Ok::<(), scloop_analysis::AnalysisError>(())
//! ```

pub mod analyze;
pub mod bands;
pub mod compare;
pub mod error;
pub mod interpret;
pub mod loudness;
pub mod psychoacoustic;
pub mod signal;
pub mod spectral;
pub mod stereo;
pub mod temporal;

mod stft;

pub use analyze::{analyze, analyze_with, AnalysisOptions, AnalysisResult, ChannelSpectral};
pub use bands::{analyze_bands, BandEnergies};
pub use compare::{
    compare, compare_files, ComparisonResult, ComparisonSummary, Direction, FeatureDelta,
};
pub use error::{AnalysisError, Result};
pub use loudness::analyze_loudness;
pub use psychoacoustic::{PsychoacousticAnalyzer, PsychoacousticFeatures};
pub use signal::Signal;
pub use spectral::{analyze_spectral, SpectralFeatures};
pub use stereo::{analyze_stereo, StereoFeatures};
pub use temporal::{analyze_temporal, TemporalFeatures};
