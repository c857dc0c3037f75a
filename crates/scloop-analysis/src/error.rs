//! Error types for scloop-analysis

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Analysis error type
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Input file does not exist
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Input file exists but could not be decoded as audio
    #[error("failed to decode audio file {}: {reason}", .path.display())]
    Decode { path: PathBuf, reason: String },

    /// I/O error during file operations
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Resampling error
    #[error("resampling error: {0}")]
    Resample(String),
}

/// Result type for analysis operations
pub type Result<T> = std::result::Result<T, AnalysisError>;

// From trait implementations for external library errors at API boundary
// These convert complex external error types to simple strings for user-facing messages

impl From<rubato::ResamplerConstructionError> for AnalysisError {
    fn from(e: rubato::ResamplerConstructionError) -> Self {
        AnalysisError::Resample(e.to_string())
    }
}

impl From<rubato::ResampleError> for AnalysisError {
    fn from(e: rubato::ResampleError) -> Self {
        AnalysisError::Resample(e.to_string())
    }
}
