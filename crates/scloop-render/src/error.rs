//! Error types for scloop-render
//!
//! System-level failures (missing input, missing SuperCollider install,
//! I/O) are `RenderError`s. Failures reported by sclang itself (syntax
//! errors, server failures, timeouts) are not `Err` values; they ride in
//! [`RenderOutcome`](crate::render::RenderOutcome) together with the
//! captured sclang output.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Render error type (system-level failures only)
#[derive(Error, Debug)]
pub enum RenderError {
    /// Input script does not exist
    #[error("input file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// SuperCollider is not installed or the installation is broken
    #[error("{0}")]
    Installation(String),

    /// Simple function syntax needs an explicit duration
    #[error("duration required for simple function syntax")]
    DurationRequired,

    /// I/O error during file operations
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for render operations
pub type Result<T> = std::result::Result<T, RenderError>;

/// Playback error type
#[derive(Error, Debug)]
pub enum PlaybackError {
    /// File to play does not exist
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// System audio player is not available
    #[error("afplay not found - playback requires macOS")]
    PlayerNotFound,

    /// Player ran but reported failure
    #[error("playback failed: {0}")]
    Failed(String),
}
