//! # scloop
//!
//! Render SuperCollider scripts to WAV files, extract acoustic features,
//! and compare renders. The loop this supports: render a patch, analyze
//! the result, tweak the patch, render again, compare.
//!
//! The work lives in two crates re-exported here:
//! - [`scloop_analysis`] — WAV decoding, feature extraction, comparison
//! - [`scloop_render`] — sclang NRT rendering and playback
//!
//! This crate adds the CLI binary and the plain-text [`format`] layer.

pub use scloop_analysis as analysis;
pub use scloop_render as render;

pub mod format;
