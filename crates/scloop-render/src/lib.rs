//! SuperCollider non-real-time rendering and playback.
//!
//! Renders .scd scripts to WAV files through sclang and plays results
//! through the system audio player. Two script styles are accepted: full
//! NRT scripts containing `recordNRT`, and simple function expressions
//! that get wrapped in NRT boilerplate (these need an explicit duration).
//!
//! sclang failures (syntax errors, server failures, timeouts) are not
//! `Err` values; they come back inside [`RenderOutcome`] with the captured
//! output, so a caller can show the error in context. Only system-level
//! problems (missing input, broken installation, I/O) are [`RenderError`]s.
//!
//! ```no_run
//! use std::path::Path;
//! use scloop_render::{render, RenderOptions};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let outcome = render(
//!     Path::new("patch.scd"),
//!     Path::new("out.wav"),
//!     &RenderOptions { duration: Some(4.0), ..Default::default() },
//! )?;
//! if let Some(error) = &outcome.error {
//!     eprintln!("{error}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod paths;
pub mod play;
pub mod render;
pub mod scerror;
pub mod sclang;
pub mod wrapper;

pub use error::{PlaybackError, RenderError, Result};
pub use play::play;
pub use render::{render, RenderMode, RenderOptions, RenderOutcome, DEFAULT_TIMEOUT};
pub use scerror::ScError;
pub use sclang::{run_sclang, SclangOutcome};
