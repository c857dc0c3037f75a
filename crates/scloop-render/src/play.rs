//! Playback of rendered files through the system audio player.

use std::io::ErrorKind;
use std::path::Path;
use std::process::Command;

use tracing::debug;

use crate::error::PlaybackError;

/// Play an audio file with `afplay`, blocking until playback finishes.
pub fn play(path: &Path) -> Result<(), PlaybackError> {
    if !path.exists() {
        return Err(PlaybackError::NotFound(path.to_path_buf()));
    }

    debug!(file = %path.display(), "starting playback");
    let output = Command::new("afplay").arg(path).output().map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            PlaybackError::PlayerNotFound
        } else {
            PlaybackError::Failed(e.to_string())
        }
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(PlaybackError::Failed(stderr.trim().to_owned()));
    }
    Ok(())
}
