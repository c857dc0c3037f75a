//! SuperCollider installation discovery and validation.

use std::path::PathBuf;

use crate::error::{RenderError, Result};

/// Environment variable overriding the SuperCollider application path
pub const SC_APP_ENV: &str = "SCLOOP_SC_APP";

/// Default SuperCollider application bundle on macOS
const DEFAULT_SC_APP: &str = "/Applications/SuperCollider.app";

/// SuperCollider application path (`SCLOOP_SC_APP` override, then default).
pub fn sc_app_path() -> PathBuf {
    std::env::var_os(SC_APP_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SC_APP))
}

/// Path to the sclang executable inside the application bundle.
pub fn sclang_path() -> PathBuf {
    sc_app_path().join("Contents").join("MacOS").join("sclang")
}

/// Path to the scsynth executable inside the application bundle.
pub fn scsynth_path() -> PathBuf {
    sc_app_path()
        .join("Contents")
        .join("Resources")
        .join("scsynth")
}

/// Directory containing sclang.
///
/// sclang must run with this as its working directory so its Qt/Cocoa
/// resources resolve.
pub fn sclang_dir() -> PathBuf {
    sclang_path().parent().map(PathBuf::from).unwrap_or_default()
}

#[cfg(unix)]
fn is_executable(path: &std::path::Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(_path: &std::path::Path) -> bool {
    true
}

/// Validate that SuperCollider is installed and usable, with an actionable
/// message when it is not.
pub fn validate_installation() -> Result<()> {
    let app = sc_app_path();
    let sclang = sclang_path();
    let scsynth = scsynth_path();

    if !app.exists() {
        return Err(RenderError::Installation(format!(
            "SuperCollider not found at {}\n\n\
             To install SuperCollider:\n\
             \x20 1. Download from https://supercollider.github.io/downloads\n\
             \x20 2. Move SuperCollider.app to /Applications\n\n\
             Or set {SC_APP_ENV} to a custom location:\n\
             \x20 export {SC_APP_ENV}=/path/to/SuperCollider.app",
            app.display()
        )));
    }

    if !sclang.exists() {
        return Err(RenderError::Installation(format!(
            "sclang executable not found at {}\n\n\
             The SuperCollider installation may be corrupted.\n\
             Try reinstalling from https://supercollider.github.io/downloads",
            sclang.display()
        )));
    }

    if !scsynth.exists() {
        return Err(RenderError::Installation(format!(
            "scsynth executable not found at {}\n\n\
             The SuperCollider installation may be corrupted.\n\
             Try reinstalling from https://supercollider.github.io/downloads",
            scsynth.display()
        )));
    }

    if !is_executable(&sclang) {
        return Err(RenderError::Installation(format!(
            "sclang is not executable: {}\n\nTry running:\n\x20 chmod +x {}",
            sclang.display(),
            sclang.display()
        )));
    }

    Ok(())
}

/// Whether a usable SuperCollider installation was found.
pub fn is_installed() -> bool {
    validate_installation().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths_derive_from_app() {
        // Not touching the env var here: other tests may run in parallel
        let app = sc_app_path();
        assert!(sclang_path().starts_with(&app));
        assert!(scsynth_path().starts_with(&app));
        assert_eq!(sclang_dir(), sclang_path().parent().unwrap());
    }

    #[test]
    fn test_validation_mentions_env_override_when_missing() {
        if sc_app_path().exists() {
            return; // SC actually installed; nothing to assert here
        }
        let err = validate_installation().unwrap_err();
        assert!(err.to_string().contains(SC_APP_ENV));
    }
}
