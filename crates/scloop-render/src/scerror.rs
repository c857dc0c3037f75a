//! Detection and extraction of errors from sclang output.
//!
//! sclang exits 0 even when compilation fails, so success is determined by
//! scanning the captured output for error markers rather than by exit code.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

/// A structured error extracted from sclang output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScError {
    /// The error message reported by sclang
    pub message: String,
    /// Source file the error points at, when sclang reports one
    pub file: Option<String>,
    /// 1-based line number within that file
    pub line: Option<u32>,
    /// Character position within the line
    pub char_pos: Option<u32>,
}

impl fmt::Display for ScError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ERROR: {}", self.message)?;
        if let (Some(line), Some(char_pos)) = (self.line, self.char_pos) {
            write!(f, " (line {line}, char {char_pos})")?;
        }
        Ok(())
    }
}

fn error_word_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\bERROR\b").unwrap())
}

fn structured_error_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"ERROR:\s*(.+?)\n\s+in file '([^']+)'\n\s+line (\d+) char (\d+)").unwrap()
    })
}

fn simple_error_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"ERROR:\s*(.+)").unwrap())
}

/// Whether sclang output contains any error marker.
pub fn has_error(output: &str) -> bool {
    error_word_re().is_match(output)
        || output.contains("Library has not been compiled successfully")
        || output.contains("FAILURE IN SERVER")
}

/// Extract the first error from sclang output.
///
/// Prefers the structured `ERROR: ... in file '...' line N char M` form;
/// falls back to a bare `ERROR:` line, then to the non-ERROR markers.
pub fn extract_error(output: &str) -> Option<ScError> {
    if let Some(caps) = structured_error_re().captures(output) {
        return Some(ScError {
            message: caps[1].trim().to_owned(),
            file: Some(caps[2].to_owned()),
            line: caps[3].parse().ok(),
            char_pos: caps[4].parse().ok(),
        });
    }

    if let Some(caps) = simple_error_re().captures(output) {
        return Some(ScError {
            message: caps[1].trim().to_owned(),
            file: None,
            line: None,
            char_pos: None,
        });
    }

    if output.contains("Library has not been compiled successfully") {
        return Some(ScError {
            message: "Library has not been compiled successfully".to_owned(),
            file: None,
            line: None,
            char_pos: None,
        });
    }

    if output.contains("FAILURE IN SERVER") {
        let message = output
            .lines()
            .find(|l| l.contains("FAILURE IN SERVER"))
            .map(|l| l.trim().to_owned())
            .unwrap_or_else(|| "FAILURE IN SERVER".to_owned());
        return Some(ScError {
            message,
            file: None,
            line: None,
            char_pos: None,
        });
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_output_has_no_error() {
        assert!(!has_error("compiling class library...\nRender complete\n"));
        // "error" embedded inside a word is not a marker
        assert!(!has_error("loading errorless_synth.scd"));
    }

    #[test]
    fn test_detects_error_markers() {
        assert!(has_error("ERROR: syntax error"));
        assert!(has_error("error: lowercase still counts"));
        assert!(has_error("Library has not been compiled successfully."));
        assert!(has_error("FAILURE IN SERVER /s_new SynthDef not found"));
    }

    #[test]
    fn test_extracts_structured_error() {
        let output = "compiling class library...\n\
                      ERROR: syntax error, unexpected BADTOKEN\n\
                      \x20 in file '/tmp/render.scd'\n\
                      \x20 line 12 char 5:\n";
        let err = extract_error(output).unwrap();
        assert_eq!(err.message, "syntax error, unexpected BADTOKEN");
        assert_eq!(err.file.as_deref(), Some("/tmp/render.scd"));
        assert_eq!(err.line, Some(12));
        assert_eq!(err.char_pos, Some(5));
        assert!(err.to_string().contains("line 12, char 5"));
    }

    #[test]
    fn test_falls_back_to_simple_error() {
        let err = extract_error("ERROR: Message 'foo' not understood.\n").unwrap();
        assert_eq!(err.message, "Message 'foo' not understood.");
        assert!(err.file.is_none());
        assert!(err.line.is_none());
    }

    #[test]
    fn test_server_failure_line() {
        let output = "NRT starting\nFAILURE IN SERVER /s_new SynthDef not found\ndone\n";
        let err = extract_error(output).unwrap();
        assert!(err.message.contains("SynthDef not found"));
    }

    #[test]
    fn test_no_error_extracts_none() {
        assert!(extract_error("Render complete\n").is_none());
    }
}
