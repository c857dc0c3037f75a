//! Reference-range descriptors for raw measurements.
//!
//! These provide context, not judgment: what counts as "bright" or
//! "compressed" still depends on the material. Consumed by the
//! presentation layer next to the numeric values.

/// Describe a spectral centroid value.
pub fn describe_centroid(hz: f64) -> &'static str {
    if hz < 300.0 {
        "very dark"
    } else if hz < 800.0 {
        "dark/warm"
    } else if hz < 2000.0 {
        "neutral"
    } else if hz < 4000.0 {
        "bright"
    } else {
        "very bright"
    }
}

/// Describe a crest factor (peak/RMS) value.
pub fn describe_crest_factor(cf: f64) -> &'static str {
    if cf < 3.0 {
        "very compressed"
    } else if cf < 10.0 {
        "moderate dynamics"
    } else if cf < 20.0 {
        "punchy/dynamic"
    } else {
        "very dynamic"
    }
}

/// Describe a stereo width (side-energy ratio) value.
pub fn describe_stereo_width(width: f64) -> &'static str {
    if width < 0.1 {
        "mono"
    } else if width < 0.3 {
        "narrow"
    } else if width < 0.6 {
        "moderate"
    } else if width < 0.8 {
        "wide"
    } else {
        "very wide"
    }
}

/// Describe an integrated loudness value against common targets.
pub fn describe_loudness(lufs: f64) -> &'static str {
    if lufs > -10.0 {
        "very loud, likely clipping"
    } else if lufs > -14.0 {
        "loud, streaming target"
    } else if lufs > -18.0 {
        "moderate"
    } else if lufs > -24.0 {
        "quiet, broadcast range"
    } else {
        "very quiet"
    }
}

/// Describe a Zwicker loudness value (sone, relative scale).
pub fn describe_zwicker_loudness(sones: f64) -> &'static str {
    if sones < 5.0 {
        "quiet"
    } else if sones < 20.0 {
        "moderate"
    } else if sones < 50.0 {
        "loud"
    } else {
        "very loud"
    }
}

/// Describe a sharpness value (acum; 1.0 = reference narrow-band noise at 1 kHz).
pub fn describe_sharpness(acum: f64) -> &'static str {
    if acum < 1.0 {
        "dull/warm"
    } else if acum < 2.0 {
        "neutral"
    } else if acum < 3.0 {
        "bright"
    } else {
        "harsh/piercing"
    }
}

/// Describe a roughness value (asper; perception of 20-300 Hz amplitude modulation).
pub fn describe_roughness(asper: f64) -> &'static str {
    if asper < 0.1 {
        "smooth"
    } else if asper < 0.5 {
        "slight texture"
    } else if asper < 1.0 {
        "noticeable modulation"
    } else {
        "rough/gritty"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centroid_ranges() {
        assert_eq!(describe_centroid(100.0), "very dark");
        assert_eq!(describe_centroid(1000.0), "neutral");
        assert_eq!(describe_centroid(5000.0), "very bright");
    }

    #[test]
    fn test_loudness_ranges() {
        assert_eq!(describe_loudness(-5.0), "very loud, likely clipping");
        assert_eq!(describe_loudness(-13.0), "loud, streaming target");
        assert_eq!(describe_loudness(-30.0), "very quiet");
    }

    #[test]
    fn test_width_ranges() {
        assert_eq!(describe_stereo_width(0.05), "mono");
        assert_eq!(describe_stereo_width(0.5), "moderate");
        assert_eq!(describe_stereo_width(0.9), "very wide");
    }
}
