//! Feature-delta comparison between two analysis results.
//!
//! Flattens both results into dotted-key metric maps, computes per-metric
//! deltas with direction and significance, and attaches human
//! interpretations for significant changes.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::analyze::{analyze, AnalysisResult};
use crate::error::Result;

/// Absolute delta below which a metric counts as unchanged
const UNCHANGED_EPSILON: f64 = 1e-10;

/// Percent change beyond which a delta counts as significant
const SIGNIFICANCE_PERCENT: f64 = 10.0;

/// Direction of a metric change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Unchanged,
}

/// Delta between two values of one metric.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureDelta {
    /// Dotted metric path, e.g. `spectral.left.centroid_hz`
    pub metric: String,
    pub value_a: f64,
    pub value_b: f64,
    /// `value_b - value_a`
    pub delta: f64,
    /// `delta / |value_a| * 100`; `None` when the base value is ~0
    pub percent_change: Option<f64>,
    pub direction: Direction,
    /// Whether `|percent_change|` exceeds 10%
    pub significant: bool,
    pub unit: String,
    /// Human reading of the change, present only for significant deltas of
    /// known metrics
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interpretation: Option<String>,
}

/// Aggregate view over all deltas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonSummary {
    /// Metric keys with significant changes, in flattening order
    pub significant_changes: Vec<String>,
    pub total_metrics: usize,
    pub changed_count: usize,
    pub significant_count: usize,
    /// Interpretation strings for all significant changes
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interpretations: Vec<String>,
}

/// Complete comparison between two audio files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub file_a: String,
    pub file_b: String,
    pub duration_a: f64,
    pub duration_b: f64,
    pub summary: ComparisonSummary,
    pub deltas: BTreeMap<String, FeatureDelta>,
}

/// Compare two already-computed analysis results.
///
/// Only keys present in both flattened results are compared; metadata keys
/// (`file`, `sample_rate`, `channels`) never enter the comparison, and
/// schema drift (e.g. psychoacoustic data on one side only) is tolerated by
/// silently omitting the missing keys.
pub fn compare(a: &AnalysisResult, b: &AnalysisResult) -> ComparisonResult {
    let flat_a = flatten(a);
    let flat_b: HashMap<String, f64> = flatten(b).into_iter().collect();

    let mut deltas = BTreeMap::new();
    let mut significant_changes = Vec::new();
    let mut interpretations = Vec::new();
    let mut changed_count = 0;
    let mut significant_count = 0;

    for (key, value_a) in flat_a {
        let Some(&value_b) = flat_b.get(&key) else {
            continue;
        };

        let delta = value_b - value_a;

        let percent_change = if value_a.abs() > UNCHANGED_EPSILON {
            Some(delta / value_a.abs() * 100.0)
        } else {
            None
        };

        let direction = if delta.abs() < UNCHANGED_EPSILON {
            Direction::Unchanged
        } else if delta > 0.0 {
            Direction::Up
        } else {
            Direction::Down
        };

        let significant = percent_change.is_some_and(|p| p.abs() > SIGNIFICANCE_PERCENT);

        let interpretation = if significant && direction != Direction::Unchanged {
            significant_changes.push(key.clone());
            let text = interpretation_for(metric_name(&key), direction).map(str::to_owned);
            if let Some(text) = &text {
                interpretations.push(text.clone());
            }
            text
        } else {
            None
        };

        if direction != Direction::Unchanged {
            changed_count += 1;
        }
        if significant {
            significant_count += 1;
        }

        deltas.insert(
            key.clone(),
            FeatureDelta {
                metric: key.clone(),
                value_a,
                value_b,
                delta,
                percent_change,
                direction,
                significant,
                unit: unit_for(metric_name(&key)).to_owned(),
                interpretation,
            },
        );
    }

    ComparisonResult {
        file_a: a.file.clone(),
        file_b: b.file.clone(),
        duration_a: a.duration_sec,
        duration_b: b.duration_sec,
        summary: ComparisonSummary {
            significant_changes,
            total_metrics: deltas.len(),
            changed_count,
            significant_count,
            interpretations,
        },
        deltas,
    }
}

/// Analyze two files and compare them (baseline first).
pub fn compare_files(file_a: impl AsRef<Path>, file_b: impl AsRef<Path>) -> Result<ComparisonResult> {
    let a = analyze(file_a)?;
    let b = analyze(file_b)?;
    Ok(compare(&a, &b))
}

/// Flatten an analysis result into dotted-key numeric pairs.
///
/// This is an explicit typed walk, not reflective introspection: new fields
/// must be added here deliberately, which keeps metadata and non-numeric
/// values out of the comparison by construction. `file`, `sample_rate` and
/// `channels` are intentionally absent.
fn flatten(result: &AnalysisResult) -> Vec<(String, f64)> {
    let mut flat = Vec::with_capacity(32);
    let mut push = |key: &str, value: f64| flat.push((key.to_owned(), value));

    push("duration_sec", result.duration_sec);

    for (side, features) in [
        ("left", &result.spectral.left),
        ("right", &result.spectral.right),
    ] {
        push(&format!("spectral.{side}.centroid_hz"), features.centroid_hz);
        push(&format!("spectral.{side}.rolloff_hz"), features.rolloff_hz);
        push(&format!("spectral.{side}.flatness"), features.flatness);
        push(&format!("spectral.{side}.bandwidth_hz"), features.bandwidth_hz);
    }

    push("temporal.attack_ms", result.temporal.attack_ms);
    push("temporal.rms", result.temporal.rms);
    push("temporal.crest_factor", result.temporal.crest_factor);

    push("stereo.width", result.stereo.width);
    push("stereo.correlation", result.stereo.correlation);

    push("loudness_lufs", result.loudness_lufs);

    if let Some(psycho) = &result.psychoacoustic {
        push("psychoacoustic.loudness_sone", psycho.loudness_sone);
        push("psychoacoustic.loudness_sone_max", psycho.loudness_sone_max);
        push("psychoacoustic.sharpness_acum", psycho.sharpness_acum);
        push("psychoacoustic.roughness_asper", psycho.roughness_asper);
    }

    push("band_energies.sub", result.band_energies.sub);
    push("band_energies.bass", result.band_energies.bass);
    push("band_energies.low_mid", result.band_energies.low_mid);
    push("band_energies.mid", result.band_energies.mid);
    push("band_energies.high_mid", result.band_energies.high_mid);
    push("band_energies.high", result.band_energies.high);

    flat
}

/// Base metric name of a flattened key (`spectral.left.centroid_hz` ->
/// `centroid_hz`).
fn metric_name(key: &str) -> &str {
    key.rsplit('.').next().unwrap_or(key)
}

/// Unit for a base metric name.
fn unit_for(name: &str) -> &'static str {
    match name {
        "centroid_hz" | "rolloff_hz" | "bandwidth_hz" => "Hz",
        "attack_ms" => "ms",
        "loudness_lufs" => "LUFS",
        "duration_sec" => "s",
        "loudness_sone" | "loudness_sone_max" => "sone",
        "sharpness_acum" => "acum",
        "roughness_asper" => "asper",
        _ => "",
    }
}

/// Human reading for a significant change of a known metric.
fn interpretation_for(name: &str, direction: Direction) -> Option<&'static str> {
    let (down, up) = match name {
        "centroid_hz" => ("darker/warmer", "brighter"),
        "rolloff_hz" => ("less high frequency content", "more high frequency content"),
        "bandwidth_hz" => ("narrower spectrum", "wider spectrum"),
        "attack_ms" => ("snappier attack", "slower attack"),
        "rms" => ("quieter", "louder"),
        "crest_factor" => ("more compressed", "more dynamic"),
        "width" => ("narrower stereo", "wider stereo"),
        "correlation" => ("less correlated L/R", "more correlated L/R"),
        "loudness_lufs" => ("quieter", "louder"),
        "loudness_sone" => ("quieter (perceived)", "louder (perceived)"),
        "loudness_sone_max" => ("lower peak loudness", "higher peak loudness"),
        "sharpness_acum" => ("duller/softer", "sharper/brighter"),
        "roughness_asper" => ("smoother", "rougher/grittier"),
        _ => return None,
    };
    match direction {
        Direction::Down => Some(down),
        Direction::Up => Some(up),
        Direction::Unchanged => None,
    }
}
