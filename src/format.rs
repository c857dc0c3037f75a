//! Human-readable formatting of analysis and comparison results.

use std::fmt::Write;

use scloop_analysis::interpret::{
    describe_centroid, describe_crest_factor, describe_loudness, describe_roughness,
    describe_sharpness, describe_stereo_width, describe_zwicker_loudness,
};
use scloop_analysis::{AnalysisResult, ComparisonResult, Direction, FeatureDelta};

const INDENT: &str = "  ";

fn section(out: &mut String, title: &str) {
    let _ = writeln!(out, "=== {title} ===");
}

fn row(out: &mut String, label: &str, value: &str) {
    let _ = writeln!(out, "{INDENT}{label:<14} {value}");
}

fn row3(out: &mut String, label: &str, left: &str, right: &str) {
    let _ = writeln!(out, "{INDENT}{label:<14} {left:<24} {right}");
}

/// Format a full analysis result as sectioned plain text.
pub fn format_analysis(result: &AnalysisResult) -> String {
    let mut out = String::new();

    section(&mut out, "FILE INFO");
    row(&mut out, "File", &result.file);
    row(&mut out, "Duration", &format!("{:.2}s", result.duration_sec));
    row(&mut out, "Sample Rate", &format!("{} Hz", result.sample_rate));
    row(&mut out, "Channels", &result.channels.to_string());
    out.push('\n');

    section(&mut out, "SPECTRAL");
    let left = &result.spectral.left;
    let right = &result.spectral.right;
    row3(&mut out, "", "Left", "Right");
    row3(
        &mut out,
        "Centroid",
        &format!(
            "{:.0} Hz ({})",
            left.centroid_hz,
            describe_centroid(left.centroid_hz)
        ),
        &format!(
            "{:.0} Hz ({})",
            right.centroid_hz,
            describe_centroid(right.centroid_hz)
        ),
    );
    row3(
        &mut out,
        "Rolloff (85%)",
        &format!("{:.0} Hz", left.rolloff_hz),
        &format!("{:.0} Hz", right.rolloff_hz),
    );
    row3(
        &mut out,
        "Flatness",
        &format!("{:.3}", left.flatness),
        &format!("{:.3}", right.flatness),
    );
    row3(
        &mut out,
        "Bandwidth",
        &format!("{:.0} Hz", left.bandwidth_hz),
        &format!("{:.0} Hz", right.bandwidth_hz),
    );
    out.push('\n');

    section(&mut out, "DYNAMICS");
    row(&mut out, "RMS", &format!("{:.4}", result.temporal.rms));
    row(
        &mut out,
        "Crest Factor",
        &format!(
            "{:.1} ({})",
            result.temporal.crest_factor,
            describe_crest_factor(result.temporal.crest_factor)
        ),
    );
    row(
        &mut out,
        "Attack",
        &format!("{:.1} ms", result.temporal.attack_ms),
    );
    out.push('\n');

    section(&mut out, "STEREO");
    row(
        &mut out,
        "Width",
        &format!(
            "{:.2} ({})",
            result.stereo.width,
            describe_stereo_width(result.stereo.width)
        ),
    );
    row(
        &mut out,
        "Correlation",
        &format!("{:.2}", result.stereo.correlation),
    );
    out.push('\n');

    section(&mut out, "BANDS");
    for (label, value) in [
        ("Sub", result.band_energies.sub),
        ("Bass", result.band_energies.bass),
        ("Low Mid", result.band_energies.low_mid),
        ("Mid", result.band_energies.mid),
        ("High Mid", result.band_energies.high_mid),
        ("High", result.band_energies.high),
    ] {
        row(&mut out, label, &format!("{value:.3}"));
    }
    out.push('\n');

    section(&mut out, "LOUDNESS");
    row(
        &mut out,
        "Integrated",
        &format!(
            "{:.1} LUFS ({})",
            result.loudness_lufs,
            describe_loudness(result.loudness_lufs)
        ),
    );

    if let Some(psycho) = &result.psychoacoustic {
        out.push('\n');
        section(&mut out, "PSYCHOACOUSTIC");
        row(
            &mut out,
            "Zwicker",
            &format!(
                "{:.1} sone ({})",
                psycho.loudness_sone,
                describe_zwicker_loudness(psycho.loudness_sone)
            ),
        );
        row(
            &mut out,
            "Sharpness",
            &format!(
                "{:.2} acum ({})",
                psycho.sharpness_acum,
                describe_sharpness(psycho.sharpness_acum)
            ),
        );
        row(
            &mut out,
            "Roughness",
            &format!(
                "{:.3} asper ({})",
                psycho.roughness_asper,
                describe_roughness(psycho.roughness_asper)
            ),
        );
    }

    out
}

fn format_value(value: f64, reference: f64) -> String {
    if reference.abs() > 100.0 {
        format!("{value:.0}")
    } else if reference.abs() > 1.0 {
        format!("{value:.2}")
    } else {
        format!("{value:.4}")
    }
}

fn format_delta_line(key: &str, delta: &FeatureDelta) -> String {
    let mut name = metric_label(key);
    if key.contains(".left.") {
        name.push_str(" (L)");
    } else if key.contains(".right.") {
        name.push_str(" (R)");
    }

    let mut val_a = format_value(delta.value_a, delta.value_a);
    let mut val_b = format_value(delta.value_b, delta.value_a);
    let mut diff = if delta.value_a.abs() > 100.0 {
        format!("{:+.0}", delta.delta)
    } else if delta.value_a.abs() > 1.0 {
        format!("{:+.2}", delta.delta)
    } else {
        format!("{:+.4}", delta.delta)
    };
    if !delta.unit.is_empty() {
        val_a = format!("{val_a} {}", delta.unit);
        val_b = format!("{val_b} {}", delta.unit);
        diff = format!("{diff} {}", delta.unit);
    }

    let arrow = match delta.direction {
        Direction::Up => "^",
        Direction::Down => "v",
        Direction::Unchanged => "=",
    };

    let pct = match delta.percent_change {
        Some(p) if p.abs() < 10000.0 => format!(" ({p:+.1}%)"),
        _ => String::new(),
    };

    format!("{INDENT}{name:<18} {val_a:<12} -> {val_b:<12} {arrow} {diff}{pct}")
}

fn metric_label(key: &str) -> String {
    key.rsplit('.').next().unwrap_or(key).to_owned()
}

/// Format a comparison result as sectioned plain text grouped by category.
pub fn format_comparison(result: &ComparisonResult) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Comparison: {} -> {}", result.file_a, result.file_b);
    let _ = writeln!(
        out,
        "Duration: {:.2}s -> {:.2}s",
        result.duration_a, result.duration_b
    );
    out.push('\n');

    let categories: [(&str, fn(&str) -> bool); 6] = [
        ("SPECTRAL", |k| k.starts_with("spectral")),
        ("TEMPORAL", |k| k.starts_with("temporal")),
        ("STEREO", |k| k.starts_with("stereo")),
        ("BANDS", |k| k.starts_with("band_energies")),
        ("LOUDNESS", |k| k == "loudness_lufs"),
        ("PSYCHOACOUSTIC", |k| k.starts_with("psychoacoustic")),
    ];

    for (title, belongs) in categories {
        let deltas: Vec<_> = result
            .deltas
            .iter()
            .filter(|(key, _)| belongs(key))
            .collect();
        if deltas.is_empty() {
            continue;
        }

        let has_significant = deltas.iter().any(|(_, d)| d.significant);
        if has_significant {
            section(&mut out, &format!("{title} (changes)"));
        } else {
            section(&mut out, title);
        }

        for (key, delta) in deltas {
            let _ = writeln!(out, "{}", format_delta_line(key, delta));
        }
        out.push('\n');
    }

    if !result.summary.interpretations.is_empty() {
        let _ = writeln!(out, "Summary: {}", result.summary.interpretations.join(", "));
    }

    out
}
