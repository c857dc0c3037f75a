//! Whole-loop integration: analyze two renders, compare them, and format
//! both views through the umbrella crate.

use std::f64::consts::PI;
use std::path::{Path, PathBuf};

use scloop::analysis::{analyze_with, compare, AnalysisOptions, Direction};
use scloop::format::{format_analysis, format_comparison};
use scloop::render::wrapper;

const SAMPLE_RATE: u32 = 44100;

fn write_tone(dir: &Path, name: &str, freq: f64, amplitude: f64) -> PathBuf {
    let path = dir.join(name);
    let spec = hound::WavSpec {
        channels: 2,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut writer = hound::WavWriter::create(&path, spec).unwrap();
    for i in 0..SAMPLE_RATE {
        let s = (amplitude * (2.0 * PI * freq * i as f64 / SAMPLE_RATE as f64).sin()) as f32;
        writer.write_sample(s).unwrap();
        writer.write_sample(s).unwrap();
    }
    writer.finalize().unwrap();
    path
}

fn analyze_fast(path: &Path) -> scloop::analysis::AnalysisResult {
    analyze_with(
        path,
        AnalysisOptions {
            skip_psychoacoustic: true,
        },
    )
    .unwrap()
}

#[test]
fn analyze_compare_format_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let dark = write_tone(dir.path(), "dark.wav", 220.0, 0.4);
    let bright = write_tone(dir.path(), "bright.wav", 1760.0, 0.4);

    let a = analyze_fast(&dark);
    let b = analyze_fast(&bright);

    let analysis_text = format_analysis(&a);
    assert!(analysis_text.contains("FILE INFO"));
    assert!(analysis_text.contains("dark.wav"));

    let diff = compare(&a, &b);
    let centroid = &diff.deltas["spectral.left.centroid_hz"];
    assert_eq!(centroid.direction, Direction::Up);
    assert!(centroid.significant);
    assert_eq!(centroid.interpretation.as_deref(), Some("brighter"));

    let comparison_text = format_comparison(&diff);
    assert!(comparison_text.contains("SPECTRAL (changes)"));
    assert!(comparison_text.contains("brighter"));
}

#[test]
fn wrapped_script_targets_analyzable_output() {
    // The wrapper points the NRT score at the path analyze will read
    let out = PathBuf::from("/tmp/loop-out.wav");
    let script = wrapper::wrap_function("{ SinOsc.ar(440) * 0.2 }", 2.0, &out);
    assert!(script.contains("/tmp/loop-out.wav"));
    assert!(script.contains("recordNRT"));
}
