//! Command-line interface for rendering, analyzing, playing, and comparing
//! SuperCollider output.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use scloop::format::{format_analysis, format_comparison};
use scloop_analysis::{analyze_with, compare, AnalysisOptions};
use scloop_render::{play, render, RenderOptions};

/// Exit code for errors the user's script or audio caused
const EXIT_ANALYSIS: u8 = 1;
/// Exit code for system errors (missing files, missing installations)
const EXIT_SYSTEM: u8 = 2;

#[derive(Parser)]
#[command(name = "scloop", version, about = "Render SuperCollider code to WAV files, analyze and compare them")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a SuperCollider script to a WAV file
    Render {
        /// SuperCollider file to render (.scd)
        file: PathBuf,
        /// Output WAV path; defaults to the input filename with .wav
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Duration in seconds (required for simple function syntax)
        #[arg(short, long)]
        duration: Option<f64>,
        /// Timeout in seconds for rendering
        #[arg(short, long, default_value_t = 120.0)]
        timeout: f64,
        /// Output result as JSON
        #[arg(short, long)]
        json: bool,
        /// Show sclang output
        #[arg(long)]
        verbose: bool,
    },
    /// Analyze a WAV file and extract acoustic features
    Analyze {
        /// WAV file to analyze
        file: PathBuf,
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
        /// Skip psychoacoustic metrics (faster analysis)
        #[arg(long)]
        no_psychoacoustic: bool,
    },
    /// Play an audio file through the system speaker
    Play {
        /// Audio file to play (WAV)
        file: PathBuf,
    },
    /// Compare two audio files and show feature deltas
    Compare {
        /// First audio file (baseline)
        file_a: PathBuf,
        /// Second audio file (comparison)
        file_b: PathBuf,
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },
    /// Render, analyze, and play in one step
    Iterate {
        /// SuperCollider file, or inline code with --code
        source: String,
        /// Treat SOURCE as inline SuperCollider code instead of a path
        #[arg(short, long)]
        code: bool,
        /// Keep the rendered WAV at this path (otherwise a temp file)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Duration in seconds (required for simple function syntax)
        #[arg(short, long)]
        duration: Option<f64>,
        /// Timeout in seconds for rendering
        #[arg(short, long, default_value_t = 120.0)]
        timeout: f64,
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
        /// Skip playback
        #[arg(long)]
        no_play: bool,
        /// Skip psychoacoustic metrics (faster analysis)
        #[arg(long)]
        no_psychoacoustic: bool,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().command {
        Command::Render {
            file,
            output,
            duration,
            timeout,
            json,
            verbose,
        } => cmd_render(file, output, duration, timeout, json, verbose),
        Command::Analyze {
            file,
            json,
            no_psychoacoustic,
        } => cmd_analyze(file, json, no_psychoacoustic),
        Command::Play { file } => cmd_play(file),
        Command::Compare {
            file_a,
            file_b,
            json,
        } => cmd_compare(file_a, file_b, json),
        Command::Iterate {
            source,
            code,
            output,
            duration,
            timeout,
            json,
            no_play,
            no_psychoacoustic,
        } => cmd_iterate(IterateArgs {
            source,
            code,
            output,
            duration,
            timeout,
            json,
            no_play,
            no_psychoacoustic,
        }),
    }
}

fn require_file(path: &PathBuf) -> Result<(), ExitCode> {
    if !path.exists() {
        eprintln!("Error: file not found: {}", path.display());
        return Err(ExitCode::from(EXIT_SYSTEM));
    }
    if !path.is_file() {
        eprintln!("Error: not a file: {}", path.display());
        return Err(ExitCode::from(EXIT_SYSTEM));
    }
    Ok(())
}

fn cmd_render(
    file: PathBuf,
    output: Option<PathBuf>,
    duration: Option<f64>,
    timeout: f64,
    json: bool,
    verbose: bool,
) -> ExitCode {
    let output = output.unwrap_or_else(|| file.with_extension("wav"));
    if file.exists() {
        if let Some(parent) = output.parent() {
            // Best effort; render reports path problems itself
            let _ = std::fs::create_dir_all(parent);
        }
    }

    let options = RenderOptions {
        duration,
        timeout: Duration::from_secs_f64(timeout),
    };
    let outcome = match render(&file, &output, &options) {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::from(EXIT_SYSTEM);
        }
    };

    if json {
        let mut data = render_json(&outcome);
        if verbose {
            data["sclang_output"] = serde_json::json!(outcome.sclang_output);
        }
        println!("{:#}", data);
    } else if outcome.success {
        println!("Rendered: {}", outcome.output_path.display());
        if let Some(duration_sec) = outcome.duration_sec {
            println!(
                "  Duration: {duration_sec:.2}s, Render time: {:.2}s",
                outcome.render_time_sec
            );
        }
    } else {
        eprintln!("Render failed");
        if let Some(error) = &outcome.error {
            eprintln!("{error}");
        }
    }

    if verbose && !json && !outcome.sclang_output.is_empty() {
        println!("\n--- sclang output ---");
        println!("{}", outcome.sclang_output);
    }

    if outcome.success {
        ExitCode::SUCCESS
    } else if outcome.sclang_output.is_empty() {
        ExitCode::from(EXIT_SYSTEM)
    } else {
        ExitCode::from(EXIT_ANALYSIS)
    }
}

fn cmd_analyze(file: PathBuf, json: bool, no_psychoacoustic: bool) -> ExitCode {
    if let Err(code) = require_file(&file) {
        return code;
    }

    let options = AnalysisOptions {
        skip_psychoacoustic: no_psychoacoustic,
    };
    match analyze_with(&file, options) {
        Ok(result) => {
            if json {
                match serde_json::to_string_pretty(&result) {
                    Ok(text) => println!("{text}"),
                    Err(e) => {
                        eprintln!("Error: {e}");
                        return ExitCode::from(EXIT_SYSTEM);
                    }
                }
            } else {
                print!("{}", format_analysis(&result));
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Analysis failed: {e}");
            ExitCode::from(EXIT_ANALYSIS)
        }
    }
}

fn cmd_play(file: PathBuf) -> ExitCode {
    if let Err(code) = require_file(&file) {
        return code;
    }

    println!("Playing: {}", file.display());
    match play(&file) {
        Ok(()) => {
            println!("Played: {}", file.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Playback error: {e}");
            ExitCode::from(EXIT_ANALYSIS)
        }
    }
}

struct IterateArgs {
    source: String,
    code: bool,
    output: Option<PathBuf>,
    duration: Option<f64>,
    timeout: f64,
    json: bool,
    no_play: bool,
    no_psychoacoustic: bool,
}

fn render_json(outcome: &scloop_render::RenderOutcome) -> serde_json::Value {
    let mut data = serde_json::json!({
        "success": outcome.success,
        "output_path": outcome.output_path,
        "duration_sec": outcome.duration_sec,
        "render_time_sec": (outcome.render_time_sec * 1000.0).round() / 1000.0,
        "mode": match outcome.mode {
            scloop_render::RenderMode::FullNrt => "full_nrt",
            scloop_render::RenderMode::Wrapped => "wrapped",
        },
    });
    if let Some(error) = &outcome.error {
        data["error"] = serde_json::json!({
            "message": error.message,
            "file": error.file,
            "line": error.line,
            "char": error.char_pos,
        });
    }
    data
}

fn iterate_failure(args: &IterateArgs, message: String, exit: u8) -> ExitCode {
    if args.json {
        println!(
            "{:#}",
            serde_json::json!({
                "success": false,
                "render": serde_json::Value::Null,
                "analysis": serde_json::Value::Null,
                "played": false,
                "error": message,
            })
        );
    } else {
        eprintln!("Error: {message}");
    }
    ExitCode::from(exit)
}

/// Render, analyze, and play in one step: the full feedback loop.
fn cmd_iterate(args: IterateArgs) -> ExitCode {
    let start = std::time::Instant::now();

    // Scratch files must outlive the render and (for temp output) analysis
    let scratch = match tempfile::tempdir() {
        Ok(dir) => dir,
        Err(e) => return iterate_failure(&args, e.to_string(), EXIT_SYSTEM),
    };

    let input = if args.code {
        let path = scratch.path().join("inline.scd");
        if let Err(e) = std::fs::write(&path, &args.source) {
            return iterate_failure(&args, e.to_string(), EXIT_SYSTEM);
        }
        path
    } else {
        let path = PathBuf::from(&args.source);
        if !path.exists() {
            return iterate_failure(
                &args,
                format!("File not found: {}", path.display()),
                EXIT_SYSTEM,
            );
        }
        path
    };

    // Surface the missing-duration case before touching sclang
    let script_code = match std::fs::read_to_string(&input) {
        Ok(code) => code,
        Err(e) => return iterate_failure(&args, e.to_string(), EXIT_SYSTEM),
    };
    if scloop_render::wrapper::needs_wrapping(&script_code) && args.duration.is_none() {
        return iterate_failure(
            &args,
            "Duration required for simple function syntax (use --duration)".to_owned(),
            EXIT_SYSTEM,
        );
    }

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| scratch.path().join("iterate.wav"));

    let options = RenderOptions {
        duration: args.duration,
        timeout: Duration::from_secs_f64(args.timeout),
    };
    let outcome = match render(&input, &output, &options) {
        Ok(outcome) => outcome,
        Err(e) => return iterate_failure(&args, e.to_string(), EXIT_SYSTEM),
    };

    if !outcome.success {
        let message = outcome
            .error
            .as_ref()
            .map(|e| e.to_string())
            .unwrap_or_else(|| "render failed".to_owned());
        if args.json {
            println!(
                "{:#}",
                serde_json::json!({
                    "success": false,
                    "render": render_json(&outcome),
                    "analysis": serde_json::Value::Null,
                    "played": false,
                    "error": message,
                })
            );
        } else {
            eprintln!("Render failed");
            if let Some(error) = &outcome.error {
                eprintln!("{error}");
            }
        }
        return if outcome.sclang_output.is_empty() {
            ExitCode::from(EXIT_SYSTEM)
        } else {
            ExitCode::from(EXIT_ANALYSIS)
        };
    }

    let analysis_options = AnalysisOptions {
        skip_psychoacoustic: args.no_psychoacoustic,
    };
    let analysis = match analyze_with(&outcome.output_path, analysis_options) {
        Ok(result) => result,
        Err(e) => return iterate_failure(&args, format!("Analysis failed: {e}"), EXIT_ANALYSIS),
    };

    let (played, play_error) = if args.no_play {
        (false, None)
    } else {
        match play(&outcome.output_path) {
            Ok(()) => (true, None),
            Err(e) => (false, Some(e.to_string())),
        }
    };

    let total_time_sec = start.elapsed().as_secs_f64();
    if args.json {
        let data = serde_json::json!({
            "success": true,
            "render": render_json(&outcome),
            "analysis": analysis,
            "played": played,
            "play_error": play_error,
            "output_path": args.output.as_ref().map(|p| p.display().to_string()),
            "total_time_sec": (total_time_sec * 1000.0).round() / 1000.0,
        });
        println!("{:#}", data);
    } else {
        println!("Rendered: {}", outcome.output_path.display());
        if let Some(duration_sec) = outcome.duration_sec {
            println!(
                "  Duration: {duration_sec:.2}s, Render time: {:.2}s",
                outcome.render_time_sec
            );
        }
        println!();
        print!("{}", format_analysis(&analysis));
        if let Some(play_error) = &play_error {
            eprintln!("Playback error: {play_error}");
        }
    }
    ExitCode::SUCCESS
}

fn cmd_compare(file_a: PathBuf, file_b: PathBuf, json: bool) -> ExitCode {
    for file in [&file_a, &file_b] {
        if let Err(code) = require_file(file) {
            return code;
        }
    }

    let analyze_one = |path: &PathBuf| {
        analyze_with(
            path,
            AnalysisOptions {
                skip_psychoacoustic: false,
            },
        )
    };
    let (a, b) = match (analyze_one(&file_a), analyze_one(&file_b)) {
        (Ok(a), Ok(b)) => (a, b),
        (Err(e), _) | (_, Err(e)) => {
            eprintln!("Comparison failed: {e}");
            return ExitCode::from(EXIT_ANALYSIS);
        }
    };

    let result = compare(&a, &b);
    if json {
        match serde_json::to_string_pretty(&result) {
            Ok(text) => println!("{text}"),
            Err(e) => {
                eprintln!("Error: {e}");
                return ExitCode::from(EXIT_SYSTEM);
            }
        }
    } else {
        print!("{}", format_comparison(&result));
    }
    ExitCode::SUCCESS
}
