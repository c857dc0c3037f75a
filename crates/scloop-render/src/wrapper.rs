//! NRT (non-real-time) wrapping for simple function syntax.
//!
//! A script that already calls `recordNRT` renders as-is (with placeholder
//! substitution); a bare function like `{ SinOsc.ar(440) }` gets wrapped in
//! the NRT boilerplate below.

use std::path::Path;

/// Template wrapping a simple function in NRT boilerplate
const NRT_WRAPPER_TEMPLATE: &str = r#"// Auto-generated NRT wrapper by scloop
(
var userFunc = __USER_CODE__;
var duration = __DURATION__;
var outputPath = "__OUTPUT_PATH__";

SynthDef(\scloop_render, { |out=0|
    Out.ar(out, userFunc.value);
}).store;

var score = Score([
    [0.0, [\s_new, \scloop_render, 1000, 0, 0]],
    [duration, [\n_free, 1000]],
]);

score.recordNRT(
    outputFilePath: outputPath,
    headerFormat: "WAV",
    sampleFormat: "int24",
    options: ServerOptions.new.numOutputBusChannels_(2),
    duration: duration,
    action: { "Render complete".postln; 0.exit; }
);
)
"#;

/// Whether the code is a simple function that needs NRT wrapping.
///
/// Code that already contains `recordNRT` is treated as a full NRT script.
pub fn needs_wrapping(code: &str) -> bool {
    !code.contains("recordNRT")
}

/// Wrap a simple function expression in a complete NRT rendering script.
pub fn wrap_function(code: &str, duration: f64, output_path: &Path) -> String {
    NRT_WRAPPER_TEMPLATE
        .replace("__USER_CODE__", code.trim())
        .replace("__DURATION__", &duration.to_string())
        .replace("__OUTPUT_PATH__", &output_path.display().to_string())
}

/// Replace `__OUTPUT_PATH__` (and `__DURATION__` when given) in a full NRT
/// script.
pub fn replace_placeholders(code: &str, output_path: &Path, duration: Option<f64>) -> String {
    let mut result = code.replace("__OUTPUT_PATH__", &output_path.display().to_string());
    if let Some(duration) = duration {
        result = result.replace("__DURATION__", &duration.to_string());
    }
    result
}
