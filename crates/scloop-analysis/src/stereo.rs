//! Stereo imaging features (width, L/R correlation).

use serde::{Deserialize, Serialize};

/// Guard against division by zero on silent signals
const EPSILON: f64 = 1e-10;

/// Stereo imaging features.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StereoFeatures {
    /// Side energy / (mid energy + side energy), 0-1
    pub width: f64,
    /// Pearson correlation of L and R.
    ///
    /// Reported as 1.0 when either channel has near-zero variance
    /// (std < 1e-10). This is a convention for silent/constant channels,
    /// not a true correlation.
    pub correlation: f64,
}

/// Compute stereo features from left/right channels of equal length.
pub fn analyze_stereo(left: &[f32], right: &[f32]) -> StereoFeatures {
    let len = left.len().min(right.len());
    if len == 0 {
        return StereoFeatures {
            width: 0.0,
            correlation: 1.0,
        };
    }

    // Mid/Side energy
    let mut mid_energy = 0.0f64;
    let mut side_energy = 0.0f64;
    let mut sum_l = 0.0f64;
    let mut sum_r = 0.0f64;
    for i in 0..len {
        let l = left[i] as f64;
        let r = right[i] as f64;
        let mid = (l + r) * 0.5;
        let side = (l - r) * 0.5;
        mid_energy += mid * mid;
        side_energy += side * side;
        sum_l += l;
        sum_r += r;
    }
    let width = side_energy / (mid_energy + side_energy + EPSILON);

    // Pearson correlation with mean removal
    let n = len as f64;
    let mean_l = sum_l / n;
    let mean_r = sum_r / n;
    let mut var_l = 0.0f64;
    let mut var_r = 0.0f64;
    let mut cov = 0.0f64;
    for i in 0..len {
        let dl = left[i] as f64 - mean_l;
        let dr = right[i] as f64 - mean_r;
        var_l += dl * dl;
        var_r += dr * dr;
        cov += dl * dr;
    }
    let std_l = (var_l / n).sqrt();
    let std_r = (var_r / n).sqrt();

    let correlation = if std_l > EPSILON && std_r > EPSILON {
        cov / n / (std_l * std_r)
    } else {
        1.0
    };

    StereoFeatures { width, correlation }
}
