//! Robust (median/MAD) normalization of raw values onto the 0–100 scale.

use rhi_core::{ScoringMode, NEUTRAL_SCORE};

use crate::store::Baseline;

/// Rescales MAD to a standard-deviation equivalent under normality.
pub const MAD_SCALE_FACTOR: f64 = 1.4826;

/// Output of [`robust_score`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RobustScore {
    pub z: f64,
    pub score: f64,
}

/// Robust z-score of `value` against `baseline`.
///
/// A zero MAD means the baseline never moves, so there is no deviation
/// signal and `z` is `0`.
#[must_use]
pub fn robust_z(value: f64, baseline: &Baseline) -> f64 {
    if baseline.mad == 0.0 {
        return 0.0;
    }
    (value - baseline.median) / (baseline.mad * MAD_SCALE_FACTOR)
}

/// Map a z-score onto `[0, 100]`.
///
/// - Monotone: `50 + direction * z * scale`, so `z = 0` is neutral.
/// - Goldilocks: `100 - |z| * scale`, so `z = 0` is best.
#[must_use]
pub fn score_from_z(z: f64, mode: ScoringMode, scale: f64) -> f64 {
    let raw = match mode {
        ScoringMode::Monotone { direction } => NEUTRAL_SCORE + direction.sign() * z * scale,
        ScoringMode::Goldilocks => 100.0 - z.abs() * scale,
    };
    raw.clamp(0.0, 100.0)
}

/// Score `value` against its seasonal baseline.
#[must_use]
pub fn robust_score(value: f64, baseline: &Baseline, mode: ScoringMode, scale: f64) -> RobustScore {
    let z = robust_z(value, baseline);
    RobustScore {
        z,
        score: score_from_z(z, mode, scale),
    }
}
