//! Staleness decay: old observations drift toward the neutral score.
//!
//! `decayed = 50 + (score - 50) * 0.5^(age / half_life)`

use rhi_core::NEUTRAL_SCORE;

/// Fraction of a score's distance from neutral that survives `age_days`.
///
/// Negative ages (observation dated after the target) are treated as fresh.
#[must_use]
pub fn decay_factor(age_days: f64, half_life_days: f64) -> f64 {
    if !age_days.is_finite() || age_days <= 0.0 {
        return 1.0;
    }
    0.5_f64.powf(age_days / half_life_days)
}

/// Pull `score` toward neutral according to its age.
#[must_use]
pub fn decay_score(score: f64, age_days: f64, half_life_days: f64) -> f64 {
    NEUTRAL_SCORE + (score - NEUTRAL_SCORE) * decay_factor(age_days, half_life_days)
}
