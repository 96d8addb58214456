//! Deterministic synthetic history for indicators that declare a
//! `synthetic` block in the catalog.
//!
//! Each series is a clamped random walk emitted on its own cadence. The same
//! registry, end date, span and seed always produce the same store.

use std::f64::consts::TAU;

use chrono::{Datelike, Days, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rhi_core::{Frequency, Registry, SyntheticParams};

use crate::error::EngineError;
use crate::store::{Observation, TimeSeriesStore};

/// Size of a shock, in multiples of the series' volatility.
const SHOCK_SIGMAS: f64 = 5.0;

/// Whether a series with `frequency` reports on `date`.
#[must_use]
pub fn emits_on(frequency: Frequency, date: NaiveDate) -> bool {
    match frequency {
        Frequency::Daily => true,
        Frequency::Weekly => date.weekday() == Weekday::Mon,
        Frequency::Monthly => date.day() == 1,
    }
}

/// Build a store holding `years` of synthetic history ending at `end`
/// (inclusive). Indicators without synthetic parameters get no data.
///
/// # Errors
///
/// Propagates [`TimeSeriesStore::insert`] rejections, which only occur if
/// a step produces a non-finite value.
pub fn synthetic_store(
    registry: &Registry,
    end: NaiveDate,
    years: u32,
    seed: u64,
) -> Result<TimeSeriesStore, EngineError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut store = TimeSeriesStore::new();

    let span = Days::new(365 * u64::from(years));
    let start = end.checked_sub_days(span).unwrap_or(NaiveDate::MIN);

    let mut walks: Vec<(&str, Frequency, &SyntheticParams, f64)> = registry
        .indicators()
        .iter()
        .filter_map(|i| {
            i.synthetic
                .as_ref()
                .map(|p| (i.id.as_str(), i.frequency, p, p.level))
        })
        .collect();

    for date in start.iter_days().take_while(|d| *d <= end) {
        for (id, frequency, params, level) in &mut walks {
            if !emits_on(*frequency, date) {
                continue;
            }
            *level = step(&mut rng, params, *level, date.month());
            store.insert(Observation {
                indicator_id: (*id).to_string(),
                date,
                value: *level,
            })?;
        }
    }

    tracing::info!(
        series = walks.len(),
        observations = store.len(),
        %start,
        %end,
        seed,
        "seeded synthetic store"
    );
    Ok(store)
}

fn step(rng: &mut StdRng, params: &SyntheticParams, level: f64, month: u32) -> f64 {
    let seasonal = if params.seasonal_months.contains(&month) {
        params.seasonal_drift
    } else {
        0.0
    };

    let shock = if params.shock_probability > 0.0 && rng.random::<f64>() < params.shock_probability
    {
        let sign = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
        sign * SHOCK_SIGMAS * params.volatility
    } else {
        0.0
    };

    (level + gaussian(rng) * params.volatility + shock + seasonal).max(0.0)
}

/// Standard normal sample via Box-Muller.
fn gaussian(rng: &mut StdRng) -> f64 {
    // 1 - [0, 1) keeps u1 away from zero so ln(u1) stays finite.
    let u1 = 1.0 - rng.random::<f64>();
    let u2 = rng.random::<f64>();
    (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos()
}
