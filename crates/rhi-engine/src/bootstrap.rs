//! Startup loading: decide what "today" is and fill the store once.

use chrono::{NaiveDate, Utc};
use rhi_core::{AppConfig, Registry};

use crate::error::EngineError;
use crate::seed::synthetic_store;
use crate::store::{load_observations, TimeSeriesStore};

/// The configured as-of date, or the current UTC date.
#[must_use]
pub fn resolve_today(config: &AppConfig) -> NaiveDate {
    config
        .as_of_date
        .unwrap_or_else(|| Utc::now().date_naive())
}

/// Build the process-wide store.
///
/// Loads `config.observations_path` when set. Otherwise seeds
/// `config.baseline_years + 1` years of synthetic history ending at `today`,
/// so the first scored year already has a full baseline window behind it.
///
/// # Errors
///
/// Returns [`EngineError`] if the observations file cannot be read or parsed,
/// or if it contains a duplicate or non-finite observation.
pub fn build_store(
    config: &AppConfig,
    registry: &Registry,
    today: NaiveDate,
) -> Result<TimeSeriesStore, EngineError> {
    let Some(path) = &config.observations_path else {
        let years = config.baseline_years.saturating_add(1);
        return synthetic_store(registry, today, years, config.seed);
    };

    let observations = load_observations(path)?;
    let unknown: Vec<&str> = {
        let mut ids: Vec<&str> = observations
            .iter()
            .map(|o| o.indicator_id.as_str())
            .filter(|id| registry.indicator(id).is_none())
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    };
    if !unknown.is_empty() {
        tracing::warn!(
            ids = ?unknown,
            "observations file contains indicators missing from the catalog; they will not be scored"
        );
    }

    let mut store = TimeSeriesStore::new();
    let inserted = store.extend(observations)?;
    tracing::info!(
        path = %path.display(),
        observations = inserted,
        "loaded observations file"
    );
    Ok(store)
}
