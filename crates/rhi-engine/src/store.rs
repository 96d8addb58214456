//! In-memory time-series store with as-of (LOCF) and month-of-year baseline
//! lookups.
//!
//! [`TimeSeriesStore`] is the single-writer, append-only side. The pipeline
//! never reads it directly: it reads an immutable, versioned
//! [`StoreSnapshot`] through the [`SeriesReader`] contract, so concurrent
//! readers need no coordination and the backing store can be swapped.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::stats::{mad, median};

/// One recorded value of one indicator. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub indicator_id: String,
    pub date: NaiveDate,
    pub value: f64,
}

/// Result of an as-of lookup: the carried-forward value and when it was observed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AsOfValue {
    pub observed_on: NaiveDate,
    pub value: f64,
}

/// Median/MAD summary of one month-of-year bucket.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Baseline {
    pub median: f64,
    pub mad: f64,
    pub samples: usize,
}

/// Read contract the scoring pipeline depends on.
pub trait SeriesReader {
    /// Most recent observation at or before `date` (LOCF).
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NoData`] if nothing exists at or before `date`.
    fn get_as_of(&self, indicator_id: &str, date: NaiveDate) -> Result<AsOfValue, EngineError>;

    /// Median/MAD of observations in calendar `month` dated within
    /// `[as_of - window_years, as_of)`. `as_of` itself is excluded.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InsufficientBaseline`] when fewer than
    /// `min_samples` observations fall in the window, or
    /// [`EngineError::InvalidMonth`] for a month outside 1–12.
    fn get_month_baseline(
        &self,
        indicator_id: &str,
        month: u32,
        as_of: NaiveDate,
        window_years: u32,
        min_samples: usize,
    ) -> Result<Baseline, EngineError>;
}

/// Append-only observation store. Writes go through `&mut self`, so there is
/// exactly one writer at a time; readers take a [`StoreSnapshot`].
#[derive(Debug, Clone, Default)]
pub struct TimeSeriesStore {
    series: BTreeMap<String, BTreeMap<NaiveDate, f64>>,
    version: u64,
    len: usize,
}

impl TimeSeriesStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one observation.
    ///
    /// # Errors
    ///
    /// Rejects non-finite values and a second observation for the same
    /// `(indicator_id, date)`.
    pub fn insert(&mut self, observation: Observation) -> Result<(), EngineError> {
        let Observation {
            indicator_id,
            date,
            value,
        } = observation;

        if !value.is_finite() {
            return Err(EngineError::NonFiniteValue { indicator_id, date });
        }

        let series = self.series.entry(indicator_id.clone()).or_default();
        if series.contains_key(&date) {
            return Err(EngineError::DuplicateObservation { indicator_id, date });
        }
        series.insert(date, value);
        self.len += 1;
        self.version += 1;
        Ok(())
    }

    /// Record many observations, stopping at the first rejected one.
    ///
    /// Returns how many were inserted.
    ///
    /// # Errors
    ///
    /// See [`TimeSeriesStore::insert`].
    pub fn extend<I>(&mut self, observations: I) -> Result<usize, EngineError>
    where
        I: IntoIterator<Item = Observation>,
    {
        let mut count = 0usize;
        for observation in observations {
            self.insert(observation)?;
            count += 1;
        }
        Ok(count)
    }

    /// Monotonic counter bumped on every successful insert.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Freeze the current contents into an immutable snapshot.
    #[must_use]
    pub fn snapshot(&self) -> StoreSnapshot {
        let series = self
            .series
            .iter()
            .map(|(id, points)| (id.clone(), Series::from_points(points.clone())))
            .collect();
        StoreSnapshot {
            version: self.version,
            observations: self.len,
            series: Arc::new(series),
        }
    }
}

#[derive(Debug)]
struct Series {
    by_date: BTreeMap<NaiveDate, f64>,
    /// Fixed 12-way month-of-year index; each bucket is sorted by date.
    by_month: [Vec<(NaiveDate, f64)>; 12],
}

impl Series {
    fn from_points(by_date: BTreeMap<NaiveDate, f64>) -> Self {
        let mut by_month: [Vec<(NaiveDate, f64)>; 12] = std::array::from_fn(|_| Vec::new());
        for (&date, &value) in &by_date {
            by_month[month_index(date.month())].push((date, value));
        }
        Self { by_date, by_month }
    }
}

fn month_index(month: u32) -> usize {
    // chrono months are 1-based and always <= 12.
    (month as usize) - 1
}

/// Immutable, cheaply clonable view of a [`TimeSeriesStore`] at one version.
#[derive(Debug, Clone)]
pub struct StoreSnapshot {
    version: u64,
    observations: usize,
    series: Arc<BTreeMap<String, Series>>,
}

impl StoreSnapshot {
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Total observations across all indicators.
    #[must_use]
    pub fn observation_count(&self) -> usize {
        self.observations
    }

    pub fn indicator_ids(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(String::as_str)
    }

    /// Latest observation date for `indicator_id`, if any.
    #[must_use]
    pub fn last_observed(&self, indicator_id: &str) -> Option<NaiveDate> {
        self.series
            .get(indicator_id)
            .and_then(|s| s.by_date.keys().next_back().copied())
    }
}

impl SeriesReader for StoreSnapshot {
    fn get_as_of(&self, indicator_id: &str, date: NaiveDate) -> Result<AsOfValue, EngineError> {
        self.series
            .get(indicator_id)
            .and_then(|s| s.by_date.range(..=date).next_back())
            .map(|(&observed_on, &value)| AsOfValue { observed_on, value })
            .ok_or_else(|| EngineError::NoData {
                indicator_id: indicator_id.to_string(),
                date,
            })
    }

    fn get_month_baseline(
        &self,
        indicator_id: &str,
        month: u32,
        as_of: NaiveDate,
        window_years: u32,
        min_samples: usize,
    ) -> Result<Baseline, EngineError> {
        if !(1..=12).contains(&month) {
            return Err(EngineError::InvalidMonth(month));
        }

        let window_start = as_of
            .checked_sub_months(Months::new(window_years.saturating_mul(12)))
            .unwrap_or(NaiveDate::MIN);

        let values: Vec<f64> = self
            .series
            .get(indicator_id)
            .map(|s| {
                let bucket = &s.by_month[month_index(month)];
                let lo = bucket.partition_point(|(d, _)| *d < window_start);
                let hi = bucket.partition_point(|(d, _)| *d < as_of);
                bucket[lo..hi.max(lo)].iter().map(|(_, v)| *v).collect()
            })
            .unwrap_or_default();

        let insufficient = || EngineError::InsufficientBaseline {
            indicator_id: indicator_id.to_string(),
            month,
            found: values.len(),
            required: min_samples,
        };

        if values.len() < min_samples.max(1) {
            return Err(insufficient());
        }

        let center = median(&values).ok_or_else(insufficient)?;
        let spread = mad(&values, center).ok_or_else(insufficient)?;

        Ok(Baseline {
            median: center,
            mad: spread,
            samples: values.len(),
        })
    }
}

/// Bulk-load observations from a JSON array of
/// `{"indicator_id", "date", "value"}` objects.
///
/// # Errors
///
/// Returns [`EngineError::ObservationsFileIo`] if the file cannot be read and
/// [`EngineError::ObservationsFileParse`] if it is not valid JSON of that shape.
pub fn load_observations(path: &Path) -> Result<Vec<Observation>, EngineError> {
    let content =
        std::fs::read_to_string(path).map_err(|e| EngineError::ObservationsFileIo {
            path: path.display().to_string(),
            source: e,
        })?;
    let observations: Vec<Observation> = serde_json::from_str(&content)?;
    Ok(observations)
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
