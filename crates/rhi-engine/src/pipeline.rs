//! The scoring pipeline: registry + store snapshot + date in, scores out.

use std::sync::Arc;

use chrono::{Datelike, Days, NaiveDate};
use rhi_core::{AppConfig, Indicator, Registry, NEUTRAL_SCORE};

use crate::aggregate::{component_scores, headline_score};
use crate::decay::{decay_factor, decay_score};
use crate::drivers::decompose;
use crate::error::EngineError;
use crate::scorer::robust_score;
use crate::store::SeriesReader;
use crate::types::{DaySnapshot, HistoryPoint, IndicatorScore, RhiSnapshot, ScoreStatus};

/// Upper bound on the number of days a history request may cover.
pub const MAX_HISTORY_DAYS: u32 = 3650;

/// Baseline knobs shared by every computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    pub baseline_years: u32,
    pub min_baseline_samples: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            baseline_years: 5,
            min_baseline_samples: 3,
        }
    }
}

impl EngineSettings {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            baseline_years: config.baseline_years,
            min_baseline_samples: config.min_baseline_samples,
        }
    }
}

/// Computes indicator, component and headline scores.
///
/// Holds only immutable configuration. Every method is a pure function of
/// its arguments, so the engine is freely shared across threads.
#[derive(Debug, Clone)]
pub struct RhiEngine {
    registry: Arc<Registry>,
    settings: EngineSettings,
}

impl RhiEngine {
    #[must_use]
    pub fn new(registry: Arc<Registry>, settings: EngineSettings) -> Self {
        Self { registry, settings }
    }

    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    #[must_use]
    pub fn settings(&self) -> EngineSettings {
        self.settings
    }

    /// Score one indicator as of `date`.
    ///
    /// Data gaps never fail the computation: no observation yields
    /// [`ScoreStatus::Missing`], a thin seasonal baseline yields
    /// [`ScoreStatus::Neutral`] pinned at 50.
    pub fn score_indicator<R>(
        &self,
        reader: &R,
        indicator: &Indicator,
        date: NaiveDate,
    ) -> IndicatorScore
    where
        R: SeriesReader + ?Sized,
    {
        let mut result = IndicatorScore {
            indicator_id: indicator.id.clone(),
            name: indicator.name.clone(),
            component: indicator.component.clone(),
            date,
            observed_on: None,
            raw_value: None,
            z_score: None,
            score: None,
            staleness_age_days: None,
            decay_factor: None,
            decayed_score: None,
            status: ScoreStatus::Missing,
        };

        let observation = match reader.get_as_of(&indicator.id, date) {
            Ok(v) => v,
            Err(e) => {
                tracing::debug!(indicator = %indicator.id, %date, error = %e, "indicator missing");
                return result;
            }
        };

        let age_days = (date - observation.observed_on).num_days().max(0);
        result.observed_on = Some(observation.observed_on);
        result.raw_value = Some(observation.value);
        result.staleness_age_days = Some(age_days);

        let baseline = reader.get_month_baseline(
            &indicator.id,
            observation.observed_on.month(),
            observation.observed_on,
            self.settings.baseline_years,
            self.settings.min_baseline_samples,
        );

        match baseline {
            Ok(baseline) => {
                let scored = robust_score(
                    observation.value,
                    &baseline,
                    indicator.scoring,
                    indicator.scale,
                );
                #[allow(clippy::cast_precision_loss)]
                let age = age_days as f64;
                result.z_score = Some(scored.z);
                result.score = Some(scored.score);
                result.decay_factor = Some(decay_factor(age, indicator.half_life_days));
                result.decayed_score =
                    Some(decay_score(scored.score, age, indicator.half_life_days));
                result.status = ScoreStatus::Scored;
            }
            Err(e @ EngineError::InsufficientBaseline { .. }) => {
                tracing::debug!(
                    indicator = %indicator.id,
                    %date,
                    error = %e,
                    "baseline too thin, scoring neutral"
                );
                result.score = Some(NEUTRAL_SCORE);
                result.decay_factor = Some(1.0);
                result.decayed_score = Some(NEUTRAL_SCORE);
                result.status = ScoreStatus::Neutral;
            }
            Err(e) => {
                tracing::warn!(
                    indicator = %indicator.id,
                    %date,
                    error = %e,
                    "baseline lookup failed"
                );
                result.status = ScoreStatus::Missing;
            }
        }

        result
    }

    /// Score every indicator, component and the headline for `date`.
    pub fn compute_day<R>(&self, reader: &R, date: NaiveDate) -> DaySnapshot
    where
        R: SeriesReader + ?Sized,
    {
        let indicators: Vec<IndicatorScore> = self
            .registry
            .components()
            .iter()
            .flat_map(|c| self.registry.component_indicators(c))
            .map(|indicator| self.score_indicator(reader, indicator, date))
            .collect();
        let components = component_scores(&self.registry, &indicators);
        let headline = headline_score(&components);

        DaySnapshot {
            date,
            headline,
            components,
            indicators,
        }
    }

    /// Snapshot for `today` with drivers measured against the previous day.
    pub fn latest<R>(&self, reader: &R, today: NaiveDate) -> RhiSnapshot
    where
        R: SeriesReader + ?Sized,
    {
        let current = self.compute_day(reader, today);
        let drivers = match today.pred_opt() {
            Some(yesterday) => {
                let previous = self.compute_day(reader, yesterday);
                decompose(&self.registry, &current, &previous)
            }
            None => Vec::new(),
        };

        tracing::debug!(
            as_of = %today,
            headline = current.headline,
            drivers = drivers.len(),
            "computed latest snapshot"
        );

        RhiSnapshot {
            as_of: today,
            headline_score: current.headline,
            components: current.components,
            indicators: current.indicators,
            drivers,
        }
    }

    /// Headline and component scores for the `days` days ending at `end`,
    /// oldest first. `days` is clamped to `1..=MAX_HISTORY_DAYS`.
    pub fn history<R>(&self, reader: &R, end: NaiveDate, days: u32) -> Vec<HistoryPoint>
    where
        R: SeriesReader + ?Sized,
    {
        let days = days.clamp(1, MAX_HISTORY_DAYS);
        (0..days)
            .rev()
            .filter_map(|offset| end.checked_sub_days(Days::new(u64::from(offset))))
            .map(|date| {
                let day = self.compute_day(reader, date);
                HistoryPoint {
                    date,
                    headline_score: day.headline,
                    components: day.components,
                }
            })
            .collect()
    }
}
