use chrono::NaiveDate;
use serde::Serialize;

/// How an indicator's score for one date was arrived at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreStatus {
    /// Baseline available; robust score computed and decayed.
    Scored,
    /// Observation exists but its seasonal baseline is too thin; pinned at 50.
    Neutral,
    /// No observation at or before the date. Excluded from aggregation.
    Missing,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorScore {
    pub indicator_id: String,
    pub name: String,
    pub component: String,
    pub date: NaiveDate,
    pub observed_on: Option<NaiveDate>,
    pub raw_value: Option<f64>,
    pub z_score: Option<f64>,
    pub score: Option<f64>,
    pub staleness_age_days: Option<i64>,
    pub decay_factor: Option<f64>,
    pub decayed_score: Option<f64>,
    pub status: ScoreStatus,
}

impl IndicatorScore {
    /// The value that feeds aggregation, or `None` when the indicator is missing.
    #[must_use]
    pub fn contribution(&self) -> Option<f64> {
        match self.status {
            ScoreStatus::Missing => None,
            ScoreStatus::Scored | ScoreStatus::Neutral => self.decayed_score,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentScore {
    pub name: String,
    pub score: f64,
    pub weight: f64,
    /// Indicators with data for the date; `0` means the score is the neutral fallback.
    pub indicators_present: usize,
}

/// Full result of scoring every indicator for one date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DaySnapshot {
    pub date: NaiveDate,
    pub headline: f64,
    pub components: Vec<ComponentScore>,
    pub indicators: Vec<IndicatorScore>,
}

impl DaySnapshot {
    #[must_use]
    pub fn indicator(&self, indicator_id: &str) -> Option<&IndicatorScore> {
        self.indicators
            .iter()
            .find(|s| s.indicator_id == indicator_id)
    }

    #[must_use]
    pub fn component(&self, name: &str) -> Option<&ComponentScore> {
        self.components.iter().find(|c| c.name == name)
    }
}

/// One indicator's signed share of the day-over-day headline change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Driver {
    #[serde(rename = "id")]
    pub indicator_id: String,
    pub name: String,
    pub impact: f64,
    /// Owning component.
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RhiSnapshot {
    pub as_of: NaiveDate,
    pub headline_score: f64,
    pub components: Vec<ComponentScore>,
    pub indicators: Vec<IndicatorScore>,
    /// Sorted by descending `|impact|`.
    pub drivers: Vec<Driver>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryPoint {
    pub date: NaiveDate,
    pub headline_score: f64,
    pub components: Vec<ComponentScore>,
}
