use std::collections::BTreeMap;

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use rhi_engine::{
    ComponentScore, Driver, HistoryPoint, IndicatorScore, ScoreStatus, MAX_HISTORY_DAYS,
};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{round_to, ApiError, ApiResponse, AppState, ResponseMeta};

const DEFAULT_HISTORY_DAYS: u32 = 90;

#[derive(Debug, Serialize)]
pub(super) struct ComponentItem {
    pub score: f64,
    pub weight: f64,
}

#[derive(Debug, Serialize)]
pub(super) struct IndicatorItem {
    pub id: String,
    pub name: String,
    pub component: String,
    pub status: ScoreStatus,
    pub observed_on: Option<NaiveDate>,
    pub raw_value: Option<f64>,
    pub z_score: Option<f64>,
    pub score: Option<f64>,
    pub staleness_age_days: Option<i64>,
    pub decay_factor: Option<f64>,
    pub health_score: Option<f64>,
}

#[derive(Debug, Serialize)]
pub(super) struct DriverItem {
    pub id: String,
    pub name: String,
    pub impact: f64,
    pub category: String,
}

#[derive(Debug, Serialize)]
pub(super) struct LatestData {
    pub timestamp: DateTime<Utc>,
    pub as_of: NaiveDate,
    pub headline_score: f64,
    pub components: BTreeMap<String, ComponentItem>,
    pub indicators: Vec<IndicatorItem>,
    pub driver_decomposition: Vec<DriverItem>,
}

#[derive(Debug, Serialize)]
pub(super) struct HistoryItem {
    pub date: NaiveDate,
    pub headline_score: f64,
    pub components: BTreeMap<String, f64>,
}

#[derive(Debug, Serialize)]
pub(super) struct HistoryData {
    pub days: u32,
    pub series: Vec<HistoryItem>,
}

#[derive(Debug, Deserialize)]
pub(super) struct HistoryQuery {
    pub days: Option<String>,
}

impl From<&ComponentScore> for ComponentItem {
    fn from(c: &ComponentScore) -> Self {
        Self {
            score: round_to(c.score, 2),
            weight: c.weight,
        }
    }
}

impl From<IndicatorScore> for IndicatorItem {
    fn from(s: IndicatorScore) -> Self {
        Self {
            id: s.indicator_id,
            name: s.name,
            component: s.component,
            status: s.status,
            observed_on: s.observed_on,
            raw_value: s.raw_value,
            z_score: s.z_score.map(|z| round_to(z, 3)),
            score: s.score.map(|v| round_to(v, 2)),
            staleness_age_days: s.staleness_age_days,
            decay_factor: s.decay_factor.map(|f| round_to(f, 3)),
            health_score: s.decayed_score.map(|v| round_to(v, 2)),
        }
    }
}

impl From<Driver> for DriverItem {
    fn from(d: Driver) -> Self {
        Self {
            id: d.indicator_id,
            name: d.name,
            impact: round_to(d.impact, 3),
            category: d.category,
        }
    }
}

impl From<HistoryPoint> for HistoryItem {
    fn from(p: HistoryPoint) -> Self {
        Self {
            date: p.date,
            headline_score: round_to(p.headline_score, 2),
            components: p
                .components
                .iter()
                .map(|c| (c.name.clone(), round_to(c.score, 2)))
                .collect(),
        }
    }
}

/// Parse `?days=`, defaulting to 90. Out-of-range or non-numeric input is
/// rejected rather than clamped.
pub(super) fn parse_history_days(raw: Option<&str>) -> Result<u32, String> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_HISTORY_DAYS);
    };
    let days: i64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("days must be an integer, got '{raw}'"))?;
    match u32::try_from(days) {
        Ok(d) if (1..=MAX_HISTORY_DAYS).contains(&d) => Ok(d),
        _ => Err(format!(
            "days must be between 1 and {MAX_HISTORY_DAYS}, got {days}"
        )),
    }
}

pub(super) async fn latest(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<LatestData>> {
    let today = state.today();
    let snapshot = state.engine.latest(state.snapshot.as_ref(), today);

    let drivers = rhi_engine::drivers::top_drivers(snapshot.drivers, state.driver_limit);

    Json(ApiResponse {
        data: LatestData {
            timestamp: Utc::now(),
            as_of: snapshot.as_of,
            headline_score: round_to(snapshot.headline_score, 2),
            components: snapshot
                .components
                .iter()
                .map(|c| (c.name.clone(), ComponentItem::from(c)))
                .collect(),
            indicators: snapshot
                .indicators
                .into_iter()
                .map(IndicatorItem::from)
                .collect(),
            driver_decomposition: drivers.into_iter().map(DriverItem::from).collect(),
        },
        meta: ResponseMeta::new(req_id.0),
    })
}

pub(super) async fn history(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<ApiResponse<HistoryData>>, ApiError> {
    let days = parse_history_days(query.days.as_deref())
        .map_err(|message| ApiError::new(req_id.0.clone(), "validation_error", message))?;

    let series = state
        .engine
        .history(state.snapshot.as_ref(), state.today(), days)
        .into_iter()
        .map(HistoryItem::from)
        .collect();

    Ok(Json(ApiResponse {
        data: HistoryData { days, series },
        meta: ResponseMeta::new(req_id.0),
    }))
}
