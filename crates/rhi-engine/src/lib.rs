//! Analytics engine for the Resilience Health Index.
//!
//! Turns raw, multi-frequency indicator observations into a single 0–100
//! headline score:
//!
//! 1. [`store`] answers as-of (LOCF) lookups and month-of-year baselines.
//! 2. [`scorer`] maps a value onto 0–100 via a median/MAD robust z-score.
//! 3. [`decay`] pulls scores from stale observations toward neutral.
//! 4. [`aggregate`] rolls indicator scores into components and the headline.
//! 5. [`drivers`] attributes the day-over-day headline change to indicators.
//!
//! Every computation is a pure function of (registry, store snapshot, date).

pub mod aggregate;
pub mod bootstrap;
pub mod decay;
pub mod drivers;
pub mod error;
pub mod pipeline;
pub mod scorer;
pub mod seed;
pub mod stats;
pub mod store;
pub mod types;

pub use bootstrap::{build_store, resolve_today};
pub use error::EngineError;
pub use pipeline::{EngineSettings, RhiEngine, MAX_HISTORY_DAYS};
pub use store::{
    load_observations, AsOfValue, Baseline, Observation, SeriesReader, StoreSnapshot,
    TimeSeriesStore,
};
pub use types::{
    ComponentScore, DaySnapshot, Driver, HistoryPoint, IndicatorScore, RhiSnapshot, ScoreStatus,
};
