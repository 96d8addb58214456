//! Shared configuration for the RHI workspace.
//!
//! Holds the environment-driven [`AppConfig`] and the indicator catalog
//! ([`Registry`]) that every other crate reads at startup. Nothing in here
//! changes after the process has finished loading.

pub mod app_config;
pub mod config;
pub mod indicators;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use indicators::{
    load_indicators, parse_indicators, Component, Direction, Frequency, Indicator, Registry,
    ScoringMode, SyntheticParams,
};

/// Neutral score assigned when an indicator has no usable signal.
pub const NEUTRAL_SCORE: f64 = 50.0;

/// Tolerance used when checking that a set of weights sums to one.
pub const WEIGHT_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read indicators file {path}: {source}")]
    IndicatorsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse indicators file: {0}")]
    IndicatorsFileParse(#[from] serde_yaml::Error),

    #[error("invalid indicator configuration: {0}")]
    Validation(String),
}
