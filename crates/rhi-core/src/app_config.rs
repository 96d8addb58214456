use std::net::SocketAddr;
use std::path::PathBuf;

use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub indicators_path: PathBuf,
    /// Length of the trailing month-of-year baseline window.
    pub baseline_years: u32,
    /// Minimum observations a month bucket needs before it is trusted.
    pub min_baseline_samples: usize,
    pub frontend_origin: String,
    /// How many drivers `/rhi/latest` returns.
    pub driver_limit: usize,
    /// Bulk observations file. When unset the store is seeded synthetically.
    pub observations_path: Option<PathBuf>,
    pub seed: u64,
    /// Pins "today" for reproducible runs; defaults to the current UTC date.
    pub as_of_date: Option<NaiveDate>,
}
