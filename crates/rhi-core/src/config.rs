use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable has a default, so an empty environment yields a usable
/// development config.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    use chrono::NaiveDate;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("RHI_ENV", "development"))?;

    let bind_addr = or_default("RHI_BIND_ADDR", "0.0.0.0:8000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("RHI_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("RHI_LOG_LEVEL", "info");
    let indicators_path = PathBuf::from(or_default(
        "RHI_INDICATORS_PATH",
        "./config/indicators.yaml",
    ));

    let baseline_years = parse_u32("RHI_BASELINE_YEARS", "5")?;
    if baseline_years == 0 {
        return Err(invalid("RHI_BASELINE_YEARS", "must be at least 1".into()));
    }
    let min_baseline_samples = parse_usize("RHI_MIN_BASELINE_SAMPLES", "3")?;
    if min_baseline_samples == 0 {
        return Err(invalid(
            "RHI_MIN_BASELINE_SAMPLES",
            "must be at least 1".into(),
        ));
    }

    let frontend_origin = or_default("RHI_FRONTEND_ORIGIN", "http://localhost:3000");
    let driver_limit = parse_usize("RHI_DRIVER_LIMIT", "10")?;
    let observations_path = lookup("RHI_OBSERVATIONS_PATH")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .map(PathBuf::from);
    let seed = parse_u64("RHI_SEED", "42")?;

    let as_of_date = match lookup("RHI_AS_OF_DATE") {
        Ok(raw) if !raw.trim().is_empty() => Some(
            NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
                .map_err(|e| invalid("RHI_AS_OF_DATE", e.to_string()))?,
        ),
        _ => None,
    };

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        indicators_path,
        baseline_years,
        min_baseline_samples,
        frontend_origin,
        driver_limit,
        observations_path,
        seed,
        as_of_date,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "RHI_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
