use std::collections::HashMap;
use std::env::VarError;

use chrono::NaiveDate;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn parse_environment_development() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
}

#[test]
fn parse_environment_production() {
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "RHI_ENV"));
}

#[test]
fn build_app_config_uses_defaults_for_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:8000");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(
        cfg.indicators_path.to_str(),
        Some("./config/indicators.yaml")
    );
    assert_eq!(cfg.baseline_years, 5);
    assert_eq!(cfg.min_baseline_samples, 3);
    assert_eq!(cfg.frontend_origin, "http://localhost:3000");
    assert_eq!(cfg.driver_limit, 10);
    assert!(cfg.observations_path.is_none());
    assert_eq!(cfg.seed, 42);
    assert!(cfg.as_of_date.is_none());
}

#[test]
fn build_app_config_fails_with_invalid_bind_addr() {
    let mut map = HashMap::new();
    map.insert("RHI_BIND_ADDR", "not-a-socket-addr");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "RHI_BIND_ADDR"),
        "expected InvalidEnvVar(RHI_BIND_ADDR), got: {result:?}"
    );
}

#[test]
fn baseline_years_override() {
    let mut map = HashMap::new();
    map.insert("RHI_BASELINE_YEARS", "3");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.baseline_years, 3);
}

#[test]
fn baseline_years_zero_is_rejected() {
    let mut map = HashMap::new();
    map.insert("RHI_BASELINE_YEARS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "RHI_BASELINE_YEARS"),
        "expected InvalidEnvVar(RHI_BASELINE_YEARS), got: {result:?}"
    );
}

#[test]
fn baseline_years_invalid() {
    let mut map = HashMap::new();
    map.insert("RHI_BASELINE_YEARS", "five");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "RHI_BASELINE_YEARS"),
        "expected InvalidEnvVar(RHI_BASELINE_YEARS), got: {result:?}"
    );
}

#[test]
fn min_baseline_samples_zero_is_rejected() {
    let mut map = HashMap::new();
    map.insert("RHI_MIN_BASELINE_SAMPLES", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "RHI_MIN_BASELINE_SAMPLES"),
        "expected InvalidEnvVar(RHI_MIN_BASELINE_SAMPLES), got: {result:?}"
    );
}

#[test]
fn observations_path_blank_is_treated_as_unset() {
    let mut map = HashMap::new();
    map.insert("RHI_OBSERVATIONS_PATH", "  ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.observations_path.is_none());
}

#[test]
fn observations_path_override() {
    let mut map = HashMap::new();
    map.insert("RHI_OBSERVATIONS_PATH", "/data/observations.json");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(
        cfg.observations_path.as_deref().and_then(|p| p.to_str()),
        Some("/data/observations.json")
    );
}

#[test]
fn as_of_date_parses_iso_date() {
    let mut map = HashMap::new();
    map.insert("RHI_AS_OF_DATE", "2024-03-15");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.as_of_date, NaiveDate::from_ymd_opt(2024, 3, 15));
}

#[test]
fn as_of_date_invalid() {
    let mut map = HashMap::new();
    map.insert("RHI_AS_OF_DATE", "15/03/2024");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "RHI_AS_OF_DATE"),
        "expected InvalidEnvVar(RHI_AS_OF_DATE), got: {result:?}"
    );
}

#[test]
fn seed_invalid() {
    let mut map = HashMap::new();
    map.insert("RHI_SEED", "-1");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "RHI_SEED"),
        "expected InvalidEnvVar(RHI_SEED), got: {result:?}"
    );
}
