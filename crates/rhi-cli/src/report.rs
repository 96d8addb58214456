//! Offline command handlers: load the catalog and store exactly as the server
//! does, run one computation, print JSON to stdout.

use std::fmt::Write as _;
use std::sync::Arc;

use anyhow::{bail, Context};
use chrono::NaiveDate;
use rhi_core::{AppConfig, Registry};
use rhi_engine::{drivers::top_drivers, EngineSettings, RhiEngine, StoreSnapshot};

fn load_registry(config: &AppConfig) -> anyhow::Result<Registry> {
    rhi_core::load_indicators(&config.indicators_path).with_context(|| {
        format!(
            "loading indicator catalog from {}",
            config.indicators_path.display()
        )
    })
}

/// Engine, store snapshot, and the "today" the store was built up to.
/// Requested dates only pick the scoring day; they never reshape the store.
fn load_engine(config: &AppConfig) -> anyhow::Result<(RhiEngine, StoreSnapshot, NaiveDate)> {
    let registry = load_registry(config)?;
    let today = rhi_engine::resolve_today(config);
    let store = rhi_engine::build_store(config, &registry, today)?;
    let engine = RhiEngine::new(Arc::new(registry), EngineSettings::from_app_config(config));
    Ok((engine, store.snapshot(), today))
}

fn scoring_date(requested: Option<NaiveDate>, today: NaiveDate) -> anyhow::Result<NaiveDate> {
    match requested {
        Some(date) if date > today => {
            bail!("{date} is after the store's as-of date {today}")
        }
        Some(date) => Ok(date),
        None => Ok(today),
    }
}

/// Latest snapshot as JSON, with drivers cut to `top` (or the configured limit).
pub(crate) fn latest_json(
    config: &AppConfig,
    as_of: Option<NaiveDate>,
    top: Option<usize>,
) -> anyhow::Result<serde_json::Value> {
    let (engine, snapshot, today) = load_engine(config)?;
    let as_of = scoring_date(as_of, today)?;

    let mut latest = engine.latest(&snapshot, as_of);
    latest.drivers = top_drivers(latest.drivers, top.unwrap_or(config.driver_limit));
    Ok(serde_json::to_value(latest)?)
}

/// `days` of history ending at `end` (or today) as JSON.
pub(crate) fn history_json(
    config: &AppConfig,
    days: u32,
    end: Option<NaiveDate>,
) -> anyhow::Result<serde_json::Value> {
    let (engine, snapshot, today) = load_engine(config)?;
    let end = scoring_date(end, today)?;
    let series = engine.history(&snapshot, end, days);
    Ok(serde_json::json!({ "days": days, "end": end, "series": series }))
}

/// Human-readable catalog summary.
pub(crate) fn catalog_summary(registry: &Registry) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    writeln!(
        out,
        "{} components, {} indicators",
        registry.components().len(),
        registry.indicators().len()
    )?;
    for component in registry.components() {
        writeln!(out, "{} (weight {})", component.name, component.weight)?;
        for indicator in registry.component_indicators(component) {
            writeln!(
                out,
                "  {:<18} {:<8} weight {:<5} half-life {}d",
                indicator.id,
                indicator.frequency.to_string(),
                indicator.weight,
                indicator.half_life_days
            )?;
        }
    }
    Ok(out)
}

pub(crate) fn run_latest(
    config: &AppConfig,
    as_of: Option<NaiveDate>,
    top: Option<usize>,
) -> anyhow::Result<()> {
    let json = latest_json(config, as_of, top)?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

pub(crate) fn run_history(
    config: &AppConfig,
    days: u32,
    end: Option<NaiveDate>,
) -> anyhow::Result<()> {
    let json = history_json(config, days, end)?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

pub(crate) fn run_check_config(config: &AppConfig) -> anyhow::Result<()> {
    let registry = load_registry(config)?;
    tracing::info!(
        path = %config.indicators_path.display(),
        env = %config.env,
        "indicator catalog is valid"
    );
    print!("{}", catalog_summary(&registry)?);
    Ok(())
}
