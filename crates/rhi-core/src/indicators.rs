use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{ConfigError, WEIGHT_TOLERANCE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Frequency::Daily => write!(f, "daily"),
            Frequency::Weekly => write!(f, "weekly"),
            Frequency::Monthly => write!(f, "monthly"),
        }
    }
}

/// Which way a monotone series improves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// More is better.
    Positive,
    /// Less is better.
    Negative,
}

impl Direction {
    #[must_use]
    pub fn sign(self) -> f64 {
        match self {
            Direction::Positive => 1.0,
            Direction::Negative => -1.0,
        }
    }
}

/// How a robust z-score is mapped onto the 0–100 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum ScoringMode {
    Monotone { direction: Direction },
    /// Deviation from baseline in either direction is penalized.
    Goldilocks,
}

/// Mode tag as written in the catalog file. Direction is validated separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModeKind {
    Monotone,
    Goldilocks,
}

/// Parameters for the synthetic random walk used when no observations file
/// is configured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntheticParams {
    pub level: f64,
    pub volatility: f64,
    /// Calendar months (1–12) that receive `seasonal_drift` per step.
    #[serde(default)]
    pub seasonal_months: Vec<u32>,
    #[serde(default)]
    pub seasonal_drift: f64,
    /// Chance per step of a five-sigma jump.
    #[serde(default)]
    pub shock_probability: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentConfig {
    pub name: String,
    pub weight: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorConfig {
    pub id: String,
    pub name: String,
    pub component: String,
    pub frequency: Frequency,
    pub mode: ModeKind,
    /// `+1` or `-1`; required for monotone, forbidden for goldilocks.
    #[serde(default)]
    pub direction: Option<i8>,
    pub weight: f64,
    #[serde(default)]
    pub scale: Option<f64>,
    #[serde(default)]
    pub half_life_days: Option<f64>,
    #[serde(default)]
    pub synthetic: Option<SyntheticParams>,
}

/// Per-cadence staleness half-lives, in days.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HalfLifeConfig {
    pub daily: f64,
    pub weekly: f64,
    pub monthly: f64,
}

impl Default for HalfLifeConfig {
    fn default() -> Self {
        Self {
            daily: 3.0,
            weekly: 10.0,
            monthly: 45.0,
        }
    }
}

impl HalfLifeConfig {
    #[must_use]
    pub fn for_frequency(&self, frequency: Frequency) -> f64 {
        match frequency {
            Frequency::Daily => self.daily,
            Frequency::Weekly => self.weekly,
            Frequency::Monthly => self.monthly,
        }
    }
}

/// Score points per unit of robust z, by mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaleConfig {
    pub monotone: f64,
    pub goldilocks: f64,
}

impl Default for ScaleConfig {
    fn default() -> Self {
        Self {
            monotone: 12.5,
            goldilocks: 12.5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct IndicatorsFile {
    pub components: Vec<ComponentConfig>,
    #[serde(default)]
    pub half_life_days: HalfLifeConfig,
    #[serde(default)]
    pub scale: ScaleConfig,
    pub indicators: Vec<IndicatorConfig>,
}

/// A validated indicator definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Indicator {
    pub id: String,
    pub name: String,
    pub component: String,
    pub frequency: Frequency,
    pub scoring: ScoringMode,
    pub weight: f64,
    pub scale: f64,
    pub half_life_days: f64,
    #[serde(skip)]
    pub synthetic: Option<SyntheticParams>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Component {
    pub name: String,
    pub weight: f64,
    #[serde(skip)]
    indicators: Vec<usize>,
}

/// The immutable indicator catalog.
///
/// Components and indicators keep their declaration order, which is the
/// order every downstream output uses.
#[derive(Debug, Clone)]
pub struct Registry {
    components: Vec<Component>,
    indicators: Vec<Indicator>,
    by_id: HashMap<String, usize>,
}

impl Registry {
    /// Validate a parsed catalog file and build the registry.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] describing the first problem found.
    pub fn from_file(file: IndicatorsFile) -> Result<Self, ConfigError> {
        validate_settings(&file)?;

        let mut components: Vec<Component> = Vec::with_capacity(file.components.len());
        let mut component_index: HashMap<String, usize> = HashMap::new();
        for c in &file.components {
            let name = c.name.trim();
            if name.is_empty() {
                return Err(ConfigError::Validation(
                    "component name must be non-empty".to_string(),
                ));
            }
            check_weight(&format!("component '{name}'"), c.weight)?;
            if component_index
                .insert(name.to_string(), components.len())
                .is_some()
            {
                return Err(ConfigError::Validation(format!(
                    "duplicate component: '{name}'"
                )));
            }
            components.push(Component {
                name: name.to_string(),
                weight: c.weight,
                indicators: Vec::new(),
            });
        }
        check_sum(
            "component weights",
            components.iter().map(|c| c.weight).sum(),
        )?;

        let mut indicators = Vec::with_capacity(file.indicators.len());
        let mut by_id = HashMap::new();
        for cfg in file.indicators {
            let indicator = build_indicator(cfg, &file.half_life_days, &file.scale)?;
            let Some(&ci) = component_index.get(&indicator.component) else {
                return Err(ConfigError::Validation(format!(
                    "indicator '{}' references unknown component '{}'",
                    indicator.id, indicator.component
                )));
            };
            let idx = indicators.len();
            if by_id.insert(indicator.id.clone(), idx).is_some() {
                return Err(ConfigError::Validation(format!(
                    "duplicate indicator id: '{}'",
                    indicator.id
                )));
            }
            components[ci].indicators.push(idx);
            indicators.push(indicator);
        }

        for component in &components {
            if component.indicators.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "component '{}' has no indicators",
                    component.name
                )));
            }
            let sum = component
                .indicators
                .iter()
                .map(|&i| indicators[i].weight)
                .sum();
            check_sum(&format!("indicator weights in '{}'", component.name), sum)?;
        }

        Ok(Self {
            components,
            indicators,
            by_id,
        })
    }

    #[must_use]
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    #[must_use]
    pub fn indicators(&self) -> &[Indicator] {
        &self.indicators
    }

    #[must_use]
    pub fn indicator(&self, id: &str) -> Option<&Indicator> {
        self.by_id.get(id).map(|&i| &self.indicators[i])
    }

    #[must_use]
    pub fn component(&self, name: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.name == name)
    }

    /// Indicators owned by `component`, in declaration order.
    pub fn component_indicators<'a>(
        &'a self,
        component: &'a Component,
    ) -> impl Iterator<Item = &'a Indicator> + 'a {
        component.indicators.iter().map(|&i| &self.indicators[i])
    }
}

/// Load and validate the indicator catalog from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_indicators(path: &Path) -> Result<Registry, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IndicatorsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_indicators(&content)
}

/// Parse and validate an indicator catalog held in memory.
///
/// # Errors
///
/// Returns `ConfigError` if the YAML does not parse or fails validation.
pub fn parse_indicators(content: &str) -> Result<Registry, ConfigError> {
    let file: IndicatorsFile = serde_yaml::from_str(content)?;
    Registry::from_file(file)
}

fn build_indicator(
    cfg: IndicatorConfig,
    half_lives: &HalfLifeConfig,
    scales: &ScaleConfig,
) -> Result<Indicator, ConfigError> {
    let id = cfg.id.trim().to_string();
    if id.is_empty() {
        return Err(ConfigError::Validation(
            "indicator id must be non-empty".to_string(),
        ));
    }
    if cfg.name.trim().is_empty() {
        return Err(ConfigError::Validation(format!(
            "indicator '{id}' must have a non-empty name"
        )));
    }
    check_weight(&format!("indicator '{id}'"), cfg.weight)?;

    let scoring = match (cfg.mode, cfg.direction) {
        (ModeKind::Monotone, Some(1)) => ScoringMode::Monotone {
            direction: Direction::Positive,
        },
        (ModeKind::Monotone, Some(-1)) => ScoringMode::Monotone {
            direction: Direction::Negative,
        },
        (ModeKind::Monotone, Some(other)) => {
            return Err(ConfigError::Validation(format!(
                "indicator '{id}' has invalid direction {other}; must be 1 or -1"
            )));
        }
        (ModeKind::Monotone, None) => {
            return Err(ConfigError::Validation(format!(
                "monotone indicator '{id}' requires a direction"
            )));
        }
        (ModeKind::Goldilocks, Some(_)) => {
            return Err(ConfigError::Validation(format!(
                "goldilocks indicator '{id}' must not set a direction"
            )));
        }
        (ModeKind::Goldilocks, None) => ScoringMode::Goldilocks,
    };

    let scale = cfg.scale.unwrap_or(match scoring {
        ScoringMode::Monotone { .. } => scales.monotone,
        ScoringMode::Goldilocks => scales.goldilocks,
    });
    check_positive(&format!("scale of indicator '{id}'"), scale)?;

    let half_life_days = cfg
        .half_life_days
        .unwrap_or_else(|| half_lives.for_frequency(cfg.frequency));
    check_positive(&format!("half-life of indicator '{id}'"), half_life_days)?;

    if let Some(synthetic) = &cfg.synthetic {
        if synthetic.volatility < 0.0 || !synthetic.volatility.is_finite() {
            return Err(ConfigError::Validation(format!(
                "indicator '{id}' has invalid synthetic volatility"
            )));
        }
        if let Some(m) = synthetic
            .seasonal_months
            .iter()
            .find(|m| !(1..=12).contains(*m))
        {
            return Err(ConfigError::Validation(format!(
                "indicator '{id}' has invalid seasonal month {m}"
            )));
        }
        if !(0.0..=1.0).contains(&synthetic.shock_probability) {
            return Err(ConfigError::Validation(format!(
                "indicator '{id}' has shock_probability outside [0, 1]"
            )));
        }
    }

    Ok(Indicator {
        id,
        name: cfg.name.trim().to_string(),
        component: cfg.component.trim().to_string(),
        frequency: cfg.frequency,
        scoring,
        weight: cfg.weight,
        scale,
        half_life_days,
        synthetic: cfg.synthetic,
    })
}

fn validate_settings(file: &IndicatorsFile) -> Result<(), ConfigError> {
    let hl = &file.half_life_days;
    check_positive("daily half-life", hl.daily)?;
    check_positive("weekly half-life", hl.weekly)?;
    check_positive("monthly half-life", hl.monthly)?;
    check_positive("monotone scale", file.scale.monotone)?;
    check_positive("goldilocks scale", file.scale.goldilocks)?;

    let mut seen = HashSet::new();
    for c in &file.components {
        if !seen.insert(c.name.trim().to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate component: '{}'",
                c.name.trim()
            )));
        }
    }
    Ok(())
}

fn check_weight(what: &str, weight: f64) -> Result<(), ConfigError> {
    if !weight.is_finite() || weight < 0.0 {
        return Err(ConfigError::Validation(format!(
            "{what} has invalid weight {weight}"
        )));
    }
    Ok(())
}

fn check_positive(what: &str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ConfigError::Validation(format!(
            "{what} must be positive, got {value}"
        )));
    }
    Ok(())
}

fn check_sum(what: &str, sum: f64) -> Result<(), ConfigError> {
    if (sum - 1.0).abs() > WEIGHT_TOLERANCE {
        return Err(ConfigError::Validation(format!(
            "{what} sum to {sum}, expected 1.0"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "indicators_test.rs"]
mod tests;
