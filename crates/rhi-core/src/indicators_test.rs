use std::path::Path;

use super::*;

const MINIMAL: &str = r"
components:
  - name: Ocean
    weight: 0.6
  - name: Rail
    weight: 0.4
indicators:
  - id: ocean_rate
    name: Ocean Spot Rates
    component: Ocean
    frequency: weekly
    mode: goldilocks
    weight: 0.5
  - id: port_congestion
    name: Port Congestion
    component: Ocean
    frequency: daily
    mode: monotone
    direction: -1
    weight: 0.5
  - id: rail_carloads
    name: Rail Carloads
    component: Rail
    frequency: monthly
    mode: monotone
    direction: 1
    weight: 1.0
    half_life_days: 30
    scale: 10
";

fn minimal_file() -> IndicatorsFile {
    serde_yaml::from_str(MINIMAL).expect("minimal catalog parses")
}

#[test]
fn parses_minimal_catalog() {
    let registry = parse_indicators(MINIMAL).expect("valid catalog");
    assert_eq!(registry.components().len(), 2);
    assert_eq!(registry.indicators().len(), 3);

    let port = registry.indicator("port_congestion").expect("port");
    assert_eq!(
        port.scoring,
        ScoringMode::Monotone {
            direction: Direction::Negative
        }
    );
    assert_eq!(port.frequency, Frequency::Daily);
    assert!((port.half_life_days - 3.0).abs() < f64::EPSILON);
    assert!((port.scale - 12.5).abs() < f64::EPSILON);

    let ocean = registry.indicator("ocean_rate").expect("ocean");
    assert_eq!(ocean.scoring, ScoringMode::Goldilocks);
    assert!((ocean.half_life_days - 10.0).abs() < f64::EPSILON);
}

#[test]
fn per_indicator_overrides_win() {
    let registry = parse_indicators(MINIMAL).unwrap();
    let rail = registry.indicator("rail_carloads").unwrap();
    assert!((rail.half_life_days - 30.0).abs() < f64::EPSILON);
    assert!((rail.scale - 10.0).abs() < f64::EPSILON);
}

#[test]
fn component_indicators_keep_declaration_order() {
    let registry = parse_indicators(MINIMAL).unwrap();
    let ocean = registry.component("Ocean").unwrap();
    let ids: Vec<&str> = registry
        .component_indicators(ocean)
        .map(|i| i.id.as_str())
        .collect();
    assert_eq!(ids, vec!["ocean_rate", "port_congestion"]);
}

#[test]
fn rejects_component_weights_not_summing_to_one() {
    let mut file = minimal_file();
    file.components[1].weight = 0.5;
    let err = Registry::from_file(file).unwrap_err();
    assert!(
        err.to_string().contains("component weights"),
        "unexpected error: {err}"
    );
}

#[test]
fn rejects_indicator_weights_not_summing_to_one() {
    let mut file = minimal_file();
    file.indicators[0].weight = 0.4;
    let err = Registry::from_file(file).unwrap_err();
    assert!(
        err.to_string().contains("indicator weights in 'Ocean'"),
        "unexpected error: {err}"
    );
}

#[test]
fn accepts_weights_within_tolerance() {
    let mut file = minimal_file();
    file.indicators[0].weight = 0.5 + 1e-12;
    assert!(Registry::from_file(file).is_ok());
}

#[test]
fn rejects_negative_weight() {
    let mut file = minimal_file();
    file.indicators[0].weight = -0.5;
    file.indicators[1].weight = 1.5;
    let err = Registry::from_file(file).unwrap_err();
    assert!(err.to_string().contains("invalid weight"));
}

#[test]
fn rejects_unknown_component() {
    let mut file = minimal_file();
    file.indicators[2].component = "Air".to_string();
    let err = Registry::from_file(file).unwrap_err();
    assert!(err.to_string().contains("unknown component 'Air'"));
}

#[test]
fn rejects_component_without_indicators() {
    let mut file = minimal_file();
    file.components[0].weight = 0.3;
    file.components[1].weight = 0.3;
    file.components.push(ComponentConfig {
        name: "Air".to_string(),
        weight: 0.4,
    });
    let err = Registry::from_file(file).unwrap_err();
    assert!(err.to_string().contains("'Air' has no indicators"));
}

#[test]
fn rejects_duplicate_indicator_id() {
    let mut file = minimal_file();
    file.indicators[1].id = "ocean_rate".to_string();
    let err = Registry::from_file(file).unwrap_err();
    assert!(err.to_string().contains("duplicate indicator id"));
}

#[test]
fn rejects_duplicate_component_case_insensitive() {
    let mut file = minimal_file();
    file.components[1].name = "ocean".to_string();
    let err = Registry::from_file(file).unwrap_err();
    assert!(err.to_string().contains("duplicate component"));
}

#[test]
fn rejects_monotone_without_direction() {
    let mut file = minimal_file();
    file.indicators[1].direction = None;
    let err = Registry::from_file(file).unwrap_err();
    assert!(err.to_string().contains("requires a direction"));
}

#[test]
fn rejects_direction_outside_unit() {
    let mut file = minimal_file();
    file.indicators[1].direction = Some(2);
    let err = Registry::from_file(file).unwrap_err();
    assert!(err.to_string().contains("invalid direction 2"));
}

#[test]
fn rejects_goldilocks_with_direction() {
    let mut file = minimal_file();
    file.indicators[0].direction = Some(1);
    let err = Registry::from_file(file).unwrap_err();
    assert!(err.to_string().contains("must not set a direction"));
}

#[test]
fn rejects_non_positive_half_life() {
    let mut file = minimal_file();
    file.half_life_days.weekly = 0.0;
    let err = Registry::from_file(file).unwrap_err();
    assert!(err.to_string().contains("weekly half-life"));
}

#[test]
fn rejects_empty_indicator_name() {
    let mut file = minimal_file();
    file.indicators[0].name = "  ".to_string();
    let err = Registry::from_file(file).unwrap_err();
    assert!(err.to_string().contains("non-empty name"));
}

#[test]
fn rejects_invalid_seasonal_month() {
    let mut file = minimal_file();
    file.indicators[0].synthetic = Some(SyntheticParams {
        level: 1.0,
        volatility: 0.1,
        seasonal_months: vec![13],
        seasonal_drift: 0.0,
        shock_probability: 0.0,
    });
    let err = Registry::from_file(file).unwrap_err();
    assert!(err.to_string().contains("seasonal month 13"));
}

#[test]
fn unknown_mode_fails_to_parse() {
    let yaml = MINIMAL.replace("mode: goldilocks", "mode: sideways");
    let err = parse_indicators(&yaml).unwrap_err();
    assert!(matches!(err, ConfigError::IndicatorsFileParse(_)));
}

#[test]
fn unknown_frequency_fails_to_parse() {
    let yaml = MINIMAL.replace("frequency: monthly", "frequency: hourly");
    let err = parse_indicators(&yaml).unwrap_err();
    assert!(matches!(err, ConfigError::IndicatorsFileParse(_)));
}

#[test]
fn load_indicators_reports_missing_file() {
    let err = load_indicators(Path::new("/nonexistent/indicators.yaml")).unwrap_err();
    assert!(matches!(err, ConfigError::IndicatorsFileIo { .. }));
}

#[test]
fn direction_sign() {
    assert!((Direction::Positive.sign() - 1.0).abs() < f64::EPSILON);
    assert!((Direction::Negative.sign() + 1.0).abs() < f64::EPSILON);
}

#[test]
fn load_indicators_from_real_file() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("config")
        .join("indicators.yaml");
    assert!(
        path.exists(),
        "indicators.yaml missing at {path:?}; required for this test"
    );
    let result = load_indicators(&path);
    assert!(result.is_ok(), "failed to load indicators.yaml: {result:?}");
    let registry = result.unwrap();
    assert_eq!(registry.components().len(), 5);
    assert_eq!(registry.indicators().len(), 9);
    assert!(registry.indicators().iter().all(|i| i.synthetic.is_some()));
}

#[test]
fn indicator_serializes_scoring_mode_as_tagged_object() {
    let registry = parse_indicators(MINIMAL).expect("valid catalog");
    let port = serde_json::to_value(registry.indicator("port_congestion").expect("port"))
        .expect("serialize");
    assert_eq!(port["scoring"]["mode"], "monotone");
    assert_eq!(port["scoring"]["direction"], "negative");
    assert_eq!(port["frequency"], "daily");
    assert!(port.get("synthetic").is_none());
}
