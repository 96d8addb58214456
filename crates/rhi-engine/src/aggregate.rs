//! Weighted roll-up of indicator scores into components and the headline.

use rhi_core::{Component, Registry, NEUTRAL_SCORE};

use crate::types::{ComponentScore, IndicatorScore};

/// Score one component from its indicators' scores for a single date.
///
/// Weights are renormalized over the indicators that have data; a missing
/// indicator is skipped, never counted as zero. With nothing present the
/// component sits at the neutral score.
#[must_use]
pub fn component_score(
    registry: &Registry,
    component: &Component,
    scores: &[IndicatorScore],
) -> ComponentScore {
    let mut weighted = 0.0;
    let mut weight_sum = 0.0;
    let mut present = 0usize;

    for indicator in registry.component_indicators(component) {
        let Some(value) = scores
            .iter()
            .find(|s| s.indicator_id == indicator.id)
            .and_then(IndicatorScore::contribution)
        else {
            continue;
        };
        weighted += indicator.weight * value;
        weight_sum += indicator.weight;
        present += 1;
    }

    let score = if weight_sum > 0.0 {
        (weighted / weight_sum).clamp(0.0, 100.0)
    } else {
        NEUTRAL_SCORE
    };

    ComponentScore {
        name: component.name.clone(),
        score,
        weight: component.weight,
        indicators_present: present,
    }
}

/// Score every component in registry order.
#[must_use]
pub fn component_scores(registry: &Registry, scores: &[IndicatorScore]) -> Vec<ComponentScore> {
    registry
        .components()
        .iter()
        .map(|c| component_score(registry, c, scores))
        .collect()
}

/// Fixed-weight sum of component scores. Component weights are not
/// renormalized: a data-less component contributes its neutral 50.
#[must_use]
pub fn headline_score(components: &[ComponentScore]) -> f64 {
    components
        .iter()
        .map(|c| c.weight * c.score)
        .sum::<f64>()
        .clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rhi_core::parse_indicators;

    use super::*;
    use crate::types::ScoreStatus;

    const CATALOG: &str = r"
components:
  - { name: Ocean, weight: 0.6 }
  - { name: Rail, weight: 0.4 }
indicators:
  - { id: a, name: A, component: Ocean, frequency: daily, mode: goldilocks, weight: 0.5 }
  - { id: b, name: B, component: Ocean, frequency: daily, mode: monotone, direction: 1, weight: 0.3 }
  - { id: c, name: C, component: Ocean, frequency: daily, mode: monotone, direction: 1, weight: 0.2 }
  - { id: r, name: R, component: Rail, frequency: weekly, mode: monotone, direction: -1, weight: 1.0 }
";

    fn score(id: &str, component: &str, decayed: Option<f64>) -> IndicatorScore {
        IndicatorScore {
            indicator_id: id.to_string(),
            name: id.to_uppercase(),
            component: component.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            observed_on: None,
            raw_value: None,
            z_score: None,
            score: decayed,
            staleness_age_days: None,
            decay_factor: None,
            decayed_score: decayed,
            status: if decayed.is_some() {
                ScoreStatus::Scored
            } else {
                ScoreStatus::Missing
            },
        }
    }

    #[test]
    fn full_component_is_weighted_average() {
        let registry = parse_indicators(CATALOG).unwrap();
        let scores = [
            score("a", "Ocean", Some(80.0)),
            score("b", "Ocean", Some(40.0)),
            score("c", "Ocean", Some(60.0)),
        ];
        let ocean = component_score(&registry, &registry.components()[0], &scores);
        // 0.5*80 + 0.3*40 + 0.2*60
        assert!((ocean.score - 64.0).abs() < 1e-12);
        assert_eq!(ocean.indicators_present, 3);
    }

    #[test]
    fn missing_indicator_is_skipped_and_weights_renormalized() {
        let registry = parse_indicators(CATALOG).unwrap();
        let scores = [
            score("a", "Ocean", Some(80.0)),
            score("b", "Ocean", None),
            score("c", "Ocean", Some(60.0)),
        ];
        let ocean = component_score(&registry, &registry.components()[0], &scores);
        // (0.5*80 + 0.2*60) / 0.7
        assert!((ocean.score - 52.0 / 0.7).abs() < 1e-12);
        assert_eq!(ocean.indicators_present, 2);
    }

    #[test]
    fn neutral_status_still_counts() {
        let registry = parse_indicators(CATALOG).unwrap();
        let mut neutral = score("r", "Rail", Some(50.0));
        neutral.status = ScoreStatus::Neutral;
        let rail = component_score(&registry, &registry.components()[1], &[neutral]);
        assert_eq!(rail.score, 50.0);
        assert_eq!(rail.indicators_present, 1);
    }

    #[test]
    fn all_missing_component_falls_back_to_neutral() {
        let registry = parse_indicators(CATALOG).unwrap();
        let rail = component_score(&registry, &registry.components()[1], &[]);
        assert_eq!(rail.score, NEUTRAL_SCORE);
        assert_eq!(rail.indicators_present, 0);
    }

    #[test]
    fn headline_uses_fixed_component_weights() {
        let registry = parse_indicators(CATALOG).unwrap();
        let scores = [score("a", "Ocean", Some(90.0)), score("b", "Ocean", Some(90.0))];
        let components = component_scores(&registry, &scores);
        assert_eq!(components.len(), 2);
        // Ocean 90, Rail neutral 50: 0.6*90 + 0.4*50
        assert!((headline_score(&components) - 74.0).abs() < 1e-12);
    }
}
