//! Day-over-day attribution of headline movement to individual indicators.

use rhi_core::Registry;

use crate::types::{DaySnapshot, Driver};

/// Per-indicator impact between two scored days:
/// `component_weight * indicator_weight * (decayed_today - decayed_yesterday)`.
///
/// Indicators missing on either day are omitted. The result is sorted by
/// descending `|impact|`; the sort is stable, so ties keep registry order.
#[must_use]
pub fn decompose(
    registry: &Registry,
    today: &DaySnapshot,
    yesterday: &DaySnapshot,
) -> Vec<Driver> {
    let mut drivers: Vec<Driver> = Vec::with_capacity(registry.indicators().len());

    for component in registry.components() {
        for indicator in registry.component_indicators(component) {
            let current = today
                .indicator(&indicator.id)
                .and_then(|s| s.contribution());
            let previous = yesterday
                .indicator(&indicator.id)
                .and_then(|s| s.contribution());
            let (Some(current), Some(previous)) = (current, previous) else {
                continue;
            };
            drivers.push(Driver {
                indicator_id: indicator.id.clone(),
                name: indicator.name.clone(),
                impact: component.weight * indicator.weight * (current - previous),
                category: component.name.clone(),
            });
        }
    }

    drivers.sort_by(|a, b| b.impact.abs().total_cmp(&a.impact.abs()));
    drivers
}

/// Keep the `n` largest movers.
#[must_use]
pub fn top_drivers(mut drivers: Vec<Driver>, n: usize) -> Vec<Driver> {
    drivers.truncate(n);
    drivers
}
