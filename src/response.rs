//! Closed-form responses of biodiversity and crop production to the size of
//! the bee population.

use crate::params::{MAX_BEE_PERCENTAGE, MAX_RESILIENCE};

/// Logistic steepness.
pub const SIGMOID_STEEPNESS: f64 = 5.0;
/// Logistic midpoint on the resilience-adjusted bee fraction.
pub const SIGMOID_MIDPOINT: f64 = 0.5;
/// Shift of the effective bee fraction per unit of resilience.
pub const RESILIENCE_SHIFT: f64 = 0.3;
/// Share of crops that require animal pollination.
pub const POLLINATOR_DEPENDENT_SHARE: f64 = 0.35;

/// Biodiversity retained (0–100) for a bee population percentage and an
/// ecosystem resilience in `[0, 1]`.
///
/// Resilience moves the effective population up, which shifts the collapse
/// of the logistic curve towards lower bee numbers.
pub fn biodiversity_response(bee_percentage: f64, ecosystem_resilience: f64) -> f64 {
    debug_assert!(
        (0.0..=MAX_BEE_PERCENTAGE).contains(&bee_percentage),
        "bee percentage {bee_percentage} outside [0, 100]"
    );
    debug_assert!(
        (0.0..=MAX_RESILIENCE).contains(&ecosystem_resilience),
        "resilience {ecosystem_resilience} outside [0, 1]"
    );

    let bee = bee_percentage / MAX_BEE_PERCENTAGE;
    let adjusted = bee + ecosystem_resilience * RESILIENCE_SHIFT;
    let factor = logistic(adjusted, SIGMOID_STEEPNESS, SIGMOID_MIDPOINT);
    (factor * 100.0).min(100.0)
}

/// Aggregate crop production (0–100) for a bee population percentage.
pub fn crop_production_response(bee_percentage: f64) -> f64 {
    debug_assert!(
        (0.0..=MAX_BEE_PERCENTAGE).contains(&bee_percentage),
        "bee percentage {bee_percentage} outside [0, 100]"
    );

    let bee = bee_percentage / MAX_BEE_PERCENTAGE;
    let dependent = pollinator_dependent_yield(bee);
    100.0
        * (POLLINATOR_DEPENDENT_SHARE * dependent + (1.0 - POLLINATOR_DEPENDENT_SHARE) * 1.0)
}

/// Yield factor of pollinator-dependent crops for a bee fraction.
///
/// Piecewise linear: saturated above 0.8, gentle decline to 0.5, steep
/// decline to 0.2, collapse to zero below that. Continuous at every
/// breakpoint.
pub fn pollinator_dependent_yield(bee_fraction: f64) -> f64 {
    if bee_fraction >= 0.8 {
        1.0
    } else if bee_fraction >= 0.5 {
        0.8 + (bee_fraction - 0.5) / 0.3 * 0.2
    } else if bee_fraction >= 0.2 {
        0.4 + (bee_fraction - 0.2) / 0.3 * 0.4
    } else {
        bee_fraction / 0.2 * 0.4
    }
}

fn logistic(x: f64, steepness: f64, midpoint: f64) -> f64 {
    1.0 / (1.0 + (-steepness * (x - midpoint)).exp())
}
