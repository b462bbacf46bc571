//! Route fitness evaluation.
//!
//! A route is scored by flying it in nearest-neighbour order against an
//! [`EnergyCostModel`](crate::energy::EnergyCostModel). Running out of
//! budget is not an error: the route scores [`INFEASIBLE_FITNESS`].

mod evaluator;

pub use evaluator::{RouteEvaluation, RouteFitnessEvaluator};

use serde::{Deserialize, Serialize};

/// Fitness of a route that cannot be flown within the energy budget.
pub const INFEASIBLE_FITNESS: f64 = -1000.0;

/// Share of the theoretical maximum counted as a full recharge.
pub const RECHARGE_SATURATION: f64 = 0.9;

/// Weights of the three fitness terms.
///
/// # Examples
///
/// ```
/// use pdv_routing::evaluation::FitnessWeights;
///
/// let w = FitnessWeights::default();
/// assert_eq!((w.recharge, w.vehicle_energy, w.distance), (50.0, 25.0, 25.0));
/// assert_eq!(w.total(), 100.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitnessWeights {
    /// Weight of the charged-energy term.
    pub recharge: f64,
    /// Weight of the vehicle-energy term.
    pub vehicle_energy: f64,
    /// Weight of the flight-distance term. Zero skips the term.
    pub distance: f64,
}

impl FitnessWeights {
    /// Creates a weight set.
    pub fn new(recharge: f64, vehicle_energy: f64, distance: f64) -> Self {
        Self {
            recharge,
            vehicle_energy,
            distance,
        }
    }

    /// Sum of the weights; the upper bound of a route fitness.
    pub fn total(&self) -> f64 {
        self.recharge + self.vehicle_energy + self.distance
    }

    /// Returns `true` if every weight is finite and non-negative.
    pub fn is_valid(&self) -> bool {
        [self.recharge, self.vehicle_energy, self.distance]
            .iter()
            .all(|w| w.is_finite() && *w >= 0.0)
    }
}

impl Default for FitnessWeights {
    fn default() -> Self {
        Self::new(50.0, 25.0, 25.0)
    }
}

/// Increasing transform mapping `[0, ∞)` into `[0, 1)`.
///
/// Non-finite or negative ratios map to the nearest bound.
pub fn saturate(ratio: f64) -> f64 {
    if ratio.is_nan() {
        0.0
    } else {
        ratio.max(0.0).tanh()
    }
}

/// Complementary transform, `1 - saturate(ratio)`.
pub fn complement(ratio: f64) -> f64 {
    1.0 - saturate(ratio)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_saturate_edges() {
        assert_eq!(saturate(0.0), 0.0);
        assert_eq!(saturate(-3.0), 0.0);
        assert_eq!(saturate(f64::NAN), 0.0);
        assert_eq!(saturate(f64::INFINITY), 1.0);
        assert!((complement(0.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_weights_validity() {
        assert!(FitnessWeights::default().is_valid());
        assert!(!FitnessWeights::new(-1.0, 0.0, 0.0).is_valid());
        assert!(!FitnessWeights::new(f64::NAN, 0.0, 0.0).is_valid());
    }

    proptest! {
        #[test]
        fn prop_transforms_bounded(ratio in prop::num::f64::ANY) {
            let s = saturate(ratio);
            let c = complement(ratio);
            prop_assert!((0.0..=1.0).contains(&s));
            prop_assert!((0.0..=1.0).contains(&c));
        }

        #[test]
        fn prop_saturate_monotone(a in 0.0f64..1e6, b in 0.0f64..1e6) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(saturate(lo) <= saturate(hi));
        }
    }
}
