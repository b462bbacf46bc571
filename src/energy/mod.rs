//! Vehicle and sensor energy accounting.
//!
//! The optimizer only talks to energy through [`EnergyCostModel`]. The
//! stock implementation, [`PdvEnergyModel`], models a battery-powered drone
//! that recharges nodes inductively and optionally spreads acoustic side
//! charges to close neighbours.

mod pdv;

pub use pdv::{AcousticParameters, PdvEnergyModel, PdvParameters};

use serde::{Deserialize, Serialize};

use crate::models::{Point, Target, VehicleState};

/// Cost of flying one leg.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TravelCost {
    /// Leg length [m].
    pub distance: f64,
    /// Flight time [h].
    pub time: f64,
    /// Vehicle energy spent [Wh].
    pub energy: f64,
}

/// Cost of recharging one target while hovering over it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ChargeCost {
    /// Hover time [h].
    pub time: f64,
    /// Vehicle energy spent [Wh].
    pub energy: f64,
}

/// How energy reaches the sensors at a stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChargingMode {
    /// Only the visited node is charged, by inductive transfer.
    InductiveOnly,
    /// The visited node relays part of its charge acoustically to nodes
    /// inside the acoustic radius.
    #[default]
    InductiveAndAcoustic,
}

/// Energy accounting consumed by fleet sizing and route evaluation.
///
/// Vehicle energies are in Wh, sensor energies in J. Implementations must
/// be pure: the same inputs always give the same costs, so evaluations can
/// run concurrently.
pub trait EnergyCostModel: Send + Sync {
    /// Battery budget of a freshly dispatched vehicle [Wh].
    fn capacity(&self) -> f64;

    /// Margin that must stay in the battery after returning to the depot [Wh].
    fn reserve(&self) -> f64 {
        0.0
    }

    /// Cost of flying a straight leg of the given length.
    fn leg_cost(&self, distance: f64) -> TravelCost;

    /// Cost of flying between two points.
    fn travel_cost(&self, from: &Point, to: &Point) -> TravelCost {
        self.leg_cost(from.distance_to(to))
    }

    /// Cost of hovering over `target` and refilling it.
    fn charge_cost(&self, vehicle: &VehicleState, target: &Target) -> ChargeCost;

    /// Energy the vehicle may still spend [Wh].
    fn remaining_budget(&self, vehicle: &VehicleState) -> f64 {
        vehicle.remaining_energy()
    }

    /// Energy a charging stop relays to each acoustic neighbour [J].
    ///
    /// Zero disables side charges.
    fn acoustic_sent(&self) -> f64 {
        0.0
    }

    /// Energy received by a neighbour at the given distance [J].
    fn acoustic_delivery(&self, _distance: f64) -> f64 {
        0.0
    }

    /// Returns `true` if a node at `distance` from a stop is in its cluster.
    fn in_acoustic_range(&self, _distance: f64) -> bool {
        false
    }

    /// Indices of the targets in `all` that form the acoustic cluster of `center`.
    fn acoustic_cluster_of(&self, center: &Target, all: &[Target]) -> Vec<usize> {
        all.iter()
            .enumerate()
            .filter(|(_, t)| t.id() != center.id())
            .filter(|(_, t)| self.in_acoustic_range(center.position().distance_to(&t.position())))
            .map(|(i, _)| i)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Flat;

    impl EnergyCostModel for Flat {
        fn capacity(&self) -> f64 {
            10.0
        }

        fn leg_cost(&self, distance: f64) -> TravelCost {
            TravelCost {
                distance,
                time: distance,
                energy: distance,
            }
        }

        fn charge_cost(&self, _vehicle: &VehicleState, _target: &Target) -> ChargeCost {
            ChargeCost::default()
        }
    }

    #[test]
    fn test_defaults_disable_acoustic() {
        let m = Flat;
        let a = Target::new(0, Point::new(0.0, 0.0), 1.0, 1.0);
        let b = Target::new(1, Point::new(0.1, 0.0), 1.0, 1.0);
        assert!(m.acoustic_cluster_of(&a, &[a.clone(), b]).is_empty());
        assert_eq!(m.acoustic_sent(), 0.0);
        assert_eq!(m.reserve(), 0.0);
    }

    #[test]
    fn test_travel_cost_uses_leg_cost() {
        let c = Flat.travel_cost(&Point::new(0.0, 0.0), &Point::new(3.0, 4.0));
        assert!((c.energy - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_remaining_budget_default() {
        let v = VehicleState::at_depot(7.0);
        assert_eq!(Flat.remaining_budget(&v), 7.0);
    }
}
