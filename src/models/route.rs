//! Evaluated flight plans handed to result consumers.

use serde::{Deserialize, Serialize};

/// A single recharge stop within a flight plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Visit {
    /// Identifier of the target charged at this stop.
    pub target_id: usize,
    /// Time since take-off when the vehicle arrives [h].
    pub arrival_time: f64,
    /// Vehicle energy left after the transfer [Wh].
    pub remaining_energy: f64,
    /// Energy delivered at this stop, side charges included [J].
    pub charged_energy: f64,
    /// Targets that received acoustic side charges from this stop.
    pub acoustic_neighbors: Vec<usize>,
}

/// The flight of one vehicle, in visiting order.
///
/// The depot is implicit at both ends of `visits`.
///
/// # Examples
///
/// ```
/// use pdv_routing::models::{RoutePlan, Visit};
///
/// let mut plan = RoutePlan::new(0);
/// plan.push_visit(Visit {
///     target_id: 7,
///     arrival_time: 0.01,
///     remaining_energy: 180.0,
///     charged_energy: 24.0,
///     acoustic_neighbors: vec![],
/// });
/// assert_eq!(plan.len(), 1);
/// assert_eq!(plan.target_ids(), vec![7]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutePlan {
    vehicle: usize,
    visits: Vec<Visit>,
    distance: f64,
    flight_time: f64,
    energy_cost: f64,
    charged_energy: f64,
    served_ratio: f64,
    fitness: f64,
    feasible: bool,
}

impl RoutePlan {
    /// Creates an empty, feasible plan for the given vehicle slot.
    pub fn new(vehicle: usize) -> Self {
        Self {
            vehicle,
            visits: Vec::new(),
            distance: 0.0,
            flight_time: 0.0,
            energy_cost: 0.0,
            charged_energy: 0.0,
            served_ratio: 1.0,
            fitness: 0.0,
            feasible: true,
        }
    }

    /// Appends a stop.
    pub fn push_visit(&mut self, visit: Visit) {
        self.visits.push(visit);
    }

    /// Vehicle slot this plan belongs to.
    pub fn vehicle(&self) -> usize {
        self.vehicle
    }

    /// Stops in flight order.
    pub fn visits(&self) -> &[Visit] {
        &self.visits
    }

    /// Number of stops.
    pub fn len(&self) -> usize {
        self.visits.len()
    }

    /// Returns `true` if the vehicle never leaves the depot.
    pub fn is_empty(&self) -> bool {
        self.visits.is_empty()
    }

    /// Target identifiers in flight order.
    pub fn target_ids(&self) -> Vec<usize> {
        self.visits.iter().map(|v| v.target_id).collect()
    }

    /// Total flown distance, return leg included [m].
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// Total flight time, return leg included [h].
    pub fn flight_time(&self) -> f64 {
        self.flight_time
    }

    /// Vehicle energy spent [Wh].
    pub fn energy_cost(&self) -> f64 {
        self.energy_cost
    }

    /// Energy delivered to sensors, side charges included [J].
    ///
    /// Side charges reach every acoustic neighbour of a stop, whichever
    /// route that neighbour belongs to. Two routes stopping next to each
    /// other both count the energy they relay to one another.
    pub fn charged_energy(&self) -> f64 {
        self.charged_energy
    }

    /// Fraction of assigned targets that were actually visited.
    pub fn served_ratio(&self) -> f64 {
        self.served_ratio
    }

    /// Route fitness.
    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    /// Whether the whole route fits within the energy budget.
    pub fn is_feasible(&self) -> bool {
        self.feasible
    }

    pub(crate) fn set_totals(&mut self, distance: f64, flight_time: f64, energy_cost: f64) {
        self.distance = distance;
        self.flight_time = flight_time;
        self.energy_cost = energy_cost;
    }

    pub(crate) fn set_outcome(
        &mut self,
        charged_energy: f64,
        served_ratio: f64,
        fitness: f64,
        feasible: bool,
    ) {
        self.charged_energy = charged_energy;
        self.served_ratio = served_ratio;
        self.fitness = fitness;
        self.feasible = feasible;
    }
}
