//! Ephemeral PDV state used while simulating a flight.

use super::Point;

/// State of one recharging vehicle during a simulated flight.
///
/// A fresh state is created at the depot for every route evaluation and
/// for every vehicle opened by fleet sizing; it is never shared.
/// Energies are in Wh, distances in meters and times in hours.
///
/// # Examples
///
/// ```
/// use pdv_routing::models::{Point, VehicleState};
///
/// let mut v = VehicleState::at_depot(187.0);
/// v.advance(Point::new(30.0, 40.0), 50.0, 0.01);
/// v.consume(3.0);
/// assert_eq!(v.position(), Point::new(30.0, 40.0));
/// assert!((v.remaining_energy() - 184.0).abs() < 1e-10);
/// assert!((v.energy_used() - 3.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleState {
    position: Point,
    distance: f64,
    time: f64,
    capacity: f64,
    remaining: f64,
}

impl VehicleState {
    /// Creates a fully charged vehicle parked at the depot.
    pub fn at_depot(capacity: f64) -> Self {
        let capacity = capacity.max(0.0);
        Self {
            position: Point::DEPOT,
            distance: 0.0,
            time: 0.0,
            capacity,
            remaining: capacity,
        }
    }

    /// Current position.
    pub fn position(&self) -> Point {
        self.position
    }

    /// Cumulative flown distance [m].
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// Cumulative flight and hover time [h].
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Energy budget of a fresh vehicle [Wh].
    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    /// Energy still available [Wh]. Never negative.
    pub fn remaining_energy(&self) -> f64 {
        self.remaining
    }

    /// Energy spent so far [Wh].
    pub fn energy_used(&self) -> f64 {
        self.capacity - self.remaining
    }

    /// Moves the vehicle, accumulating distance and time.
    pub fn advance(&mut self, to: Point, distance: f64, time: f64) {
        self.position = to;
        self.distance += distance;
        self.time += time;
    }

    /// Adds time spent without moving (hovering during a transfer).
    pub fn wait(&mut self, time: f64) {
        self.time += time;
    }

    /// Draws energy from the battery, clamping at zero.
    ///
    /// Returns the energy actually drawn.
    pub fn consume(&mut self, energy: f64) -> f64 {
        let drawn = energy.max(0.0).min(self.remaining);
        self.remaining -= drawn;
        drawn
    }
}
