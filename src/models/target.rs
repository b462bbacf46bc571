//! Recharge targets.

use serde::{Deserialize, Serialize};

use super::Point;

/// A sensor node that requested a recharge visit.
///
/// Targets are read-only for the whole optimization run. Energies are in
/// joules: `energy_deficit` is what a full inductive recharge delivers and
/// `energy_capacity` is the energy stored at maximum voltage.
///
/// # Examples
///
/// ```
/// use pdv_routing::models::{Point, Target};
///
/// let t = Target::new(4, Point::new(100.0, 100.0), 24.0, 37.5);
/// assert_eq!(t.id(), 4);
/// assert_eq!(t.energy_deficit(), 24.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    id: usize,
    position: Point,
    energy_deficit: f64,
    energy_capacity: f64,
}

impl Target {
    /// Creates a target.
    ///
    /// The capacity is raised to at least the deficit so the charged-energy
    /// ratio stays meaningful.
    pub fn new(id: usize, position: Point, energy_deficit: f64, energy_capacity: f64) -> Self {
        let energy_deficit = energy_deficit.max(0.0);
        Self {
            id,
            position,
            energy_deficit,
            energy_capacity: energy_capacity.max(energy_deficit),
        }
    }

    /// Stable identifier supplied by the caller.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Location of the node.
    pub fn position(&self) -> Point {
        self.position
    }

    /// Energy needed to bring the node back to full charge [J].
    pub fn energy_deficit(&self) -> f64 {
        self.energy_deficit
    }

    /// Energy stored by the node at maximum voltage [J].
    pub fn energy_capacity(&self) -> f64 {
        self.energy_capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_accessors() {
        let t = Target::new(2, Point::new(1.0, 2.0), 10.0, 37.5);
        assert_eq!(t.id(), 2);
        assert_eq!(t.position(), Point::new(1.0, 2.0));
        assert_eq!(t.energy_deficit(), 10.0);
        assert_eq!(t.energy_capacity(), 37.5);
    }

    #[test]
    fn test_negative_deficit_clamped() {
        let t = Target::new(0, Point::DEPOT, -3.0, 5.0);
        assert_eq!(t.energy_deficit(), 0.0);
    }

    #[test]
    fn test_capacity_at_least_deficit() {
        let t = Target::new(0, Point::DEPOT, 12.0, 5.0);
        assert_eq!(t.energy_capacity(), 12.0);
    }
}
