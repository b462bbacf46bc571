//! Drone with inductive and acoustic power transfer.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use super::{ChargeCost, EnergyCostModel, TravelCost};
use crate::models::{Target, VehicleState};

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Vehicle parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdvParameters {
    /// Battery budget [Wh].
    pub capacity: f64,
    /// Power draw while flying or hovering [W].
    pub power: f64,
    /// Cruise speed [m/h].
    pub speed: f64,
    /// Positioning time above each node [h].
    pub hover_time: f64,
    /// RF to DC efficiency of the inductive link.
    pub ipt_efficiency: f64,
    /// Extra energy kept on top of the flight home [Wh].
    pub reserve: f64,
}

impl Default for PdvParameters {
    fn default() -> Self {
        Self {
            capacity: 187.0,
            power: 363.888,
            speed: 21_600.0,
            hover_time: 5.6e-3,
            ipt_efficiency: 0.5,
            reserve: 0.0,
        }
    }
}

/// Acoustic side-charge parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcousticParameters {
    /// Neighbours must be strictly closer than this [m].
    pub radius: f64,
    /// Neighbours must be strictly farther than this [m].
    pub min_separation: f64,
    /// Carrier frequency [Hz].
    pub frequency: f64,
    /// Material attenuation coefficient.
    pub alpha: f64,
    /// Frequency exponent of the attenuation.
    pub efficiency_exponent: f64,
    /// Piezo transducer efficiency, applied at both ends.
    pub piezo_efficiency: f64,
    /// Acoustic to DC conversion efficiency.
    pub acoustic_to_dc: f64,
    /// Energy sent to each neighbour [J].
    pub energy_sent: f64,
}

impl Default for AcousticParameters {
    fn default() -> Self {
        Self {
            radius: 0.7,
            min_separation: 0.05,
            frequency: 47_500.0,
            alpha: 3.21,
            efficiency_exponent: 8.58e-3,
            piezo_efficiency: 0.9,
            acoustic_to_dc: 0.98,
            energy_sent: 12.0,
        }
    }
}

/// Stock energy model.
///
/// Flying and hovering draw constant power. Refilling a node costs its
/// deficit divided by the inductive efficiency.
///
/// # Examples
///
/// ```
/// use pdv_routing::energy::{EnergyCostModel, PdvEnergyModel};
/// use pdv_routing::models::{Point, Target, VehicleState};
///
/// let model = PdvEnergyModel::default();
/// let leg = model.leg_cost(21_600.0);
/// assert!((leg.time - 1.0).abs() < 1e-12);
/// assert!((leg.energy - 363.888).abs() < 1e-9);
///
/// let t = Target::new(0, Point::new(1.0, 1.0), 1800.0, 1800.0);
/// let c = model.charge_cost(&VehicleState::at_depot(187.0), &t);
/// // hover 363.888 W × 5.6e-3 h plus 1800 J / (0.5 × 3600)
/// assert!((c.energy - (363.888 * 5.6e-3 + 1.0)).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PdvEnergyModel {
    vehicle: PdvParameters,
    acoustic: AcousticParameters,
}

impl PdvEnergyModel {
    /// Creates a model from explicit parameters.
    pub fn new(vehicle: PdvParameters, acoustic: AcousticParameters) -> Self {
        Self { vehicle, acoustic }
    }

    /// Overrides the battery budget.
    pub fn with_capacity(mut self, capacity: f64) -> Self {
        self.vehicle.capacity = capacity;
        self
    }

    /// Keeps `reserve` Wh unused on top of the flight home.
    pub fn with_reserve(mut self, reserve: f64) -> Self {
        self.vehicle.reserve = reserve;
        self
    }

    /// Vehicle parameters.
    pub fn vehicle(&self) -> &PdvParameters {
        &self.vehicle
    }

    /// Acoustic parameters.
    pub fn acoustic(&self) -> &AcousticParameters {
        &self.acoustic
    }

    fn attenuation(&self) -> f64 {
        let a = &self.acoustic;
        (2.0 * PI * a.frequency).powf(a.efficiency_exponent) * a.alpha
    }
}

impl EnergyCostModel for PdvEnergyModel {
    fn capacity(&self) -> f64 {
        self.vehicle.capacity
    }

    fn reserve(&self) -> f64 {
        self.vehicle.reserve
    }

    fn leg_cost(&self, distance: f64) -> TravelCost {
        let time = if self.vehicle.speed > 0.0 {
            distance / self.vehicle.speed
        } else {
            0.0
        };
        TravelCost {
            distance,
            time,
            energy: self.vehicle.power * time,
        }
    }

    fn charge_cost(&self, _vehicle: &VehicleState, target: &Target) -> ChargeCost {
        let hover = self.vehicle.power * self.vehicle.hover_time;
        let transfer = if self.vehicle.ipt_efficiency > 0.0 {
            target.energy_deficit() / (self.vehicle.ipt_efficiency * SECONDS_PER_HOUR)
        } else {
            0.0
        };
        ChargeCost {
            time: self.vehicle.hover_time,
            energy: hover + transfer,
        }
    }

    fn acoustic_sent(&self) -> f64 {
        self.acoustic.energy_sent
    }

    fn acoustic_delivery(&self, distance: f64) -> f64 {
        let a = &self.acoustic;
        let gain = (-self.attenuation() * distance).exp();
        a.piezo_efficiency * a.piezo_efficiency * a.acoustic_to_dc * gain * a.energy_sent
    }

    fn in_acoustic_range(&self, distance: f64) -> bool {
        distance > self.acoustic.min_separation && distance < self.acoustic.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Point;

    #[test]
    fn test_defaults() {
        let m = PdvEnergyModel::default();
        assert_eq!(m.capacity(), 187.0);
        assert_eq!(m.reserve(), 0.0);
        assert_eq!(m.acoustic_sent(), 12.0);
    }

    #[test]
    fn test_leg_cost_linear() {
        let m = PdvEnergyModel::default();
        let a = m.leg_cost(100.0);
        let b = m.leg_cost(200.0);
        assert!((b.energy - 2.0 * a.energy).abs() < 1e-12);
        assert_eq!(a.distance, 100.0);
    }

    #[test]
    fn test_acoustic_delivery_decays() {
        let m = PdvEnergyModel::default();
        let near = m.acoustic_delivery(0.1);
        let far = m.acoustic_delivery(0.6);
        assert!(near > far);
        assert!(near < 12.0 * 0.9 * 0.9 * 0.98);
        assert!(far > 0.0);
    }

    #[test]
    fn test_acoustic_range_bounds() {
        let m = PdvEnergyModel::default();
        assert!(!m.in_acoustic_range(0.05));
        assert!(m.in_acoustic_range(0.3));
        assert!(!m.in_acoustic_range(0.7));
    }

    #[test]
    fn test_cluster() {
        let m = PdvEnergyModel::default();
        let all = vec![
            Target::new(0, Point::new(10.0, 10.0), 20.0, 37.5),
            Target::new(1, Point::new(10.3, 10.0), 20.0, 37.5),
            Target::new(2, Point::new(12.0, 10.0), 20.0, 37.5),
            Target::new(3, Point::new(10.0, 10.02), 20.0, 37.5),
        ];
        assert_eq!(m.acoustic_cluster_of(&all[0], &all), vec![1]);
    }

    #[test]
    fn test_builders() {
        let m = PdvEnergyModel::default().with_capacity(12.0).with_reserve(0.0);
        assert_eq!(m.capacity(), 12.0);
        assert_eq!(m.reserve(), 0.0);
        assert_eq!(m.vehicle().power, 363.888);
        assert_eq!(m.acoustic().radius, 0.7);
    }
}
