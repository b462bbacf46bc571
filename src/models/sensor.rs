//! Supercapacitor-powered sensor nodes and recharge requests.
//!
//! This is the target-set provider: it turns a deployment of sensor nodes
//! into the [`Target`]s that fall below their minimum operating voltage.

use serde::{Deserialize, Serialize};

use super::{Point, Target};
use crate::error::{Error, Result};

/// Sensor hardware class, which fixes the supercapacitor parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SensorKind {
    /// Pressure sensor: 3 F, 5.0 V max, 3.5 V min, 3.3 V critical.
    Pressure,
    /// Temperature sensor: 6 F, 2.5 V max, 1.75 V min, 1.5 V critical.
    Temperature,
}

impl SensorKind {
    /// Supercapacitor capacitance [F].
    pub fn capacitance(&self) -> f64 {
        match self {
            SensorKind::Pressure => 3.0,
            SensorKind::Temperature => 6.0,
        }
    }

    /// Fully charged voltage [V].
    pub fn max_voltage(&self) -> f64 {
        match self {
            SensorKind::Pressure => 5.0,
            SensorKind::Temperature => 2.5,
        }
    }

    /// Below this voltage the node requests a recharge [V].
    pub fn min_voltage(&self) -> f64 {
        match self {
            SensorKind::Pressure => 3.5,
            SensorKind::Temperature => 1.75,
        }
    }

    /// Below this voltage the node stops sensing [V].
    pub fn critical_voltage(&self) -> f64 {
        match self {
            SensorKind::Pressure => 3.3,
            SensorKind::Temperature => 1.5,
        }
    }
}

/// A deployed sensor node.
///
/// # Examples
///
/// ```
/// use pdv_routing::models::{Point, SensorKind, SensorNode};
///
/// let node = SensorNode::new(1, Point::new(10.0, 5.0), 3.0, SensorKind::Pressure);
/// assert!(node.needs_recharge());
/// // ½ · 3 F · (5² − 3²) V² = 24 J
/// assert!((node.recharge_package() - 24.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorNode {
    id: usize,
    position: Point,
    voltage: f64,
    kind: SensorKind,
}

impl SensorNode {
    /// Creates a sensor node with the given supercapacitor voltage.
    pub fn new(id: usize, position: Point, voltage: f64, kind: SensorKind) -> Self {
        Self {
            id,
            position,
            voltage,
            kind,
        }
    }

    /// Node identifier.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Node position.
    pub fn position(&self) -> Point {
        self.position
    }

    /// Current supercapacitor voltage [V].
    pub fn voltage(&self) -> f64 {
        self.voltage
    }

    /// Hardware class.
    pub fn kind(&self) -> SensorKind {
        self.kind
    }

    /// Energy currently stored [J].
    pub fn stored_energy(&self) -> f64 {
        0.5 * self.kind.capacitance() * self.voltage * self.voltage
    }

    /// Energy stored at maximum voltage [J].
    pub fn max_energy(&self) -> f64 {
        let v = self.kind.max_voltage();
        0.5 * self.kind.capacitance() * v * v
    }

    /// Energy needed to recharge the node to its maximum voltage [J].
    pub fn recharge_package(&self) -> f64 {
        (self.max_energy() - self.stored_energy()).max(0.0)
    }

    /// Returns `true` if the voltage fell below the recharge threshold.
    pub fn needs_recharge(&self) -> bool {
        self.voltage < self.kind.min_voltage()
    }

    /// Returns `true` if the node is at or below its critical voltage.
    pub fn is_critical(&self) -> bool {
        self.voltage <= self.kind.critical_voltage()
    }

    /// Recharge priority weight: 10 near full charge down to 3 when depleted.
    ///
    /// Each 0.25 V below the maximum voltage lowers the weight by one.
    pub fn weight(&self) -> u8 {
        let drop = self.kind.max_voltage() - self.voltage;
        if drop <= 0.25 {
            return 10;
        }
        let steps = ((drop - 1e-12) / 0.25).floor() as i64;
        (10 - steps).clamp(3, 10) as u8
    }

    /// Converts this node into a recharge target.
    pub fn to_target(&self) -> Target {
        Target::new(
            self.id,
            self.position,
            self.recharge_package(),
            self.max_energy(),
        )
    }
}

/// Collects the recharge targets of a deployment.
///
/// Rejects deployments where two nodes share an id or overlap in position.
///
/// # Examples
///
/// ```
/// use pdv_routing::models::{collect_targets, Point, SensorKind, SensorNode};
///
/// let sensors = vec![
///     SensorNode::new(0, Point::new(1.0, 0.0), 4.8, SensorKind::Pressure),
///     SensorNode::new(1, Point::new(2.0, 0.0), 3.1, SensorKind::Pressure),
///     SensorNode::new(2, Point::new(3.0, 0.0), 1.6, SensorKind::Temperature),
/// ];
/// let targets = collect_targets(&sensors).unwrap();
/// let ids: Vec<usize> = targets.iter().map(|t| t.id()).collect();
/// assert_eq!(ids, vec![1, 2]);
/// ```
pub fn collect_targets(sensors: &[SensorNode]) -> Result<Vec<Target>> {
    for (i, a) in sensors.iter().enumerate() {
        for b in &sensors[i + 1..] {
            if a.id == b.id {
                return Err(Error::InvalidInput(format!("duplicate sensor id {}", a.id)));
            }
            if a.position.coincides(&b.position, 1e-9) {
                return Err(Error::InvalidInput(format!(
                    "sensors {} and {} overlap",
                    a.id, b.id
                )));
            }
        }
    }

    Ok(sensors
        .iter()
        .filter(|s| s.needs_recharge())
        .map(SensorNode::to_target)
        .collect())
}
