//! Domain model types for recharging-vehicle routing.
//!
//! Provides the core abstractions: planar points, recharge targets and the
//! sensor nodes they come from, the ephemeral vehicle state used during
//! simulation, candidate partitions and populations, and the evaluated
//! flight plans returned to callers.

mod instance;
mod point;
mod population;
mod route;
mod sensor;
mod solution;
mod target;
mod vehicle;

pub use instance::Instance;
pub use point::Point;
pub use population::Population;
pub use route::{RoutePlan, Visit};
pub use sensor::{collect_targets, SensorKind, SensorNode};
pub use solution::Solution;
pub use target::Target;
pub use vehicle::VehicleState;
