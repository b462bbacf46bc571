//! # pdv-routing
//!
//! Route planning for recharging drones (PDVs) serving energy-depleted
//! wireless sensor nodes. Targets are partitioned among a fleet sized to
//! the vehicle energy budget, and each vehicle's share is improved by one of
//! three population-based metaheuristics.
//!
//! ## Modules
//!
//! - [`models`]: Domain model types (Point, Target, SensorNode, VehicleState, Solution, Population)
//! - [`distance`]: Depot-first distance matrix and neighbour ranks
//! - [`energy`]: Energy cost model trait and the stock drone model
//! - [`evaluation`]: Energy-simulating route fitness
//! - [`constructive`]: Fleet sizing and randomized nearest-k seeding
//! - [`search`]: Genetic, black-hole and simulated-annealing strategies
//! - [`driver`]: End-to-end runs and reports
//! - [`config`]: Serializable configuration and presets
//! - [`error`]: Error types
//!
//! ## Example
//!
//! ```
//! use pdv_routing::config::OptimizerConfig;
//! use pdv_routing::driver::Optimizer;
//! use pdv_routing::models::{Point, SensorKind, SensorNode};
//!
//! let sensors: Vec<SensorNode> = (0..8)
//!     .map(|i| SensorNode::new(i, Point::new(40.0 * i as f64 + 20.0, 15.0), 3.2, SensorKind::Pressure))
//!     .collect();
//! let optimizer = Optimizer::new(
//!     OptimizerConfig::default().with_min_requests(5).with_population_size(6).with_seed(3),
//! ).unwrap();
//! let report = optimizer.plan_sensors(&sensors, &optimizer.energy_model()).unwrap();
//! assert!(report.feasible);
//! assert_eq!(report.served_targets(), 8);
//! ```

pub mod config;
pub mod constructive;
pub mod distance;
pub mod driver;
pub mod energy;
pub mod error;
pub mod evaluation;
pub mod models;
pub mod search;

pub use error::{Error, Result};
