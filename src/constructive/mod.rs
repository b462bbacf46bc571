//! Constructive procedures run before the search.
//!
//! - [`estimate_fleet_size`]: greedy nearest-neighbour bin packing under the energy budget, O(n²)
//! - [`PopulationInitializer`]: randomized nearest-k partitions, O(n² log n) per member
//! - [`nearest_neighbor_order`], [`farthest_neighbor_tour`], [`radial_lower_bound`]:
//!   visiting order and distance bounds used by the evaluator

mod fleet;
mod initializer;
mod nearest_neighbor;

pub use fleet::estimate_fleet_size;
pub use initializer::PopulationInitializer;
pub use nearest_neighbor::{
    farthest_neighbor_tour, nearest_neighbor_order, radial_lower_bound, tour_length,
};
