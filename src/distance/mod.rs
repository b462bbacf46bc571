//! Distance matrices and neighbour rankings.
//!
//! All search operators share one read-only matrix (depot at location 0)
//! and one neighbour table built per run.

mod matrix;
mod neighbors;

pub use matrix::DistanceMatrix;
pub use neighbors::NeighborTable;
