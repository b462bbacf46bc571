//! Error types surfaced to callers of the planner.
//!
//! Route infeasibility found while scoring candidates is not an error: it is
//! absorbed into the fitness as [`INFEASIBLE_FITNESS`](crate::evaluation::INFEASIBLE_FITNESS).
//! Only precondition and configuration failures reach the caller.

use thiserror::Error;

/// Errors produced while configuring or running the planner.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Fewer recharge requests than the configured trigger threshold.
    ///
    /// This is a "nothing to do" signal rather than a failure; see
    /// [`Error::is_skip`].
    #[error("only {requests} recharge requests, at least {required} required to plan")]
    InsufficientDemand {
        /// Number of targets that requested a recharge.
        requests: usize,
        /// Configured minimum.
        required: usize,
    },

    /// A single target cannot be served even by a freshly dispatched vehicle.
    #[error("target {id} needs {required:.3} Wh but a fresh vehicle only has {available:.3} Wh")]
    InfeasibleTarget {
        /// Identifier of the unreachable target.
        id: usize,
        /// Energy required for the out-and-back visit, including the reserve.
        required: f64,
        /// Budget of a fresh vehicle.
        available: f64,
    },

    /// A solution no longer partitions the target set.
    #[error("partition invariant violated: {0}")]
    DataInconsistency(String),

    /// Configuration values outside their valid range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Malformed input data (duplicate ids, overlapping sensors, ...).
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Returns `true` when the error only signals that planning was skipped.
    pub fn is_skip(&self) -> bool {
        matches!(self, Error::InsufficientDemand { .. })
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
