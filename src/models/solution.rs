//! Candidate partitions of the target set.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One candidate ("chromosome", "star") of the search.
///
/// `routes[v]` holds the target indices assigned to vehicle slot `v`.
/// Indices refer to positions in the run's target list, never to ids, so
/// mutation operators carry identity without looking at coordinates.
/// The stored order is an assignment only; the visiting order is
/// recomputed by the evaluator.
///
/// # Examples
///
/// ```
/// use pdv_routing::models::Solution;
///
/// let mut s = Solution::new(vec![vec![0, 1], vec![2, 3]]);
/// s.swap_targets(1, 2);
/// assert_eq!(s.routes(), &[vec![0, 2], vec![1, 3]]);
/// assert!(s.check_partition(4).is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    routes: Vec<Vec<usize>>,
    route_fitness: Vec<f64>,
    fitness: f64,
}

impl Solution {
    /// Creates an unevaluated solution.
    pub fn new(routes: Vec<Vec<usize>>) -> Self {
        let n = routes.len();
        Self {
            routes,
            route_fitness: vec![0.0; n],
            fitness: 0.0,
        }
    }

    /// Routes, one per vehicle slot.
    pub fn routes(&self) -> &[Vec<usize>] {
        &self.routes
    }

    /// Route of one vehicle slot.
    pub fn route(&self, vehicle: usize) -> &[usize] {
        &self.routes[vehicle]
    }

    /// Number of vehicle slots.
    pub fn num_routes(&self) -> usize {
        self.routes.len()
    }

    /// Number of assigned targets across all routes.
    pub fn num_targets(&self) -> usize {
        self.routes.iter().map(Vec::len).sum()
    }

    /// Cached per-route fitness.
    pub fn route_fitness(&self) -> &[f64] {
        &self.route_fitness
    }

    /// Cached aggregate fitness (sum over routes).
    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    /// Replaces the cached fitness of one route and refreshes the sum.
    pub fn set_route_fitness(&mut self, vehicle: usize, fitness: f64) {
        self.route_fitness[vehicle] = fitness;
        self.fitness = self.route_fitness.iter().sum();
    }

    /// Replaces all cached fitness values.
    pub fn set_fitness(&mut self, route_fitness: Vec<f64>) {
        self.fitness = route_fitness.iter().sum();
        self.route_fitness = route_fitness;
    }

    /// Finds the `(vehicle, slot)` holding a target.
    pub fn locate(&self, target: usize) -> Option<(usize, usize)> {
        self.routes.iter().enumerate().find_map(|(v, route)| {
            route
                .iter()
                .position(|&t| t == target)
                .map(|slot| (v, slot))
        })
    }

    /// Target at a given `(vehicle, slot)`.
    pub fn target_at(&self, vehicle: usize, slot: usize) -> Option<usize> {
        self.routes.get(vehicle).and_then(|r| r.get(slot)).copied()
    }

    /// Swaps the positions of two targets across whichever routes hold them.
    ///
    /// Returns the vehicle slots that changed. Swapping preserves the
    /// partition; a target absent from the solution leaves it untouched.
    pub fn swap_targets(&mut self, a: usize, b: usize) -> Option<(usize, usize)> {
        if a == b {
            return None;
        }
        let (va, sa) = self.locate(a)?;
        let (vb, sb) = self.locate(b)?;
        self.routes[va][sa] = b;
        self.routes[vb][sb] = a;
        Some((va, vb))
    }

    /// Verifies that the routes partition `0..num_targets` exactly.
    pub fn check_partition(&self, num_targets: usize) -> Result<()> {
        let mut seen = vec![false; num_targets];
        for (v, route) in self.routes.iter().enumerate() {
            for &t in route {
                match seen.get_mut(t) {
                    None => {
                        return Err(Error::DataInconsistency(format!(
                            "route {v} holds unknown target index {t}"
                        )))
                    }
                    Some(true) => {
                        return Err(Error::DataInconsistency(format!(
                            "target index {t} assigned twice (route {v})"
                        )))
                    }
                    Some(flag) => *flag = true,
                }
            }
        }
        if let Some(missing) = seen.iter().position(|&s| !s) {
            return Err(Error::DataInconsistency(format!(
                "target index {missing} not assigned"
            )));
        }
        Ok(())
    }

    /// Returns `true` if no cached route fitness equals the infeasible sentinel.
    pub fn is_feasible(&self) -> bool {
        self.route_fitness
            .iter()
            .all(|&f| f > crate::evaluation::INFEASIBLE_FITNESS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locate() {
        let s = Solution::new(vec![vec![3, 1], vec![0, 2]]);
        assert_eq!(s.locate(2), Some((1, 1)));
        assert_eq!(s.locate(3), Some((0, 0)));
        assert_eq!(s.locate(9), None);
        assert_eq!(s.target_at(1, 0), Some(0));
        assert_eq!(s.target_at(4, 0), None);
    }

    #[test]
    fn test_swap_within_route() {
        let mut s = Solution::new(vec![vec![0, 1, 2]]);
        assert_eq!(s.swap_targets(0, 2), Some((0, 0)));
        assert_eq!(s.route(0), &[2, 1, 0]);
    }

    #[test]
    fn test_swap_same_target_is_noop() {
        let mut s = Solution::new(vec![vec![0, 1]]);
        assert_eq!(s.swap_targets(1, 1), None);
        assert_eq!(s.route(0), &[0, 1]);
    }

    #[test]
    fn test_fitness_cache() {
        let mut s = Solution::new(vec![vec![0], vec![1]]);
        s.set_fitness(vec![10.0, 20.0]);
        assert_eq!(s.fitness(), 30.0);
        s.set_route_fitness(1, 5.0);
        assert_eq!(s.fitness(), 15.0);
        assert!(s.is_feasible());
        s.set_route_fitness(0, crate::evaluation::INFEASIBLE_FITNESS);
        assert!(!s.is_feasible());
    }

    #[test]
    fn test_partition_duplicate() {
        let s = Solution::new(vec![vec![0, 1], vec![1]]);
        assert!(matches!(
            s.check_partition(2),
            Err(Error::DataInconsistency(_))
        ));
    }

    #[test]
    fn test_partition_missing() {
        let s = Solution::new(vec![vec![0], vec![2]]);
        assert!(s.check_partition(3).is_err());
    }

    #[test]
    fn test_partition_out_of_range() {
        let s = Solution::new(vec![vec![0, 5]]);
        assert!(s.check_partition(2).is_err());
    }
}
