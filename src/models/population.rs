//! Fixed-size population of candidate solutions.

use serde::{Deserialize, Serialize};

use super::Solution;
use crate::error::Result;

/// An ordered collection of solutions.
///
/// The aggregate fitness ordering, not member identity, decides the best
/// member. Ties resolve to the lowest index.
///
/// # Examples
///
/// ```
/// use pdv_routing::models::{Population, Solution};
///
/// let mut a = Solution::new(vec![vec![0]]);
/// a.set_fitness(vec![4.0]);
/// let mut b = Solution::new(vec![vec![0]]);
/// b.set_fitness(vec![9.0]);
/// let pop = Population::new(vec![a, b]);
/// assert_eq!(pop.best_index(), Some(1));
/// assert_eq!(pop.total_fitness(), 13.0);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Population {
    members: Vec<Solution>,
}

impl Population {
    /// Wraps a set of solutions.
    pub fn new(members: Vec<Solution>) -> Self {
        Self { members }
    }

    /// Members in order.
    pub fn members(&self) -> &[Solution] {
        &self.members
    }

    /// Mutable access to the members.
    pub fn members_mut(&mut self) -> &mut [Solution] {
        &mut self.members
    }

    /// Member at `index`.
    pub fn get(&self, index: usize) -> Option<&Solution> {
        self.members.get(index)
    }

    /// Population size.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns `true` if there are no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Index of the member with the highest aggregate fitness.
    pub fn best_index(&self) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (i, s) in self.members.iter().enumerate() {
            match best {
                Some((_, f)) if s.fitness() <= f => {}
                _ => best = Some((i, s.fitness())),
            }
        }
        best.map(|(i, _)| i)
    }

    /// Member with the highest aggregate fitness.
    pub fn best(&self) -> Option<&Solution> {
        self.best_index().map(|i| &self.members[i])
    }

    /// Sum of the aggregate fitness of all members.
    pub fn total_fitness(&self) -> f64 {
        self.members.iter().map(Solution::fitness).sum()
    }

    /// Checks the partition invariant on every member.
    pub fn check_partition(&self, num_targets: usize) -> Result<()> {
        self.members
            .iter()
            .try_for_each(|s| s.check_partition(num_targets))
    }

    /// Consumes the population, returning its members.
    pub fn into_members(self) -> Vec<Solution> {
        self.members
    }
}
