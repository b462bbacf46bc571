//! Simulated annealing.
//!
//! Each member runs its own Metropolis chain; members do not compete.
//! A move picks a random non-empty route, a random target in it, and swaps
//! that target with a rank-selected neighbour. Only the touched routes are
//! re-evaluated. A move that makes a touched route infeasible is dropped
//! without the Metropolis test.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::debug;

use super::operators::{neighbor_swap, task_seeds};
use super::{SearchContext, SearchOutcome, SearchPhase, SearchStrategy, StrategyKind};
use crate::energy::EnergyCostModel;
use crate::error::{Error, Result};
use crate::models::{Population, Solution};

/// Annealing schedule.
///
/// # Examples
///
/// ```
/// use pdv_routing::search::SimulatedAnnealingSearch;
///
/// let sa = SimulatedAnnealingSearch::new(1e4, 1e-5, 0.95);
/// assert_eq!(sa.steps(), 405);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatedAnnealingSearch {
    initial_temperature: f64,
    min_temperature: f64,
    cooling_factor: f64,
    acceptance_scale: f64,
}

impl SimulatedAnnealingSearch {
    /// Creates a geometric schedule from `initial` down to `min`.
    pub fn new(initial_temperature: f64, min_temperature: f64, cooling_factor: f64) -> Self {
        Self {
            initial_temperature,
            min_temperature,
            cooling_factor,
            acceptance_scale: 500.0,
        }
    }

    /// Sets the factor applied to fitness differences before the
    /// Metropolis test.
    pub fn with_acceptance_scale(mut self, scale: f64) -> Self {
        self.acceptance_scale = scale;
        self
    }

    /// Starting temperature of every chain.
    pub fn initial_temperature(&self) -> f64 {
        self.initial_temperature
    }

    /// Chains stop once the temperature is no longer above this.
    pub fn min_temperature(&self) -> f64 {
        self.min_temperature
    }

    /// Geometric cooling factor.
    pub fn cooling_factor(&self) -> f64 {
        self.cooling_factor
    }

    /// Scale applied to fitness differences.
    pub fn acceptance_scale(&self) -> f64 {
        self.acceptance_scale
    }

    /// Number of accept/reject decisions per chain; zero for a schedule
    /// that never cools.
    pub fn steps(&self) -> usize {
        if self.validate().is_err() {
            return 0;
        }
        let mut temp = self.initial_temperature;
        let mut steps = 0;
        while temp > self.min_temperature {
            temp *= self.cooling_factor;
            steps += 1;
        }
        steps
    }

    fn validate(&self) -> Result<()> {
        if !(self.cooling_factor > 0.0 && self.cooling_factor < 1.0) {
            return Err(Error::InvalidConfig(format!(
                "cooling factor {} outside (0, 1)",
                self.cooling_factor
            )));
        }
        if !(self.min_temperature > 0.0 && self.initial_temperature.is_finite()) {
            return Err(Error::InvalidConfig(
                "temperatures must be positive and finite".into(),
            ));
        }
        Ok(())
    }

    /// Metropolis test on a scaled fitness difference.
    fn accept(&self, delta: f64, temperature: f64, rng: &mut StdRng) -> bool {
        delta >= 0.0 || (delta / temperature).exp() > rng.random::<f64>()
    }

    fn anneal<M: EnergyCostModel + ?Sized>(
        &self,
        ctx: &SearchContext<'_, M>,
        member: &mut Solution,
        rng: &mut StdRng,
    ) -> u64 {
        let instance = ctx.instance();
        let evaluator = ctx.evaluator();
        let mut evaluations = 0;
        let mut temp = self.initial_temperature;

        while temp > self.min_temperature {
            let occupied: Vec<usize> = (0..member.num_routes())
                .filter(|&v| !member.route(v).is_empty())
                .collect();
            if occupied.is_empty() {
                break;
            }
            let v = occupied[rng.random_range(0..occupied.len())];
            let slot = rng.random_range(0..member.route(v).len());

            let mut trial = member.clone();
            let moved = trial
                .target_at(v, slot)
                .and_then(|t| neighbor_swap(&mut trial, instance, t, ctx.neighborhood(), rng));
            if let Some((a, b)) = moved {
                evaluations += if a == b { 1 } else { 2 };
                if evaluator.reevaluate(&mut trial, &[a, b]) {
                    let delta = (trial.fitness() - member.fitness()) * self.acceptance_scale;
                    if self.accept(delta, temp, rng) {
                        *member = trial;
                    }
                }
            }
            temp *= self.cooling_factor;
        }
        evaluations
    }
}

impl Default for SimulatedAnnealingSearch {
    fn default() -> Self {
        Self::new(3e4, 1e-5, 0.96)
    }
}

impl SearchStrategy for SimulatedAnnealingSearch {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Annealing
    }

    fn search<M: EnergyCostModel + ?Sized>(
        &self,
        ctx: &SearchContext<'_, M>,
        population: &mut Population,
        rng: &mut StdRng,
    ) -> Result<SearchOutcome> {
        self.validate()?;
        ctx.check(population)?;
        let seeds = task_seeds(rng, population.len());

        let results: Vec<Option<u64>> = population
            .members_mut()
            .par_iter_mut()
            .zip(seeds.par_iter())
            .map(|(member, &seed)| {
                if ctx.cancel().is_cancelled() {
                    return None;
                }
                let mut local = StdRng::seed_from_u64(seed);
                Some(self.anneal(ctx, member, &mut local))
            })
            .collect();

        ctx.check(population)?;
        let cancelled = results.iter().any(Option::is_none);
        let evaluations = results.iter().flatten().sum();
        debug!(
            members = population.len(),
            evaluations,
            best = population.best().map(Solution::fitness),
            cancelled,
            "annealing complete"
        );

        Ok(SearchOutcome {
            phase: if cancelled {
                SearchPhase::Cancelled
            } else {
                SearchPhase::Converged
            },
            iterations: if cancelled { 0 } else { self.steps() },
            evaluations,
        })
    }
}
