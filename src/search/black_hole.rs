//! Black-hole search.
//!
//! The best member (the black hole) attracts every other member (a star):
//! each slot of a star moves a random fraction of the way toward the
//! target the black hole holds in the same slot, and is snapped to the
//! nearest real target. Afterwards stars are re-seeded with probability
//! `fitness(black hole) / Σ fitness`.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::debug;

use super::genetic::clamp_probability;
use super::operators::{attract, task_seeds};
use super::{SearchContext, SearchOutcome, SearchPhase, SearchStrategy, StrategyKind};
use crate::energy::EnergyCostModel;
use crate::error::{Error, Result};
use crate::models::{Population, Solution};

/// Black-hole search parameters.
///
/// # Examples
///
/// ```
/// use pdv_routing::search::BlackHoleSearch;
///
/// let bh = BlackHoleSearch::new(50, 0.25);
/// assert_eq!(bh.generations(), 50);
/// assert_eq!(bh.attraction_rate(), 0.25);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BlackHoleSearch {
    generations: usize,
    attraction_rate: f64,
}

impl BlackHoleSearch {
    /// Creates a black-hole search; the rate is clamped to `[0, 1]`.
    pub fn new(generations: usize, attraction_rate: f64) -> Self {
        Self {
            generations,
            attraction_rate: clamp_probability(attraction_rate),
        }
    }

    /// Generation budget.
    pub fn generations(&self) -> usize {
        self.generations
    }

    /// Per-slot probability of being pulled toward the black hole.
    pub fn attraction_rate(&self) -> f64 {
        self.attraction_rate
    }

    fn pull<M: EnergyCostModel + ?Sized>(
        &self,
        ctx: &SearchContext<'_, M>,
        star: &mut Solution,
        hole: &Solution,
        rng: &mut StdRng,
    ) {
        let instance = ctx.instance();
        for v in 0..star.num_routes() {
            for slot in 0..star.route(v).len() {
                if !rng.random_bool(self.attraction_rate) {
                    continue;
                }
                let (Some(target), Some(anchor)) = (star.target_at(v, slot), hole.target_at(v, slot))
                else {
                    continue;
                };
                let toward = instance.target(anchor).position();
                attract(star, instance, target, toward, rng);
            }
        }
        ctx.evaluator().evaluate_solution(star);
    }
}

impl Default for BlackHoleSearch {
    fn default() -> Self {
        Self::new(50, 0.5)
    }
}

/// Probability of swallowing a star: the black hole's share of the total
/// fitness, or zero when that share is undefined.
pub fn absorption_probability(hole_fitness: f64, total_fitness: f64) -> f64 {
    let p = hole_fitness / total_fitness;
    if p.is_finite() {
        p.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

impl SearchStrategy for BlackHoleSearch {
    fn kind(&self) -> StrategyKind {
        StrategyKind::BlackHole
    }

    fn search<M: EnergyCostModel + ?Sized>(
        &self,
        ctx: &SearchContext<'_, M>,
        population: &mut Population,
        rng: &mut StdRng,
    ) -> Result<SearchOutcome> {
        let mut outcome = SearchOutcome {
            phase: SearchPhase::Initialized,
            iterations: 0,
            evaluations: 0,
        };
        ctx.check(population)?;
        let routes = ctx.vehicles() as u64;

        for generation in 0..self.generations {
            if ctx.cancel().is_cancelled() {
                outcome.phase = SearchPhase::Cancelled;
                return Ok(outcome);
            }
            outcome.phase = SearchPhase::Evolving;

            let hole_index = population
                .best_index()
                .ok_or_else(|| Error::InvalidConfig("empty population".into()))?;
            let hole = population.members()[hole_index].clone();
            let seeds = task_seeds(rng, population.len());

            population
                .members_mut()
                .par_iter_mut()
                .zip(seeds.par_iter())
                .enumerate()
                .filter(|(i, _)| *i != hole_index)
                .for_each(|(_, (star, &seed))| {
                    let mut local = StdRng::seed_from_u64(seed);
                    self.pull(ctx, star, &hole, &mut local);
                });
            outcome.evaluations += (population.len() as u64 - 1) * routes;

            let hole_index = population.best_index().unwrap_or(hole_index);
            let last = generation + 1 == self.generations;
            let mut swallowed = 0usize;
            if !last {
                let p = absorption_probability(
                    population.members()[hole_index].fitness(),
                    population.total_fitness(),
                );
                let draws: Vec<bool> = (0..population.len())
                    .map(|i| i != hole_index && rng.random_bool(p))
                    .collect();
                swallowed = draws.iter().filter(|&&d| d).count();
                let seeds = task_seeds(rng, population.len());
                population
                    .members_mut()
                    .par_iter_mut()
                    .zip(seeds.par_iter())
                    .zip(draws.par_iter())
                    .filter(|(_, drawn)| **drawn)
                    .for_each(|((star, &seed), _)| {
                        *star = ctx.reseed(seed);
                    });
                outcome.evaluations += swallowed as u64 * routes;
            }

            ctx.check(population)?;
            outcome.iterations = generation + 1;
            debug!(
                generation,
                black_hole = hole_index,
                fitness = population.members()[hole_index].fitness(),
                swallowed,
                "black-hole generation complete"
            );
        }

        outcome.phase = SearchPhase::Converged;
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constructive::PopulationInitializer;
    use crate::energy::PdvEnergyModel;
    use crate::evaluation::{FitnessWeights, RouteFitnessEvaluator};
    use crate::search::test_support::scattered;
    use crate::search::CancelToken;

    fn run(seed: u64, generations: usize) -> (Population, SearchOutcome) {
        let inst = scattered(16);
        let model = PdvEnergyModel::default();
        let ev = RouteFitnessEvaluator::new(&inst, &model, FitnessWeights::default());
        let cancel = CancelToken::new();
        let ctx = SearchContext::new(&ev, PopulationInitializer::new(3), 2, &cancel);
        let mut rng = StdRng::seed_from_u64(seed);
        let mut pop = ctx.seed_population(6, &mut rng);
        let outcome = BlackHoleSearch::new(generations, 0.4)
            .search(&ctx, &mut pop, &mut rng)
            .unwrap();
        (pop, outcome)
    }

    #[test]
    fn test_absorption_probability() {
        assert_eq!(absorption_probability(10.0, 40.0), 0.25);
        assert_eq!(absorption_probability(10.0, 0.0), 0.0);
        assert_eq!(absorption_probability(-1000.0, 5.0), 0.0);
        assert_eq!(absorption_probability(50.0, 20.0), 1.0);
        assert_eq!(absorption_probability(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_partition_kept() {
        let (pop, outcome) = run(8, 7);
        assert!(pop.check_partition(16).is_ok());
        assert_eq!(outcome.iterations, 7);
        assert_eq!(outcome.phase, SearchPhase::Converged);
    }

    #[test]
    fn test_deterministic() {
        let (a, _) = run(13, 5);
        let (b, _) = run(13, 5);
        assert_eq!(a.members(), b.members());
    }

    #[test]
    fn test_zero_rate_leaves_last_generation_stars() {
        let inst = scattered(10);
        let model = PdvEnergyModel::default();
        let ev = RouteFitnessEvaluator::new(&inst, &model, FitnessWeights::default());
        let cancel = CancelToken::new();
        let ctx = SearchContext::new(&ev, PopulationInitializer::new(3), 2, &cancel);
        let mut rng = StdRng::seed_from_u64(3);
        let mut pop = ctx.seed_population(5, &mut rng);
        let before = pop.members().to_vec();
        // one generation is also the last one, so nothing is re-seeded
        BlackHoleSearch::new(1, 0.0)
            .search(&ctx, &mut pop, &mut rng)
            .unwrap();
        assert_eq!(pop.members(), &before[..]);
    }
}
