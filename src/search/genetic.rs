//! Genetic search.
//!
//! # Operators
//!
//! - **Donor copy**: each member's trial starts as a copy of a random other member
//! - **Crossover**: every slot is swapped with a rank-selected neighbour with probability `crossover_rate`
//! - **Selection**: a member is replaced iff its trial scores strictly higher

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::debug;

use super::operators::{neighbor_swap, random_other, task_seeds};
use super::{SearchContext, SearchOutcome, SearchPhase, SearchStrategy, StrategyKind};
use crate::energy::EnergyCostModel;
use crate::error::Result;
use crate::models::{Population, Solution};

/// Genetic search parameters.
///
/// # Examples
///
/// ```
/// use pdv_routing::search::GeneticSearch;
///
/// let ga = GeneticSearch::new(100, 0.4);
/// assert_eq!(ga.generations(), 100);
/// assert_eq!(ga.crossover_rate(), 0.4);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct GeneticSearch {
    generations: usize,
    crossover_rate: f64,
}

impl GeneticSearch {
    /// Creates a genetic search; the rate is clamped to `[0, 1]`.
    pub fn new(generations: usize, crossover_rate: f64) -> Self {
        Self {
            generations,
            crossover_rate: clamp_probability(crossover_rate),
        }
    }

    /// Generation budget.
    pub fn generations(&self) -> usize {
        self.generations
    }

    /// Per-slot crossover probability.
    pub fn crossover_rate(&self) -> f64 {
        self.crossover_rate
    }

    fn trial<M: EnergyCostModel + ?Sized>(
        &self,
        ctx: &SearchContext<'_, M>,
        donor: &Solution,
        rng: &mut StdRng,
    ) -> Solution {
        let instance = ctx.instance();
        let mut trial = donor.clone();
        for v in 0..trial.num_routes() {
            for slot in 0..trial.route(v).len() {
                if !rng.random_bool(self.crossover_rate) {
                    continue;
                }
                if let Some(target) = trial.target_at(v, slot) {
                    neighbor_swap(&mut trial, instance, target, ctx.neighborhood(), rng);
                }
            }
        }
        ctx.evaluator().evaluate_solution(&mut trial);
        trial
    }
}

impl Default for GeneticSearch {
    fn default() -> Self {
        Self::new(50, 0.5)
    }
}

impl SearchStrategy for GeneticSearch {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Genetic
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

        for generation in 0..self.generations {
            if ctx.cancel().is_cancelled() {
                outcome.phase = SearchPhase::Cancelled;
                return Ok(outcome);
            }
            outcome.phase = SearchPhase::Evolving;

            let donors: Vec<Solution> = population.members().to_vec();
            let size = donors.len();
            let seeds = task_seeds(rng, size);

            let evaluations: u64 = population
                .members_mut()
                .par_iter_mut()
                .zip(seeds.par_iter())
                .enumerate()
                .map(|(i, (member, &seed))| {
                    let mut local = StdRng::seed_from_u64(seed);
                    let donor = &donors[random_other(size, i, &mut local)];
                    let trial = self.trial(ctx, donor, &mut local);
                    let evaluated = trial.num_routes() as u64;
                    if trial.fitness() > member.fitness() {
                        *member = trial;
                    }
                    evaluated
                })
                .sum();

            ctx.check(population)?;
            outcome.iterations = generation + 1;
            outcome.evaluations += evaluations;
            debug!(
                generation,
                best = population.best().map(Solution::fitness),
                "genetic generation complete"
            );
        }

        outcome.phase = SearchPhase::Converged;
        Ok(outcome)
    }
}

pub(super) fn clamp_probability(p: f64) -> f64 {
    if p.is_nan() {
        0.0
    } else {
        p.clamp(0.0, 1.0)
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
        let inst = scattered(18);
        let model = PdvEnergyModel::default();
        let ev = RouteFitnessEvaluator::new(&inst, &model, FitnessWeights::default());
        let cancel = CancelToken::new();
        let ctx = SearchContext::new(&ev, PopulationInitializer::new(4), 3, &cancel);
        let mut rng = StdRng::seed_from_u64(seed);
        let mut pop = ctx.seed_population(8, &mut rng);
        let outcome = GeneticSearch::new(generations, 0.3)
            .search(&ctx, &mut pop, &mut rng)
            .unwrap();
        (pop, outcome)
    }

    #[test]
    fn test_best_never_decreases() {
        let inst = scattered(18);
        let model = PdvEnergyModel::default();
        let ev = RouteFitnessEvaluator::new(&inst, &model, FitnessWeights::default());
        let cancel = CancelToken::new();
        let ctx = SearchContext::new(&ev, PopulationInitializer::new(4), 3, &cancel);
        let mut rng = StdRng::seed_from_u64(2);
        let mut pop = ctx.seed_population(8, &mut rng);
        let before: Vec<f64> = pop.members().iter().map(Solution::fitness).collect();
        GeneticSearch::new(10, 0.3)
            .search(&ctx, &mut pop, &mut rng)
            .unwrap();
        for (member, old) in pop.members().iter().zip(before) {
            assert!(member.fitness() >= old);
        }
    }

    #[test]
    fn test_partition_and_counters() {
        let (pop, outcome) = run(4, 6);
        assert!(pop.check_partition(18).is_ok());
        assert_eq!(outcome.iterations, 6);
        assert_eq!(outcome.phase, SearchPhase::Converged);
        assert_eq!(outcome.evaluations, 6 * 8 * 3);
    }

    #[test]
    fn test_deterministic() {
        let (a, _) = run(21, 5);
        let (b, _) = run(21, 5);
        assert_eq!(a.members(), b.members());
    }

    #[test]
    fn test_cancelled_before_start() {
        let inst = scattered(6);
        let model = PdvEnergyModel::default();
        let ev = RouteFitnessEvaluator::new(&inst, &model, FitnessWeights::default());
        let cancel = CancelToken::new();
        cancel.cancel();
        let ctx = SearchContext::new(&ev, PopulationInitializer::default(), 2, &cancel);
        let mut rng = StdRng::seed_from_u64(0);
        let mut pop = ctx.seed_population(4, &mut rng);
        let outcome = GeneticSearch::default()
            .search(&ctx, &mut pop, &mut rng)
            .unwrap();
        assert_eq!(outcome.phase, SearchPhase::Cancelled);
        assert_eq!(outcome.iterations, 0);
    }

    #[test]
    fn test_rate_clamped() {
        assert_eq!(GeneticSearch::new(1, 2.0).crossover_rate(), 1.0);
        assert_eq!(GeneticSearch::new(1, f64::NAN).crossover_rate(), 0.0);
    }
}
