//! Population-based search strategies.
//!
//! Three interchangeable strategies drive a population of partitions:
//!
//! - [`GeneticSearch`]: neighbour-swap trials copied from random donors, greedy replacement
//! - [`BlackHoleSearch`]: stars pulled toward the best member, probabilistic re-seeding
//! - [`SimulatedAnnealingSearch`]: independent Metropolis chains per member
//!
//! All of them share a [`SearchContext`] (evaluator, initializer, fleet
//! size, cancellation) and keep the partition invariant, which is checked
//! at every generation boundary.
//!
//! Members are processed in parallel with `rayon`. Every parallel task
//! gets its own `StdRng` seeded from the run's generator, so a fixed seed
//! reproduces the same result on any number of threads.

mod annealing;
mod black_hole;
mod cancel;
mod genetic;
pub mod operators;

pub use annealing::SimulatedAnnealingSearch;
pub use black_hole::BlackHoleSearch;
pub use cancel::CancelToken;
pub use genetic::GeneticSearch;

use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::constructive::PopulationInitializer;
use crate::energy::EnergyCostModel;
use crate::error::Result;
use crate::evaluation::RouteFitnessEvaluator;
use crate::models::{Instance, Population};

/// Identifies a strategy in reports and configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Genetic search.
    Genetic,
    /// Black-hole search.
    BlackHole,
    /// Simulated annealing.
    Annealing,
}

/// Lifecycle of a search run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchPhase {
    /// Population built and evaluated, no generation run yet.
    Initialized,
    /// Generations in progress.
    Evolving,
    /// Iteration budget exhausted.
    Converged,
    /// Stopped early by a [`CancelToken`].
    Cancelled,
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// The full iteration budget ran.
    Completed,
    /// Cancelled; the best solution found so far is reported.
    Cancelled,
}

/// Counters returned by a strategy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchOutcome {
    /// Final phase.
    pub phase: SearchPhase,
    /// Generations (GA, BH) or cooling steps per member (SA) completed.
    pub iterations: usize,
    /// Route evaluations performed.
    pub evaluations: u64,
}

impl SearchOutcome {
    /// Termination derived from the final phase.
    pub fn termination(&self) -> Termination {
        match self.phase {
            SearchPhase::Cancelled => Termination::Cancelled,
            _ => Termination::Completed,
        }
    }
}

/// Read-only data shared by every task of a run.
pub struct SearchContext<'a, M: EnergyCostModel + ?Sized> {
    evaluator: &'a RouteFitnessEvaluator<'a, M>,
    initializer: PopulationInitializer,
    vehicles: usize,
    cancel: &'a CancelToken,
}

impl<'a, M: EnergyCostModel + ?Sized> SearchContext<'a, M> {
    /// Creates a context for `vehicles` routes per solution.
    pub fn new(
        evaluator: &'a RouteFitnessEvaluator<'a, M>,
        initializer: PopulationInitializer,
        vehicles: usize,
        cancel: &'a CancelToken,
    ) -> Self {
        Self {
            evaluator,
            initializer,
            vehicles: vehicles.max(1),
            cancel,
        }
    }

    /// Route evaluator.
    pub fn evaluator(&self) -> &'a RouteFitnessEvaluator<'a, M> {
        self.evaluator
    }

    /// Shared run data.
    pub fn instance(&self) -> &'a Instance {
        self.evaluator.instance()
    }

    /// Population initializer, also used for re-seeding.
    pub fn initializer(&self) -> &PopulationInitializer {
        &self.initializer
    }

    /// Neighbourhood bound for rank-based moves.
    pub fn neighborhood(&self) -> usize {
        self.initializer.neighborhood()
    }

    /// Routes per solution.
    pub fn vehicles(&self) -> usize {
        self.vehicles
    }

    /// Cancellation token.
    pub fn cancel(&self) -> &CancelToken {
        self.cancel
    }

    /// Builds and evaluates an initial population.
    pub fn seed_population(&self, size: usize, rng: &mut StdRng) -> Population {
        let mut members =
            self.initializer
                .initialize(self.instance(), self.vehicles, size, rng);
        members
            .par_iter_mut()
            .for_each(|s| self.evaluator.evaluate_solution(s));
        Population::new(members)
    }

    /// Re-seeds one member from scratch with its own generator.
    pub(crate) fn reseed(&self, seed: u64) -> crate::models::Solution {
        let mut local = StdRng::seed_from_u64(seed);
        let mut s = self
            .initializer
            .build(self.instance(), self.vehicles, &mut local);
        self.evaluator.evaluate_solution(&mut s);
        s
    }

    /// Checks the partition invariant on every member.
    pub(crate) fn check(&self, population: &Population) -> Result<()> {
        population.check_partition(self.instance().len())
    }
}

/// A population-improvement strategy.
pub trait SearchStrategy {
    /// Strategy identifier.
    fn kind(&self) -> StrategyKind;

    /// Improves `population` in place until the budget runs out or the
    /// run is cancelled.
    ///
    /// # Errors
    ///
    /// [`Error::DataInconsistency`](crate::error::Error::DataInconsistency)
    /// if a member stops partitioning the target set.
    fn search<M: EnergyCostModel + ?Sized>(
        &self,
        ctx: &SearchContext<'_, M>,
        population: &mut Population,
        rng: &mut StdRng,
    ) -> Result<SearchOutcome>;
}

/// One of the three strategies.
#[derive(Debug, Clone, PartialEq)]
pub enum Strategy {
    /// Genetic search.
    Genetic(GeneticSearch),
    /// Black-hole search.
    BlackHole(BlackHoleSearch),
    /// Simulated annealing.
    Annealing(SimulatedAnnealingSearch),
}

impl SearchStrategy for Strategy {
    fn kind(&self) -> StrategyKind {
        match self {
            Strategy::Genetic(s) => s.kind(),
            Strategy::BlackHole(s) => s.kind(),
            Strategy::Annealing(s) => s.kind(),
        }
    }

    fn search<M: EnergyCostModel + ?Sized>(
        &self,
        ctx: &SearchContext<'_, M>,
        population: &mut Population,
        rng: &mut StdRng,
    ) -> Result<SearchOutcome> {
        match self {
            Strategy::Genetic(s) => s.search(ctx, population, rng),
            Strategy::BlackHole(s) => s.search(ctx, population, rng),
            Strategy::Annealing(s) => s.search(ctx, population, rng),
        }
    }
}
