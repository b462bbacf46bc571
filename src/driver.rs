//! End-to-end optimization runs.

use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::config::OptimizerConfig;
use crate::constructive::{estimate_fleet_size, PopulationInitializer};
use crate::energy::{EnergyCostModel, PdvEnergyModel};
use crate::error::{Error, Result};
use crate::evaluation::RouteFitnessEvaluator;
use crate::models::{collect_targets, Instance, RoutePlan, SensorNode, Solution, Target};
use crate::search::{CancelToken, SearchContext, SearchStrategy, StrategyKind, Termination};

/// Result of one optimization run.
#[derive(Debug, Clone, Serialize)]
pub struct OptimizationReport {
    /// Strategy used.
    pub strategy: StrategyKind,
    /// Fleet size.
    pub vehicles: usize,
    /// Master seed of the run.
    pub seed: u64,
    /// Full runs performed.
    pub attempts: usize,
    /// Iterations of the winning attempt.
    pub iterations: usize,
    /// Route evaluations across all attempts.
    pub evaluations: u64,
    /// Aggregate fitness of the best solution.
    pub fitness: f64,
    /// Whether every route of the best solution is feasible.
    pub feasible: bool,
    /// How the winning attempt ended.
    pub termination: Termination,
    /// Wall-clock time.
    pub elapsed: Duration,
    /// Best partition, by target index.
    pub solution: Solution,
    /// Per-vehicle flights of the best solution.
    pub routes: Vec<RoutePlan>,
}

impl OptimizationReport {
    /// Distance flown by the whole fleet [m].
    pub fn total_distance(&self) -> f64 {
        self.routes.iter().map(RoutePlan::distance).sum()
    }

    /// Vehicle energy spent by the whole fleet [Wh].
    pub fn total_energy_cost(&self) -> f64 {
        self.routes.iter().map(RoutePlan::energy_cost).sum()
    }

    /// Energy delivered to sensors [J].
    ///
    /// Sum of [`RoutePlan::charged_energy`], so side charges relayed
    /// between neighbours on different routes appear once per route.
    pub fn total_charged_energy(&self) -> f64 {
        self.routes.iter().map(RoutePlan::charged_energy).sum()
    }

    /// Number of targets actually visited.
    pub fn served_targets(&self) -> usize {
        self.routes.iter().map(RoutePlan::len).sum()
    }

    /// Longest flight time among the vehicles [h].
    pub fn makespan(&self) -> f64 {
        self.routes
            .iter()
            .map(RoutePlan::flight_time)
            .fold(0.0, f64::max)
    }
}

/// Runs fleet sizing, seeding, search and reporting.
///
/// # Examples
///
/// ```
/// use pdv_routing::config::{OptimizerConfig, StrategyConfig};
/// use pdv_routing::driver::Optimizer;
/// use pdv_routing::models::{Point, Target};
///
/// let targets: Vec<Target> = (1..=4)
///     .map(|i| {
///         let c = 100.0 * i as f64;
///         Target::new(i, Point::new(c, c), 24.0, 37.5)
///     })
///     .collect();
/// let config = OptimizerConfig::default()
///     .with_min_requests(1)
///     .with_population_size(4)
///     .with_strategy(StrategyConfig::Genetic { generations: 5, crossover_rate: 0.5 })
///     .with_seed(1);
/// let optimizer = Optimizer::new(config).unwrap();
/// let report = optimizer.run(&targets, &optimizer.energy_model()).unwrap();
/// assert_eq!(report.vehicles, 1);
/// assert!(report.feasible);
/// assert_eq!(report.served_targets(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct Optimizer {
    config: OptimizerConfig,
}

impl Optimizer {
    /// Creates an optimizer after validating the configuration.
    pub fn new(config: OptimizerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Active configuration.
    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Energy model described by the configuration.
    pub fn energy_model(&self) -> PdvEnergyModel {
        PdvEnergyModel::new(self.config.vehicle.clone(), self.config.acoustic.clone())
    }

    /// Plans routes for every sensor below its recharge threshold.
    pub fn plan_sensors<M: EnergyCostModel + ?Sized>(
        &self,
        sensors: &[SensorNode],
        model: &M,
    ) -> Result<OptimizationReport> {
        let targets = collect_targets(sensors)?;
        self.run(&targets, model)
    }

    /// Plans routes for the given targets.
    ///
    /// # Errors
    ///
    /// - [`Error::InsufficientDemand`] when fewer targets than `min_requests` are given
    /// - [`Error::InvalidInput`] on duplicate ids or non-finite data
    /// - [`Error::InfeasibleTarget`] when a target is out of reach of a fresh vehicle
    /// - [`Error::DataInconsistency`] if a search step breaks the partition
    pub fn run<M: EnergyCostModel + ?Sized>(
        &self,
        targets: &[Target],
        model: &M,
    ) -> Result<OptimizationReport> {
        self.run_with_cancel(targets, model, &CancelToken::new())
    }

    /// Like [`Optimizer::run`], stopping early when `cancel` fires.
    #[instrument(skip_all, fields(targets = targets.len()))]
    pub fn run_with_cancel<M: EnergyCostModel + ?Sized>(
        &self,
        targets: &[Target],
        model: &M,
        cancel: &CancelToken,
    ) -> Result<OptimizationReport> {
        let start = Instant::now();
        let config = &self.config;

        if targets.len() < config.min_requests {
            info!(
                requests = targets.len(),
                required = config.min_requests,
                "not enough recharge requests, skipping"
            );
            return Err(Error::InsufficientDemand {
                requests: targets.len(),
                required: config.min_requests,
            });
        }

        let cancel = match config.time_limit_ms {
            Some(ms) => cancel.clone().with_time_limit(Duration::from_millis(ms)),
            None => cancel.clone(),
        };

        let instance = Instance::new(targets.to_vec())?;
        let vehicles = estimate_fleet_size(&instance, model)?;
        let evaluator = RouteFitnessEvaluator::new(&instance, model, config.weights)
            .with_charging(config.charging);
        let ctx = SearchContext::new(
            &evaluator,
            PopulationInitializer::new(config.neighborhood),
            vehicles,
            &cancel,
        );
        let strategy = config.strategy.build();
        let seed = config.seed.unwrap_or_else(rand::random);
        let mut master = StdRng::seed_from_u64(seed);

        info!(
            strategy = ?strategy.kind(),
            vehicles,
            seed,
            population = config.population_size,
            "optimization started"
        );

        let mut best: Option<Solution> = None;
        let mut attempts = 0;
        let mut iterations = 0;
        let mut evaluations = 0;
        let mut termination = Termination::Completed;

        while attempts < config.max_attempts {
            attempts += 1;
            let mut rng = StdRng::seed_from_u64(master.random());
            let mut population = ctx.seed_population(config.population_size, &mut rng);
            evaluations += (population.len() * vehicles) as u64;

            let outcome = strategy.search(&ctx, &mut population, &mut rng)?;
            evaluations += outcome.evaluations;

            let candidate = population
                .best()
                .cloned()
                .ok_or_else(|| Error::DataInconsistency("empty population".into()))?;
            let improves = best
                .as_ref()
                .map_or(true, |b| candidate.fitness() > b.fitness());
            if improves {
                best = Some(candidate);
                iterations = outcome.iterations;
                termination = outcome.termination();
            }

            let feasible = best.as_ref().is_some_and(Solution::is_feasible);
            if feasible || outcome.termination() == Termination::Cancelled {
                if outcome.termination() == Termination::Cancelled {
                    warn!(attempt = attempts, "optimization cancelled");
                    termination = Termination::Cancelled;
                }
                break;
            }
            if attempts < config.max_attempts {
                warn!(
                    attempt = attempts,
                    fitness = best.as_ref().map(Solution::fitness),
                    "best solution infeasible, retrying with a fresh seed"
                );
            }
        }

        let best = best.ok_or_else(|| Error::DataInconsistency("no solution produced".into()))?;
        let routes: Vec<RoutePlan> = best
            .routes()
            .iter()
            .enumerate()
            .map(|(v, route)| evaluator.plan(v, route))
            .collect();

        let report = OptimizationReport {
            strategy: strategy.kind(),
            vehicles,
            seed,
            attempts,
            iterations,
            evaluations,
            fitness: best.fitness(),
            feasible: best.is_feasible(),
            termination,
            elapsed: start.elapsed(),
            solution: best,
            routes,
        };

        info!(
            fitness = report.fitness,
            feasible = report.feasible,
            attempts,
            elapsed_ms = report.elapsed.as_millis() as u64,
            "optimization finished"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EffortLevel, Randomness, StrategyConfig};
    use crate::models::{Point, SensorKind};

    fn diagonal() -> Vec<Target> {
        (1..=4)
            .map(|i| {
                let c = 100.0 * i as f64;
                Target::new(i, Point::new(c, c), 24.0, 37.5)
            })
            .collect()
    }

    fn field(n: usize) -> Vec<Target> {
        (0..n)
            .map(|i| {
                let x = ((i * 7) % 11) as f64 * 120.0 + 30.0;
                let y = ((i * 5) % 13) as f64 * 110.0 + 20.0 + i as f64;
                Target::new(i + 100, Point::new(x, y), 24.0, 37.5)
            })
            .collect()
    }

    fn config(strategy: StrategyConfig) -> OptimizerConfig {
        OptimizerConfig::default()
            .with_min_requests(1)
            .with_population_size(6)
            .with_strategy(strategy)
            .with_seed(99)
    }

    fn strategies() -> Vec<StrategyConfig> {
        vec![
            StrategyConfig::Genetic {
                generations: 8,
                crossover_rate: 0.5,
            },
            StrategyConfig::BlackHole {
                generations: 8,
                attraction_rate: 0.5,
            },
            StrategyConfig::Annealing {
                initial_temperature: 100.0,
                min_temperature: 1.0,
                cooling_factor: 0.9,
                acceptance_scale: 500.0,
            },
        ]
    }

    #[test]
    fn test_insufficient_demand() {
        let opt = Optimizer::new(OptimizerConfig::default()).unwrap();
        let err = opt.run(&diagonal(), &opt.energy_model()).unwrap_err();
        assert!(err.is_skip());
        assert_eq!(
            err,
            Error::InsufficientDemand {
                requests: 4,
                required: 30
            }
        );
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(Optimizer::new(OptimizerConfig::default().with_population_size(0)).is_err());
    }

    #[test]
    fn test_diagonal_single_vehicle() {
        for strategy in strategies() {
            let opt = Optimizer::new(config(strategy)).unwrap();
            let report = opt.run(&diagonal(), &opt.energy_model()).unwrap();
            assert_eq!(report.vehicles, 1);
            assert_eq!(report.routes.len(), 1);
            assert!(report.feasible);
            assert_eq!(report.routes[0].target_ids(), vec![1, 2, 3, 4]);
            assert_eq!(report.routes[0].served_ratio(), 1.0);
            assert_eq!(report.termination, Termination::Completed);
        }
    }

    #[test]
    fn test_partition_in_report() {
        let targets = field(24);
        for strategy in strategies() {
            let opt = Optimizer::new(config(strategy)).unwrap();
            let model = opt.energy_model().with_capacity(110.0);
            let report = opt.run(&targets, &model).unwrap();
            assert!(report.vehicles >= 1);
            assert!(report.solution.check_partition(targets.len()).is_ok());
            assert_eq!(report.routes.len(), report.vehicles);
            if report.feasible {
                assert_eq!(report.served_targets(), targets.len());
            }
        }
    }

    #[test]
    fn test_deterministic_per_strategy() {
        let targets = field(20);
        for strategy in strategies() {
            let opt = Optimizer::new(config(strategy)).unwrap();
            let model = opt.energy_model();
            let a = opt.run(&targets, &model).unwrap();
            let b = opt.run(&targets, &model).unwrap();
            assert_eq!(a.solution, b.solution);
            assert_eq!(a.fitness, b.fitness);
        }
    }

    #[test]
    fn test_cancelled_run_reports_best_so_far() {
        let opt = Optimizer::new(config(StrategyConfig::genetic(
            EffortLevel::High,
            Randomness::Medium,
        )))
        .unwrap();
        let cancel = CancelToken::new();
        cancel.cancel();
        let report = opt
            .run_with_cancel(&field(12), &opt.energy_model(), &cancel)
            .unwrap();
        assert_eq!(report.termination, Termination::Cancelled);
        assert_eq!(report.iterations, 0);
        assert!(report.solution.check_partition(12).is_ok());
    }

    #[test]
    fn test_unreachable_target_is_fatal() {
        let opt = Optimizer::new(config(StrategyConfig::default())).unwrap();
        let mut targets = diagonal();
        targets.push(Target::new(9, Point::new(50_000.0, 0.0), 24.0, 37.5));
        let err = opt.run(&targets, &opt.energy_model()).unwrap_err();
        assert!(matches!(err, Error::InfeasibleTarget { id: 9, .. }));
    }

    #[test]
    fn test_plan_sensors() {
        let sensors: Vec<SensorNode> = (0..6)
            .map(|i| {
                let v = if i % 2 == 0 { 3.0 } else { 4.9 };
                SensorNode::new(i, Point::new(50.0 * (i + 1) as f64, 10.0), v, SensorKind::Pressure)
            })
            .collect();
        let opt = Optimizer::new(config(StrategyConfig::default())).unwrap();
        let report = opt.plan_sensors(&sensors, &opt.energy_model()).unwrap();
        let mut ids: Vec<usize> = report.routes.iter().flat_map(RoutePlan::target_ids).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![0, 2, 4]);
    }

    #[test]
    fn test_report_serializes() {
        let opt = Optimizer::new(config(StrategyConfig::default())).unwrap();
        let report = opt.run(&diagonal(), &opt.energy_model()).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["strategy"], "genetic");
        assert_eq!(json["vehicles"], 1);
        assert!(json["routes"][0]["visits"].is_array());
        assert!(report.total_distance() > 0.0);
        assert!(report.total_energy_cost() > 0.0);
        assert!((report.total_charged_energy() - 96.0).abs() < 1e-9);
        assert!(report.makespan() > 0.0);
    }
}
